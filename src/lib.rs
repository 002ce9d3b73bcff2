//! FinancesK SDK for Rust.
//!
//! A client for the FinancesK personal-finance backend. Each domain
//! (accounts, transactions, categories, bank institutions, balance) has one
//! authoritative [`Store`] that owns its client-side state and talks to the
//! backend through an injected gateway. Consumers read snapshots, subscribe
//! to changes, and compute derived values with the pure functions in
//! [`views`].
//!
//! # Quick start
//!
//! ```no_run
//! use financesk_sdk::models::{AccountQuery, LoginRequest};
//! use financesk_sdk::{views, FinanceSdk};
//!
//! # async fn example() -> financesk_sdk::Result<()> {
//! let sdk = FinanceSdk::builder().build()?;
//! let user = sdk.session().login(&LoginRequest::new("ana", "s3cret")).await?;
//!
//! sdk.accounts().load(AccountQuery::for_user(user.id)).await?;
//! let cents = views::total_balance(sdk.accounts().state().items());
//! println!("{}", financesk_sdk::currency::format_brl(financesk_sdk::currency::from_cents(cents)));
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod currency;
pub mod error;
pub mod gateway;
pub mod http;
pub mod models;
pub mod onboarding;
pub mod privacy;
pub mod query;
pub mod storage;
pub mod store;
pub mod validation;
pub mod views;

pub use auth::Session;
pub use error::{ErrorDescriptor, ErrorKind, FinanceError, Result};
pub use gateway::{Page, ReadGateway, WriteGateway};
pub use http::{ApiClient, TokenSource};
pub use onboarding::OnboardingSequencer;
pub use privacy::PrivacySettings;
pub use query::QueryParams;
pub use store::{BalanceStore, LoadFailurePolicy, Pagination, Store, StoreState};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use gateway::{
    HttpAccountGateway, HttpBalanceGateway, HttpBankInstitutionGateway, HttpCategoryGateway,
    HttpTransactionGateway,
};
use storage::{FileStorage, MemoryStorage, SharedStorage};

pub type AccountStore<G = HttpAccountGateway> = Store<G>;
pub type TransactionStore<G = HttpTransactionGateway> = Store<G>;
pub type CategoryStore<G = HttpCategoryGateway> = Store<G>;
pub type BankInstitutionStore<G = HttpBankInstitutionGateway> = Store<G>;

// ---------------------------------------------------------------------------
// FinanceSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`FinanceSdk`].
///
/// Use [`FinanceSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](FinanceSdkBuilder::build).
pub struct FinanceSdkBuilder {
    api_url: Option<String>,
    timeout: Duration,
    storage_dir: Option<PathBuf>,
    in_memory_storage: bool,
}

impl Default for FinanceSdkBuilder {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            storage_dir: None,
            in_memory_storage: false,
        }
    }
}

impl FinanceSdkBuilder {
    /// Set the backend base URL, e.g. `https://api.example.com/api/v1`.
    ///
    /// If not set, `FINANCESK_API_URL` is consulted, then
    /// [`config::DEFAULT_API_URL`].
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the per-request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory for the persisted session and preferences.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/financesk-sdk` on Linux).
    pub fn storage_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep session and preferences in memory only. Defaults to `false`.
    pub fn in_memory_storage(mut self, in_memory: bool) -> Self {
        self.in_memory_storage = in_memory;
        self
    }

    /// Build the SDK. No request is made until a store operation runs.
    pub fn build(self) -> Result<FinanceSdk> {
        let storage: SharedStorage = if self.in_memory_storage {
            Arc::new(MemoryStorage::new())
        } else {
            Arc::new(FileStorage::new(self.storage_dir)?)
        };

        let api_url = self.api_url.unwrap_or_else(config::api_url_from_env);
        let client = ApiClient::new(&api_url, self.timeout, TokenSource::default())?;
        tracing::debug!(api_url = %client.base_url(), "building FinancesK SDK");

        Ok(FinanceSdk {
            accounts: Store::new("accounts", HttpAccountGateway::new(client.clone())),
            transactions: Store::new("transactions", HttpTransactionGateway::new(client.clone()))
                .with_failure_policy(LoadFailurePolicy::ResetToEmpty),
            categories: Store::new("categories", HttpCategoryGateway::new(client.clone())),
            bank_institutions: Store::new(
                "bank_institutions",
                HttpBankInstitutionGateway::new(client.clone()),
            )
            .with_failure_policy(LoadFailurePolicy::ResetToEmpty),
            balance: BalanceStore::new(HttpBalanceGateway::new(client.clone())),
            session: Session::new(client.clone(), storage.clone()),
            onboarding: OnboardingSequencer::with_default_steps(storage.clone()),
            privacy: PrivacySettings::new(storage),
            client,
        })
    }
}

// ---------------------------------------------------------------------------
// FinanceSdk
// ---------------------------------------------------------------------------

/// The main entry point: one store per domain plus session and preferences,
/// all sharing a single [`ApiClient`].
///
/// Created via [`FinanceSdk::builder()`].
pub struct FinanceSdk {
    client: ApiClient,
    accounts: AccountStore,
    transactions: TransactionStore,
    categories: CategoryStore,
    bank_institutions: BankInstitutionStore,
    balance: BalanceStore<HttpBalanceGateway>,
    session: Session,
    onboarding: OnboardingSequencer,
    privacy: PrivacySettings,
}

impl FinanceSdk {
    pub fn builder() -> FinanceSdkBuilder {
        FinanceSdkBuilder::default()
    }

    // -- Stores -------------------------------------------------------------

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Transactions. A failed search clears the list.
    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    /// Read-only bank institution catalogue. A failed fetch clears the list.
    pub fn bank_institutions(&self) -> &BankInstitutionStore {
        &self.bank_institutions
    }

    pub fn balance(&self) -> &BalanceStore<HttpBalanceGateway> {
        &self.balance
    }

    // -- Session and preferences ----------------------------------------------

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn onboarding(&self) -> &OnboardingSequencer {
        &self.onboarding
    }

    pub fn privacy(&self) -> &PrivacySettings {
        &self.privacy
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl fmt::Display for FinanceSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FinanceSdk(api_url={}, authenticated={})",
            self.client.base_url(),
            self.session.is_authenticated()
        )
    }
}
