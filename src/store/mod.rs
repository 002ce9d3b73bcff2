//! Domain state stores.
//!
//! A [`Store`] is the single authoritative holder of one domain's client-side
//! state: the entity list, a `loading` flag, optional pagination counters, and
//! the most recent error. It is the only writer of that state. Consumers read
//! it through [`Store::state`] / [`Store::snapshot`] and follow changes with
//! [`Store::subscribe`]; they never mutate it.
//!
//! Every operation settles `loading` on every path, records failures in
//! `last_error`, and also returns the error to its caller. Loads carry a
//! sequence number: issuing a new load cancels the one in flight, and a
//! response that is no longer the latest is discarded.
//!
//! # Example
//!
//! ```no_run
//! use financesk_sdk::FinanceSdk;
//! use financesk_sdk::models::AccountQuery;
//!
//! # async fn example() -> financesk_sdk::Result<()> {
//! let sdk = FinanceSdk::builder().build()?;
//! let accounts = sdk.accounts();
//! let mut changes = accounts.subscribe();
//!
//! accounts.load(AccountQuery::for_user(1)).await?;
//! changes.changed().await.ok();
//! println!("{} accounts", changes.borrow().items().len());
//! # Ok(())
//! # }
//! ```

pub mod balance;
mod tracker;

pub use balance::{month_bounds, BalanceState, BalanceStore};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::{ErrorDescriptor, FinanceError, Result};
use crate::gateway::{ReadGateway, WriteGateway};
use crate::models::{Account, BankInstitution, Category, PageInfo, TransactionDetail};
use crate::validation::Validate;
use tracker::{InFlight, RequestState, RequestTracker};

// ---------------------------------------------------------------------------
// Identified
// ---------------------------------------------------------------------------

/// Entities a store can patch by id.
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for Account {
    fn id(&self) -> i64 {
        self.account_id
    }
}

impl Identified for TransactionDetail {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for BankInstitution {
    fn id(&self) -> i64 {
        self.institution_id
    }
}

// ---------------------------------------------------------------------------
// Pagination / LoadFailurePolicy
// ---------------------------------------------------------------------------

/// Paging counters from the most recent successful paginated fetch.
///
/// `total_items` and `total_pages` go stale between fetches; `create` and
/// `remove` adjust `total_items` locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl From<PageInfo> for Pagination {
    fn from(info: PageInfo) -> Self {
        Self {
            page: info.number,
            page_size: info.size,
            total_items: info.total_elements,
            total_pages: info.total_pages,
        }
    }
}

/// What a failed `load` does to the items already held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadFailurePolicy {
    /// Keep the previous items; stale beats blank.
    #[default]
    KeepItems,
    /// Clear the items and zero the totals.
    ResetToEmpty,
}

// ---------------------------------------------------------------------------
// StoreState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StoreState<T> {
    items: Vec<T>,
    loading: bool,
    pagination: Option<Pagination>,
    last_error: Option<ErrorDescriptor>,
    in_flight: usize,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            pagination: None,
            last_error: None,
            in_flight: 0,
        }
    }
}

impl<T> StoreState<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    pub fn last_error(&self) -> Option<&ErrorDescriptor> {
        self.last_error.as_ref()
    }
}

impl<T: Identified> StoreState<T> {
    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn add(&mut self, item: T) {
        self.items.push(item);
        if let Some(p) = self.pagination.as_mut() {
            p.total_items += 1;
        }
    }

    /// Returns whether an item was actually removed.
    fn remove_by_id(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let removed = self.items.len() < before;
        if removed {
            if let Some(p) = self.pagination.as_mut() {
                p.total_items = p.total_items.saturating_sub(1);
            }
        }
        removed
    }

    fn replace_by_id(&mut self, item: T) -> bool {
        let id = item.id();
        match self.items.iter_mut().find(|existing| existing.id() == id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }
}

impl<T> RequestState for StoreState<T> {
    fn request_started(&mut self) {
        self.in_flight += 1;
        self.loading = true;
    }

    fn request_settled(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store<G: ReadGateway> {
    name: &'static str,
    gateway: G,
    state: watch::Sender<StoreState<G::Item>>,
    tracker: RequestTracker,
    policy: LoadFailurePolicy,
    last_query: Mutex<Option<G::Query>>,
}

impl<G: ReadGateway> Store<G> {
    /// Create an empty store. `name` labels its log events.
    pub fn new(name: &'static str, gateway: G) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            name,
            gateway,
            state,
            tracker: RequestTracker::new(),
            policy: LoadFailurePolicy::default(),
            last_query: Mutex::new(None),
        }
    }

    pub fn with_failure_policy(mut self, policy: LoadFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn failure_policy(&self) -> LoadFailurePolicy {
        self.policy
    }

    // -- Read-only views ----------------------------------------------------

    /// Borrow the current state. Do not hold the guard across an `.await`.
    pub fn state(&self) -> watch::Ref<'_, StoreState<G::Item>> {
        self.state.borrow()
    }

    pub fn snapshot(&self) -> StoreState<G::Item> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<G::Item> {
        self.state.borrow().items.clone()
    }

    pub fn find(&self, id: i64) -> Option<G::Item> {
        self.state.borrow().find(id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.state.borrow().pagination
    }

    pub fn last_error(&self) -> Option<ErrorDescriptor> {
        self.state.borrow().last_error.clone()
    }

    /// Change feed for consumers; every state mutation marks it changed.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<G::Item>> {
        self.state.subscribe()
    }

    // -- Loading ------------------------------------------------------------

    /// Fetch the list for `query`, replacing the items on success.
    ///
    /// A newer `load` on the same store cancels this one, which then returns
    /// [`FinanceError::Superseded`] without touching the state.
    pub async fn load(&self, query: G::Query) -> Result<()> {
        if let Err(err) = query.validate() {
            self.record_error("load", &err);
            return Err(err);
        }
        *self.last_query.lock() = Some(query.clone());

        let seq = self.tracker.issue();
        let _in_flight = InFlight::begin(&self.state);
        tracing::debug!(store = self.name, seq, "loading");

        let outcome = tokio::select! {
            result = self.gateway.fetch(&query) => result,
            () = self.tracker.superseded(seq) => {
                tracing::debug!(store = self.name, seq, "load cancelled by a newer request");
                return Err(FinanceError::Superseded);
            }
        };

        if !self.tracker.is_latest(seq) {
            tracing::warn!(store = self.name, seq, "discarding stale response");
            return Err(FinanceError::Superseded);
        }

        match outcome {
            Ok(page) => {
                tracing::debug!(store = self.name, seq, count = page.items.len(), "loaded");
                self.state.send_modify(|s| {
                    s.items = page.items;
                    s.pagination = page.pagination;
                    s.last_error = None;
                });
                Ok(())
            }
            Err(err) => {
                self.record_error("load", &err);
                if self.policy == LoadFailurePolicy::ResetToEmpty {
                    self.state.send_modify(|s| {
                        s.items.clear();
                        if let Some(p) = s.pagination.as_mut() {
                            p.total_items = 0;
                            p.total_pages = 0;
                        }
                    });
                }
                Err(err)
            }
        }
    }

    /// Repeat the most recent load, e.g. after a change made elsewhere.
    pub async fn reload(&self) -> Result<()> {
        let query = self.last_query.lock().clone();
        match query {
            Some(query) => self.load(query).await,
            None => Err(FinanceError::InvalidArgument(format!(
                "{} store has not been loaded yet",
                self.name
            ))),
        }
    }

    fn record_error(&self, op: &'static str, err: &FinanceError) {
        if matches!(err, FinanceError::Superseded) {
            return;
        }
        tracing::warn!(store = self.name, op, error = %err, "operation failed");
        let descriptor = ErrorDescriptor::from(err);
        self.state.send_modify(|s| s.last_error = Some(descriptor));
    }

    /// Apply a settled write: patch on success, record the error otherwise.
    fn settle<R>(
        &self,
        op: &'static str,
        result: Result<R>,
        apply: impl FnOnce(&mut StoreState<G::Item>, &R),
    ) -> Result<R> {
        match &result {
            Ok(value) => self.state.send_modify(|s| {
                apply(s, value);
                s.last_error = None;
            }),
            Err(err) => self.record_error(op, err),
        }
        result
    }
}

impl<G: WriteGateway> Store<G> {
    /// Create an entity and append it to the local list.
    pub async fn create(&self, payload: G::Create) -> Result<G::Item> {
        if let Err(err) = payload.validate() {
            self.record_error("create", &err);
            return Err(err);
        }
        let _in_flight = InFlight::begin(&self.state);
        let result = self.gateway.create(&payload).await;
        self.settle("create", result, |s, item| s.add(item.clone()))
    }

    /// Update an entity and replace the local copy, if one is held.
    pub async fn update(&self, id: i64, payload: G::Update) -> Result<G::Item> {
        if let Err(err) = payload.validate() {
            self.record_error("update", &err);
            return Err(err);
        }
        let _in_flight = InFlight::begin(&self.state);
        let result = self.gateway.update(id, &payload).await;
        self.settle("update", result, |s, item| {
            s.replace_by_id(item.clone());
        })
    }

    /// Delete an entity and drop it from the local list.
    ///
    /// Ids that are not held locally are still sent to the backend; on success
    /// nothing local changes.
    pub async fn remove(&self, id: i64) -> Result<()> {
        let _in_flight = InFlight::begin(&self.state);
        let result = self.gateway.delete(id).await;
        self.settle("remove", result, |s, _| {
            if !s.remove_by_id(id) {
                tracing::debug!(store = self.name, id, "removed id was not held locally");
            }
        })
    }
}
