//! Shared test fixtures for the FinancesK SDK integration tests.
//!
//! Provides in-memory gateways that stand in for the backend so store
//! behavior can be tested without HTTP, plus small entity builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::Notify;

use financesk_sdk::gateway::BalanceGateway;
use financesk_sdk::models::{
    Account, AccountOperationType, AccountQuery, AccountType, CreateAccountRequest,
    FinancialStatsParams, FinancialSummary, PaymentStatus, TransactionDetail,
    TransactionSearchParams, TransactionType,
};
use financesk_sdk::{FinanceError, Page, Pagination, ReadGateway, Result, WriteGateway};

// ---------------------------------------------------------------------------
// Entity builders
// ---------------------------------------------------------------------------

pub fn account(id: i64, name: &str, balance_cents: i64, bank: Option<&str>) -> Account {
    Account {
        account_id: id,
        account_name: name.to_string(),
        account_description: None,
        account_type: AccountType::ContaCorrente,
        bank_institution_name: bank.map(str::to_string),
        account_credit_limit: None,
        account_statement_closing_date: None,
        account_payment_due_date: None,
        account_current_balance: balance_cents,
        account_current_balance_formatted: None,
        account_currency: "BRL".to_string(),
        user_id: 1,
        user_name: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn transaction(id: i64, amount: f64, kind: TransactionType) -> TransactionDetail {
    TransactionDetail {
        id,
        description: format!("transaction {}", id),
        amount,
        down_payment: None,
        transaction_type: kind,
        operation_type: match kind {
            TransactionType::Income => AccountOperationType::Deposit,
            TransactionType::Expense => AccountOperationType::Payment,
        },
        status: PaymentStatus::Paid,
        category_id: 1,
        category_name: "General".to_string(),
        due_date: "2024-01-15".to_string(),
        created_at: None,
        updated_at: None,
        notes: None,
        recurrence_pattern: None,
        installment_info: None,
        user_id: 1,
        account_id: 1,
        account_name: "Checking".to_string(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// January 2024 for user 1.
pub fn january_search() -> TransactionSearchParams {
    TransactionSearchParams::new(1, date(2024, 1, 1), date(2024, 1, 31))
}

pub fn ids<T: financesk_sdk::store::Identified>(items: &[T]) -> Vec<i64> {
    items.iter().map(|i| i.id()).collect()
}

fn backend_error() -> FinanceError {
    FinanceError::Api {
        status: 500,
        message: "backend unavailable".to_string(),
    }
}

// ---------------------------------------------------------------------------
// FakeAccountGateway
// ---------------------------------------------------------------------------

/// In-memory account backend with switchable failures and a call counter.
pub struct FakeAccountGateway {
    pub accounts: Mutex<Vec<Account>>,
    /// Report paging counters on fetch.
    pub paginate: bool,
    pub fail_fetch: AtomicBool,
    pub fail_writes: AtomicBool,
    pub calls: AtomicUsize,
    next_id: AtomicI64,
}

impl FakeAccountGateway {
    pub fn new(accounts: Vec<Account>) -> Self {
        let next = accounts.iter().map(|a| a.account_id).max().unwrap_or(0) + 1;
        Self {
            accounts: Mutex::new(accounts),
            paginate: false,
            fail_fetch: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            next_id: AtomicI64::new(next),
        }
    }

    pub fn paginated(mut self) -> Self {
        self.paginate = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_writes(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(backend_error());
        }
        Ok(())
    }
}

#[async_trait]
impl ReadGateway for FakeAccountGateway {
    type Item = Account;
    type Query = AccountQuery;

    async fn fetch(&self, query: &AccountQuery) -> Result<Page<Account>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(backend_error());
        }
        let items: Vec<Account> = self
            .accounts
            .lock()
            .iter()
            .filter(|a| a.user_id == query.user_id)
            .cloned()
            .collect();
        if self.paginate {
            let total = items.len() as u64;
            Ok(Page::paged(
                items,
                Pagination {
                    page: 0,
                    page_size: 20,
                    total_items: total,
                    total_pages: 1,
                },
            ))
        } else {
            Ok(Page::unpaged(items))
        }
    }
}

#[async_trait]
impl WriteGateway for FakeAccountGateway {
    type Create = CreateAccountRequest;
    type Update = CreateAccountRequest;

    async fn create(&self, payload: &CreateAccountRequest) -> Result<Account> {
        self.check_writes()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut created = account(
            id,
            &payload.account_name,
            payload.account_current_balance.unwrap_or(0),
            None,
        );
        created.user_id = payload.user_id;
        self.accounts.lock().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, payload: &CreateAccountRequest) -> Result<Account> {
        self.check_writes()?;
        let mut accounts = self.accounts.lock();
        let existing = accounts
            .iter_mut()
            .find(|a| a.account_id == id)
            .ok_or_else(|| FinanceError::NotFound(format!("account {}", id)))?;
        existing.account_name = payload.account_name.clone();
        if let Some(balance) = payload.account_current_balance {
            existing.account_current_balance = balance;
        }
        Ok(existing.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.check_writes()?;
        self.accounts.lock().retain(|a| a.account_id != id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedTransactionGateway
// ---------------------------------------------------------------------------

/// Canned response for one page of the transaction search.
#[derive(Clone, Default)]
pub struct Script {
    pub items: Vec<TransactionDetail>,
    pub total_items: Option<u64>,
    pub fail: bool,
    /// When set, the response is held until the gate is notified.
    pub gate: Option<Arc<Notify>>,
}

impl Script {
    pub fn ok(items: Vec<TransactionDetail>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// Transaction search fake keyed by requested page number.
#[derive(Default)]
pub struct ScriptedTransactionGateway {
    scripts: Mutex<HashMap<u32, Script>>,
    /// Notified each time a fetch starts.
    pub started: Notify,
    pub calls: AtomicUsize,
}

impl ScriptedTransactionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, page: u32, script: Script) {
        self.scripts.lock().insert(page, script);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadGateway for ScriptedTransactionGateway {
    type Item = TransactionDetail;
    type Query = TransactionSearchParams;

    async fn fetch(&self, query: &TransactionSearchParams) -> Result<Page<TransactionDetail>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let page = query.page.unwrap_or(0);
        let script = self.scripts.lock().get(&page).cloned().unwrap_or_default();
        self.started.notify_one();

        if let Some(gate) = &script.gate {
            gate.notified().await;
        }
        if script.fail {
            return Err(FinanceError::Timeout);
        }

        let total = script.total_items.unwrap_or(script.items.len() as u64);
        Ok(Page::paged(
            script.items,
            Pagination {
                page,
                page_size: 20,
                total_items: total,
                total_pages: total.div_ceil(20) as u32,
            },
        ))
    }
}

// ---------------------------------------------------------------------------
// FakeBalanceGateway
// ---------------------------------------------------------------------------

/// Answers with `summary`, or fails while it is `None`.
#[derive(Default)]
pub struct FakeBalanceGateway {
    pub summary: Mutex<Option<FinancialSummary>>,
    pub last_params: Mutex<Option<FinancialStatsParams>>,
}

impl FakeBalanceGateway {
    pub fn answering(summary: FinancialSummary) -> Self {
        Self {
            summary: Mutex::new(Some(summary)),
            last_params: Mutex::new(None),
        }
    }
}

#[async_trait]
impl BalanceGateway for FakeBalanceGateway {
    async fn income_expense_balance(
        &self,
        params: &FinancialStatsParams,
    ) -> Result<FinancialSummary> {
        *self.last_params.lock() = Some(params.clone());
        self.summary.lock().clone().ok_or_else(backend_error)
    }
}
