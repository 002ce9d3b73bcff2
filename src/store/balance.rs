//! Single-value store for the backend-computed financial summary.

use chrono::{Datelike, Local, NaiveDate};
use parking_lot::Mutex;
use tokio::sync::watch;

use super::tracker::{InFlight, RequestState, RequestTracker};
use crate::error::{ErrorDescriptor, FinanceError, Result};
use crate::gateway::BalanceGateway;
use crate::models::{FinancialStatsParams, FinancialSummary, PaymentStatus};
use crate::validation::Validate;

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(date);
    (first, last)
}

// ---------------------------------------------------------------------------
// BalanceState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct BalanceState {
    summary: FinancialSummary,
    loading: bool,
    last_error: Option<ErrorDescriptor>,
    in_flight: usize,
}

impl BalanceState {
    pub fn summary(&self) -> &FinancialSummary {
        &self.summary
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&ErrorDescriptor> {
        self.last_error.as_ref()
    }
}

impl RequestState for BalanceState {
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
// BalanceStore
// ---------------------------------------------------------------------------

/// Holds the latest income/expense/balance summary.
///
/// A failed refresh keeps the previous summary (zeros until the first
/// success). Refreshes are sequenced like list loads.
pub struct BalanceStore<G: BalanceGateway> {
    gateway: G,
    state: watch::Sender<BalanceState>,
    tracker: RequestTracker,
    last_params: Mutex<Option<FinancialStatsParams>>,
}

impl<G: BalanceGateway> BalanceStore<G> {
    pub fn new(gateway: G) -> Self {
        let (state, _) = watch::channel(BalanceState::default());
        Self {
            gateway,
            state,
            tracker: RequestTracker::new(),
            last_params: Mutex::new(None),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> watch::Ref<'_, BalanceState> {
        self.state.borrow()
    }

    pub fn summary(&self) -> FinancialSummary {
        self.state.borrow().summary.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn last_error(&self) -> Option<ErrorDescriptor> {
        self.state.borrow().last_error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BalanceState> {
        self.state.subscribe()
    }

    /// Fetch the summary for `params`.
    pub async fn refresh(&self, params: FinancialStatsParams) -> Result<FinancialSummary> {
        if let Err(err) = params.validate() {
            self.record_error(&err);
            return Err(err);
        }
        *self.last_params.lock() = Some(params.clone());

        let seq = self.tracker.issue();
        let _in_flight = InFlight::begin(&self.state);

        let outcome = tokio::select! {
            result = self.gateway.income_expense_balance(&params) => result,
            () = self.tracker.superseded(seq) => return Err(FinanceError::Superseded),
        };

        if !self.tracker.is_latest(seq) {
            tracing::warn!(store = "balance", seq, "discarding stale response");
            return Err(FinanceError::Superseded);
        }

        match outcome {
            Ok(summary) => {
                self.state.send_modify(|s| {
                    s.summary = summary.clone();
                    s.last_error = None;
                });
                Ok(summary)
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Summary for the current calendar month, optionally for one status.
    pub async fn load_current_month(
        &self,
        user_id: i64,
        status: Option<PaymentStatus>,
    ) -> Result<FinancialSummary> {
        let (start, end) = month_bounds(Local::now().date_naive());
        self.refresh(FinancialStatsParams {
            status,
            start_date: Some(start),
            end_date: Some(end),
            ..FinancialStatsParams::for_user(user_id)
        })
        .await
    }

    /// Repeat the most recent refresh.
    pub async fn reload(&self) -> Result<FinancialSummary> {
        let params = self.last_params.lock().clone();
        match params {
            Some(params) => self.refresh(params).await,
            None => Err(FinanceError::InvalidArgument(
                "balance store has not been loaded yet".to_string(),
            )),
        }
    }

    fn record_error(&self, err: &FinanceError) {
        tracing::warn!(store = "balance", error = %err, "refresh failed");
        let descriptor = ErrorDescriptor::from(err);
        self.state.send_modify(|s| s.last_error = Some(descriptor));
    }
}
