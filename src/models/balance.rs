use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::{PaymentStatus, TransactionType};

// ---------------------------------------------------------------------------
// FinancialSummary — Backend-computed income/expense/balance totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub currency: String,
}

impl Default for FinancialSummary {
    fn default() -> Self {
        Self {
            total_income: 0.0,
            total_expense: 0.0,
            balance: 0.0,
            currency: "R$".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// FinancialStatsParams — Filters for the income/expense/balance endpoint
// ---------------------------------------------------------------------------

/// Filters for the balance statistics query.
///
/// Every field except `user_id` is optional; unset fields are left out of the
/// request. Use `status: None` for "all statuses".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialStatsParams {
    pub user_id: i64,
    pub status: Option<PaymentStatus>,
    pub category_id: Option<i64>,
    pub is_recurring: Option<bool>,
    pub has_installments: Option<bool>,
    pub description: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
}

impl FinancialStatsParams {
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}
