//! Income/expense/balance statistics endpoint.

use async_trait::async_trait;

use super::BalanceGateway;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{FinancialStatsParams, FinancialSummary};
use crate::query::QueryParams;

/// Build the query string for the statistics endpoint.
///
/// Only `userId` is always sent; every other filter is omitted when unset.
pub fn stats_query(params: &FinancialStatsParams) -> QueryParams {
    let mut q = QueryParams::new();
    q.set("userId", params.user_id)
        .set_opt("status", params.status)
        .set_opt("categoryId", params.category_id)
        .set_opt("isRecurring", params.is_recurring)
        .set_opt("hasInstallments", params.has_installments)
        .set_text("description", params.description.as_deref())
        .set_opt("minAmount", params.min_amount)
        .set_opt("maxAmount", params.max_amount)
        .set_opt("startDate", params.start_date)
        .set_opt("endDate", params.end_date)
        .set_opt("type", params.transaction_type);
    q
}

#[derive(Debug, Clone)]
pub struct HttpBalanceGateway {
    client: ApiClient,
}

impl HttpBalanceGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BalanceGateway for HttpBalanceGateway {
    async fn income_expense_balance(
        &self,
        params: &FinancialStatsParams,
    ) -> Result<FinancialSummary> {
        self.client
            .get(
                "transactions/stats/income-expense-balance",
                &stats_query(params),
            )
            .await
    }
}
