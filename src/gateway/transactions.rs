//! Transaction endpoints, including the paginated search.

use async_trait::async_trait;

use super::{Page, ReadGateway, WriteGateway};
use crate::config;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{
    CreateTransactionRequest, CreatedResource, PagedResponse, TransactionDetail,
    TransactionSearchParams, UpdateTransactionRequest,
};
use crate::query::QueryParams;
use crate::store::Pagination;

/// Build the query string for `GET /transactions/search`.
///
/// Required fields and paging/sorting defaults are always present; optional
/// filters appear only when set, and a blank description counts as unset.
pub fn search_query(params: &TransactionSearchParams) -> QueryParams {
    let mut q = QueryParams::new();
    q.set("userId", params.user_id)
        .set("startDate", params.start_date)
        .set("endDate", params.end_date)
        .set("page", params.page.unwrap_or(0))
        .set("size", params.size.unwrap_or(config::DEFAULT_PAGE_SIZE))
        .set("sortField", params.sort_field.unwrap_or_default())
        .set("sortDirection", params.sort_direction.unwrap_or_default())
        .set_opt("type", params.transaction_type)
        .set_opt("status", params.status)
        .set_opt("categoryId", params.category_id)
        .set_opt("isRecurring", params.is_recurring)
        .set_opt("hasInstallments", params.has_installments)
        .set_text("description", params.description.as_deref())
        .set_opt("minAmount", params.min_amount)
        .set_opt("maxAmount", params.max_amount);
    q
}

#[derive(Debug, Clone)]
pub struct HttpTransactionGateway {
    client: ApiClient,
}

impl HttpTransactionGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<TransactionDetail> {
        self.client
            .get(&format!("transactions/{}", id), &QueryParams::new())
            .await
    }
}

#[async_trait]
impl ReadGateway for HttpTransactionGateway {
    type Item = TransactionDetail;
    type Query = TransactionSearchParams;

    async fn fetch(&self, params: &TransactionSearchParams) -> Result<Page<TransactionDetail>> {
        let resp: PagedResponse<TransactionDetail> = self
            .client
            .get("transactions/search", &search_query(params))
            .await?;
        Ok(Page::paged(resp.content, Pagination::from(resp.page)))
    }
}

#[async_trait]
impl WriteGateway for HttpTransactionGateway {
    type Create = CreateTransactionRequest;
    type Update = UpdateTransactionRequest;

    async fn create(&self, payload: &CreateTransactionRequest) -> Result<TransactionDetail> {
        let receipt: CreatedResource = self.client.post("transactions", payload).await?;
        self.get_by_id(receipt.id).await
    }

    async fn update(
        &self,
        id: i64,
        payload: &UpdateTransactionRequest,
    ) -> Result<TransactionDetail> {
        self.client
            .put(&format!("transactions/{}", id), payload)
            .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("transactions/{}", id)).await
    }
}
