//! Account endpoints.

use async_trait::async_trait;

use super::{Page, ReadGateway, WriteGateway};
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Account, AccountQuery, CreateAccountRequest, CreatedResource};
use crate::query::QueryParams;

#[derive(Debug, Clone)]
pub struct HttpAccountGateway {
    client: ApiClient,
}

impl HttpAccountGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Account> {
        self.client
            .get(&format!("accounts/{}", id), &QueryParams::new())
            .await
    }
}

#[async_trait]
impl ReadGateway for HttpAccountGateway {
    type Item = Account;
    type Query = AccountQuery;

    async fn fetch(&self, query: &AccountQuery) -> Result<Page<Account>> {
        let accounts: Vec<Account> = self
            .client
            .get(
                &format!("accounts/user/{}", query.user_id),
                &QueryParams::new(),
            )
            .await?;
        Ok(Page::unpaged(accounts))
    }
}

#[async_trait]
impl WriteGateway for HttpAccountGateway {
    type Create = CreateAccountRequest;
    type Update = CreateAccountRequest;

    /// The backend answers with a receipt; the account itself is fetched by id.
    async fn create(&self, payload: &CreateAccountRequest) -> Result<Account> {
        let receipt: CreatedResource = self.client.post("accounts", payload).await?;
        self.get_by_id(receipt.id).await
    }

    async fn update(&self, id: i64, payload: &CreateAccountRequest) -> Result<Account> {
        self.client.put(&format!("accounts/{}", id), payload).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("accounts/{}", id)).await
    }
}
