//! Read-only bank institution list.

use async_trait::async_trait;

use super::{Page, ReadGateway};
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::BankInstitution;
use crate::query::QueryParams;

#[derive(Debug, Clone)]
pub struct HttpBankInstitutionGateway {
    client: ApiClient,
}

impl HttpBankInstitutionGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<BankInstitution> {
        let mut q = QueryParams::new();
        q.set("id", id);
        self.client.get("bank", &q).await
    }
}

#[async_trait]
impl ReadGateway for HttpBankInstitutionGateway {
    type Item = BankInstitution;
    type Query = ();

    async fn fetch(&self, _query: &()) -> Result<Page<BankInstitution>> {
        let banks: Vec<BankInstitution> = self.client.get("bank/all", &QueryParams::new()).await?;
        Ok(Page::unpaged(banks))
    }
}
