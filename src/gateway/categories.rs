//! Category endpoints.

use async_trait::async_trait;

use super::{Page, ReadGateway, WriteGateway};
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Category, CategoryRequest};
use crate::query::QueryParams;

#[derive(Debug, Clone)]
pub struct HttpCategoryGateway {
    client: ApiClient,
}

impl HttpCategoryGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReadGateway for HttpCategoryGateway {
    type Item = Category;
    type Query = ();

    async fn fetch(&self, _query: &()) -> Result<Page<Category>> {
        let categories: Vec<Category> = self.client.get("categories", &QueryParams::new()).await?;
        Ok(Page::unpaged(categories))
    }
}

#[async_trait]
impl WriteGateway for HttpCategoryGateway {
    type Create = CategoryRequest;
    type Update = CategoryRequest;

    async fn create(&self, payload: &CategoryRequest) -> Result<Category> {
        self.client.post("categories", payload).await
    }

    async fn update(&self, id: i64, payload: &CategoryRequest) -> Result<Category> {
        self.client.put(&format!("categories/{}", id), payload).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("categories/{}", id)).await
    }
}
