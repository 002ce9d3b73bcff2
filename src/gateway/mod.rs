//! Remote gateways: the boundary between a store and the backend.
//!
//! Each store owns exactly one gateway, injected at construction so tests can
//! substitute an in-memory fake. [`ReadGateway`] covers list fetches;
//! [`WriteGateway`] adds create/update/delete for mutable domains.
//! The `Http*` types are the production implementations.

pub mod accounts;
pub mod balance;
pub mod banks;
pub mod categories;
pub mod transactions;

pub use accounts::HttpAccountGateway;
pub use balance::{stats_query, HttpBalanceGateway};
pub use banks::HttpBankInstitutionGateway;
pub use categories::HttpCategoryGateway;
pub use transactions::{search_query, HttpTransactionGateway};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FinancialStatsParams, FinancialSummary};
use crate::store::{Identified, Pagination};
use crate::validation::Validate;

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One fetch result: the items plus paging counters for paginated domains.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    pub fn unpaged(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }

    pub fn paged(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            pagination: Some(pagination),
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ReadGateway: Send + Sync {
    type Item: Identified + Clone + Send + Sync + 'static;
    type Query: Validate + Clone + Send + Sync + 'static;

    async fn fetch(&self, query: &Self::Query) -> Result<Page<Self::Item>>;
}

#[async_trait]
pub trait WriteGateway: ReadGateway {
    type Create: Validate + Send + Sync;
    type Update: Validate + Send + Sync;

    /// Create an entity and return it as the backend stored it.
    async fn create(&self, payload: &Self::Create) -> Result<Self::Item>;

    async fn update(&self, id: i64, payload: &Self::Update) -> Result<Self::Item>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// Source of backend-computed income/expense/balance totals.
#[async_trait]
pub trait BalanceGateway: Send + Sync {
    async fn income_expense_balance(&self, params: &FinancialStatsParams)
        -> Result<FinancialSummary>;
}

// Shared handles, so a caller can keep a reference to the gateway it injected.

#[async_trait]
impl<G: ReadGateway> ReadGateway for Arc<G> {
    type Item = G::Item;
    type Query = G::Query;

    async fn fetch(&self, query: &Self::Query) -> Result<Page<Self::Item>> {
        (**self).fetch(query).await
    }
}

#[async_trait]
impl<G: WriteGateway> WriteGateway for Arc<G> {
    type Create = G::Create;
    type Update = G::Update;

    async fn create(&self, payload: &Self::Create) -> Result<Self::Item> {
        (**self).create(payload).await
    }

    async fn update(&self, id: i64, payload: &Self::Update) -> Result<Self::Item> {
        (**self).update(id, payload).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<G: BalanceGateway> BalanceGateway for Arc<G> {
    async fn income_expense_balance(
        &self,
        params: &FinancialStatsParams,
    ) -> Result<FinancialSummary> {
        (**self).income_expense_balance(params).await
    }
}
