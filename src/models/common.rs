use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CreatedResource — Receipt returned by create endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResource {
    pub id: i64,
    pub message: Option<String>,
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// PageInfo / PagedResponse — Paginated search envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub size: u32,
    pub number: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub content: Vec<T>,
    pub page: PageInfo,
}
