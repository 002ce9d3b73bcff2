use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankInstitution {
    pub institution_id: i64,
    pub institution_name: String,
    pub institution_logo: Option<String>,
}
