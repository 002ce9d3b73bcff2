use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Environment variable overriding [`DEFAULT_API_URL`].
pub const API_URL_ENV: &str = "FINANCESK_API_URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Keys in the local key-value storage.
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const ONBOARDING_KEY: &str = "financesK-onboarding";
pub const SHOW_VALUES_KEY: &str = "financesK-showValues";

/// Page size sent when a transaction search leaves it unset.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Shown when a failed response carries no readable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

pub fn api_url_from_env() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

pub fn default_storage_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("financesk-sdk")
    } else {
        PathBuf::from(".financesk-sdk")
    }
}
