//! Show/hide preference for monetary values.

use tokio::sync::watch;

use crate::config;
use crate::error::Result;
use crate::storage::SharedStorage;

/// Persisted "show values" flag. Values are shown until the user hides them.
pub struct PrivacySettings {
    show_values: watch::Sender<bool>,
    storage: SharedStorage,
}

impl PrivacySettings {
    pub fn new(storage: SharedStorage) -> Self {
        let initial = match storage.get(config::SHOW_VALUES_KEY) {
            Ok(Some(raw)) => raw.trim() == "true",
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read privacy preference");
                true
            }
        };
        let (show_values, _) = watch::channel(initial);
        Self {
            show_values,
            storage,
        }
    }

    pub fn show_values(&self) -> bool {
        *self.show_values.borrow()
    }

    /// Flip the flag, persist it, and return the new value.
    pub fn toggle(&self) -> Result<bool> {
        let mut shown = false;
        self.show_values.send_modify(|v| {
            *v = !*v;
            shown = *v;
        });
        self.storage
            .set(config::SHOW_VALUES_KEY, if shown { "true" } else { "false" })?;
        Ok(shown)
    }

    /// `formatted` as-is when values are shown, masked otherwise.
    pub fn display(&self, formatted: &str) -> String {
        if self.show_values() {
            formatted.to_string()
        } else {
            mask(formatted)
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.show_values.subscribe()
    }
}

/// `"R$ 1.234,56"` -> `"R$ ******"`: one asterisk per digit, clamped to 3..=8
/// so the masked text keeps roughly the same width.
pub fn mask(formatted: &str) -> String {
    let digits = formatted.chars().filter(char::is_ascii_digit).count();
    format!("R$ {}", "*".repeat(digits.clamp(3, 8)))
}
