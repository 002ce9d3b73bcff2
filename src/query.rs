//! Query-string builder for gateway requests.
//!
//! Optional values go through [`QueryParams::set_opt`] or
//! [`QueryParams::set_text`], which leave the key out entirely when the value
//! is unset. The backend reads an absent key as "no filter" and an empty one
//! as "equals empty", so an unset filter must never reach the wire as `""`.
//! Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use financesk_sdk::QueryParams;
//! let mut params = QueryParams::new();
//! params
//!     .set("userId", 1)
//!     .set_opt("categoryId", None::<i64>)
//!     .set_text("description", Some("  rent "));
//! assert_eq!(params.to_query_string(), "userId=1&description=rent");
//! ```

use std::fmt::Display;

/// Ordered list of query-string pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair unconditionally.
    pub fn set<V: Display>(&mut self, key: &str, value: V) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a pair only when `value` is `Some`.
    pub fn set_opt<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.set(key, v);
        }
        self
    }

    /// Add a trimmed free-text pair, skipping `None` and blank strings.
    pub fn set_text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => self.set(key, text),
            _ => self,
        }
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render as an `application/x-www-form-urlencoded` string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}
