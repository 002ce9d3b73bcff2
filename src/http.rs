//! JSON-over-HTTP client shared by every gateway.
//!
//! Resolves paths against the configured API base URL, attaches the session's
//! bearer token, and turns non-success responses into
//! [`FinanceError::Api`] with the backend's message when it sent one.

use crate::config;
use crate::error::{FinanceError, Result};
use crate::query::QueryParams;
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

// ---------------------------------------------------------------------------
// TokenSource
// ---------------------------------------------------------------------------

/// Bearer token shared between the session (writer) and the client (reader).
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenSource {
    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    pub fn set(&self, token: Option<String>) {
        *self.inner.write() = token;
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: Url,
    token: TokenSource,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration, token: TokenSource) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let inner = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            inner,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token_source(&self) -> &TokenSource {
        &self.token
    }

    /// Resolve an API-relative path such as `"accounts/7"`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &QueryParams) -> Result<T> {
        let builder = self.request(Method::GET, path)?.query(query.pairs());
        let resp = self.send(builder).await?;
        decode(resp).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        let resp = self.send(builder).await?;
        decode(resp).await
    }

    /// POST where the response body carries nothing of interest.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send(builder).await?;
        Ok(())
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path)?.json(body);
        let resp = self.send(builder).await?;
        decode(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut builder = self.inner.request(method, url);
        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let req = builder.build().map_err(transport_error)?;
        let method = req.method().clone();
        let url = req.url().clone();
        tracing::debug!(http.method = %method, http.url = %url, "sending request");

        let resp = self.inner.execute(req).await.map_err(|e| {
            tracing::warn!(http.method = %method, http.url = %url, error = %e, "request failed");
            transport_error(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let err = api_error(resp).await;
        tracing::warn!(
            http.method = %method,
            http.url = %url,
            http.status_code = status.as_u16(),
            error = %err,
            "backend rejected request"
        );
        Err(err)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn transport_error(e: reqwest::Error) -> FinanceError {
    if e.is_timeout() {
        FinanceError::Timeout
    } else {
        FinanceError::Http(e)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await.map_err(transport_error)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Build an API error from a failed response, falling back to a generic
/// message when the body is missing or unparseable.
async fn api_error(resp: Response) -> FinanceError {
    let status = resp.status().as_u16();
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message.or(body.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| config::GENERIC_ERROR_MESSAGE.to_string());
    FinanceError::Api { status, message }
}
