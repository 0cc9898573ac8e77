//! Authenticated HTTP client for the Taskora backend.
//!
//! Provides [`ApiClient`] which attaches the stored bearer token, enforces
//! a fixed request timeout, and on a 401 transparently refreshes the access
//! token and retries the original request exactly once.

use crate::{
    config::Config,
    endpoints,
    error::{ApiError, Result},
    token_store::TokenStore,
    types::RefreshResponse,
};
use reqwest::{multipart, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable description of one API call. A retried request is a fresh
/// descriptor with `is_retry` set, never a mutation of the original.
#[derive(Debug, Clone)]
struct RequestSpec {
    method: Method,
    path: String,
    body: Option<Value>,
    is_retry: bool,
}

impl RequestSpec {
    fn new(method: Method, path: &str, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.to_string(),
            body,
            is_retry: false,
        }
    }

    fn retried(self) -> Self {
        Self {
            is_retry: true,
            ..self
        }
    }
}

/// HTTP client owning the retry/refresh protocol against the Taskora API.
///
/// All operations return `Result<Value, ApiError>`: expected failures
/// (error statuses, timeouts, transport errors, malformed bodies) come back
/// as [`ApiError`] values, never as panics.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Internal(e.into()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    /// The credential store this client reads tokens from.
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.execute(RequestSpec::new(Method::GET, path, None)).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        self.execute(RequestSpec::new(Method::POST, path, Some(to_value(body)?)))
            .await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        self.execute(RequestSpec::new(Method::PUT, path, Some(to_value(body)?)))
            .await
    }

    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        self.execute(RequestSpec::new(Method::PATCH, path, Some(to_value(body)?)))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.execute(RequestSpec::new(Method::DELETE, path, None))
            .await
    }

    /// GET a resource whose payload may be nested under a named key
    /// (`{"subjects": [...]}`) or returned raw; prefers the key when present.
    pub async fn get_resource(&self, path: &str, key: &str) -> Result<Value> {
        Ok(unwrap_payload(self.get(path).await?, key))
    }

    /// Send a multipart form with a `file` part plus extra string fields.
    /// No Content-Type override: reqwest sets the multipart boundary itself.
    pub async fn upload(
        &self,
        path: &str,
        file_name: &str,
        file_bytes: Vec<u8>,
        extra_fields: &[(&str, &str)],
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut is_retry = false;

        loop {
            // Multipart forms are consumed on send, so each attempt builds
            // its own from the owned bytes.
            let mut form = multipart::Form::new().part(
                "file",
                multipart::Part::bytes(file_bytes.clone()).file_name(file_name.to_string()),
            );
            for (name, value) in extra_fields {
                form = form.text(name.to_string(), value.to_string());
            }

            let mut builder = self.http.post(&url).multipart(form);
            if let Some(token) = self.store.access_token() {
                builder = builder.bearer_auth(token);
            }

            debug!(url = %url, is_retry, "uploading multipart form");
            let response = builder.send().await.map_err(map_transport_error)?;

            if response.status() == StatusCode::UNAUTHORIZED && !is_retry {
                self.refresh_access_token().await?;
                is_retry = true;
                continue;
            }

            return finish(response).await;
        }
    }

    /// Per-call state machine: dispatch, then on a first 401 refresh and
    /// re-dispatch a retry descriptor. `is_retry` guards the branch so no
    /// call traverses it twice.
    async fn execute(&self, mut spec: RequestSpec) -> Result<Value> {
        loop {
            let response = self.dispatch(&spec).await?;

            if response.status() == StatusCode::UNAUTHORIZED && !spec.is_retry {
                debug!(path = %spec.path, "access token rejected, attempting refresh");
                self.refresh_access_token().await?;
                spec = spec.retried();
                continue;
            }

            return finish(response).await;
        }
    }

    async fn dispatch(&self, spec: &RequestSpec) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, spec.path);
        debug!(method = %spec.method, url = %url, is_retry = spec.is_retry, "dispatching request");

        let mut builder = self.http.request(spec.method.clone(), &url);
        if let Some(token) = self.store.access_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(map_transport_error)
    }

    /// Mint a new access token from the stored refresh token.
    ///
    /// The refresh token is sent as the `Authorization: Bearer` value, the
    /// backend's actual contract for its refresh endpoint. Any failure
    /// clears both stored tokens. This procedure never triggers another
    /// refresh, and concurrent calls may each run their own refresh; the
    /// backend does not rotate refresh tokens, so the race is harmless.
    pub async fn refresh_access_token(&self) -> Result<()> {
        let Some(refresh_token) = self.store.refresh_token() else {
            debug!("no refresh token stored, cannot refresh");
            self.store.clear_tokens();
            return Err(ApiError::AuthExpired);
        };

        let url = format!("{}{}", self.base_url, endpoints::auth::REFRESH);
        info!("refreshing access token");

        let response = match self.http.post(&url).bearer_auth(refresh_token).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("token refresh transport failure: {}", e);
                self.store.clear_tokens();
                return Err(map_transport_error(e));
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "token refresh rejected");
            self.store.clear_tokens();
            return Err(ApiError::AuthExpired);
        }

        match response.json::<RefreshResponse>().await {
            Ok(refreshed) => {
                self.store.set_access_token(refreshed.access_token);
                debug!("access token refreshed");
                Ok(())
            }
            Err(e) => {
                warn!("unreadable refresh response: {}", e);
                self.store.clear_tokens();
                Err(ApiError::MalformedResponse)
            }
        }
    }
}

/// Classify the final response into the uniform result shape.
async fn finish(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await.map_err(map_transport_error)?;
    let body = try_parse_json(&text);

    if status.is_success() {
        return match body {
            Some(value) => Ok(value),
            // 204-style responses carry no body.
            None if text.trim().is_empty() => Ok(Value::Null),
            None => Err(ApiError::MalformedResponse),
        };
    }

    debug!(status = %status, "request failed");
    match body.as_ref().and_then(error_message) {
        Some(message) => Err(ApiError::Api(message)),
        None => Err(ApiError::MalformedResponse),
    }
}

/// Parse a body as JSON without letting the parse error escape; `None`
/// feeds the generic-error path.
fn try_parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Server error envelopes carry `message` and sometimes only `error`.
fn error_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Prefer the named key of a response envelope when present, else the raw
/// body.
pub fn unwrap_payload(mut body: Value, key: &str) -> Value {
    match body.get_mut(key) {
        Some(value) => value.take(),
        None => body,
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e)
    }
}

fn to_value<B: Serialize>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Internal(e.into()))
}
