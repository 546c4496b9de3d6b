//! Retrying HTTP transport
//!
//! Wraps a `reqwest::Client` with the SDK's retry policy: every call carries
//! the configured timeout, and only connection-level timeouts are retried,
//! with a linear backoff (1s, 2s, ...) up to `max_retries` extra attempts.
//! HTTP error statuses are not retried; they come back as a normal
//! [`RawResponse`] for the request type to classify during decode.

use std::time::Duration;

use bytes::Bytes;
use mpesa_core::{SdkError, SdkResult};
use reqwest::{Method, StatusCode};
use serde::Serialize;

use crate::auth::TokenManager;

/// How a call authenticates against the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// No `Authorization` header
    None,
    /// HTTP Basic auth with the consumer key/secret
    Basic,
    /// Cached bearer token from the [`TokenManager`]
    Bearer,
}

/// Raw gateway reply: status plus undecoded body bytes.
///
/// Decoding is the request type's job, so the transport hands back exactly
/// what arrived on the wire.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// HTTP transport shared by all endpoint calls of one client
#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    auth: TokenManager,
    base_url: String,
    max_retries: u32,
}

impl Transport {
    pub fn new(
        http: reqwest::Client,
        auth: TokenManager,
        base_url: String,
        max_retries: u32,
    ) -> Self {
        Self {
            http,
            auth,
            base_url,
            max_retries,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `payload` to `endpoint`, retrying timeouts.
    ///
    /// Performs up to `max_retries + 1` attempts in total. Any non-timeout
    /// outcome (success, network failure, or an auth failure while fetching
    /// the bearer token) ends the loop immediately.
    pub async fn api_request<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<&P>,
        auth_mode: AuthMode,
    ) -> SdkResult<RawResponse> {
        let url = format!("{}{endpoint}", self.base_url);
        let body = payload.map(serde_json::to_vec).transpose()?;

        let mut attempt = 0u32;
        loop {
            match self.dispatch(&url, method.clone(), body.clone(), auth_mode).await {
                Err(SdkError::Timeout(_)) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(%url, attempt, "request timed out, retrying");
                    tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
                }
                outcome => return outcome,
            }
        }
    }

    async fn dispatch(
        &self,
        url: &str,
        method: Method,
        body: Option<Vec<u8>>,
        auth_mode: AuthMode,
    ) -> SdkResult<RawResponse> {
        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.body(body);
        }

        request = match auth_mode {
            AuthMode::None => request,
            AuthMode::Basic => {
                let (key, secret) = self.auth.credentials();
                request.basic_auth(key, Some(secret))
            }
            AuthMode::Bearer => {
                // Token-fetch failures short-circuit the whole call; there
                // is no point sending the business request without a token.
                let token = self.auth.get_token(&self.http, &self.base_url).await?;
                request.header(reqwest::header::AUTHORIZATION, token)
            }
        };

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(classify_transport_error)?;

        Ok(RawResponse { status, body })
    }
}

/// Split reqwest failures into the timeout and network halves of the
/// taxonomy; only the former is retried.
pub(crate) fn classify_transport_error(err: reqwest::Error) -> SdkError {
    if err.is_timeout() {
        SdkError::timeout(err.to_string())
    } else {
        SdkError::network(err.to_string())
    }
}
