//! Authorization token lifecycle
//!
//! The gateway issues short-lived bearer tokens at the token endpoint.
//! [`TokenManager`] caches one per client and refreshes it proactively: a
//! token is treated as stale two seconds before its advertised expiry so a
//! request never races the gateway clock.
//!
//! Refreshing is safe under concurrency. Readers observing a stale token may
//! each fetch a replacement; the writes are idempotent (a refreshed token is
//! always at least as fresh as what it overwrites), so no single-flight
//! collapsing is needed.

use std::time::{Duration, Instant};

use mpesa_core::{SdkError, SdkResult};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::transport::classify_transport_error;

/// Token endpoint path, relative to the environment base URL
pub(crate) const TOKEN_ENDPOINT: &str = "/v1/token/generate?grant_type=client_credentials";

/// Tokens are refreshed this long before their advertised expiry
const SAFETY_MARGIN: Duration = Duration::from_secs(2);

/// A cached bearer credential, already prefixed with its scheme
/// (e.g. `Bearer xyz`)
#[derive(Debug, Clone)]
pub struct AuthToken {
    token: String,
    created_at: Instant,
    validity: Duration,
}

impl AuthToken {
    fn new(token_type: &str, access_token: &str, expires_in: u64) -> Self {
        Self {
            token: format!("{token_type} {access_token}"),
            created_at: Instant::now(),
            validity: Duration::from_secs(expires_in),
        }
    }

    /// Usable while `now < created_at + validity - SAFETY_MARGIN`
    fn is_fresh(&self) -> bool {
        self.created_at.elapsed() + SAFETY_MARGIN < self.validity
    }
}

/// Wire shape of the token endpoint reply. `resultCode`/`resultDesc` are
/// only present when the gateway rejects the credentials.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: String,
    #[serde(default, rename = "resultCode")]
    result_code: String,
    #[serde(default, rename = "resultDesc")]
    result_desc: String,
}

/// Owns the consumer credentials and the cached bearer token for one client
#[derive(Debug)]
pub struct TokenManager {
    consumer_key: String,
    consumer_secret: String,
    cached: RwLock<Option<AuthToken>>,
}

impl TokenManager {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            cached: RwLock::new(None),
        }
    }

    /// Consumer key/secret pair, for endpoints using Basic auth directly
    pub fn credentials(&self) -> (&str, &str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    /// Return the cached token, refreshing it first if missing or stale.
    ///
    /// The fast path takes a read lock and performs no I/O.
    pub async fn get_token(&self, http: &reqwest::Client, base_url: &str) -> SdkResult<String> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh() {
                return Ok(token.token.clone());
            }
        }

        let token = self.fetch(http, base_url).await?;
        let value = token.token.clone();
        *self.cached.write().await = Some(token);
        Ok(value)
    }

    async fn fetch(&self, http: &reqwest::Client, base_url: &str) -> SdkResult<AuthToken> {
        tracing::debug!("refreshing authorization token");

        let response = http
            .get(format!("{base_url}{TOKEN_ENDPOINT}"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .send()
            .await
            .map_err(classify_transport_error)?;

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| SdkError::processing(format!("token response decode failed: {e}")))?;

        if !body.result_code.is_empty() {
            tracing::error!(result_code = %body.result_code, "token refresh rejected");
            return Err(SdkError::auth(body.result_desc));
        }

        // A missing or malformed expires_in yields 0: the token works for
        // this call but is re-fetched on the next one.
        let expires_in = body.expires_in.parse().unwrap_or(0);
        Ok(AuthToken::new(&body.token_type, &body.access_token, expires_in))
    }
}
