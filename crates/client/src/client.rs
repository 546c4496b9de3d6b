//! Client facade and the generic request execution pipeline

use std::time::Duration;

use mpesa_core::{Environment, SdkError, SdkResult};
use reqwest::Method;
use serde::Serialize;

use crate::account::{AccountBalanceRequest, AccountBalanceResponse};
use crate::auth::TokenManager;
use crate::b2c::{B2cPaymentRequest, B2cPaymentResponse};
use crate::c2b::{
    RegisterUrlRequest, RegisterUrlResponse, SimulatePaymentRequest, SimulatePaymentResponse,
    StkPushRequest, StkPushResponse,
};
use crate::request::MpesaRequest;
use crate::transaction::{
    TransactionReversalRequest, TransactionReversalResponse, TransactionStatusRequest,
    TransactionStatusResponse,
};
use crate::transport::{AuthMode, Transport};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_RETRIES: u32 = 1;

/// Client for the M-Pesa REST API
///
/// Cheap to share behind an `Arc`; all per-call state lives in the request
/// values, the only shared mutable state is the cached bearer token.
#[derive(Debug)]
pub struct MpesaClient {
    transport: Transport,
    consumer_key: String,
}

impl MpesaClient {
    /// Create a new client builder
    pub fn builder() -> MpesaClientBuilder {
        MpesaClientBuilder::default()
    }

    /// Base URL all endpoints are resolved against
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Run `request` through the full pipeline: validate, fill defaults,
    /// send with retry, decode.
    ///
    /// Validation failures return before any network I/O. This is public so
    /// callers can drive endpoints the SDK does not wrap yet.
    pub async fn execute<R>(
        &self,
        mut request: R,
        endpoint: &str,
        method: Method,
        auth_mode: AuthMode,
    ) -> SdkResult<R::Response>
    where
        R: MpesaRequest + Serialize,
    {
        tracing::info!(endpoint, "sending request");

        if let Err(err) = request.validate() {
            tracing::error!(endpoint, %err, "request validation failed");
            return Err(err);
        }

        request.fill_defaults();

        let raw = self
            .transport
            .api_request(endpoint, method, Some(&request), auth_mode)
            .await
            .inspect_err(|err| tracing::error!(endpoint, %err, "api request failed"))?;

        match request.decode_response(&raw) {
            Ok(response) => {
                tracing::info!(endpoint, "request successful");
                Ok(response)
            }
            Err(err) => {
                tracing::error!(endpoint, %err, "failed to decode response");
                Err(err)
            }
        }
    }

    /// Register the validation/confirmation URLs for a shortcode
    pub async fn register_url(
        &self,
        request: RegisterUrlRequest,
    ) -> SdkResult<RegisterUrlResponse> {
        let endpoint = format!("/v1/c2b-register-url/register?apikey={}", self.consumer_key);
        self.execute(request, &endpoint, Method::POST, AuthMode::None)
            .await
    }

    /// Simulate a customer-initiated payment (sandbox only)
    pub async fn simulate_customer_payment(
        &self,
        request: SimulatePaymentRequest,
    ) -> SdkResult<SimulatePaymentResponse> {
        self.execute(
            request,
            "/mpesa/b2c/simulatetransaction/v1/request",
            Method::POST,
            AuthMode::Bearer,
        )
        .await
    }

    /// Prompt a customer's phone to authorize a charge
    pub async fn stk_push(
        &self,
        passkey: &str,
        mut request: StkPushRequest,
    ) -> SdkResult<StkPushResponse> {
        request.set_passkey(passkey);
        self.execute(
            request,
            "/mpesa/stkpush/v1/processrequest",
            Method::POST,
            AuthMode::Bearer,
        )
        .await
    }

    /// Disburse money from a business shortcode to a customer wallet
    pub async fn b2c_payment(&self, request: B2cPaymentRequest) -> SdkResult<B2cPaymentResponse> {
        self.execute(
            request,
            "/mpesa/b2c/v2/paymentrequest",
            Method::POST,
            AuthMode::Bearer,
        )
        .await
    }

    /// Query the balance of a business shortcode
    pub async fn account_balance(
        &self,
        request: AccountBalanceRequest,
    ) -> SdkResult<AccountBalanceResponse> {
        self.execute(
            request,
            "/mpesa/accountbalance/v1/query",
            Method::POST,
            AuthMode::Bearer,
        )
        .await
    }

    /// Query the status of a previously initiated transaction
    pub async fn transaction_status(
        &self,
        request: TransactionStatusRequest,
    ) -> SdkResult<TransactionStatusResponse> {
        self.execute(
            request,
            "/mpesa/transactionstatus/v1/query",
            Method::POST,
            AuthMode::Bearer,
        )
        .await
    }

    /// Reverse a completed transaction
    pub async fn reverse_transaction(
        &self,
        request: TransactionReversalRequest,
    ) -> SdkResult<TransactionReversalResponse> {
        self.execute(
            request,
            "/mpesa/reversal/v1/request",
            Method::POST,
            AuthMode::Bearer,
        )
        .await
    }
}

/// Builder for [`MpesaClient`]
#[derive(Default)]
pub struct MpesaClientBuilder {
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
    environment: Option<Environment>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    base_url: Option<String>,
}

impl MpesaClientBuilder {
    /// Set the consumer key/secret pair issued by the gateway portal
    pub fn credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.consumer_key = Some(key.into());
        self.consumer_secret = Some(secret.into());
        self
    }

    /// Select the target environment (defaults to sandbox)
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the per-request timeout (defaults to 5s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set how many extra attempts a timed-out call gets (defaults to 1)
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Override the environment's base URL. Mainly for tests against a
    /// local mock gateway.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build the client, failing fast on invalid configuration
    pub fn build(self) -> SdkResult<MpesaClient> {
        let consumer_key = self
            .consumer_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SdkError::configuration("consumer key cannot be empty"))?;
        let consumer_secret = self
            .consumer_secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SdkError::configuration("consumer secret cannot be empty"))?;

        let environment = self.environment.unwrap_or(Environment::Sandbox);
        let base_url = self
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| environment.base_url().to_string());

        let timeout = match self.timeout {
            Some(t) if t.is_zero() => DEFAULT_TIMEOUT,
            Some(t) => t,
            None => DEFAULT_TIMEOUT,
        };
        let max_retries = match self.max_retries {
            Some(0) | None => DEFAULT_MAX_RETRIES,
            Some(n) => n,
        };

        let http = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("mpesa-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SdkError::configuration(e.to_string()))?;

        let auth = TokenManager::new(consumer_key.clone(), consumer_secret);
        tracing::info!(%environment, "created mpesa client");

        Ok(MpesaClient {
            transport: Transport::new(http, auth, base_url, max_retries),
            consumer_key,
        })
    }
}
