//! Integration tests for the M-Pesa client against a mock gateway

use std::time::{Duration, Instant};

use mpesa_client::MpesaClient;
use mpesa_client::account::AccountBalanceRequest;
use mpesa_client::b2c::B2cPaymentRequest;
use mpesa_client::c2b::RegisterUrlRequest;
use mpesa_core::{CommandId, Environment, IdentifierType, ResponseType, SdkError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("key:secret")
const BASIC_KEY_SECRET: &str = "Basic a2V5OnNlY3JldA==";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client_for(server: &MockServer) -> MpesaClient {
    init_tracing();
    MpesaClient::builder()
        .credentials("key", "secret")
        .environment(Environment::Sandbox)
        .base_url(server.uri())
        .build()
        .unwrap()
}

fn balance_request() -> AccountBalanceRequest {
    AccountBalanceRequest {
        identifier_type: IdentifierType::ShortCode,
        initiator: "apiuser".into(),
        party_a: 600000,
        queue_time_out_url: "https://example.com/timeout".into(),
        result_url: "https://example.com/result".into(),
        remarks: "balance check".into(),
        security_credential: "encrypted".into(),
        originator_conversation_id: "partner-001".into(),
        ..Default::default()
    }
}

fn register_request() -> RegisterUrlRequest {
    RegisterUrlRequest {
        short_code: "554433".into(),
        response_type: ResponseType::Completed,
        command_id: None,
        confirmation_url: "https://example.com/confirm".into(),
        validation_url: "https://example.com/validate".into(),
    }
}

async fn mount_token_endpoint(server: &MockServer, expires_in: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/token/generate"))
        .and(query_param("grant_type", "client_credentials"))
        .and(header("authorization", BASIC_KEY_SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": expires_in,
        })))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn bearer_token_is_fetched_once_and_cached() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "3600", 1).await;

    Mock::given(method("POST"))
        .and(path("/mpesa/accountbalance/v1/query"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ResponseCode": "0",
            "ResponseDescription": "Accept the service request successfully.",
            "ConversationID": "AG_1",
            "OriginatorConversationID": "partner-001",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    // two calls, one token fetch
    let first = client.account_balance(balance_request()).await.unwrap();
    let second = client.account_balance(balance_request()).await.unwrap();

    assert_eq!(first.conversation_id, "AG_1");
    assert_eq!(
        second.response_description,
        "Accept the service request successfully."
    );
}

#[tokio::test]
async fn stale_token_triggers_a_refresh() {
    let server = MockServer::start().await;
    // expires_in 1s is inside the 2s safety margin, so every call refreshes
    mount_token_endpoint(&server, "1", 2).await;

    Mock::given(method("POST"))
        .and(path("/mpesa/accountbalance/v1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ResponseCode": "0",
            "ResponseDescription": "ok",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.account_balance(balance_request()).await.unwrap();
    client.account_balance(balance_request()).await.unwrap();
}

#[tokio::test]
async fn rejected_credentials_abort_the_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/token/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": "999991",
            "resultDesc": "Invalid client id passed",
        })))
        .mount(&server)
        .await;

    // the business endpoint must never be reached
    Mock::given(method("POST"))
        .and(path("/mpesa/accountbalance/v1/query"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.account_balance(balance_request()).await.unwrap_err();
    assert_eq!(err.code(), "AUTH_ERROR");
    assert!(err.to_string().contains("Invalid client id passed"));
}

#[tokio::test]
async fn timeouts_are_retried_max_retries_plus_one_times() {
    let server = MockServer::start().await;

    // Always slower than the client timeout; register_url needs no token,
    // so every received request is one transport attempt.
    Mock::given(method("POST"))
        .and(path("/v1/c2b-register-url/register"))
        .and(query_param("apikey", "key"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(3)
        .mount(&server)
        .await;

    init_tracing();
    let client = MpesaClient::builder()
        .credentials("key", "secret")
        .base_url(server.uri())
        .timeout(Duration::from_millis(200))
        .max_retries(2)
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client.register_url(register_request()).await.unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(err.code(), "TIMEOUT_ERROR");
    // linear backoff sleeps 1s then 2s between the three attempts
    assert!(
        elapsed >= Duration::from_secs(3),
        "expected at least 3s of backoff, took {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(10),
        "backoff took unexpectedly long: {elapsed:?}"
    );
}

#[tokio::test]
async fn validation_failure_performs_no_http_calls() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let request = AccountBalanceRequest {
        result_url: String::new(),
        ..balance_request()
    };

    let err = client.account_balance(request).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn gateway_error_body_is_classified() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "3600", 1).await;

    Mock::given(method("POST"))
        .and(path("/mpesa/accountbalance/v1/query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "requestId": "12345",
            "errorCode": "500",
            "errorMessage": "boom",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.account_balance(balance_request()).await.unwrap_err();

    assert_eq!(err.code(), "500");
    assert_eq!(err.request_id(), Some("12345"));
    assert!(err.to_string().contains("12345"));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn svc0403_surfaces_as_authentication_error() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "3600", 1).await;

    Mock::given(method("POST"))
        .and(path("/mpesa/b2c/v2/paymentrequest"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "requestId": "77",
            "errorCode": "SVC0403",
            "errorMessage": "Forbidden to access operation",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = B2cPaymentRequest {
        initiator_name: "apiuser".into(),
        security_credential: "encrypted".into(),
        command_id: CommandId::SalaryPayment,
        amount: 100,
        party_a: 600000,
        party_b: 251712345678,
        remarks: "salary".into(),
        queue_time_out_url: "https://example.com/timeout".into(),
        result_url: "https://example.com/result".into(),
        occasion: String::new(),
        originator_conversation_id: "partner-002".into(),
    };

    let err = client.b2c_payment(request).await.unwrap_err();
    assert!(matches!(err, SdkError::Auth(_)));
    assert!(err.to_string().contains("Forbidden to access operation"));
}

#[tokio::test]
async fn register_url_decodes_the_nested_header_family() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/c2b-register-url/register"))
        .and(query_param("apikey", "key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "header": {
                "responseCode": "200",
                "responseMessage": "Request processed successfully",
                "customerMessage": "",
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.register_url(register_request()).await.unwrap();

    assert_eq!(response.response_code, "200");
    assert_eq!(response.response_description, "Request processed successfully");
}

#[tokio::test]
async fn register_url_failure_keeps_the_header_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/c2b-register-url/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "header": {
                "responseCode": "403",
                "responseMessage": "Short code already registered",
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.register_url(register_request()).await.unwrap_err();

    assert_eq!(err.code(), "403");
    assert!(err.to_string().contains("Short code already registered"));
}
