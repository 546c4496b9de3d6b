//! Async client for the Safaricom Ethiopia M-Pesa REST API
//!
//! The entry point is [`MpesaClient`]: build one per set of credentials and
//! share it freely across tasks. Each payment operation is a value type
//! implementing [`MpesaRequest`]; the client validates it, fills gateway
//! defaults, sends it with retry-on-timeout, and decodes the reply into a
//! typed response or an [`SdkError`](mpesa_core::SdkError).
//!
//! ```no_run
//! use mpesa_client::MpesaClient;
//! use mpesa_client::account::AccountBalanceRequest;
//! use mpesa_core::{Environment, IdentifierType};
//!
//! # async fn run() -> Result<(), mpesa_core::SdkError> {
//! let client = MpesaClient::builder()
//!     .credentials("consumer-key", "consumer-secret")
//!     .environment(Environment::Sandbox)
//!     .build()?;
//!
//! let response = client
//!     .account_balance(AccountBalanceRequest {
//!         identifier_type: IdentifierType::ShortCode,
//!         initiator: "apiuser".into(),
//!         party_a: 600000,
//!         queue_time_out_url: "https://example.com/timeout".into(),
//!         result_url: "https://example.com/result".into(),
//!         remarks: "balance check".into(),
//!         security_credential: "encrypted".into(),
//!         originator_conversation_id: "partner-001".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{}", response.response_description);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod auth;
pub mod b2c;
pub mod c2b;
pub mod client;
pub mod request;
pub mod transaction;
pub mod transport;

pub use client::{MpesaClient, MpesaClientBuilder};
pub use request::{MpesaRequest, MpesaResponse};
pub use transport::{AuthMode, RawResponse};
