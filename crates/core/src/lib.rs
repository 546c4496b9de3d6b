//! Core types and utilities for the M-Pesa SDK
//!
//! Everything in this crate is pure: domain enums, the error taxonomy,
//! credential encoding and input validators. The HTTP client lives in
//! `mpesa-client`.

pub mod credentials;
pub mod error;
pub mod types;
pub mod validation;

pub use error::{SdkError, SdkResult};
pub use types::{CommandId, Environment, IdentifierType, ResponseType, TransactionType};
