//! Domain enums shared by every endpoint
//!
//! The serde renames carry the exact strings the gateway expects on the
//! wire, so these enums serialize directly into request payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// Target environment for API calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    /// Base host for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.safaricom.et",
            Self::Sandbox => "https://apisandbox.safaricom.et",
        }
    }
}

impl FromStr for Environment {
    type Err = SdkError;

    /// Unrecognized names are a configuration error, never a silent default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            other => Err(SdkError::configuration(format!(
                "unknown environment '{other}', expected 'production' or 'sandbox'"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Sandbox => write!(f, "sandbox"),
        }
    }
}

/// Command identifier carried in the `CommandID` field of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandId {
    CustomerPayBillOnline,
    AccountBalance,
    CustomerBuyGoodsOnline,
    BusinessPayment,
    SalaryPayment,
    PromotionPayment,
    #[serde(rename = "RegisterURL")]
    RegisterUrl,
    #[serde(rename = "TransactionStatusQuery")]
    TransactionStatus,
    TransactionReversal,
}

/// Identifier kind for a transaction party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierType {
    #[serde(rename = "1")]
    Msisdn,
    #[serde(rename = "2")]
    TillNumber,
    #[serde(rename = "4")]
    ShortCode,
}

/// Transaction kind for customer-initiated payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    CustomerPayBillOnline,
    CustomerBuyGoodsOnline,
}

/// How the gateway should treat a payment when the validation URL is
/// unreachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    Completed,
    Cancelled,
}
