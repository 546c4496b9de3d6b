//! Business-to-customer disbursements

use mpesa_core::validation::validate_url;
use mpesa_core::{CommandId, SdkError, SdkResult};
use serde::Serialize;

use crate::request::{MpesaRequest, MpesaResponse, decode_flat};
use crate::transport::RawResponse;

/// Parameters for sending money from a business shortcode to a customer
/// wallet
#[derive(Debug, Clone, Serialize)]
pub struct B2cPaymentRequest {
    /// API operator username initiating the payout
    #[serde(rename = "InitiatorName")]
    pub initiator_name: String,

    /// Encrypted initiator password
    #[serde(rename = "SecurityCredential")]
    pub security_credential: String,

    /// One of BusinessPayment, SalaryPayment or PromotionPayment
    #[serde(rename = "CommandID")]
    pub command_id: CommandId,

    /// Amount to disburse, whole units
    #[serde(rename = "Amount")]
    pub amount: u64,

    /// Sending business shortcode
    #[serde(rename = "PartyA")]
    pub party_a: u64,

    /// Receiving customer MSISDN
    #[serde(rename = "PartyB")]
    pub party_b: u64,

    /// Optional free-text comment
    #[serde(rename = "Remarks")]
    pub remarks: String,

    /// Notification URL if the request times out gateway-side
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_time_out_url: String,

    /// URL receiving the payout result
    #[serde(rename = "ResultURL")]
    pub result_url: String,

    /// Optional additional transaction details
    #[serde(rename = "Occasion")]
    pub occasion: String,

    /// Caller-chosen id for correlating the async result
    #[serde(rename = "OriginatorConversationID")]
    pub originator_conversation_id: String,
}

pub type B2cPaymentResponse = MpesaResponse;

impl MpesaRequest for B2cPaymentRequest {
    type Response = B2cPaymentResponse;

    fn validate(&self) -> SdkResult<()> {
        if !matches!(
            self.command_id,
            CommandId::BusinessPayment | CommandId::SalaryPayment | CommandId::PromotionPayment
        ) {
            return Err(SdkError::validation(format!(
                "command {:?} is not a B2C payout command",
                self.command_id
            )));
        }

        validate_url(&self.queue_time_out_url)?;
        validate_url(&self.result_url)?;
        Ok(())
    }

    fn decode_response(&self, raw: &RawResponse) -> SdkResult<Self::Response> {
        decode_flat(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> B2cPaymentRequest {
        B2cPaymentRequest {
            initiator_name: "apiuser".into(),
            security_credential: "encrypted".into(),
            command_id: CommandId::BusinessPayment,
            amount: 100,
            party_a: 600000,
            party_b: 251712345678,
            remarks: "payout".into(),
            queue_time_out_url: "https://example.com/timeout".into(),
            result_url: "https://example.com/result".into(),
            occasion: String::new(),
            originator_conversation_id: "partner-002".into(),
        }
    }

    #[test]
    fn payout_commands_are_accepted() {
        for command in [
            CommandId::BusinessPayment,
            CommandId::SalaryPayment,
            CommandId::PromotionPayment,
        ] {
            let request = B2cPaymentRequest {
                command_id: command,
                ..valid_request()
            };
            assert!(request.validate().is_ok());
        }
    }

    #[test]
    fn non_payout_command_is_rejected() {
        let request = B2cPaymentRequest {
            command_id: CommandId::AccountBalance,
            ..valid_request()
        };
        assert_eq!(request.validate().unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn http_result_url_is_rejected() {
        let request = B2cPaymentRequest {
            result_url: "http://example.com/result".into(),
            ..valid_request()
        };
        assert!(request.validate().is_err());
    }
}
