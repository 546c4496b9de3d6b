//! Transaction status queries and reversals

use mpesa_core::validation::validate_url;
use mpesa_core::{CommandId, IdentifierType, SdkResult};
use serde::Serialize;

use crate::request::{MpesaRequest, MpesaResponse, decode_flat};
use crate::transport::RawResponse;

/// Parameters for querying the status of a previously initiated transaction
#[derive(Debug, Clone, Serialize)]
pub struct TransactionStatusRequest {
    /// Filled automatically with [`CommandId::TransactionStatus`]
    #[serde(rename = "CommandID", skip_serializing_if = "Option::is_none")]
    pub command_id: Option<CommandId>,

    /// Identifier kind of `party_a`
    #[serde(rename = "IdentifierType")]
    pub identifier_type: IdentifierType,

    /// API operator username authenticating the query
    #[serde(rename = "Initiator")]
    pub initiator: String,

    /// Optional additional transaction details
    #[serde(rename = "Occasion")]
    pub occasion: String,

    /// Id of the original request, when the transaction id is unknown
    #[serde(rename = "OriginatorConversationID", skip_serializing_if = "String::is_empty")]
    pub originator_conversation_id: String,

    /// Shortcode or MSISDN the transaction targeted
    #[serde(rename = "PartyA")]
    pub party_a: String,

    /// Notification URL if the request times out gateway-side
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_time_out_url: String,

    /// Optional free-text comment
    #[serde(rename = "Remarks")]
    pub remarks: String,

    /// URL receiving the status result
    #[serde(rename = "ResultURL")]
    pub result_url: String,

    /// Encrypted initiator password
    #[serde(rename = "SecurityCredential")]
    pub security_credential: String,

    /// Gateway-assigned transaction id, e.g. `LKXXXX1234`
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
}

pub type TransactionStatusResponse = MpesaResponse;

impl MpesaRequest for TransactionStatusRequest {
    type Response = TransactionStatusResponse;

    fn validate(&self) -> SdkResult<()> {
        validate_url(&self.queue_time_out_url)?;
        validate_url(&self.result_url)?;
        Ok(())
    }

    fn fill_defaults(&mut self) {
        self.command_id = Some(CommandId::TransactionStatus);
    }

    fn decode_response(&self, raw: &RawResponse) -> SdkResult<Self::Response> {
        decode_flat(raw)
    }
}

/// Parameters for reversing a completed transaction
#[derive(Debug, Clone, Serialize)]
pub struct TransactionReversalRequest {
    /// API operator username initiating the reversal
    #[serde(rename = "Initiator")]
    pub initiator: String,

    /// Encrypted initiator password
    #[serde(rename = "SecurityCredential")]
    pub security_credential: String,

    /// Filled automatically with [`CommandId::TransactionReversal`]
    #[serde(rename = "CommandID", skip_serializing_if = "Option::is_none")]
    pub command_id: Option<CommandId>,

    /// Id of the transaction being reversed
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,

    /// Amount to reverse, whole units
    #[serde(rename = "Amount")]
    pub amount: u64,

    /// Organization receiving the reversed funds
    #[serde(rename = "ReceiverParty")]
    pub receiver_party: String,

    /// Identifier kind of `receiver_party`
    #[serde(rename = "RecieverIdentifierType")]
    pub receiver_identifier_type: IdentifierType,

    /// Notification URL if the request times out gateway-side
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_time_out_url: String,

    /// URL receiving the reversal result
    #[serde(rename = "ResultURL")]
    pub result_url: String,

    /// Optional free-text comment
    #[serde(rename = "Remarks")]
    pub remarks: String,

    /// Optional additional transaction details
    #[serde(rename = "Occasion")]
    pub occasion: String,

    /// Caller-chosen id for correlating the async result
    #[serde(rename = "OriginatorConversationID")]
    pub originator_conversation_id: String,
}

pub type TransactionReversalResponse = MpesaResponse;

impl MpesaRequest for TransactionReversalRequest {
    type Response = TransactionReversalResponse;

    fn validate(&self) -> SdkResult<()> {
        validate_url(&self.queue_time_out_url)?;
        validate_url(&self.result_url)?;
        Ok(())
    }

    fn fill_defaults(&mut self) {
        self.command_id = Some(CommandId::TransactionReversal);
    }

    fn decode_response(&self, raw: &RawResponse) -> SdkResult<Self::Response> {
        decode_flat(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversal_wire_field_keeps_the_gateway_spelling() {
        let mut request = TransactionReversalRequest {
            initiator: "apiuser".into(),
            security_credential: "encrypted".into(),
            command_id: None,
            transaction_id: "LKXXXX1234".into(),
            amount: 50,
            receiver_party: "600000".into(),
            receiver_identifier_type: IdentifierType::ShortCode,
            queue_time_out_url: "https://example.com/timeout".into(),
            result_url: "https://example.com/result".into(),
            remarks: String::new(),
            occasion: String::new(),
            originator_conversation_id: "partner-003".into(),
        };
        request.fill_defaults();

        let body = serde_json::to_value(&request).unwrap();
        // the gateway's own (misspelled) field name
        assert_eq!(body["RecieverIdentifierType"], "4");
        assert_eq!(body["CommandID"], "TransactionReversal");
    }

    #[test]
    fn status_query_omits_empty_originator_id() {
        let mut request = TransactionStatusRequest {
            command_id: None,
            identifier_type: IdentifierType::ShortCode,
            initiator: "apiuser".into(),
            occasion: String::new(),
            originator_conversation_id: String::new(),
            party_a: "600000".into(),
            queue_time_out_url: "https://example.com/timeout".into(),
            remarks: String::new(),
            result_url: "https://example.com/result".into(),
            security_credential: "encrypted".into(),
            transaction_id: "LKXXXX1234".into(),
        };
        request.fill_defaults();

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("OriginatorConversationID").is_none());
        assert_eq!(body["CommandID"], "TransactionStatusQuery");
    }
}
