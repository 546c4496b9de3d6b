//! Account balance queries

use mpesa_core::validation::validate_url;
use mpesa_core::{CommandId, IdentifierType, SdkResult};
use serde::Serialize;

use crate::request::{MpesaRequest, MpesaResponse, decode_flat};
use crate::transport::RawResponse;

/// Parameters for querying the balance of a business shortcode
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalanceRequest {
    /// Filled automatically with [`CommandId::AccountBalance`]
    #[serde(rename = "CommandID", skip_serializing_if = "Option::is_none")]
    pub command_id: Option<CommandId>,

    /// Identifier kind of `party_a`, usually a shortcode
    #[serde(rename = "IdentifierType")]
    pub identifier_type: IdentifierType,

    /// API operator username authenticating the query
    #[serde(rename = "Initiator")]
    pub initiator: String,

    /// Shortcode whose balance is queried
    #[serde(rename = "PartyA")]
    pub party_a: u64,

    /// Notification URL if the request times out gateway-side
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_time_out_url: String,

    /// Optional free-text comment
    #[serde(rename = "Remarks")]
    pub remarks: String,

    /// URL receiving the balance result
    #[serde(rename = "ResultURL")]
    pub result_url: String,

    /// Encrypted initiator password
    #[serde(rename = "SecurityCredential")]
    pub security_credential: String,

    /// Caller-chosen id for correlating the async result
    #[serde(rename = "OriginatorConversationID")]
    pub originator_conversation_id: String,
}

impl Default for AccountBalanceRequest {
    fn default() -> Self {
        Self {
            command_id: None,
            identifier_type: IdentifierType::ShortCode,
            initiator: String::new(),
            party_a: 0,
            queue_time_out_url: String::new(),
            remarks: String::new(),
            result_url: String::new(),
            security_credential: String::new(),
            originator_conversation_id: String::new(),
        }
    }
}

pub type AccountBalanceResponse = MpesaResponse;

impl MpesaRequest for AccountBalanceRequest {
    type Response = AccountBalanceResponse;

    fn validate(&self) -> SdkResult<()> {
        validate_url(&self.queue_time_out_url)?;
        validate_url(&self.result_url)?;
        Ok(())
    }

    fn fill_defaults(&mut self) {
        self.command_id = Some(CommandId::AccountBalance);
    }

    fn decode_response(&self, raw: &RawResponse) -> SdkResult<Self::Response> {
        decode_flat(raw)
    }
}
