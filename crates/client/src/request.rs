//! Request contract and response envelopes
//!
//! Every payment operation is a value type implementing [`MpesaRequest`].
//! The associated `Response` type makes the pipeline fully generic: what the
//! decoder produces is what the caller gets, resolved at compile time.
//!
//! The gateway answers in one of two envelope families. Most endpoints use
//! the flat shape with `ResponseCode` and a `"0"` success sentinel; the C2B
//! URL registration endpoint nests its fields under `header` with a `"200"`
//! sentinel. Failed calls of either family carry the
//! `{requestId, errorCode, errorMessage}` error shape instead.

use mpesa_core::{SdkError, SdkResult};
use serde::Deserialize;

use crate::transport::RawResponse;

/// Gateway error code signalling an authentication failure
const AUTH_FAILURE_CODE: &str = "SVC0403";

/// The capability every endpoint request must provide to be executable
/// by [`MpesaClient`](crate::MpesaClient)
pub trait MpesaRequest {
    /// What a successful call decodes into
    type Response;

    /// Check required fields before any I/O happens
    fn validate(&self) -> SdkResult<()>;

    /// Populate fields the caller should not need to set (fixed command
    /// ids, computed timestamp/signature pairs). Called exactly once per
    /// execution, after validation.
    fn fill_defaults(&mut self) {}

    /// Decode the raw gateway reply into the typed response, or classify
    /// the failure
    fn decode_response(&self, raw: &RawResponse) -> SdkResult<Self::Response>;
}

/// Flat-family reply, shared by most endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MpesaResponse {
    #[serde(default, rename = "ConversationID")]
    pub conversation_id: String,
    #[serde(default, rename = "OriginatorConversationID")]
    pub originator_conversation_id: String,
    #[serde(default, rename = "ResponseDescription")]
    pub response_description: String,
    #[serde(default, rename = "ResponseCode")]
    pub response_code: String,
}

/// Error shape the gateway uses for failed calls of both families
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MpesaErrorResponse {
    #[serde(default, rename = "requestId")]
    pub request_id: String,
    #[serde(default, rename = "errorCode")]
    pub error_code: String,
    #[serde(default, rename = "errorMessage")]
    pub error_message: String,
}

/// Nested-header family, used by C2B URL registration
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct HeaderEnvelope {
    #[serde(default)]
    pub header: Header,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Header {
    #[serde(default, rename = "responseCode")]
    pub response_code: String,
    #[serde(default, rename = "responseMessage")]
    pub response_message: String,
}

/// Turn a gateway error reply into the matching [`SdkError`].
///
/// `SVC0403` is an authentication failure and gets its own classification;
/// every other code passes through verbatim, with the gateway's request id
/// kept for correlation.
pub(crate) fn classify_gateway_error(err: MpesaErrorResponse) -> SdkError {
    if err.error_code == AUTH_FAILURE_CODE {
        return SdkError::auth(err.error_message);
    }

    SdkError::Gateway {
        message: format!(
            "request {} failed due to {}",
            err.request_id, err.error_message
        ),
        code: err.error_code,
        request_id: Some(err.request_id),
    }
}

/// Decode a flat-family reply: sentinel `"0"` is success, anything else is
/// re-parsed as the error shape.
pub(crate) fn decode_flat(raw: &RawResponse) -> SdkResult<MpesaResponse> {
    let response: MpesaResponse = serde_json::from_slice(&raw.body)?;
    if response.response_code == "0" {
        return Ok(response);
    }

    // An absent code (non-2xx status bodies have none) lands here too.
    let err: MpesaErrorResponse = serde_json::from_slice(&raw.body)?;
    Err(classify_gateway_error(err))
}

/// Decode a nested-header reply: sentinel `"200"` is success; an empty code
/// means the body is the plain error shape instead.
pub(crate) fn decode_header(raw: &RawResponse) -> SdkResult<MpesaResponse> {
    let envelope: HeaderEnvelope = serde_json::from_slice(&raw.body)?;

    match envelope.header.response_code.as_str() {
        "200" => Ok(MpesaResponse {
            response_code: envelope.header.response_code,
            response_description: envelope.header.response_message,
            ..Default::default()
        }),
        "" => {
            let err: MpesaErrorResponse = serde_json::from_slice(&raw.body)?;
            Err(classify_gateway_error(err))
        }
        _ => Err(SdkError::Gateway {
            message: format!(
                "url registration failed due to {}",
                envelope.header.response_message
            ),
            code: envelope.header.response_code,
            request_id: None,
        }),
    }
}
