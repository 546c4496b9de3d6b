//! Customer-to-business flows: URL registration, payment simulation and
//! STK push

use mpesa_core::credentials::timestamp_and_password;
use mpesa_core::validation::{validate_msisdn, validate_url};
use mpesa_core::{CommandId, ResponseType, SdkResult, TransactionType};
use serde::{Deserialize, Serialize};

use crate::request::{
    MpesaErrorResponse, MpesaRequest, MpesaResponse, classify_gateway_error, decode_flat,
    decode_header,
};
use crate::transport::RawResponse;

/// Parameters for registering the validation and confirmation URLs of a
/// shortcode
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUrlRequest {
    /// Business shortcode accepting customer payments
    #[serde(rename = "ShortCode")]
    pub short_code: String,

    /// What the gateway does when the validation URL is unreachable
    #[serde(rename = "ResponseType")]
    pub response_type: ResponseType,

    /// Filled automatically with [`CommandId::RegisterUrl`]
    #[serde(rename = "CommandID", skip_serializing_if = "Option::is_none")]
    pub command_id: Option<CommandId>,

    /// URL receiving payment completion notifications
    #[serde(rename = "ConfirmationURL")]
    pub confirmation_url: String,

    /// URL receiving payment validation requests
    #[serde(rename = "ValidationURL")]
    pub validation_url: String,
}

pub type RegisterUrlResponse = MpesaResponse;

impl MpesaRequest for RegisterUrlRequest {
    type Response = RegisterUrlResponse;

    fn validate(&self) -> SdkResult<()> {
        validate_url(&self.confirmation_url)?;
        validate_url(&self.validation_url)?;
        Ok(())
    }

    fn fill_defaults(&mut self) {
        self.command_id = Some(CommandId::RegisterUrl);
    }

    // This endpoint is the one user of the nested-header reply family.
    fn decode_response(&self, raw: &RawResponse) -> SdkResult<Self::Response> {
        decode_header(raw)
    }
}

/// Parameters for simulating a customer-initiated payment (sandbox only)
#[derive(Debug, Clone, Serialize)]
pub struct SimulatePaymentRequest {
    /// Filled automatically with [`CommandId::CustomerPayBillOnline`]
    #[serde(rename = "CommandID", skip_serializing_if = "Option::is_none")]
    pub command_id: Option<CommandId>,

    /// Amount the simulated customer pays
    #[serde(rename = "Amount")]
    pub amount: u64,

    /// Paying customer's phone number
    #[serde(rename = "Msisdn")]
    pub msisdn: String,

    /// Reference the customer would enter, e.g. an invoice number
    #[serde(rename = "BillRefNumber")]
    pub bill_ref_number: String,

    /// Receiving business shortcode
    #[serde(rename = "ShortCode")]
    pub short_code: String,
}

pub type SimulatePaymentResponse = MpesaResponse;

impl MpesaRequest for SimulatePaymentRequest {
    type Response = SimulatePaymentResponse;

    fn validate(&self) -> SdkResult<()> {
        validate_msisdn(&self.msisdn)
    }

    fn fill_defaults(&mut self) {
        self.command_id = Some(CommandId::CustomerPayBillOnline);
    }

    fn decode_response(&self, raw: &RawResponse) -> SdkResult<Self::Response> {
        decode_flat(raw)
    }
}

/// Extra key/value details attached to an STK push
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceItem {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Parameters for prompting a customer's phone to authorize a charge
#[derive(Debug, Clone, Serialize)]
pub struct StkPushRequest {
    /// Caller-chosen id echoed back in the response
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: String,

    /// Charging business shortcode
    #[serde(rename = "BusinessShortCode")]
    pub business_short_code: u64,

    /// Extra transaction details shown to the customer
    #[serde(rename = "ReferenceData")]
    pub reference_data: Vec<ReferenceItem>,

    /// PayBill or BuyGoods
    #[serde(rename = "TransactionType")]
    pub transaction_type: TransactionType,

    /// Computed by `fill_defaults` from the shortcode, passkey and timestamp
    #[serde(rename = "Password")]
    pub password: String,

    /// Computed by `fill_defaults`, `YYYYMMDDHHMMSS`
    #[serde(rename = "Timestamp")]
    pub timestamp: String,

    /// Charge amount, whole units
    #[serde(rename = "Amount")]
    pub amount: u64,

    /// Paying party, usually the customer MSISDN
    #[serde(rename = "PartyA")]
    pub party_a: String,

    /// Receiving shortcode
    #[serde(rename = "PartyB")]
    pub party_b: String,

    /// Phone receiving the PIN prompt
    #[serde(rename = "PhoneNumber")]
    pub phone_number: String,

    /// URL receiving the transaction outcome
    #[serde(rename = "CallBackURL")]
    pub call_back_url: String,

    /// Reference shown to the customer
    #[serde(rename = "AccountReference")]
    pub account_reference: String,

    /// Short transaction description
    #[serde(rename = "TransactionDesc")]
    pub transaction_desc: String,

    /// Set via [`StkPushRequest::set_passkey`]; never serialized
    #[serde(skip)]
    passkey: String,
}

impl Default for StkPushRequest {
    fn default() -> Self {
        Self {
            merchant_request_id: String::new(),
            business_short_code: 0,
            reference_data: Vec::new(),
            transaction_type: TransactionType::CustomerPayBillOnline,
            password: String::new(),
            timestamp: String::new(),
            amount: 0,
            party_a: String::new(),
            party_b: String::new(),
            phone_number: String::new(),
            call_back_url: String::new(),
            account_reference: String::new(),
            transaction_desc: String::new(),
            passkey: String::new(),
        }
    }
}

impl StkPushRequest {
    /// Attach the STK passkey used to derive the request signature
    pub fn set_passkey(&mut self, passkey: impl Into<String>) {
        self.passkey = passkey.into();
    }
}

/// STK push replies extend the flat family with checkout identifiers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StkPushResponse {
    #[serde(default, rename = "MerchantRequestID")]
    pub merchant_request_id: String,
    #[serde(default, rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    #[serde(default, rename = "ResponseCode")]
    pub response_code: String,
    #[serde(default, rename = "ResponseDescription")]
    pub response_description: String,
    #[serde(default, rename = "CustomerMessage")]
    pub customer_message: String,
}

impl MpesaRequest for StkPushRequest {
    type Response = StkPushResponse;

    fn validate(&self) -> SdkResult<()> {
        validate_url(&self.call_back_url)
    }

    fn fill_defaults(&mut self) {
        let (timestamp, password) =
            timestamp_and_password(self.business_short_code, &self.passkey);
        self.timestamp = timestamp;
        self.password = password;
    }

    fn decode_response(&self, raw: &RawResponse) -> SdkResult<Self::Response> {
        let response: StkPushResponse = serde_json::from_slice(&raw.body)?;

        match response.response_code.as_str() {
            "0" => Ok(response),
            "" => {
                let err: MpesaErrorResponse = serde_json::from_slice(&raw.body)?;
                Err(classify_gateway_error(err))
            }
            _ => Err(classify_gateway_error(MpesaErrorResponse {
                request_id: response.merchant_request_id,
                error_code: response.response_code,
                error_message: response.response_description,
            })),
        }
    }
}
