//! Credential encoding helpers
//!
//! Two encodings the gateway requires: the Basic-auth credential used when
//! fetching bearer tokens, and the rotating password that signs STK push
//! requests. The password timestamp must be captured once and sent alongside
//! the signature it was derived from.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;

/// Wire format for request timestamps, e.g. `20240131120559`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Base64-encoded `key:secret` pair for HTTP Basic authentication
pub fn basic_credential(consumer_key: &str, consumer_secret: &str) -> String {
    STANDARD.encode(format!("{consumer_key}:{consumer_secret}"))
}

/// Base64-encoded `shortcode + passkey + timestamp` request signature
pub fn signed_password(shortcode: u64, passkey: &str, timestamp: &str) -> String {
    STANDARD.encode(format!("{shortcode}{passkey}{timestamp}"))
}

/// Capture the current timestamp and derive the matching signature.
///
/// Returns `(timestamp, password)`; both must go into the same request.
pub fn timestamp_and_password(shortcode: u64, passkey: &str) -> (String, String) {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let password = signed_password(shortcode, passkey, &timestamp);
    (timestamp, password)
}
