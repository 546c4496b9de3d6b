//! Input validators used by request types before any I/O happens

use url::Url;

use crate::error::{SdkError, SdkResult};

/// Validate that a callback/result URL is an absolute HTTPS URL.
///
/// The gateway rejects plain-HTTP callbacks, so anything with a scheme
/// other than exactly `https` fails here.
pub fn validate_url(raw: &str) -> SdkResult<()> {
    let parsed = Url::parse(raw)
        .map_err(|e| SdkError::validation(format!("url parsing failed for '{raw}': {e}")))?;

    if parsed.scheme() != "https" {
        return Err(SdkError::validation(format!(
            "invalid URL scheme '{}', expected https",
            parsed.scheme()
        )));
    }

    Ok(())
}

/// Validate string length bounds; a bound of 0 skips that check
pub fn validate_string(value: &str, min_len: usize, max_len: usize) -> SdkResult<()> {
    if min_len > 0 && value.len() < min_len {
        return Err(SdkError::validation(format!(
            "'{value}' is shorter than the minimum length {min_len}"
        )));
    }

    if max_len > 0 && value.len() > max_len {
        return Err(SdkError::validation(format!(
            "'{value}' is longer than the maximum length {max_len}"
        )));
    }

    Ok(())
}

/// Validate a Safaricom Ethiopia subscriber number: 12 digits starting
/// with `2517`.
pub fn validate_msisdn(phone_number: &str) -> SdkResult<()> {
    let phone_number = phone_number.trim();

    let valid = phone_number.len() == 12
        && phone_number.starts_with("2517")
        && phone_number.chars().all(|c| c.is_ascii_digit());

    if !valid {
        return Err(SdkError::validation(format!(
            "'{phone_number}' is not a valid Safaricom phone number"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_urls_pass() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("https://example.com/callback?id=1").is_ok());
    }

    #[test]
    fn non_https_schemes_fail() {
        assert!(validate_url("http://example.com").is_err());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn failures_carry_the_validation_code() {
        let err = validate_url("http://example.com").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn string_bounds() {
        assert!(validate_string("test", 3, 10).is_ok());
        assert!(validate_string("te", 3, 10).is_err());
        assert!(validate_string("0123456789abc", 3, 10).is_err());
        // zero bounds skip the respective check
        assert!(validate_string("", 0, 10).is_ok());
        assert!(validate_string("very long remarks field", 1, 0).is_ok());
    }

    #[test]
    fn msisdn_rules() {
        assert!(validate_msisdn("251712345678").is_ok());
        assert!(validate_msisdn(" 251712345678 ").is_ok());
        assert!(validate_msisdn("251812345678").is_err()); // wrong prefix
        assert!(validate_msisdn("25171234567").is_err()); // too short
        assert!(validate_msisdn("2517123456789").is_err()); // too long
        assert!(validate_msisdn("25171234567a").is_err()); // non-digit
    }
}
