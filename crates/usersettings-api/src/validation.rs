// Input validation for settings APIs
//
// Last-resort limits on path identifiers. Setting values themselves are not
// validated or sanitized.

use usersettings_core::{Result, SettingsError};

/// Maximum size for a user identifier.
pub const MAX_USER_ID_BYTES: usize = 256;

/// Maximum size for a setting code.
pub const MAX_SETTING_CODE_BYTES: usize = 256;

fn validate_identifier(field: &str, value: &str, max_bytes: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SettingsError::invalid_input(format!(
            "{} must not be empty",
            field
        )));
    }
    if value.len() > max_bytes {
        tracing::warn!(
            "{} exceeds limit: {} bytes (max: {})",
            field,
            value.len(),
            max_bytes
        );
        return Err(SettingsError::invalid_input(format!(
            "{} exceeds {} bytes",
            field, max_bytes
        )));
    }
    Ok(())
}

/// Validate a user identifier taken from the path
pub fn validate_user_id(user_id: &str) -> Result<()> {
    validate_identifier("user_id", user_id, MAX_USER_ID_BYTES)
}

/// Validate a setting code taken from the path
pub fn validate_setting_code(code: &str) -> Result<()> {
    validate_identifier("code", code, MAX_SETTING_CODE_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_regular_identifiers() {
        assert!(validate_user_id("user_01HZX").is_ok());
        assert!(validate_setting_code("openai_api_key").is_ok());
    }

    #[test]
    fn test_rejects_blank_identifiers() {
        let err = validate_user_id("  ").unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(err, SettingsError::InvalidInput(ref msg) if msg == "user_id must not be empty"));
        assert!(validate_setting_code("").is_err());
    }

    #[test]
    fn test_rejects_oversized_identifiers() {
        let long = "x".repeat(MAX_USER_ID_BYTES + 1);
        assert!(validate_user_id(&long).is_err());
        assert!(validate_user_id(&long[..MAX_USER_ID_BYTES]).is_ok());
    }
}
