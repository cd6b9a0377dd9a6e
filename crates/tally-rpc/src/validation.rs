//! Input validation helpers for RPC parameters.

use crate::errors::RpcError;

/// Maximum general string parameter length (8 KB).
pub const MAX_PARAM_LENGTH: usize = 8_192;

/// Validate that a string parameter does not exceed `max_len` bytes.
pub fn validate_string_param(value: &str, name: &str, max_len: usize) -> Result<(), RpcError> {
    if value.len() > max_len {
        return Err(RpcError::InvalidParams {
            message: format!(
                "Parameter '{name}' exceeds maximum length ({} > {max_len})",
                value.len()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_param_succeeds() {
        assert!(validate_string_param("hello", "name", MAX_PARAM_LENGTH).is_ok());
    }

    #[test]
    fn param_at_limit_succeeds() {
        let s = "x".repeat(MAX_PARAM_LENGTH);
        assert!(validate_string_param(&s, "param", MAX_PARAM_LENGTH).is_ok());
    }

    #[test]
    fn oversized_param_fails() {
        let s = "x".repeat(MAX_PARAM_LENGTH + 1);
        let err = validate_string_param(&s, "email", MAX_PARAM_LENGTH).unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
        assert!(err.to_string().contains("email"));
    }
}
