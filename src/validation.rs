//! Input validation utilities
//!
//! Validates user-supplied identifiers before any AWS call is made.

use crate::error::{InfractlError, Result};

/// Validate EC2 instance ID format
///
/// Instance IDs must start with "i-" followed by alphanumeric characters.
pub fn validate_instance_id(instance_id: &str) -> Result<()> {
    if !instance_id.starts_with("i-") {
        return Err(InfractlError::Validation {
            field: "instance_id".to_string(),
            reason: format!("Instance ID must start with 'i-', got: {}", instance_id),
        });
    }

    if instance_id.len() < 10 || instance_id.len() > 19 {
        return Err(InfractlError::Validation {
            field: "instance_id".to_string(),
            reason: format!(
                "Instance ID must be 10-19 characters, got: {} (len: {})",
                instance_id,
                instance_id.len()
            ),
        });
    }

    let id_part = &instance_id[2..];
    if !id_part.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(InfractlError::Validation {
            field: "instance_id".to_string(),
            reason: format!(
                "Instance ID must contain only alphanumeric characters after 'i-', got: {}",
                instance_id
            ),
        });
    }

    Ok(())
}

/// Validate a tag key/value pair used for bulk start/stop
///
/// AWS tag keys are 1-128 characters; values may be empty but we require
/// one here because an empty value filter matches nothing useful.
pub fn validate_tag(tag_key: &str, tag_value: &str) -> Result<()> {
    if tag_key.is_empty() {
        return Err(InfractlError::Validation {
            field: "tag_key".to_string(),
            reason: "Tag key cannot be empty".to_string(),
        });
    }

    if tag_key.len() > 128 {
        return Err(InfractlError::Validation {
            field: "tag_key".to_string(),
            reason: format!("Tag key must be <= 128 characters (len: {})", tag_key.len()),
        });
    }

    if tag_value.is_empty() {
        return Err(InfractlError::Validation {
            field: "tag_value".to_string(),
            reason: "Tag value cannot be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_instance_id() {
        assert!(validate_instance_id("i-1234567890abcdef0").is_ok());
        assert!(validate_instance_id("i-12345678").is_ok());
    }

    #[test]
    fn test_invalid_instance_id_prefix() {
        assert!(validate_instance_id("vol-1234567890abcdef0").is_err());
        assert!(validate_instance_id("1234567890abcdef0").is_err());
    }

    #[test]
    fn test_invalid_instance_id_length() {
        assert!(validate_instance_id("i-123").is_err());
        assert!(validate_instance_id("i-1234567890abcdef01234").is_err());
    }

    #[test]
    fn test_invalid_instance_id_characters() {
        assert!(validate_instance_id("i-12345678!@").is_err());
    }

    #[test]
    fn test_valid_tag() {
        assert!(validate_tag("Schedule", "Auto").is_ok());
    }

    #[test]
    fn test_invalid_tag() {
        assert!(validate_tag("", "Auto").is_err());
        assert!(validate_tag("Schedule", "").is_err());
        assert!(validate_tag(&"k".repeat(129), "v").is_err());
    }
}
