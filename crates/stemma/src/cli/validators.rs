//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Maximum accepted length of a name query, in characters
pub const MAX_QUERY_LENGTH: usize = 200;

/// Validate a person ID.
///
/// IDs are opaque text, so only the obviously broken inputs are refused:
/// empty IDs and IDs containing whitespace or control characters.
pub fn validate_person_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Person ID cannot be empty".to_string());
    }

    if s.chars().any(char::is_whitespace) {
        return Err(format!("Person ID cannot contain whitespace: '{s}'"));
    }

    if s.chars().any(char::is_control) {
        return Err("Person ID cannot contain control characters".to_string());
    }

    Ok(s.to_string())
}

/// Validate a name query.
///
/// Must be non-empty after trimming, at most [`MAX_QUERY_LENGTH`]
/// characters, and free of control characters.
pub fn validate_name_query(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    let length = s.chars().count();
    if length > MAX_QUERY_LENGTH {
        return Err(format!(
            "Name cannot exceed {MAX_QUERY_LENGTH} characters, got {length} characters"
        ));
    }

    if let Some(pos) = s.chars().position(char::is_control) {
        return Err(format!(
            "Name contains invalid control character at position {pos}"
        ));
    }

    Ok(s.to_string())
}
