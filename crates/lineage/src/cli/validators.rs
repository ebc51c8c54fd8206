//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Validate an entity, attribute or edge id.
///
/// Ids are opaque strings and may contain inner spaces, as graph exports
/// allow. Surrounding whitespace is trimmed.
pub fn validate_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("ID cannot be empty".to_string());
    }

    Ok(s.to_string())
}

/// Validate a result limit (at least 1).
pub fn validate_limit(s: &str) -> Result<usize, String> {
    let limit: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid limit '{s}': expected a positive number"))?;
    if limit == 0 {
        return Err("Limit must be at least 1".to_string());
    }
    Ok(limit)
}
