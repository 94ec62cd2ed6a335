//! Plate number normalization and validation.
//!
//! Plates are normalized before any uniqueness check so "abc 123" and
//! "ABC 123" refer to the same vehicle.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

fn plate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9 -]{2,15}$").expect("valid regex"))
}

/// Normalize a plate number: trim, upper-case, collapse runs of inner
/// whitespace to a single space.
pub fn normalize_plate(plate: &str) -> String {
    plate
        .trim()
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize and validate a plate number.
///
/// Accepts 2–15 characters of `A-Z`, `0-9`, space, `-` after normalization,
/// with at least one alphanumeric character.
pub fn parse_plate(plate: &str) -> Result<String, CoreError> {
    let normalized = normalize_plate(plate);
    if !plate_pattern().is_match(&normalized)
        || !normalized.chars().any(|c| c.is_ascii_alphanumeric())
    {
        return Err(CoreError::InvalidArgument(format!(
            "Invalid plate number {plate:?}"
        )));
    }
    Ok(normalized)
}
