//! Facility code normalization and validation.
//!
//! Codes are stored normalized to upper-case so uniqueness is
//! case-insensitive without needing a functional index.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum facility code length.
pub const MAX_CODE_LEN: usize = 10;

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9_-]{1,10}$").expect("valid regex"))
}

/// Normalize a facility code: trim surrounding whitespace and upper-case.
pub fn normalize_facility_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Normalize and validate a facility code.
///
/// Accepts 1–10 characters of `A-Z`, `0-9`, `-`, `_` after normalization.
pub fn parse_facility_code(code: &str) -> Result<String, CoreError> {
    let normalized = normalize_facility_code(code);
    if !code_pattern().is_match(&normalized) {
        return Err(CoreError::InvalidArgument(format!(
            "Facility code must be 1-{MAX_CODE_LEN} alphanumeric/-/_ characters, got {code:?}"
        )));
    }
    Ok(normalized)
}
