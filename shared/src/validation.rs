//! Validation utilities for advisory requests

/// Maximum accepted district name length (in characters)
pub const MAX_DISTRICT_LEN: usize = 100;

/// Validate a district name as supplied by a caller
pub fn validate_district(district: &str) -> Result<(), &'static str> {
    let trimmed = district.trim();
    if trimmed.is_empty() {
        return Err("District name is required");
    }
    if trimmed.chars().count() > MAX_DISTRICT_LEN {
        return Err("District name is too long");
    }
    let allowed = |c: char| {
        c.is_alphabetic()
            || c.is_whitespace()
            || is_kannada_mark(c)
            || matches!(c, '-' | '.' | '\'' | ZWNJ | ZWJ)
    };
    if !trimmed.chars().all(allowed) {
        return Err("District name may only contain letters, spaces, hyphens, dots and apostrophes");
    }
    Ok(())
}

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

/// Vowel signs, virama and other combining marks of the Kannada block
fn is_kannada_mark(c: char) -> bool {
    matches!(c, '\u{0C80}'..='\u{0CFF}') && !c.is_numeric()
}

/// Normalize a district name into its lookup key
///
/// Trims, collapses runs of whitespace and lowercases, so that
/// `"  Dakshina   Kannada "` and `"dakshina kannada"` share a key.
pub fn normalize_district(district: &str) -> String {
    district
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
