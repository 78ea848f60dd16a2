//! Recommendations text clamping

use survey_common::models::RECOMMENDATIONS_CAPACITY;

/// Characters kept from oversized text before the ellipsis is appended
pub const TRUNCATED_PREFIX_CHARS: usize = 1497;

/// Marker appended to truncated text
pub const ELLIPSIS: char = '\u{2026}';

/// Trim recommendations and clamp them to the column capacity
///
/// Lengths are counted in chars, so multi-byte text is never split inside a
/// code point. Text over `RECOMMENDATIONS_CAPACITY` chars is cut to
/// `TRUNCATED_PREFIX_CHARS` plus `ELLIPSIS` (1498 chars total, not a full
/// column).
pub fn format_recommendations(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.chars().count() <= RECOMMENDATIONS_CAPACITY {
        return trimmed.to_string();
    }

    let mut clamped: String = trimmed.chars().take(TRUNCATED_PREFIX_CHARS).collect();
    clamped.push(ELLIPSIS);
    clamped
}
