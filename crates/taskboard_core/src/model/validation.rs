//! Record validation shared by create and update paths.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid color regex"));

/// Rejected record shape. Raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Board title is empty after trimming.
    EmptyTitle,
    /// Card content is empty after trimming.
    EmptyContent,
    /// Board color is not a `#rgb` / `#rrggbb` hex value.
    InvalidColor(String),
    /// Card creation without an owning board id.
    MissingBoardReference,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "board title must not be empty"),
            Self::EmptyContent => write!(f, "card content must not be empty"),
            Self::InvalidColor(value) => write!(f, "invalid board color `{value}`"),
            Self::MissingBoardReference => write!(f, "card must reference a board"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::is_hex_color;

    #[test]
    fn hex_color_accepts_short_and_long_forms() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#8038F0"));
        assert!(!is_hex_color("8038F0"));
        assert!(!is_hex_color("#80 38F0"));
        assert!(!is_hex_color("red"));
    }
}
