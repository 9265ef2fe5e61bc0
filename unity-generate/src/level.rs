//! Difficulty levels and the limits on expression size that come with them.

use std::{fmt, str::FromStr};

/// A difficulty level, controlling how elaborate the generated expressions are.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Arithmetic and low-degree polynomials.
    #[default]
    Elementary,

    /// Adds radicals, rational powers and polynomial composition.
    Middle,

    /// Adds transcendental functions, absolute values, derivatives, integrals and limits.
    High,
}

impl Level {
    /// All levels, from easiest to hardest.
    pub const ALL: [Level; 3] = [Level::Elementary, Level::Middle, Level::High];

    /// Interprets the level selector of a request. A missing or unrecognized selector selects
    /// [`Level::Elementary`].
    pub fn from_request(selector: Option<&str>) -> Self {
        selector.and_then(|selector| selector.parse().ok()).unwrap_or_default()
    }

    /// The numeric form of the level (`1`, `2` or `3`).
    pub fn number(self) -> u8 {
        match self {
            Level::Elementary => 1,
            Level::Middle => 2,
            Level::High => 3,
        }
    }

    /// Maximum depth of a base expression, domain guards included.
    pub fn max_depth(self) -> usize {
        match self {
            Level::Elementary => 4,
            Level::Middle => 6,
            Level::High => 8,
        }
    }

    /// Base expressions with fewer nodes than this are re-drawn.
    pub fn min_size(self) -> usize {
        match self {
            Level::Elementary => 3,
            Level::Middle => 5,
            Level::High => 7,
        }
    }

    /// Maximum depth of a composite expression once decorations are applied.
    pub fn composite_depth(self) -> usize {
        match self {
            Level::Elementary => 12,
            Level::Middle => 14,
            Level::High => 16,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Elementary => write!(f, "elementary"),
            Level::Middle => write!(f, "middle"),
            Level::High => write!(f, "high"),
        }
    }
}

/// Parses a level from its name (case-insensitive) or its number (`1`, `2` or `3`).
impl FromStr for Level {
    type Err = InvalidLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "elementary" | "1" => Ok(Level::Elementary),
            "middle" | "2" => Ok(Level::Middle),
            "high" | "3" => Ok(Level::High),
            _ => Err(InvalidLevel { level: value.to_string() }),
        }
    }
}

/// Error returned if a string names no level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLevel {
    /// The string that was parsed.
    pub level: String,
}

impl fmt::Display for InvalidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a valid level: `{}`", self.level)
    }
}

impl std::error::Error for InvalidLevel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_numbers() {
        assert_eq!(Level::from_request(Some("HIGH")), Level::High);
        assert_eq!(Level::from_request(Some(" middle ")), Level::Middle);
        assert_eq!(Level::from_request(Some("3")), Level::High);
        assert_eq!(Level::from_request(Some("1")), Level::Elementary);
    }

    #[test]
    fn unrecognized_is_elementary() {
        assert_eq!(Level::from_request(None), Level::Elementary);
        assert_eq!(Level::from_request(Some("")), Level::Elementary);
        assert_eq!(Level::from_request(Some("4")), Level::Elementary);
        assert_eq!(Level::from_request(Some("expert")), Level::Elementary);
    }

    #[test]
    fn display_round_trips() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>(), Ok(level));
            assert_eq!(level.number().to_string().parse::<Level>(), Ok(level));
        }
    }

    #[test]
    fn invalid_level() {
        assert_eq!("expert".parse::<Level>(), Err(InvalidLevel { level: "expert".to_string() }));
        assert_eq!(
            "0".parse::<Level>().unwrap_err().to_string(),
            "not a valid level: `0`",
        );
    }
}
