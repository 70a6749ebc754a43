//! Trail difficulty levels and the vocabulary standardizer.
//!
//! Providers grade trails in incompatible ways: Hiking Project uses colour
//! labels (`green`, `blueBlack`), OpenStreetMap uses the SAC alpine scale and
//! free text, USGS-shaped records carry plain words. [`Difficulty::standardize`]
//! folds them all onto four levels.
//!
//! # Examples
//! ```
//! use greentrails_core::Difficulty;
//!
//! assert_eq!(Difficulty::standardize(Some("greenBlue")), Difficulty::Easy);
//! assert_eq!(Difficulty::standardize(Some("T5")), Difficulty::Hard);
//! assert_eq!(Difficulty::standardize(None), Difficulty::Moderate);
//! assert_eq!(Difficulty::Expert.to_string(), "expert");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyword groups in match priority order. The first group with a keyword
/// contained in the lowercased input wins.
const KEYWORD_GROUPS: [(&[&str], Difficulty); 4] = [
    (&["green", "easy", "beginner"], Difficulty::Easy),
    (&["blue", "moderate", "intermediate"], Difficulty::Moderate),
    (&["black", "hard", "difficult", "advanced"], Difficulty::Hard),
    (&["expert", "extreme", "technical"], Difficulty::Expert),
];

/// SAC hiking scale codes, consulted only when no keyword group matched.
const SAC_CODES: [(&str, Difficulty); 6] = [
    ("t1", Difficulty::Easy),
    ("t2", Difficulty::Moderate),
    ("t3", Difficulty::Moderate),
    ("t4", Difficulty::Hard),
    ("t5", Difficulty::Hard),
    ("t6", Difficulty::Expert),
];

/// Four-level trail difficulty shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Suitable for beginners and families.
    Easy,
    /// Some elevation or rough footing.
    #[default]
    Moderate,
    /// Sustained climbing or exposure.
    Hard,
    /// Technical or alpine terrain.
    Expert,
}

/// Error returned when parsing a canonical difficulty name fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown difficulty '{0}'")]
pub struct ParseDifficultyError(pub String);

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Self; 4] = [Self::Easy, Self::Moderate, Self::Hard, Self::Expert];

    /// Map a provider's free-text difficulty onto one of the four levels.
    ///
    /// Matching is a case-insensitive substring search. Missing, empty and
    /// unrecognised input yields [`Difficulty::Moderate`].
    ///
    /// # Examples
    /// ```
    /// use greentrails_core::Difficulty;
    ///
    /// assert_eq!(Difficulty::standardize(Some("Black Diamond")), Difficulty::Hard);
    /// assert_eq!(Difficulty::standardize(Some("")), Difficulty::Moderate);
    /// ```
    #[must_use]
    pub fn standardize(raw: Option<&str>) -> Self {
        let Some(text) = raw else {
            return Self::Moderate;
        };
        let lowered = text.to_lowercase();
        KEYWORD_GROUPS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(*keyword)))
            .map(|(_, level)| *level)
            .or_else(|| {
                SAC_CODES
                    .iter()
                    .find(|(code, _)| lowered.contains(*code))
                    .map(|(_, level)| *level)
            })
            .unwrap_or(Self::Moderate)
    }

    /// Return the level as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "moderate" => Ok(Self::Moderate),
            "hard" => Ok(Self::Hard),
            "expert" => Ok(Self::Expert),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}
