//! Score banding.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Lowest score rated "good".
pub const GOOD_THRESHOLD: u8 = 70;
/// Lowest score rated "neutral".
pub const NEUTRAL_THRESHOLD: u8 = 50;

/// Qualitative rating derived from a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Neutral,
    Challenging,
}

pub const ALL_VERDICTS: [Verdict; 3] = [Verdict::Good, Verdict::Neutral, Verdict::Challenging];

impl Verdict {
    pub const fn from_score(score: u8) -> Self {
        if score >= GOOD_THRESHOLD {
            Self::Good
        } else if score >= NEUTRAL_THRESHOLD {
            Self::Neutral
        } else {
            Self::Challenging
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Challenging => "challenging",
        }
    }

    /// Display color as a hex string.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "#22c55e",
            Self::Neutral => "#eab308",
            Self::Challenging => "#ef4444",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banding_edges() {
        assert_eq!(Verdict::from_score(100), Verdict::Good);
        assert_eq!(Verdict::from_score(70), Verdict::Good);
        assert_eq!(Verdict::from_score(69), Verdict::Neutral);
        assert_eq!(Verdict::from_score(50), Verdict::Neutral);
        assert_eq!(Verdict::from_score(49), Verdict::Challenging);
        assert_eq!(Verdict::from_score(0), Verdict::Challenging);
    }

    #[test]
    fn colors_are_distinct() {
        assert_ne!(Verdict::Good.color(), Verdict::Neutral.color());
        assert_ne!(Verdict::Neutral.color(), Verdict::Challenging.color());
        assert!(ALL_VERDICTS.iter().all(|v| v.color().starts_with('#')));
    }
}
