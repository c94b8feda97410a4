//! Controversy grading.
//!
//! Maps a raw controversy score onto five ordered tiers. The cutoffs were
//! calibrated against the `random_05` index with 35 top words and 40 top
//! entries, so they are fixed constants rather than configuration.
//!
//! # Ladder
//!
//! Upper bounds are inclusive:
//!
//! - `<= 0.20` → tier 1, "not controversial"
//! - `<= 0.271418177` → tier 2, "probably not controversial"
//! - `<= 0.32` → tier 3, "possibly controversial"
//! - `<= 0.4` → tier 4, "very likely controversial"
//! - anything else → tier 5, "highly controversial"

use std::fmt;

/// Ascending `(upper bound, label)` pairs for tiers 1 through 4.
const LADDER: [(f64, &str); 4] = [
    (0.20, "not controversial"),
    (0.271418177, "probably not controversial"),
    (0.32, "possibly controversial"),
    (0.4, "very likely controversial"),
];

const TOP_LABEL: &str = "highly controversial";

/// One of the five severity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade {
    tier: u8,
    label: &'static str,
}

impl Grade {
    /// Tier number, 1 (least) through 5 (most controversial).
    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Relative path of the icon shown next to the banner.
    pub fn icon(&self) -> String {
        format!("images/grade{}.gif", self.tier)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/5)", self.label, self.tier)
    }
}

/// Grade a controversy score.
///
/// Total over every `f64`: values past the last cutoff, infinities and NaN
/// all land in tier 5 because no `<=` comparison holds for them.
pub fn grade(score: f64) -> Grade {
    for (i, &(bound, label)) in LADDER.iter().enumerate() {
        if score <= bound {
            return Grade {
                tier: i as u8 + 1,
                label,
            };
        }
    }
    Grade {
        tier: 5,
        label: TOP_LABEL,
    }
}
