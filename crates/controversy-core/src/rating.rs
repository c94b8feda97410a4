//! Rating scales and the control identifiers that carry them.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Labels for the four entry-relevance options, indexed by `value - 1`.
pub const ENTRY_RATING_LABELS: [&str; 4] = ["Highly on", "Slightly on", "Slightly off", "Highly off"];

/// Message shown in a status region after the server accepts a rating.
pub const RATING_SUBMITTED: &str = "Rating submitted";

/// A user's controversy rating for the scored page or text, 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RatingTier(u8);

/// A user's relevance rating for one Wikipedia entry, 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryRating(u8);

macro_rules! bounded_rating {
    ($ty:ident, $max:expr) => {
        impl $ty {
            pub const MIN: u8 = 1;
            pub const MAX: u8 = $max;

            pub fn new(value: i64) -> Result<Self, CoreError> {
                if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
                    Ok(Self(value as u8))
                } else {
                    Err(CoreError::RatingOutOfRange {
                        value,
                        min: Self::MIN,
                        max: Self::MAX,
                    })
                }
            }

            pub fn value(&self) -> u8 {
                self.0
            }

            /// Every valid rating in ascending order.
            pub fn all() -> impl Iterator<Item = Self> {
                (Self::MIN..=Self::MAX).map(Self)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse::<i64>().map_err(|_| CoreError::RatingOutOfRange {
                    value: 0,
                    min: Self::MIN,
                    max: Self::MAX,
                })?;
                Self::new(value)
            }
        }
    };
}

bounded_rating!(RatingTier, 5);
bounded_rating!(EntryRating, 4);

impl EntryRating {
    pub fn label(&self) -> &'static str {
        ENTRY_RATING_LABELS[(self.0 - 1) as usize]
    }
}

/// Element id of the row holding the entry at position `ix` of the server list.
pub fn entry_element_id(ix: usize) -> String {
    format!("entry{ix}")
}

/// Id of one radio control inside an entry row, e.g. `entry3_r2`.
pub fn entry_control_id(element_id: &str, rating: EntryRating) -> String {
    format!("{element_id}_r{rating}")
}

/// Status region for the row a control belongs to.
///
/// The row is recovered from the control id prefix before the first `_`,
/// so `entry3_r2` reports into `entry3_rating_msg`.
pub fn entry_status_region(control_id: &str) -> String {
    let prefix = control_id.split('_').next().unwrap_or(control_id);
    format!("{prefix}_rating_msg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bounds() {
        assert!(RatingTier::new(0).is_err());
        assert_eq!(RatingTier::new(1).unwrap().value(), 1);
        assert_eq!(RatingTier::new(5).unwrap().value(), 5);
        assert!(RatingTier::new(6).is_err());
    }

    #[test]
    fn entry_rating_bounds() {
        assert!(EntryRating::new(0).is_err());
        assert!(EntryRating::new(4).is_ok());
        assert!(matches!(
            EntryRating::new(5),
            Err(CoreError::RatingOutOfRange { value: 5, min: 1, max: 4 })
        ));
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("3".parse::<RatingTier>().unwrap().value(), 3);
        assert_eq!(" 2 ".parse::<EntryRating>().unwrap().value(), 2);
        assert!("x".parse::<RatingTier>().is_err());
        assert!("9".parse::<EntryRating>().is_err());
    }

    #[test]
    fn entry_labels() {
        let labels: Vec<_> = EntryRating::all().map(|r| r.label()).collect();
        assert_eq!(labels, ENTRY_RATING_LABELS);
    }

    #[test]
    fn all_tiers() {
        assert_eq!(RatingTier::all().count(), 5);
    }

    #[test]
    fn control_ids() {
        let id = entry_element_id(3);
        assert_eq!(id, "entry3");
        let control = entry_control_id(&id, EntryRating::new(2).unwrap());
        assert_eq!(control, "entry3_r2");
        assert_eq!(entry_status_region(&control), "entry3_rating_msg");
    }

    #[test]
    fn status_region_without_separator() {
        assert_eq!(entry_status_region("entry7"), "entry7_rating_msg");
    }
}
