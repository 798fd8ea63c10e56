//! Quorum threshold policy for collectively signed governance actions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How many distinct roster members must vote before a gated effect fires.
///
/// The committee-rotation default is two thirds plus one of the roster,
/// the same threshold the roster's multisig account uses when a notary is
/// available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuorumThreshold {
    /// `⌊2·R/3⌋ + 1` votes for a roster of size `R`.
    #[default]
    TwoThirdsPlusOne,
    /// `⌊R/2⌋ + 1` votes for a roster of size `R`.
    Majority,
    /// A fixed number of votes, capped at the roster size.
    Fixed {
        /// Required number of distinct voters.
        votes: usize,
    },
}

impl QuorumThreshold {
    /// Returns the number of distinct votes required for a roster of `roster_size`.
    ///
    /// Never returns zero: an empty roster still needs one vote, which no
    /// caller can supply.
    #[must_use]
    pub fn required(self, roster_size: usize) -> usize {
        let required = match self {
            Self::TwoThirdsPlusOne => roster_size * 2 / 3 + 1,
            Self::Majority => roster_size / 2 + 1,
            Self::Fixed { votes } => votes.min(roster_size),
        };
        required.max(1)
    }

    /// Whether `count` distinct votes satisfy the threshold for `roster_size`.
    #[must_use]
    pub fn is_reached(self, count: usize, roster_size: usize) -> bool {
        count >= self.required(roster_size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_two_thirds_plus_one_table() {
        let policy = QuorumThreshold::TwoThirdsPlusOne;
        assert_eq!(policy.required(1), 1);
        assert_eq!(policy.required(3), 3);
        assert_eq!(policy.required(4), 3);
        assert_eq!(policy.required(7), 5);
        assert_eq!(policy.required(10), 7);
    }

    #[test]
    fn test_majority_table() {
        let policy = QuorumThreshold::Majority;
        assert_eq!(policy.required(3), 2);
        assert_eq!(policy.required(4), 3);
        assert_eq!(policy.required(7), 4);
    }

    #[test]
    fn test_fixed_is_capped_by_roster() {
        assert_eq!(QuorumThreshold::Fixed { votes: 2 }.required(7), 2);
        assert_eq!(QuorumThreshold::Fixed { votes: 9 }.required(7), 7);
        assert_eq!(QuorumThreshold::Fixed { votes: 0 }.required(7), 1);
    }

    #[test]
    fn test_empty_roster_never_reaches_quorum() {
        assert!(!QuorumThreshold::TwoThirdsPlusOne.is_reached(0, 0));
    }

    #[test]
    fn test_is_reached_boundary() {
        let policy = QuorumThreshold::TwoThirdsPlusOne;
        assert!(!policy.is_reached(4, 7));
        assert!(policy.is_reached(5, 7));
        assert!(policy.is_reached(6, 7));
    }
}
