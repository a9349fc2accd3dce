//! Detective ranks derived from a player's cumulative score.
//!
//! | Score   | Rank                |
//! |---------|---------------------|
//! | 0-9     | Rookie Sleuth       |
//! | 10-49   | Junior Detective    |
//! | 50-99   | Senior Investigator |
//! | 100-199 | Lead Profiler       |
//! | 200+    | Chief of Detectives |

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    RookieSleuth,
    JuniorDetective,
    SeniorInvestigator,
    LeadProfiler,
    ChiefOfDetectives,
}

/// Tiers in ascending order with their inclusive lower bound.
const TIERS: [(u64, Rank); 5] = [
    (0, Rank::RookieSleuth),
    (10, Rank::JuniorDetective),
    (50, Rank::SeniorInvestigator),
    (100, Rank::LeadProfiler),
    (200, Rank::ChiefOfDetectives),
];

impl Rank {
    pub fn for_score(score: u64) -> Rank {
        TIERS
            .iter()
            .rev()
            .find(|(min, _)| score >= *min)
            .map(|(_, rank)| *rank)
            .unwrap_or(Rank::RookieSleuth)
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::RookieSleuth => "Rookie Sleuth",
            Rank::JuniorDetective => "Junior Detective",
            Rank::SeniorInvestigator => "Senior Investigator",
            Rank::LeadProfiler => "Lead Profiler",
            Rank::ChiefOfDetectives => "Chief of Detectives",
        }
    }

    pub fn min_score(self) -> u64 {
        TIERS
            .iter()
            .find(|(_, rank)| *rank == self)
            .map(|(min, _)| *min)
            .unwrap_or(0)
    }

    /// The following tier, or `None` at the top.
    pub fn next(self) -> Option<Rank> {
        TIERS
            .iter()
            .map(|(_, rank)| *rank)
            .find(|rank| *rank > self)
    }

    /// Points still needed to reach the next tier from `score`.
    pub fn points_to_next(score: u64) -> Option<u64> {
        Rank::for_score(score)
            .next()
            .map(|next| next.min_score().saturating_sub(score))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Responses carry the human label, not the variant name.
impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Rank label for a cumulative score.
pub fn detective_rank(score: u64) -> &'static str {
    Rank::for_score(score).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_boundaries() {
        let cases = [
            (0, "Rookie Sleuth"),
            (9, "Rookie Sleuth"),
            (10, "Junior Detective"),
            (49, "Junior Detective"),
            (50, "Senior Investigator"),
            (99, "Senior Investigator"),
            (100, "Lead Profiler"),
            (199, "Lead Profiler"),
            (200, "Chief of Detectives"),
            (1000, "Chief of Detectives"),
            (u64::MAX, "Chief of Detectives"),
        ];
        for (score, expected) in cases {
            assert_eq!(detective_rank(score), expected, "score {}", score);
        }
    }

    #[test]
    fn monotonic_in_score() {
        let mut prev = Rank::for_score(0);
        for score in 1..=500 {
            let rank = Rank::for_score(score);
            assert!(rank >= prev, "rank dropped at {}", score);
            prev = rank;
        }
    }

    #[test]
    fn next_tier_progress() {
        assert_eq!(Rank::points_to_next(0), Some(10));
        assert_eq!(Rank::points_to_next(42), Some(8));
        assert_eq!(Rank::points_to_next(199), Some(1));
        assert_eq!(Rank::points_to_next(200), None);
        assert_eq!(Rank::ChiefOfDetectives.next(), None);
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Rank::LeadProfiler).unwrap(),
            "\"Lead Profiler\""
        );
    }
}
