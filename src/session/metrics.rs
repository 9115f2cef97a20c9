//! Session metrics estimation.
//!
//! All values except `active_participants` are synthesized from uniform
//! ranges. They stand in for aggregation that does not exist yet, and
//! nothing downstream may treat them as derived from agent output.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive range for `total_ideas`.
pub const TOTAL_IDEAS_RANGE: (u32, u32) = (20, 100);
/// Inclusive range for `engagement_score`.
pub const ENGAGEMENT_RANGE: (u32, u32) = (70, 95);
/// Inclusive range for `consensus_level`.
pub const CONSENSUS_RANGE: (u32, u32) = (60, 90);

/// Point-in-time session metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Participants in the session (the requested count, dropped or not)
    pub active_participants: u32,
    /// Ideas generated so far
    pub total_ideas: u32,
    /// Engagement score as a percentage
    pub engagement_score: u32,
    /// Consensus level as a percentage
    pub consensus_level: u32,
}

impl MetricsSnapshot {
    /// Estimate a fresh snapshot for the given participant count.
    pub fn estimate(active_participants: u32, rng: &mut impl Rng) -> Self {
        Self {
            active_participants,
            total_ideas: rng.gen_range(TOTAL_IDEAS_RANGE.0..=TOTAL_IDEAS_RANGE.1),
            engagement_score: rng.gen_range(ENGAGEMENT_RANGE.0..=ENGAGEMENT_RANGE.1),
            consensus_level: rng.gen_range(CONSENSUS_RANGE.0..=CONSENSUS_RANGE.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ranges_hold_across_seeds() {
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let snapshot = MetricsSnapshot::estimate(75, &mut rng);

            assert_eq!(snapshot.active_participants, 75);
            assert!((20..=100).contains(&snapshot.total_ideas));
            assert!((70..=95).contains(&snapshot.engagement_score));
            assert!((60..=90).contains(&snapshot.consensus_level));
        }
    }

    #[test]
    fn test_active_participants_passthrough() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        // The requested count flows through untouched, even when it is
        // not a multiple of the subgroup size.
        assert_eq!(MetricsSnapshot::estimate(17, &mut rng).active_participants, 17);
        assert_eq!(MetricsSnapshot::estimate(0, &mut rng).active_participants, 0);
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let snapshot = MetricsSnapshot::estimate(30, &mut rng);
        let value = serde_json::to_value(snapshot).unwrap();

        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        for key in [
            "active_participants",
            "total_ideas",
            "engagement_score",
            "consensus_level",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }
}
