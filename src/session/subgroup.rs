//! Subgroup partitioning.
//!
//! Participants are synthetic (`Participant_0`, `Participant_1`, ...)
//! and are chunked into fixed-size subgroups in order. Trailing
//! participants that do not fill a complete group are left out of every
//! subgroup; [`dropped_count`] reports how many.

use serde::{Deserialize, Serialize};

/// Participants per subgroup.
pub const GROUP_SIZE: usize = 5;

/// A fixed-size cluster of participants within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subgroup {
    /// Sequence index, unique within a session
    pub id: usize,
    /// Ordered participant identifiers, always `GROUP_SIZE` of them
    pub participants: Vec<String>,
    /// Ideas raised in this subgroup (populated once conversations run)
    #[serde(default)]
    pub ideas: Vec<String>,
    /// Discussion threads currently open (populated once conversations run)
    #[serde(default)]
    pub active_discussions: Vec<String>,
}

impl Subgroup {
    /// Create a subgroup from its index and member list
    pub fn new(id: usize, participants: Vec<String>) -> Self {
        Self {
            id,
            participants,
            ideas: Vec::new(),
            active_discussions: Vec::new(),
        }
    }

    /// Graph node label for this subgroup
    pub fn label(&self) -> String {
        format!("Subgroup_{}", self.id)
    }

    /// Number of participants in this subgroup
    pub fn size(&self) -> usize {
        self.participants.len()
    }
}

/// Split `participant_count` synthetic participants into complete subgroups.
///
/// Produces `participant_count / GROUP_SIZE` subgroups; subgroup `i` holds
/// participants `[i * GROUP_SIZE, i * GROUP_SIZE + GROUP_SIZE)`. Counts
/// below `GROUP_SIZE` produce no subgroups at all.
pub fn partition_participants(participant_count: u32) -> Vec<Subgroup> {
    let participants: Vec<String> = (0..participant_count)
        .map(|i| format!("Participant_{i}"))
        .collect();

    participants
        .chunks_exact(GROUP_SIZE)
        .enumerate()
        .map(|(id, chunk)| Subgroup::new(id, chunk.to_vec()))
        .collect()
}

/// Participants excluded from every subgroup for a given count.
pub fn dropped_count(participant_count: u32) -> u32 {
    participant_count % GROUP_SIZE as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_partition_exact_multiple() {
        let subgroups = partition_participants(75);
        assert_eq!(subgroups.len(), 15);
        assert!(subgroups.iter().all(|sg| sg.size() == GROUP_SIZE));
        assert_eq!(dropped_count(75), 0);

        // Slices are contiguous and ordered
        assert_eq!(subgroups[0].participants[0], "Participant_0");
        assert_eq!(subgroups[0].participants[4], "Participant_4");
        assert_eq!(subgroups[14].participants[0], "Participant_70");
        assert_eq!(subgroups[14].participants[4], "Participant_74");
    }

    #[test]
    fn test_partition_drops_remainder() {
        let subgroups = partition_participants(17);
        assert_eq!(subgroups.len(), 3);
        assert_eq!(dropped_count(17), 2);

        // Participant_15 and Participant_16 appear in no subgroup
        let members: Vec<&str> = subgroups
            .iter()
            .flat_map(|sg| sg.participants.iter().map(String::as_str))
            .collect();
        assert_eq!(members.len(), 15);
        assert!(!members.contains(&"Participant_15"));
        assert!(!members.contains(&"Participant_16"));
    }

    #[test]
    fn test_partition_below_group_size() {
        for count in 0..GROUP_SIZE as u32 {
            assert!(partition_participants(count).is_empty(), "count={count}");
        }
    }

    #[test]
    fn test_subgroup_ids_are_sequence_indices() {
        let subgroups = partition_participants(75);
        for (expected, subgroup) in subgroups.iter().enumerate() {
            assert_eq!(subgroup.id, expected);
        }
    }

    #[test]
    fn test_subgroup_labels() {
        let subgroups = partition_participants(15);
        let labels: Vec<String> = subgroups.iter().map(Subgroup::label).collect();
        assert_eq!(labels, ["Subgroup_0", "Subgroup_1", "Subgroup_2"]);
    }

    #[test]
    fn test_new_subgroups_have_no_activity() {
        let subgroups = partition_participants(10);
        assert!(subgroups.iter().all(|sg| sg.ideas.is_empty()));
        assert!(subgroups.iter().all(|sg| sg.active_discussions.is_empty()));
    }

    proptest! {
        #[test]
        fn prop_subgroup_count_is_floor_division(count in 0u32..5_000) {
            let subgroups = partition_participants(count);
            prop_assert_eq!(subgroups.len(), (count as usize) / GROUP_SIZE);
        }

        #[test]
        fn prop_every_subgroup_is_full(count in 0u32..5_000) {
            let subgroups = partition_participants(count);
            prop_assert!(subgroups.iter().all(|sg| sg.size() == GROUP_SIZE));
        }

        #[test]
        fn prop_membership_is_disjoint_and_ordered(count in 0u32..2_000) {
            let subgroups = partition_participants(count);
            let members: Vec<String> = subgroups
                .iter()
                .flat_map(|sg| sg.participants.iter().cloned())
                .collect();

            let expected: Vec<String> = (0..members.len())
                .map(|i| format!("Participant_{i}"))
                .collect();
            prop_assert_eq!(&members, &expected);

            let used = members.len() as u32;
            prop_assert_eq!(used + dropped_count(count), count);
        }
    }
}
