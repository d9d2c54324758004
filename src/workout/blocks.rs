//! Exercise blocks - consecutive runs of sets sharing one exercise name
//!
//! Blocks are never stored. They are recomputed from the set sequence on
//! every read, so they cannot drift from it.
//!
//! Reordering moves a block by identity (its run), not by name: in a
//! superset A, B, A only the run that was asked to move relocates, the
//! other A run keeps its place.

use super::ExerciseSet;

/// Maximal run of consecutive sets with the same exercise name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub exercise: &'a str,
    /// Indices into the grouped sequence, ascending and contiguous
    pub members: Vec<usize>,
}

impl Block<'_> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("source block {index} out of range ({len} blocks)")]
    SourceOutOfRange { index: usize, len: usize },

    #[error("destination block {index} out of range ({len} blocks)")]
    DestinationOutOfRange { index: usize, len: usize },
}

/// Group sets into blocks with a single left-to-right scan.
///
/// Names are compared exactly (case-sensitive). Separated runs of the same
/// exercise stay separate blocks.
pub fn group(sets: &[ExerciseSet]) -> Vec<Block<'_>> {
    let mut blocks: Vec<Block> = Vec::new();

    for (index, set) in sets.iter().enumerate() {
        match blocks.last_mut() {
            Some(block) if block.exercise == set.exercise => block.members.push(index),
            _ => blocks.push(Block {
                exercise: &set.exercise,
                members: vec![index],
            }),
        }
    }

    blocks
}

/// Member indices of all blocks in block order
pub fn flatten(blocks: &[Block]) -> Vec<usize> {
    blocks.iter().flat_map(|b| b.members.iter().copied()).collect()
}

/// Exercise names of the current blocks, in order
pub fn block_names(sets: &[ExerciseSet]) -> Vec<&str> {
    group(sets).into_iter().map(|b| b.exercise).collect()
}

/// Index of the block holding the set at `index`
pub fn block_of(sets: &[ExerciseSet], index: usize) -> Option<usize> {
    group(sets).iter().position(|b| b.contains(index))
}

/// New set order after moving block `source` to `destination`.
///
/// Remove-then-insert: `destination` is a position in the block list with
/// the source block already taken out. Both must be below the block count.
///
/// Only the moved run changes place. If it lands next to a run with the same
/// exercise name, the two runs are adjacent afterwards and `group` reads them
/// back as one block: for A₁₂, B, A₃ moving block 0 to 1 gives B, A₁₂A₃.
pub fn permutation(
    sets: &[ExerciseSet],
    source: usize,
    destination: usize,
) -> Result<Vec<usize>, BlockError> {
    let mut blocks = group(sets);
    let len = blocks.len();

    if source >= len {
        return Err(BlockError::SourceOutOfRange { index: source, len });
    }
    if destination >= len {
        return Err(BlockError::DestinationOutOfRange { index: destination, len });
    }

    let moved = blocks.remove(source);
    blocks.insert(destination, moved);

    Ok(flatten(&blocks))
}

/// Move a whole block in place. On error `sets` is left untouched.
pub fn move_block(
    sets: &mut Vec<ExerciseSet>,
    source: usize,
    destination: usize,
) -> Result<(), BlockError> {
    let order = permutation(sets, source, destination)?;
    let reordered: Vec<ExerciseSet> = order.iter().map(|&i| sets[i].clone()).collect();
    *sets = reordered;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{SetId, test_set};

    /// Sets named by exercise, amount used as a per-set tag
    fn sequence(named: &[(&str, f64)]) -> Vec<ExerciseSet> {
        named.iter()
            .enumerate()
            .map(|(n, (name, amount))| {
                let mut set = test_set(name, *amount);
                set.id = SetId(n as u64);
                set
            })
            .collect()
    }

    fn tags(sets: &[ExerciseSet]) -> Vec<(String, f64)> {
        sets.iter().map(|s| (s.exercise.clone(), s.amount)).collect()
    }

    fn superset() -> Vec<ExerciseSet> {
        sequence(&[("A", 1.0), ("A", 2.0), ("B", 1.0), ("A", 3.0)])
    }

    fn samples() -> Vec<Vec<ExerciseSet>> {
        vec![
            vec![],
            sequence(&[("A", 1.0)]),
            sequence(&[("A", 1.0), ("A", 2.0), ("A", 3.0)]),
            superset(),
            sequence(&[("A", 1.0), ("B", 1.0), ("C", 1.0), ("B", 2.0), ("B", 3.0), ("a", 1.0)]),
            sequence(&[("Squat", 1.0), ("Squat", 2.0), ("Press", 1.0), ("Row", 1.0), ("Row", 2.0)]),
        ]
    }

    #[test]
    fn test_group_empty() {
        assert!(group(&[]).is_empty());
    }

    #[test]
    fn test_group_single() {
        let sets = sequence(&[("A", 1.0)]);
        assert_eq!(group(&sets), vec![Block { exercise: "A", members: vec![0] }]);
    }

    #[test]
    fn test_group_one_name() {
        let sets = sequence(&[("A", 1.0), ("A", 2.0), ("A", 3.0)]);
        let blocks = group(&sets);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].members, vec![0, 1, 2]);
    }

    #[test]
    fn test_group_keeps_separated_runs() {
        let sets = superset();
        assert_eq!(
            group(&sets),
            vec![
                Block { exercise: "A", members: vec![0, 1] },
                Block { exercise: "B", members: vec![2] },
                Block { exercise: "A", members: vec![3] },
            ]
        );
    }

    #[test]
    fn test_group_case_sensitive() {
        let sets = sequence(&[("Squat", 1.0), ("squat", 2.0)]);
        assert_eq!(group(&sets).len(), 2);
    }

    #[test]
    fn test_flatten_reproduces_sequence() {
        for sets in samples() {
            let order = flatten(&group(&sets));
            assert_eq!(order, (0..sets.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_adjacent_blocks_differ() {
        for sets in samples() {
            let blocks = group(&sets);
            for pair in blocks.windows(2) {
                assert_ne!(pair[0].exercise, pair[1].exercise);
            }
            for block in &blocks {
                assert!(block.members.iter().all(|&i| sets[i].exercise == block.exercise));
            }
        }
    }

    #[test]
    fn test_regroup_idempotent() {
        for sets in samples() {
            let flat: Vec<ExerciseSet> =
                flatten(&group(&sets)).into_iter().map(|i| sets[i].clone()).collect();
            assert_eq!(group(&flat), group(&sets));
        }
    }

    #[test]
    fn test_move_only_targeted_run() {
        let mut sets = superset();
        move_block(&mut sets, 0, 2).unwrap();
        assert_eq!(
            tags(&sets),
            vec![
                ("B".to_string(), 1.0),
                ("A".to_string(), 3.0),
                ("A".to_string(), 1.0),
                ("A".to_string(), 2.0),
            ]
        );
    }

    #[test]
    fn test_move_next_to_same_name() {
        let mut sets = superset();
        move_block(&mut sets, 0, 1).unwrap();
        assert_eq!(
            tags(&sets),
            vec![
                ("B".to_string(), 1.0),
                ("A".to_string(), 1.0),
                ("A".to_string(), 2.0),
                ("A".to_string(), 3.0),
            ]
        );
        // The runs are now adjacent, so they read back as one block
        assert_eq!(block_names(&sets), vec!["B", "A"]);
    }

    #[test]
    fn test_move_to_front() {
        let mut sets = sequence(&[("A", 1.0), ("B", 1.0), ("B", 2.0), ("C", 1.0)]);
        move_block(&mut sets, 2, 0).unwrap();
        assert_eq!(block_names(&sets), vec!["C", "A", "B"]);
        assert_eq!(sets[2].amount, 1.0);
        assert_eq!(sets[3].amount, 2.0);
    }

    #[test]
    fn test_move_same_position_is_noop() {
        let original = superset();
        for index in 0..3 {
            let mut sets = original.clone();
            move_block(&mut sets, index, index).unwrap();
            assert_eq!(sets, original);
        }
    }

    #[test]
    fn test_move_is_permutation() {
        for sets in samples() {
            let len = group(&sets).len();
            for source in 0..len {
                for destination in 0..len {
                    let order = permutation(&sets, source, destination).unwrap();
                    let mut sorted = order.clone();
                    sorted.sort_unstable();
                    assert_eq!(sorted, (0..sets.len()).collect::<Vec<_>>());
                }
            }
        }
    }

    #[test]
    fn test_move_preserves_order_within_blocks() {
        for sets in samples() {
            let blocks = group(&sets);
            for source in 0..blocks.len() {
                for destination in 0..blocks.len() {
                    let order = permutation(&sets, source, destination).unwrap();
                    for block in &blocks {
                        let positions: Vec<usize> = block
                            .members
                            .iter()
                            .map(|m| order.iter().position(|i| i == m).unwrap())
                            .collect();
                        // Members stay contiguous and in their original order
                        let expected: Vec<usize> =
                            (positions[0]..positions[0] + block.len()).collect();
                        assert_eq!(positions, expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_move_keeps_ids() {
        let mut sets = superset();
        move_block(&mut sets, 2, 0).unwrap();
        let ids: Vec<u64> = sets.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_move_out_of_range() {
        let original = superset();
        let mut sets = original.clone();

        assert_eq!(
            move_block(&mut sets, 3, 0),
            Err(BlockError::SourceOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            move_block(&mut sets, 0, 3),
            Err(BlockError::DestinationOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(sets, original);

        let mut empty: Vec<ExerciseSet> = vec![];
        assert!(move_block(&mut empty, 0, 0).is_err());
    }

    #[test]
    fn test_block_of() {
        let sets = superset();
        assert_eq!(block_of(&sets, 1), Some(0));
        assert_eq!(block_of(&sets, 2), Some(1));
        assert_eq!(block_of(&sets, 3), Some(2));
        assert_eq!(block_of(&sets, 4), None);
    }
}
