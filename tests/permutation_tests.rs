//! Permutation tables, recall and rotation through the public API

use schillinger::config::PermutationSettings;
use schillinger::grouping;
use schillinger::multiset::{factorial, Multiset};
use schillinger::permutation::{self, Direction, PermutationEngine, Permuter};
use std::collections::HashSet;

fn build(symbols: &[i64]) -> PermutationEngine<i64> {
    PermutationEngine::build(symbols, &PermutationSettings::default()).unwrap()
}

#[test]
fn test_counts_match_multinomial() {
    let cases: [(&[i64], u64); 6] = [
        (&[1, 2, 3, 4], 24),
        (&[1, 1, 2, 2], 6),
        (&[3, 3, 3], 1),
        (&[1, 1, 1, 2, 2, 3], 60),
        (&[2, 1, 2, 1, 2, 1, 2], 35),
        (&[5, 4, 3, 2, 1, 1], 360),
    ];
    for (symbols, expected) in cases {
        let engine = build(symbols);
        assert_eq!(engine.count(), expected, "{:?}", symbols);
        assert_eq!(Multiset::from_symbols(symbols).permutation_count().unwrap(), expected);
    }
}

#[test]
fn test_table_is_distinct_and_complete() {
    let symbols = [1, 1, 2, 3, 3];
    let engine = build(&symbols);

    let mut sorted_input = symbols.to_vec();
    sorted_input.sort();

    let mut seen = HashSet::new();
    for p in engine.permutations() {
        let mut sorted = p.clone();
        sorted.sort();
        assert_eq!(sorted, sorted_input);
        assert!(seen.insert(p.clone()));
    }
    assert_eq!(seen.len() as u64, factorial(5).unwrap() / 4);
}

#[test]
fn test_first_permutation_is_the_input() {
    for symbols in [vec![3, 1, 2], vec![2, 2, 1], vec![4, 1, 4, 1]] {
        assert_eq!(build(&symbols).recall(1).permutation, symbols);
    }
}

#[test]
fn test_recall_walks_the_table() {
    let engine = build(&[1, 2, 2, 3]);
    let count = engine.count() as i64;
    for i in 1..=count {
        let recall = engine.recall(i);
        assert_eq!(recall.index as i64, i);
        assert!(!recall.clamped);
        assert_eq!(recall.is_last, i == count);
        assert_eq!(engine.get(i as usize), Some(recall.permutation.as_slice()));
    }
    assert_eq!(engine.recall(-5).index, 1);
    assert_eq!(engine.recall(count + 1).index as i64, count);
}

#[test]
fn test_rotation_cycles() {
    let base = [3, 1, 2, 2];
    for direction in [Direction::Clockwise, Direction::Anticlockwise] {
        let mut current = base.to_vec();
        for _ in 0..base.len() {
            current = permutation::rotate(&current, 1, direction);
        }
        assert_eq!(current, base.to_vec());
    }
    assert_eq!(
        permutation::rotate(&base, 1, Direction::Clockwise),
        permutation::rotate(&base, 3, Direction::Anticlockwise)
    );
}

#[test]
fn test_anti_circular() {
    let base = [1, 2, 3, 4, 5];
    assert_eq!(
        permutation::anti_circular(&base, 2, Direction::Clockwise),
        vec![4, 3, 2, 1, 5]
    );
    assert_eq!(
        permutation::anti_circular(&base, -2, Direction::Anticlockwise),
        vec![3, 2, 1, 5, 4]
    );
}

#[test]
fn test_group_permutation() {
    let tokens = grouping::parse_tokens(&["g", "2", "1", "g", "3", "g", "2", "1"]).unwrap();
    let symbols = grouping::group_symbols(&tokens).unwrap();

    let mut permuter = Permuter::new(PermutationSettings::default());
    assert_eq!(permuter.submit(&symbols).unwrap(), 3);

    let last = permuter.recall(3).unwrap();
    assert!(last.is_last);
    assert_eq!(last.durations(), vec![3, 2, 1, 2, 1]);
    assert_eq!(last.onsets().unwrap(), vec![1, 0, 0, 1, 0, 1, 1, 0, 1]);

    let rotated = permuter.circular(1).unwrap();
    assert_eq!(rotated[0].values(), &[2, 1]);
    assert_eq!(rotated[2].values(), &[3]);
}
