//! Distinct permutations of a multiset, indexed recall and rotation
//!
//! Enumeration uses the duplicate-pruned exchange recursion: at depth `d`
//! the element at index `i` is swapped into position `d` unless the same
//! value already sits somewhere in `d..i`. Each distinct ordering is
//! produced exactly once, in a fixed order. For `[1, 1, 2]`:
//!
//! ```text
//! 1: 1 1 2
//! 2: 1 2 1
//! 3: 2 1 1
//! ```
//!
//! The first permutation is always the input order.

use crate::codec::{self, DurationList, OnsetVector};
use crate::config::PermutationSettings;
use crate::error::{PatternError, PatternResult};
use crate::multiset::{GroupSymbol, Multiset, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Rotation direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Elements move toward index 0, the first wraps to the end
    #[default]
    Clockwise,
    /// Elements move toward the end, the last wraps to index 0
    Anticlockwise,
}

impl FromStr for Direction {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clockwise" | "cw" | "forwards" | "0" => Ok(Direction::Clockwise),
            "anticlockwise" | "acw" | "reverse" | "1" => Ok(Direction::Anticlockwise),
            other => Err(PatternError::Parse(format!("unknown direction '{}'", other))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clockwise => write!(f, "clockwise"),
            Direction::Anticlockwise => write!(f, "anticlockwise"),
        }
    }
}

/// Rotate `|shift|` steps; the sign of `shift` is ignored
pub fn rotate<S: Clone>(base: &[S], shift: i64, direction: Direction) -> Vec<S> {
    let mut out = base.to_vec();
    if out.is_empty() {
        return out;
    }
    let steps = (shift.unsigned_abs() % out.len() as u64) as usize;
    match direction {
        Direction::Clockwise => out.rotate_left(steps),
        Direction::Anticlockwise => out.rotate_right(steps),
    }
    out
}

/// Reflect every element except the first, then rotate
///
/// The first element stays anchored during the reflection:
/// `[1, 2, 3, 4]` reflects to `[1, 4, 3, 2]` before rotating.
pub fn anti_circular<S: Clone>(base: &[S], shift: i64, direction: Direction) -> Vec<S> {
    let mut reflected = base.to_vec();
    if reflected.len() > 1 {
        reflected[1..].reverse();
    }
    rotate(&reflected, shift, direction)
}

fn permute_from<S: Symbol>(working: &mut Vec<S>, depth: usize, table: &mut Vec<Vec<S>>) {
    if depth >= working.len() {
        table.push(working.clone());
        return;
    }
    for i in depth..working.len() {
        if working[depth..i].contains(&working[i]) {
            continue;
        }
        working.swap(depth, i);
        permute_from(working, depth + 1, table);
        working.swap(depth, i);
    }
}

/// Result of an indexed recall
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recall<S> {
    /// 1-based position actually recalled
    pub index: usize,
    /// Position asked for, before clamping
    pub requested: i64,
    /// The requested position was outside `1..=count`
    pub clamped: bool,
    /// The last permutation was reached
    pub is_last: bool,
    pub permutation: Vec<S>,
}

impl Recall<i64> {
    /// Onset vector of the recalled duration permutation
    ///
    /// A lone `[0]` maps to `[0]`.
    pub fn onsets(&self) -> PatternResult<OnsetVector> {
        if self.permutation == [0] {
            return Ok(vec![0]);
        }
        codec::to_onsets(&self.permutation)
    }
}

impl Recall<GroupSymbol> {
    /// Durations of all groups in recalled order
    pub fn durations(&self) -> DurationList {
        self.permutation
            .iter()
            .flat_map(|g| g.values().iter().copied())
            .collect()
    }

    pub fn onsets(&self) -> PatternResult<OnsetVector> {
        codec::to_onsets(&self.durations())
    }
}

/// Every distinct permutation of one multiset
#[derive(Debug, Clone)]
pub struct PermutationEngine<S: Symbol> {
    multiset: Multiset<S>,
    table: Vec<Vec<S>>,
}

impl<S: Symbol> PermutationEngine<S> {
    /// Count and enumerate the distinct permutations of `symbols`
    pub fn build(symbols: &[S], settings: &PermutationSettings) -> PatternResult<Self> {
        if symbols.len() > settings.max_symbols {
            return Err(PatternError::invalid(format!(
                "{} symbols exceed the maximum of {}",
                symbols.len(),
                settings.max_symbols
            )));
        }

        let multiset = Multiset::from_symbols(symbols);
        let count = multiset.permutation_count()?;
        if count > settings.max_permutations {
            return Err(PatternError::TooManyPermutations {
                count,
                limit: settings.max_permutations,
            });
        }

        let mut table = Vec::with_capacity(count as usize);
        let mut working = symbols.to_vec();
        permute_from(&mut working, 0, &mut table);
        debug_assert_eq!(table.len() as u64, count);

        info!(
            "Built {} distinct permutations of {} symbols ({} distinct)",
            count,
            multiset.len(),
            multiset.distinct()
        );
        Ok(Self { multiset, table })
    }

    /// Distinct permutation count, U
    pub fn count(&self) -> u64 {
        self.table.len() as u64
    }

    pub fn multiset(&self) -> &Multiset<S> {
        &self.multiset
    }

    /// The permutations in enumeration order
    pub fn permutations(&self) -> &[Vec<S>] {
        &self.table
    }

    /// The symbols as submitted
    pub fn source(&self) -> &[S] {
        &self.table[0]
    }

    /// Permutation at a 1-based position, if in range
    pub fn get(&self, index: usize) -> Option<&[S]> {
        index
            .checked_sub(1)
            .and_then(|i| self.table.get(i))
            .map(|p| p.as_slice())
    }

    /// Permutation at a 1-based position, clamped into `1..=count`
    pub fn recall(&self, index: i64) -> Recall<S> {
        let last = self.table.len();
        let clamped_index = index.clamp(1, last as i64) as usize;
        let clamped = clamped_index as i64 != index;
        if clamped {
            debug!("Recall index {} clamped to {}", index, clamped_index);
        }

        Recall {
            index: clamped_index,
            requested: index,
            clamped,
            is_last: clamped_index == last,
            permutation: self.table[clamped_index - 1].clone(),
        }
    }
}

/// One permutation slot: the current table plus the selected entry
///
/// A new submission replaces the whole table, and only once it has been
/// built successfully.
#[derive(Debug, Clone)]
pub struct Permuter<S: Symbol> {
    settings: PermutationSettings,
    engine: Option<PermutationEngine<S>>,
    selected: usize,
}

impl<S: Symbol> Permuter<S> {
    pub fn new(settings: PermutationSettings) -> Self {
        Self {
            settings,
            engine: None,
            selected: 1,
        }
    }

    /// Build a table for new symbols and select its first permutation
    pub fn submit(&mut self, symbols: &[S]) -> PatternResult<u64> {
        let engine = PermutationEngine::build(symbols, &self.settings)?;
        let count = engine.count();
        self.engine = Some(engine);
        self.selected = 1;
        Ok(count)
    }

    pub fn engine(&self) -> PatternResult<&PermutationEngine<S>> {
        self.engine
            .as_ref()
            .ok_or_else(|| PatternError::unbuilt("pattern"))
    }

    pub fn count(&self) -> PatternResult<u64> {
        Ok(self.engine()?.count())
    }

    /// Recall and select a permutation
    pub fn recall(&mut self, index: i64) -> PatternResult<Recall<S>> {
        let recall = self.engine()?.recall(index);
        self.selected = recall.index;
        Ok(recall)
    }

    /// The currently selected permutation
    pub fn selected(&self) -> PatternResult<&[S]> {
        let engine = self.engine()?;
        Ok(engine.get(self.selected).unwrap_or_else(|| engine.source()))
    }

    pub fn direction(&self) -> Direction {
        self.settings.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.settings.direction = direction;
    }

    /// Rotate the selected permutation, optionally reflecting it about its first element
    pub fn rotate(&self, shift: i64, direction: Direction, reflect_first: bool) -> PatternResult<Vec<S>> {
        let base = self.selected()?;
        Ok(if reflect_first {
            anti_circular(base, shift, direction)
        } else {
            rotate(base, shift, direction)
        })
    }

    pub fn circular(&self, shift: i64) -> PatternResult<Vec<S>> {
        self.rotate(shift, self.settings.direction, false)
    }

    pub fn anti_circular(&self, shift: i64) -> PatternResult<Vec<S>> {
        self.rotate(shift, self.settings.direction, true)
    }
}
