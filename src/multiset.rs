//! Multisets of rhythm symbols and their distinct-permutation count
//!
//! A multiset of N symbols with multiplicities m1..mk has
//! `N! / (m1! * ... * mk!)` distinct orderings.

use crate::error::{PatternError, PatternResult};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Largest `n` whose factorial fits in a `u64`
pub const MAX_FACTORIAL_INPUT: u64 = 20;

/// Anything that can be permuted: comparable, hashable and printable
pub trait Symbol: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T: Clone + Eq + Hash + fmt::Debug + fmt::Display> Symbol for T {}

/// `n!` with overflow reported instead of wrapped
pub fn factorial(n: u64) -> PatternResult<u64> {
    (1..=n).try_fold(1u64, |acc, k| acc.checked_mul(k)).ok_or_else(|| {
        PatternError::Overflow(format!(
            "{}! does not fit in 64 bits (limit is {}!)",
            n, MAX_FACTORIAL_INPUT
        ))
    })
}

/// A group of durations treated as one permutable symbol
///
/// Two groups with the same contents in the same order are the same
/// symbol. The canonical key is the space-separated integers, e.g. `"2 1"`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GroupSymbol {
    key: String,
    values: Vec<i64>,
}

impl GroupSymbol {
    pub fn new(values: &[i64]) -> Self {
        let key = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            key,
            values: values.to_vec(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

impl fmt::Display for GroupSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.key)
    }
}

impl fmt::Debug for GroupSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupSymbol({:?})", self.key)
    }
}

impl Serialize for GroupSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Symbol multiplicities in order of first occurrence
#[derive(Debug, Clone)]
pub struct Multiset<S: Symbol> {
    entries: Vec<(S, usize)>,
    index: HashMap<S, usize>,
    len: usize,
}

impl<S: Symbol> Multiset<S> {
    pub fn from_symbols(symbols: &[S]) -> Self {
        let mut entries: Vec<(S, usize)> = Vec::new();
        let mut index: HashMap<S, usize> = HashMap::new();

        for symbol in symbols {
            match index.get(symbol) {
                Some(&slot) => entries[slot].1 += 1,
                None => {
                    index.insert(symbol.clone(), entries.len());
                    entries.push((symbol.clone(), 1));
                }
            }
        }

        Self {
            entries,
            index,
            len: symbols.len(),
        }
    }

    /// Total number of symbols, N
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct symbols
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn multiplicity(&self, symbol: &S) -> usize {
        self.index
            .get(symbol)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Distinct symbols with their counts, in first-occurrence order
    pub fn entries(&self) -> impl Iterator<Item = (&S, usize)> {
        self.entries.iter().map(|(s, n)| (s, *n))
    }

    /// Distinct-permutation count `N! / prod(m!)`
    pub fn permutation_count(&self) -> PatternResult<u64> {
        let total = factorial(self.len as u64)?;
        let mut divisor = 1u64;
        for (_, n) in &self.entries {
            // each m! divides N!, so the running product cannot overflow first
            divisor = divisor
                .checked_mul(factorial(*n as u64)?)
                .ok_or_else(|| PatternError::Overflow("multiplicity product".to_string()))?;
        }
        Ok(total / divisor)
    }
}
