//! Grouped rhythms
//!
//! A grouped rhythm is a duration list split into groups by separator
//! markers, written `g 2 2 g 1 3`. Groups can be found automatically for a
//! chosen modulus, and are the symbols of grouped permutation.

use crate::codec::{self, DurationList};
use crate::error::{PatternError, PatternResult};
use crate::multiset::GroupSymbol;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// Marker written before each group
pub const SEPARATOR: &str = "g";

/// One token of a grouped rhythm
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupToken {
    Separator,
    Duration(i64),
}

impl Serialize for GroupToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupToken::Separator => serializer.serialize_str(SEPARATOR),
            GroupToken::Duration(d) => serializer.serialize_i64(*d),
        }
    }
}

impl fmt::Display for GroupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupToken::Separator => write!(f, "{}", SEPARATOR),
            GroupToken::Duration(d) => write!(f, "{}", d),
        }
    }
}

/// Render tokens as `g 2 2 g 1 3`
pub fn format_tokens(tokens: &[GroupToken]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Moduli a duration list can be grouped by
///
/// Every `m` in `2..sum` that divides the sum and is at least as large as
/// the longest duration, ascending. Sums above [`codec::MAX_STEPS`] are
/// rejected.
pub fn candidate_groupings(durations: &[i64]) -> PatternResult<Vec<i64>> {
    codec::validate_durations(durations)?;
    let sum = codec::bounded_steps(durations)? as i64;
    let longest = durations.iter().copied().max().unwrap_or(0);

    let mut moduli = Vec::new();
    let mut d = 1i64;
    while d * d <= sum {
        if sum % d == 0 {
            moduli.push(d);
            if d != sum / d {
                moduli.push(sum / d);
            }
        }
        d += 1;
    }
    moduli.retain(|&m| m >= 2 && m < sum && m >= longest);
    moduli.sort_unstable();
    Ok(moduli)
}

/// Insert a separator before each group summing to `modulus`
///
/// A separator goes in front of an element whenever the running sum is 0
/// or exactly `modulus`. A running sum that overshoots the modulus is
/// never reset, so the rest of the list stays in one group.
pub fn group_by(durations: &[i64], modulus: i64) -> PatternResult<Vec<GroupToken>> {
    codec::validate_durations(durations)?;
    // bounds every running sum below
    codec::total_steps(durations)?;
    if modulus < 1 {
        return Err(PatternError::invalid(format!(
            "grouping modulus {} must be at least 1",
            modulus
        )));
    }

    let mut tokens = Vec::with_capacity(durations.len() * 2);
    let mut sum = 0i64;
    for &d in durations {
        if sum == 0 || sum == modulus {
            tokens.push(GroupToken::Separator);
            sum = 0;
        }
        tokens.push(GroupToken::Duration(d));
        sum += d;
    }
    Ok(tokens)
}

/// Split tokens into groups at each separator
///
/// The first token must be a separator and no group may be empty.
pub fn split_groups(tokens: &[GroupToken]) -> PatternResult<Vec<Vec<i64>>> {
    if tokens.len() < 2 {
        return Err(PatternError::invalid("bad group pattern, usage: g x y g z"));
    }
    if tokens[0] != GroupToken::Separator {
        return Err(PatternError::invalid("group pattern must start with a separator"));
    }

    let mut groups: Vec<Vec<i64>> = Vec::new();
    for token in tokens {
        match token {
            GroupToken::Separator => groups.push(Vec::new()),
            GroupToken::Duration(d) => {
                if let Some(group) = groups.last_mut() {
                    group.push(*d);
                }
            }
        }
    }

    if let Some(i) = groups.iter().position(|g| g.is_empty()) {
        return Err(PatternError::invalid(format!("group {} is empty", i)));
    }
    Ok(groups)
}

/// Parse `g 1 2 g 3` text; any non-numeric word acts as a separator
pub fn parse_tokens(words: &[&str]) -> PatternResult<Vec<GroupToken>> {
    words
        .iter()
        .map(|w| match w.parse::<i64>() {
            Ok(n) => Ok(GroupToken::Duration(n)),
            Err(_) if w.chars().all(|c| c.is_alphabetic()) => Ok(GroupToken::Separator),
            Err(_) => Err(PatternError::Parse(format!("bad group token '{}'", w))),
        })
        .collect()
}

/// Canonical group symbols for grouped permutation
pub fn group_symbols(tokens: &[GroupToken]) -> PatternResult<Vec<GroupSymbol>> {
    Ok(split_groups(tokens)?
        .iter()
        .map(|g| GroupSymbol::new(g))
        .collect())
}

/// Remembers a pattern and its last grouping
#[derive(Debug, Clone, Default)]
pub struct AutoGrouper {
    pattern: Option<DurationList>,
    grouped: Option<(i64, Vec<GroupToken>)>,
}

impl AutoGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a pattern and list its candidate moduli
    pub fn pat(&mut self, durations: &[i64]) -> PatternResult<Vec<i64>> {
        let candidates = candidate_groupings(durations)?;
        debug!("{:?} can be grouped by {:?}", durations, candidates);
        self.pattern = Some(durations.to_vec());
        self.grouped = None;
        Ok(candidates)
    }

    /// Store a pattern given as onsets
    pub fn patbin(&mut self, onsets: &[u8]) -> PatternResult<Vec<i64>> {
        let durations = codec::to_durations(onsets)?;
        self.pat(&durations)
    }

    /// Group the stored pattern
    pub fn group_by(&mut self, modulus: i64) -> PatternResult<Vec<GroupToken>> {
        let pattern = self
            .pattern
            .as_ref()
            .ok_or_else(|| PatternError::unbuilt("pattern"))?;
        let tokens = group_by(pattern, modulus)?;
        self.grouped = Some((modulus, tokens.clone()));
        Ok(tokens)
    }

    /// The last grouping produced
    pub fn replay(&self) -> PatternResult<Vec<GroupToken>> {
        if self.pattern.is_none() {
            return Err(PatternError::unbuilt("pattern"));
        }
        self.grouped
            .as_ref()
            .map(|(_, tokens)| tokens.clone())
            .ok_or_else(|| PatternError::unbuilt("grouping"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::GroupToken::{Duration as D, Separator as G};

    #[test]
    fn test_candidates() {
        // sum 12, longest 3
        assert_eq!(candidate_groupings(&[3, 1, 2, 2, 1, 3]).unwrap(), vec![3, 4, 6]);
        // sum 7 is prime
        assert!(candidate_groupings(&[3, 4]).unwrap().is_empty());
        assert!(candidate_groupings(&[]).is_err());
    }

    #[test]
    fn test_candidates_large_sums() {
        assert_eq!(candidate_groupings(&[360_360, 360_360]).unwrap(), vec![360_360]);
        assert_eq!(candidate_groupings(&[1, 3, 5, 7]).unwrap(), vec![8]);
        assert!(matches!(
            candidate_groupings(&[3_000_000_000]),
            Err(PatternError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_group_by() {
        let tokens = group_by(&[2, 2, 1, 3, 4], 4).unwrap();
        assert_eq!(tokens, vec![G, D(2), D(2), G, D(1), D(3), G, D(4)]);
        assert_eq!(format_tokens(&tokens), "g 2 2 g 1 3 g 4");
    }

    #[test]
    fn test_group_by_overshoot_never_resets() {
        let tokens = group_by(&[3, 2, 1, 2], 4).unwrap();
        assert_eq!(tokens, vec![G, D(3), D(2), D(1), D(2)]);
    }

    #[test]
    fn test_group_by_rejects_overflowing_sum() {
        assert!(matches!(
            group_by(&[i64::MAX, 1], 4),
            Err(PatternError::Overflow(_))
        ));
    }

    #[test]
    fn test_split_groups() {
        let tokens = parse_tokens(&["g", "1", "2", "g", "3"]).unwrap();
        assert_eq!(split_groups(&tokens).unwrap(), vec![vec![1, 2], vec![3]]);

        assert!(split_groups(&[G]).is_err());
        assert!(split_groups(&[D(1), D(2)]).is_err());
        assert!(split_groups(&[G, G, D(1)]).is_err());
        assert!(parse_tokens(&["g", "1.5"]).is_err());
    }

    #[test]
    fn test_autogrouper() {
        let mut grouper = AutoGrouper::new();
        assert!(grouper.group_by(4).unwrap_err().is_unbuilt());

        assert_eq!(grouper.patbin(&[1, 0, 1, 0]).unwrap(), vec![2]);
        assert!(matches!(grouper.replay(), Err(PatternError::Unbuilt(w)) if w == "grouping"));

        let tokens = grouper.group_by(2).unwrap();
        assert_eq!(tokens, vec![G, D(2), G, D(2)]);
        assert_eq!(grouper.replay().unwrap(), tokens);
    }
}
