//! Rhythm encodings
//!
//! A rhythm is either a duration list (beat lengths in minimal time units)
//! or an onset vector (one flag per minimal time unit, `1` where a beat
//! starts). The two are interchangeable as long as the rhythm does not
//! start with a rest:
//!
//! - `[3, 1, 2]` <-> `[1, 0, 0, 1, 1, 0]`
//! - `[2, 2]` <-> `[1, 0, 1, 0]`

use crate::error::{PatternError, PatternResult};
use serde::Serialize;
use tracing::debug;

/// Beat lengths in minimal time units, every element >= 1
pub type DurationList = Vec<i64>;

/// One flag per minimal time unit, `1` at each beat start
pub type OnsetVector = Vec<u8>;

/// Longest onset vector the codec will build
pub const MAX_STEPS: usize = 1 << 20;

/// Check that a duration list is non-empty and strictly positive
pub fn validate_durations(durations: &[i64]) -> PatternResult<()> {
    if durations.is_empty() {
        return Err(PatternError::invalid("empty duration list"));
    }
    if let Some((i, d)) = durations.iter().enumerate().find(|(_, &d)| d < 1) {
        return Err(PatternError::invalid(format!(
            "duration {} at position {} must be at least 1",
            d, i
        )));
    }
    Ok(())
}

/// Total length of a duration list in minimal time units
pub fn total_steps(durations: &[i64]) -> PatternResult<usize> {
    let sum = durations
        .iter()
        .try_fold(0i64, |acc, &d| acc.checked_add(d))
        .ok_or_else(|| PatternError::Overflow("duration sum".to_string()))?;
    usize::try_from(sum).map_err(|_| PatternError::Overflow(format!("{} steps", sum)))
}

/// Total length, rejected as `InvalidInput` above [`MAX_STEPS`]
pub fn bounded_steps(durations: &[i64]) -> PatternResult<usize> {
    let steps = total_steps(durations)?;
    if steps > MAX_STEPS {
        return Err(PatternError::invalid(format!(
            "{} steps exceed the maximum of {}",
            steps, MAX_STEPS
        )));
    }
    Ok(steps)
}

/// Expand a duration list into an onset vector
///
/// Each duration becomes a `1` followed by `duration - 1` zeros.
pub fn to_onsets(durations: &[i64]) -> PatternResult<OnsetVector> {
    validate_durations(durations)?;
    let steps = bounded_steps(durations)?;

    let mut onsets = vec![0u8; steps];
    let mut position = 0usize;
    for &d in durations {
        onsets[position] = 1;
        position += d as usize;
    }
    Ok(onsets)
}

/// Collapse an onset vector into a duration list
///
/// The vector must start with an onset; a leading rest is rejected rather
/// than silently dropped.
pub fn to_durations(onsets: &[u8]) -> PatternResult<DurationList> {
    if onsets.is_empty() {
        return Err(PatternError::invalid("empty onset vector"));
    }
    if let Some((i, f)) = onsets.iter().enumerate().find(|(_, &f)| f > 1) {
        return Err(PatternError::invalid(format!(
            "onset flag {} at position {} is not 0 or 1",
            f, i
        )));
    }
    if onsets[0] != 1 {
        return Err(PatternError::invalid("may not start with 0"));
    }

    let starts: Vec<usize> = onsets
        .iter()
        .enumerate()
        .filter(|(_, &f)| f == 1)
        .map(|(i, _)| i)
        .collect();

    let mut durations = Vec::with_capacity(starts.len());
    for pair in starts.windows(2) {
        durations.push((pair[1] - pair[0]) as i64);
    }
    // last beat runs to the end of the vector
    durations.push((onsets.len() - starts[starts.len() - 1]) as i64);
    Ok(durations)
}

/// Which encoding a conversion produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Duration list (`pat`)
    Pat,
    /// Onset vector (`patbin`)
    Patbin,
}

/// Output of a conversion, tagged with its encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "encoding", content = "values", rename_all = "lowercase")]
pub enum Converted {
    Pat(DurationList),
    Patbin(OnsetVector),
}

impl Converted {
    pub fn encoding(&self) -> Encoding {
        match self {
            Converted::Pat(_) => Encoding::Pat,
            Converted::Patbin(_) => Encoding::Patbin,
        }
    }
}

#[derive(Debug, Clone)]
struct ConvertedPair {
    durations: DurationList,
    onsets: OnsetVector,
    emitted: Encoding,
}

/// Stateful converter holding the most recent pattern in both encodings
#[derive(Debug, Clone, Default)]
pub struct PatternConverter {
    last: Option<ConvertedPair>,
}

impl PatternConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a duration list, remembering both encodings
    pub fn pat(&mut self, durations: &[i64]) -> PatternResult<OnsetVector> {
        let onsets = to_onsets(durations)?;
        debug!("pat {:?} -> {} steps", durations, onsets.len());
        self.last = Some(ConvertedPair {
            durations: durations.to_vec(),
            onsets: onsets.clone(),
            emitted: Encoding::Patbin,
        });
        Ok(onsets)
    }

    /// Convert an onset vector, remembering both encodings
    pub fn patbin(&mut self, onsets: &[u8]) -> PatternResult<DurationList> {
        let durations = to_durations(onsets)?;
        debug!("patbin {} steps -> {:?}", onsets.len(), durations);
        self.last = Some(ConvertedPair {
            durations: durations.clone(),
            onsets: onsets.to_vec(),
            emitted: Encoding::Pat,
        });
        Ok(durations)
    }

    /// Re-emit the last conversion result
    pub fn replay(&self) -> PatternResult<Converted> {
        let pair = self
            .last
            .as_ref()
            .ok_or_else(|| PatternError::unbuilt("pattern"))?;
        Ok(match pair.emitted {
            Encoding::Pat => Converted::Pat(pair.durations.clone()),
            Encoding::Patbin => Converted::Patbin(pair.onsets.clone()),
        })
    }

    pub fn durations(&self) -> Option<&[i64]> {
        self.last.as_ref().map(|p| p.durations.as_slice())
    }

    pub fn onsets(&self) -> Option<&[u8]> {
        self.last.as_ref().map(|p| p.onsets.as_slice())
    }
}
