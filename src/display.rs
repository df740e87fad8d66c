//! Step-grid display for rhythms
//!
//! ```text
//! r:  x . x x x .
//! a:  x . x . x .
//! b:  x . . x . .
//! ```

use crate::codec::OnsetVector;
use crate::interference::ResultantVectors;

/// Render an onset vector as `x . . x`
pub fn steps(onsets: &[u8]) -> String {
    onsets
        .iter()
        .map(|&f| if f == 1 { "x" } else { "." })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render any list of values space separated
pub fn list<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One labelled grid row, labels padded to `width`
pub fn grid_row(name: &str, onsets: &[u8], width: usize) -> String {
    format!("{:<width$} {}", format!("{}:", name), steps(onsets), width = width + 1)
}

/// All channels of a generation as aligned grid rows
pub fn grid(vectors: &ResultantVectors) -> String {
    let channels = vectors.channels();
    let width = channels.iter().map(|(n, _)| n.len()).max().unwrap_or(0);

    let mut output = String::new();
    for (name, onsets) in &channels {
        output.push_str(&grid_row(name, onsets, width));
        output.push('\n');
    }
    output
}

/// Onset vector as plain `0`/`1` values
pub fn flags(onsets: &OnsetVector) -> String {
    list(onsets)
}
