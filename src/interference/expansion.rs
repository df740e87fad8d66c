//! Square and cube expansion of a duration pattern
//!
//! Treating a pattern `p` of length `n` and sum `S` as a polynomial, the
//! square is the outer product `p[i] * p[j]` (length `n²`) and the cube is
//! `p[i] * square[j]` (length `n³`). The sync patterns scale a lower power
//! by the sum so that all of them cover the same total span.

use crate::codec;
use crate::error::{PatternError, PatternResult};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Square {
    /// Outer product, sums to `S²`
    pub square: Vec<i64>,
    /// `S * square[k]`, sums to `S³`
    pub sync: Vec<i64>,
    /// `S * p[i]`, the input stretched to span `S²`
    pub sync_linear: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cube {
    /// `p[i] * square[j]`, sums to `S³`
    pub cube: Vec<i64>,
    /// `S * square[k]`, the square stretched to span `S³`
    pub sync: Vec<i64>,
    /// `S² * p[i]`, the input stretched to span `S³`
    pub sync2: Vec<i64>,
}

fn mul(a: i64, b: i64) -> PatternResult<i64> {
    a.checked_mul(b)
        .ok_or_else(|| PatternError::Overflow(format!("{} * {}", a, b)))
}

fn scale(values: &[i64], factor: i64) -> PatternResult<Vec<i64>> {
    values.iter().map(|&v| mul(v, factor)).collect()
}

fn outer(left: &[i64], right: &[i64]) -> PatternResult<Vec<i64>> {
    let mut out = Vec::with_capacity(left.len() * right.len());
    for &l in left {
        for &r in right {
            out.push(mul(l, r)?);
        }
    }
    Ok(out)
}

fn pattern_sum(pattern: &[i64]) -> PatternResult<i64> {
    codec::validate_durations(pattern)?;
    pattern
        .iter()
        .try_fold(0i64, |acc, &v| acc.checked_add(v))
        .ok_or_else(|| PatternError::Overflow("pattern sum".to_string()))
}

/// Square a duration pattern
pub fn square(pattern: &[i64]) -> PatternResult<Square> {
    let sum = pattern_sum(pattern)?;
    let square = outer(pattern, pattern)?;
    Ok(Square {
        sync: scale(&square, sum)?,
        sync_linear: scale(pattern, sum)?,
        square,
    })
}

/// Cube a duration pattern
pub fn cube(pattern: &[i64]) -> PatternResult<Cube> {
    let sum = pattern_sum(pattern)?;
    let square = outer(pattern, pattern)?;
    Ok(Cube {
        cube: outer(pattern, &square)?,
        sync: scale(&square, sum)?,
        sync2: scale(pattern, mul(sum, sum)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        let sq = square(&[1, 2]).unwrap();
        assert_eq!(sq.square, vec![1, 2, 2, 4]);
        assert_eq!(sq.sync, vec![3, 6, 6, 12]);
        assert_eq!(sq.sync_linear, vec![3, 6]);
    }

    #[test]
    fn test_cube() {
        let cb = cube(&[1, 2]).unwrap();
        assert_eq!(cb.cube, vec![1, 2, 2, 4, 2, 4, 4, 8]);
        assert_eq!(cb.sync, vec![3, 6, 6, 12]);
        assert_eq!(cb.sync2, vec![9, 18]);
    }

    #[test]
    fn test_spans_agree() {
        let p = [3, 1, 2];
        let s: i64 = p.iter().sum();
        let sq = square(&p).unwrap();
        assert_eq!(sq.square.iter().sum::<i64>(), s * s);
        assert_eq!(sq.sync_linear.iter().sum::<i64>(), s * s);

        let cb = cube(&p).unwrap();
        assert_eq!(cb.cube.len(), 27);
        assert_eq!(cb.cube.iter().sum::<i64>(), s * s * s);
        assert_eq!(cb.sync.iter().sum::<i64>(), s * s * s);
        assert_eq!(cb.sync2.iter().sum::<i64>(), s * s * s);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(square(&[]), Err(PatternError::InvalidInput(_))));
        assert!(matches!(cube(&[2, 0]), Err(PatternError::InvalidInput(_))));
        assert!(matches!(cube(&[i64::MAX / 2, 3]), Err(PatternError::Overflow(_))));
    }
}
