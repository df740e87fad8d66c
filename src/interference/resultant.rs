//! Resultants of interfering periodicities
//!
//! Each generator marks every multiple of itself within a span; the
//! resultant is the union of the marks. For generators 2 and 3 over 6 steps:
//!
//! ```text
//! a: x . x . x .
//! b: x . . x . .
//! r: x . x x x .
//! ```

use crate::codec::OnsetVector;
use crate::error::{PatternError, PatternResult};
use serde::Serialize;

/// Two-generator resultant
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resultant {
    pub generators: [i64; 2],
    pub r: OnsetVector,
    pub a: OnsetVector,
    pub b: OnsetVector,
}

/// Three-generator resultant and its counter-theme
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resultant3 {
    pub generators: [i64; 3],
    pub r1: OnsetVector,
    pub a1: OnsetVector,
    pub b1: OnsetVector,
    pub c1: OnsetVector,
    pub r2: OnsetVector,
    pub a2: OnsetVector,
    pub b2: OnsetVector,
    pub c2: OnsetVector,
}

/// Generator `a` against phase-shifted copies of generator `b`
///
/// Channel `b[j]` holds the `b` marks shifted by `j * a`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupedResultant {
    /// Generators after clamping
    pub generators: [i64; 2],
    pub r: OnsetVector,
    pub a: OnsetVector,
    pub b: Vec<OnsetVector>,
}

/// Span of a generator set, the product of all generators
pub(crate) fn span(generators: &[i64]) -> PatternResult<usize> {
    if let Some(g) = generators.iter().find(|&&g| g < 1) {
        return Err(PatternError::invalid(format!(
            "generator {} must be at least 1",
            g
        )));
    }
    let product = generators
        .iter()
        .try_fold(1i64, |acc, &g| acc.checked_mul(g))
        .ok_or_else(|| PatternError::Overflow(format!("span of generators {:?}", generators)))?;
    usize::try_from(product).map_err(|_| PatternError::Overflow(format!("span {}", product)))
}

fn mark(pattern: &mut [u8], start: usize, period: usize) {
    for i in (start..pattern.len()).step_by(period) {
        pattern[i] = 1;
    }
}

fn union(patterns: &[&OnsetVector]) -> OnsetVector {
    let len = patterns.iter().map(|p| p.len()).max().unwrap_or(0);
    (0..len)
        .map(|i| patterns.iter().any(|p| p.get(i) == Some(&1)) as u8)
        .collect()
}

/// Resultant of two generators over `a * b` steps
pub fn resultant(a: i64, b: i64) -> PatternResult<Resultant> {
    let steps = span(&[a, b])?;

    let mut a_pat = vec![0u8; steps];
    let mut b_pat = vec![0u8; steps];
    mark(&mut a_pat, 0, a as usize);
    mark(&mut b_pat, 0, b as usize);
    let r = union(&[&a_pat, &b_pat]);

    Ok(Resultant {
        generators: [a, b],
        r,
        a: a_pat,
        b: b_pat,
    })
}

/// Resultant of three generators over `a * b * c` steps
///
/// `r1` unites the multiples of `a`, `b` and `c`. The counter-theme `r2`
/// unites the multiples of the pairwise products `b*c`, `a*c` and `a*b`.
pub fn resultant3(a: i64, b: i64, c: i64) -> PatternResult<Resultant3> {
    let steps = span(&[a, b, c])?;
    let channel = |period: i64| {
        let mut pattern = vec![0u8; steps];
        mark(&mut pattern, 0, period as usize);
        pattern
    };

    let a1 = channel(a);
    let b1 = channel(b);
    let c1 = channel(c);
    let r1 = union(&[&a1, &b1, &c1]);

    // pairwise products divide the span, so none of them overflow
    let a2 = channel(b * c);
    let b2 = channel(a * c);
    let c2 = channel(a * b);
    let r2 = union(&[&a2, &b2, &c2]);

    Ok(Resultant3 {
        generators: [a, b, c],
        r1,
        a1,
        b1,
        c1,
        r2,
        a2,
        b2,
        c2,
    })
}

fn clamp_pair(a: i64, b: i64, max_generator: i64) -> (i64, i64) {
    let a = a.clamp(1, max_generator.max(1));
    let b = b.clamp(1, a);
    (a, b)
}

/// Fill the squared segment `0..a*a` of a grouped layout
fn squared_segment(r: &mut [u8], a_pat: &mut [u8], b: &mut [OnsetVector], ga: usize, gb: usize) {
    mark(a_pat, 0, ga);
    mark(r, 0, ga);
    for i in (0..ga * gb).step_by(gb) {
        for (j, channel) in b.iter_mut().enumerate() {
            let step = i + j * ga;
            channel[step] = 1;
            r[step] = 1;
        }
    }
}

/// Grouped resultant over `a * a` steps
///
/// `a` is clamped to `1..=max_generator` and `b` to `1..=a`. The `b` marks
/// cover `a * b` steps and are repeated in `a - b + 1` channels, channel `j`
/// shifted by `j * a`.
pub fn grouped(a: i64, b: i64, max_generator: i64) -> GroupedResultant {
    let (a, b) = clamp_pair(a, b, max_generator);
    let (ga, gb) = (a as usize, b as usize);
    let steps = ga * ga;
    let channels = ga - gb + 1;

    let mut r = vec![0u8; steps];
    let mut a_pat = vec![0u8; steps];
    let mut b_pats = vec![vec![0u8; steps]; channels];
    squared_segment(&mut r, &mut a_pat, &mut b_pats, ga, gb);

    GroupedResultant {
        generators: [a, b],
        r,
        a: a_pat,
        b: b_pats,
    }
}

/// Compound resultant over `a * a + a * b` steps
///
/// The squared segment of [`grouped`] is followed by an `a * b` segment in
/// which every channel carries the unshifted `b` marks.
pub fn compound(a: i64, b: i64, max_generator: i64) -> GroupedResultant {
    let (a, b) = clamp_pair(a, b, max_generator);
    let (ga, gb) = (a as usize, b as usize);
    let squared = ga * ga;
    let steps = squared + ga * gb;
    let channels = ga - gb + 1;

    let mut r = vec![0u8; steps];
    let mut a_pat = vec![0u8; steps];
    let mut b_pats = vec![vec![0u8; steps]; channels];
    squared_segment(&mut r, &mut a_pat, &mut b_pats, ga, gb);

    for i in (squared..steps).step_by(gb) {
        for channel in b_pats.iter_mut() {
            channel[i] = 1;
        }
        r[i] = 1;
    }

    GroupedResultant {
        generators: [a, b],
        r,
        a: a_pat,
        b: b_pats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(pattern: &[u8]) -> Vec<usize> {
        pattern
            .iter()
            .enumerate()
            .filter(|(_, &f)| f == 1)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_resultant_2_3() {
        let res = resultant(2, 3).unwrap();
        assert_eq!(res.r.len(), 6);
        assert_eq!(marked(&res.r), vec![0, 2, 3, 4]);
        assert_eq!(marked(&res.a), vec![0, 2, 4]);
        assert_eq!(marked(&res.b), vec![0, 3]);
    }

    #[test]
    fn test_resultant_rejects_zero() {
        assert!(matches!(resultant(0, 3), Err(PatternError::InvalidInput(_))));
        assert!(matches!(resultant3(2, -1, 3), Err(PatternError::InvalidInput(_))));
    }

    #[test]
    fn test_resultant3() {
        let res = resultant3(2, 3, 5).unwrap();
        assert_eq!(res.r1.len(), 30);
        assert_eq!(marked(&res.c1), vec![0, 5, 10, 15, 20, 25]);
        assert_eq!(
            marked(&res.r1),
            vec![0, 2, 3, 4, 5, 6, 8, 9, 10, 12, 14, 15, 16, 18, 20, 21, 22, 24, 25, 26, 27, 28]
        );
        // counter-theme periods 15, 10 and 6
        assert_eq!(marked(&res.a2), vec![0, 15]);
        assert_eq!(marked(&res.b2), vec![0, 10, 20]);
        assert_eq!(marked(&res.c2), vec![0, 6, 12, 18, 24]);
        assert_eq!(marked(&res.r2), vec![0, 6, 10, 12, 15, 18, 20, 24]);
    }

    #[test]
    fn test_grouped() {
        let res = grouped(3, 2, 9);
        assert_eq!(res.generators, [3, 2]);
        assert_eq!(res.r.len(), 9);
        assert_eq!(res.b.len(), 2);
        assert_eq!(marked(&res.a), vec![0, 3, 6]);
        assert_eq!(marked(&res.b[0]), vec![0, 2, 4]);
        assert_eq!(marked(&res.b[1]), vec![3, 5, 7]);
        assert_eq!(marked(&res.r), vec![0, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_grouped_clamps() {
        let res = grouped(12, 15, 9);
        assert_eq!(res.generators, [9, 9]);
        assert_eq!(res.b.len(), 1);
        assert_eq!(res.r.len(), 81);

        let res = grouped(0, -4, 9);
        assert_eq!(res.generators, [1, 1]);
        assert_eq!(res.r, vec![1]);
    }

    #[test]
    fn test_compound() {
        let res = compound(3, 2, 9);
        assert_eq!(res.r.len(), 15);
        assert_eq!(marked(&res.a), vec![0, 3, 6, 9, 12]);
        assert_eq!(marked(&res.b[0]), vec![0, 2, 4, 9, 11, 13]);
        assert_eq!(marked(&res.b[1]), vec![3, 5, 7, 9, 11, 13]);
        assert_eq!(marked(&res.r), vec![0, 2, 3, 4, 5, 6, 7, 9, 11, 12, 13]);
    }
}
