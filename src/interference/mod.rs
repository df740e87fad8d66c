//! Interference Synthesizer
//!
//! Builds Schillinger resultants from generator integers and expands
//! duration patterns into their square and cube.
//!
//! # Families
//!
//! ```text
//! gen a b        -> r, a, b             over a*b steps
//! gen a b c      -> r1 a1 b1 c1,
//!                   r2 a2 b2 c2         over a*b*c steps
//! grouped a b    -> r, a, b0..bk        over a*a steps
//! compound a b   -> r, a, b0..bk        over a*a + a*b steps
//! ```
//!
//! [`InterferenceSynthesizer`] keeps only the latest generator set and the
//! vectors derived from it; every generation recomputes everything.

pub mod expansion;
pub mod resultant;

pub use expansion::{cube, square, Cube, Square};
pub use resultant::{compound, grouped, resultant, resultant3, GroupedResultant, Resultant, Resultant3};

use crate::codec::OnsetVector;
use crate::config::SynthSettings;
use crate::error::{PatternError, PatternResult};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Generators of the most recent generation, after clamping
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum GeneratorSet {
    Pair { a: i64, b: i64 },
    Trio { a: i64, b: i64, c: i64 },
    Grouped { a: i64, b: i64 },
    Compound { a: i64, b: i64 },
}

impl fmt::Display for GeneratorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorSet::Pair { a, b } => write!(f, "gen {} {}", a, b),
            GeneratorSet::Trio { a, b, c } => write!(f, "gen {} {} {}", a, b, c),
            GeneratorSet::Grouped { a, b } => write!(f, "grouped {} {}", a, b),
            GeneratorSet::Compound { a, b } => write!(f, "compound {} {}", a, b),
        }
    }
}

/// Named onset vectors derived from a generator set
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResultantVectors {
    Pair(Resultant),
    Trio(Resultant3),
    Grouped(GroupedResultant),
}

impl ResultantVectors {
    /// Every vector with its channel name, in output order
    pub fn channels(&self) -> Vec<(String, &OnsetVector)> {
        match self {
            ResultantVectors::Pair(res) => vec![
                ("r".to_string(), &res.r),
                ("a".to_string(), &res.a),
                ("b".to_string(), &res.b),
            ],
            ResultantVectors::Trio(res) => vec![
                ("r1".to_string(), &res.r1),
                ("a1".to_string(), &res.a1),
                ("b1".to_string(), &res.b1),
                ("c1".to_string(), &res.c1),
                ("r2".to_string(), &res.r2),
                ("a2".to_string(), &res.a2),
                ("b2".to_string(), &res.b2),
                ("c2".to_string(), &res.c2),
            ],
            ResultantVectors::Grouped(res) => {
                let mut channels = vec![("r".to_string(), &res.r), ("a".to_string(), &res.a)];
                for (j, b) in res.b.iter().enumerate() {
                    channels.push((format!("b{}", j), b));
                }
                channels
            }
        }
    }

    /// Vector by channel name
    pub fn channel(&self, name: &str) -> Option<&OnsetVector> {
        self.channels()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Span shared by all channels
    pub fn steps(&self) -> usize {
        match self {
            ResultantVectors::Pair(res) => res.r.len(),
            ResultantVectors::Trio(res) => res.r1.len(),
            ResultantVectors::Grouped(res) => res.r.len(),
        }
    }
}

/// Generation state of one pattern slot
#[derive(Debug, Clone)]
pub struct InterferenceSynthesizer {
    settings: SynthSettings,
    current: Option<(GeneratorSet, ResultantVectors)>,
}

impl InterferenceSynthesizer {
    pub fn new(settings: SynthSettings) -> Self {
        Self {
            settings,
            current: None,
        }
    }

    fn check_span(&self, generators: &[i64]) -> PatternResult<()> {
        let steps = resultant::span(generators)?;
        if steps > self.settings.max_span {
            return Err(PatternError::invalid(format!(
                "span {} of generators {:?} exceeds the maximum of {}",
                steps, generators, self.settings.max_span
            )));
        }
        Ok(())
    }

    fn replace(&mut self, set: GeneratorSet, vectors: ResultantVectors) -> &ResultantVectors {
        info!("Generated {} over {} steps", set, vectors.steps());
        &self.current.insert((set, vectors)).1
    }

    /// Two-generator resultant
    pub fn gen(&mut self, a: i64, b: i64) -> PatternResult<&ResultantVectors> {
        self.check_span(&[a, b])?;
        let res = resultant(a, b)?;
        Ok(self.replace(GeneratorSet::Pair { a, b }, ResultantVectors::Pair(res)))
    }

    /// Three-generator resultant and counter-theme
    pub fn gen3(&mut self, a: i64, b: i64, c: i64) -> PatternResult<&ResultantVectors> {
        self.check_span(&[a, b, c])?;
        let res = resultant3(a, b, c)?;
        Ok(self.replace(GeneratorSet::Trio { a, b, c }, ResultantVectors::Trio(res)))
    }

    /// Grouped resultant; generators are clamped, never rejected
    pub fn gen_grouped(&mut self, a: i64, b: i64) -> &ResultantVectors {
        let res = grouped(a, b, self.settings.max_generator);
        let [ca, cb] = res.generators;
        if (ca, cb) != (a, b) {
            debug!("Generators {} {} clamped to {} {}", a, b, ca, cb);
        }
        self.replace(GeneratorSet::Grouped { a: ca, b: cb }, ResultantVectors::Grouped(res))
    }

    /// Compound resultant; generators are clamped, never rejected
    pub fn gen_compound(&mut self, a: i64, b: i64) -> &ResultantVectors {
        let res = compound(a, b, self.settings.max_generator);
        let [ca, cb] = res.generators;
        if (ca, cb) != (a, b) {
            debug!("Generators {} {} clamped to {} {}", a, b, ca, cb);
        }
        self.replace(GeneratorSet::Compound { a: ca, b: cb }, ResultantVectors::Grouped(res))
    }

    /// Vectors of the latest generation
    pub fn vectors(&self) -> PatternResult<&ResultantVectors> {
        self.current
            .as_ref()
            .map(|(_, v)| v)
            .ok_or_else(|| PatternError::unbuilt("generators"))
    }

    pub fn generators(&self) -> PatternResult<&GeneratorSet> {
        self.current
            .as_ref()
            .map(|(g, _)| g)
            .ok_or_else(|| PatternError::unbuilt("generators"))
    }
}
