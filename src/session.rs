//! Command session
//!
//! A [`Session`] owns one of each pattern slot and routes parsed
//! [`Command`]s to them. Every command yields a [`Reply`], which renders as
//! text or serializes to JSON. A rejected command leaves every slot as it
//! was.

use crate::codec::{self, Converted, DurationList, OnsetVector, PatternConverter};
use crate::command::{self, AutoGroupMessage, Command, PatternInput, PermuteMessage, SynthMessage};
use crate::config::EngineConfig;
use crate::display;
use crate::error::PatternResult;
use crate::grouping::{self, AutoGrouper, GroupToken};
use crate::interference::{self, Cube, GeneratorSet, InterferenceSynthesizer, ResultantVectors, Square};
use crate::multiset::GroupSymbol;
use crate::permutation::{Direction, Permuter, Recall};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// The selected entry of a permutation table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Selection {
    pub index: usize,
    pub count: u64,
    pub clamped: bool,
    pub is_last: bool,
    /// Durations in selected order; groups are flattened
    pub pattern: DurationList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupSymbol>>,
    /// Absent when the pattern holds non-positive durations
    pub onsets: Option<OnsetVector>,
}

impl Selection {
    fn from_durations(recall: Recall<i64>, count: u64) -> Self {
        let onsets = recall.onsets().ok();
        Self {
            index: recall.index,
            count,
            clamped: recall.clamped,
            is_last: recall.is_last,
            onsets,
            groups: None,
            pattern: recall.permutation,
        }
    }

    fn from_groups(recall: Recall<GroupSymbol>, count: u64) -> Self {
        let pattern = recall.durations();
        let onsets = recall.onsets().ok();
        Self {
            index: recall.index,
            count,
            clamped: recall.clamped,
            is_last: recall.is_last,
            pattern,
            groups: Some(recall.permutation),
            onsets,
        }
    }
}

/// Output of one command
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    Converted(Converted),
    /// A new table was built; its first permutation is selected
    Permutations { count: u64, selected: Selection },
    Selected(Selection),
    Rotated {
        pattern: DurationList,
        #[serde(skip_serializing_if = "Option::is_none")]
        groups: Option<Vec<GroupSymbol>>,
        onsets: Option<OnsetVector>,
    },
    Direction { direction: Direction },
    Groupings { moduli: Vec<i64> },
    Grouped { tokens: Vec<GroupToken> },
    Resultants { generators: GeneratorSet, vectors: ResultantVectors },
    Square(Square),
    Cube(Cube),
}

fn onsets_of(pattern: &[i64]) -> Option<OnsetVector> {
    if pattern == [0] {
        return Some(vec![0]);
    }
    codec::to_onsets(pattern).ok()
}

fn write_onsets(f: &mut fmt::Formatter<'_>, onsets: &Option<OnsetVector>) -> fmt::Result {
    match onsets {
        Some(onsets) => writeln!(f, "patbin: {}", display::flags(onsets)),
        None => Ok(()),
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.groups {
            Some(groups) => display::list(groups),
            None => display::list(&self.pattern),
        };
        write!(f, "permutation {} of {}: {}", self.index, self.count, body)?;
        if self.is_last {
            write!(f, " (last)")?;
        }
        writeln!(f)?;
        if self.groups.is_some() {
            writeln!(f, "pat: {}", display::list(&self.pattern))?;
        }
        write_onsets(f, &self.onsets)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Converted(Converted::Pat(values)) => writeln!(f, "pat: {}", display::list(values)),
            Reply::Converted(Converted::Patbin(values)) => {
                writeln!(f, "patbin: {}", display::flags(values))
            }
            Reply::Permutations { count, selected } => {
                writeln!(f, "count: {}", count)?;
                write!(f, "{}", selected)
            }
            Reply::Selected(selection) => write!(f, "{}", selection),
            Reply::Rotated {
                pattern,
                groups,
                onsets,
            } => {
                if let Some(groups) = groups {
                    writeln!(f, "groups: {}", display::list(groups))?;
                }
                writeln!(f, "pat: {}", display::list(pattern))?;
                write_onsets(f, onsets)
            }
            Reply::Direction { direction } => writeln!(f, "direction: {}", direction),
            Reply::Groupings { moduli } if moduli.is_empty() => writeln!(f, "groupings: none"),
            Reply::Groupings { moduli } => writeln!(f, "groupings: {}", display::list(moduli)),
            Reply::Grouped { tokens } => writeln!(f, "{}", grouping::format_tokens(tokens)),
            Reply::Resultants {
                generators,
                vectors,
            } => {
                writeln!(f, "{} ({} steps)", generators, vectors.steps())?;
                write!(f, "{}", display::grid(vectors))
            }
            Reply::Square(sq) => {
                writeln!(f, "square: {}", display::list(&sq.square))?;
                writeln!(f, "sync: {}", display::list(&sq.sync))?;
                writeln!(f, "sync_linear: {}", display::list(&sq.sync_linear))
            }
            Reply::Cube(cb) => {
                writeln!(f, "cube: {}", display::list(&cb.cube))?;
                writeln!(f, "sync: {}", display::list(&cb.sync))?;
                writeln!(f, "sync2: {}", display::list(&cb.sync2))
            }
        }
    }
}

/// All pattern slots of one engine instance
#[derive(Debug, Clone)]
pub struct Session {
    config: EngineConfig,
    converter: PatternConverter,
    permuter: Permuter<i64>,
    groups: Permuter<GroupSymbol>,
    grouper: AutoGrouper,
    synth: InterferenceSynthesizer,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            converter: PatternConverter::new(),
            permuter: Permuter::new(config.permutation.clone()),
            groups: Permuter::new(config.permutation.clone()),
            grouper: AutoGrouper::new(),
            synth: InterferenceSynthesizer::new(config.synth.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn permuter(&self) -> &Permuter<i64> {
        &self.permuter
    }

    pub fn group_permuter(&self) -> &Permuter<GroupSymbol> {
        &self.groups
    }

    pub fn synth(&self) -> &InterferenceSynthesizer {
        &self.synth
    }

    /// Parse and execute one command line
    pub fn run_line(&mut self, line: &str) -> PatternResult<Reply> {
        let result = command::parse(line).and_then(|cmd| self.execute(cmd));
        if let Err(e) = &result {
            warn!("Rejected '{}': {}", line.trim(), e);
        }
        result
    }

    pub fn execute(&mut self, command: Command) -> PatternResult<Reply> {
        debug!("Executing {:?}", command);
        match command {
            Command::Convert(None) => Ok(Reply::Converted(self.converter.replay()?)),
            Command::Convert(Some(PatternInput::Pat(durations))) => Ok(Reply::Converted(
                Converted::Patbin(self.converter.pat(&durations)?),
            )),
            Command::Convert(Some(PatternInput::Patbin(onsets))) => Ok(Reply::Converted(
                Converted::Pat(self.converter.patbin(&onsets)?),
            )),
            Command::Permute(message) => self.permute(message),
            Command::Group(message) => self.permute_groups(message),
            Command::AutoGroup(message) => self.autogroup(message),
            Command::Synth(message) => self.synthesize(message),
            Command::Square(pattern) => Ok(Reply::Square(interference::square(&pattern)?)),
            Command::Cube(pattern) => Ok(Reply::Cube(interference::cube(&pattern)?)),
        }
    }

    fn permute(&mut self, message: PermuteMessage<PatternInput>) -> PatternResult<Reply> {
        match message {
            PermuteMessage::Load(input) => {
                let symbols = match input {
                    PatternInput::Pat(durations) => durations,
                    PatternInput::Patbin(onsets) => codec::to_durations(&onsets)?,
                };
                let count = self.permuter.submit(&symbols)?;
                let selected = Selection::from_durations(self.permuter.recall(1)?, count);
                Ok(Reply::Permutations { count, selected })
            }
            PermuteMessage::Recall(index) => {
                let recall = self.permuter.recall(index)?;
                let count = self.permuter.count()?;
                Ok(Reply::Selected(Selection::from_durations(recall, count)))
            }
            PermuteMessage::Circular(shift) => {
                let pattern = self.permuter.circular(shift)?;
                Ok(Reply::Rotated {
                    onsets: onsets_of(&pattern),
                    groups: None,
                    pattern,
                })
            }
            PermuteMessage::Anticircular(shift) => {
                let pattern = self.permuter.anti_circular(shift)?;
                Ok(Reply::Rotated {
                    onsets: onsets_of(&pattern),
                    groups: None,
                    pattern,
                })
            }
            PermuteMessage::Mode(direction) => {
                self.permuter.set_direction(direction);
                Ok(Reply::Direction { direction })
            }
        }
    }

    fn permute_groups(&mut self, message: PermuteMessage<Vec<GroupToken>>) -> PatternResult<Reply> {
        let rotated = |groups: Vec<GroupSymbol>| {
            let pattern: DurationList = groups.iter().flat_map(|g| g.values().to_vec()).collect();
            Reply::Rotated {
                onsets: onsets_of(&pattern),
                groups: Some(groups),
                pattern,
            }
        };

        match message {
            PermuteMessage::Load(tokens) => {
                let symbols = grouping::group_symbols(&tokens)?;
                let count = self.groups.submit(&symbols)?;
                let selected = Selection::from_groups(self.groups.recall(1)?, count);
                Ok(Reply::Permutations { count, selected })
            }
            PermuteMessage::Recall(index) => {
                let recall = self.groups.recall(index)?;
                let count = self.groups.count()?;
                Ok(Reply::Selected(Selection::from_groups(recall, count)))
            }
            PermuteMessage::Circular(shift) => Ok(rotated(self.groups.circular(shift)?)),
            PermuteMessage::Anticircular(shift) => Ok(rotated(self.groups.anti_circular(shift)?)),
            PermuteMessage::Mode(direction) => {
                self.groups.set_direction(direction);
                Ok(Reply::Direction { direction })
            }
        }
    }

    fn autogroup(&mut self, message: AutoGroupMessage) -> PatternResult<Reply> {
        match message {
            AutoGroupMessage::Load(PatternInput::Pat(durations)) => Ok(Reply::Groupings {
                moduli: self.grouper.pat(&durations)?,
            }),
            AutoGroupMessage::Load(PatternInput::Patbin(onsets)) => Ok(Reply::Groupings {
                moduli: self.grouper.patbin(&onsets)?,
            }),
            AutoGroupMessage::GroupBy(modulus) => Ok(Reply::Grouped {
                tokens: self.grouper.group_by(modulus)?,
            }),
            AutoGroupMessage::Bang => Ok(Reply::Grouped {
                tokens: self.grouper.replay()?,
            }),
        }
    }

    fn synthesize(&mut self, message: SynthMessage) -> PatternResult<Reply> {
        match message {
            SynthMessage::Gen(a, b) => {
                self.synth.gen(a, b)?;
            }
            SynthMessage::Gen3(a, b, c) => {
                self.synth.gen3(a, b, c)?;
            }
            SynthMessage::Grouped(a, b) => {
                self.synth.gen_grouped(a, b);
            }
            SynthMessage::Compound(a, b) => {
                self.synth.gen_compound(a, b);
            }
            SynthMessage::Bang => {}
        }
        Ok(Reply::Resultants {
            generators: self.synth.generators()?.clone(),
            vectors: self.synth.vectors()?.clone(),
        })
    }
}
