//! Text commands
//!
//! One command per line, addressed to a slot:
//!
//! ```text
//! conv pat 3 1 2            conv patbin 1 0 0 1 1 0      conv bang
//! permute pat 1 1 2         permute recall 3             permute circular 1
//! permute anticircular 2    permute mode anticlockwise
//! group g 1 2 g 3 g 1 2     group recall 2               group circular 1
//! autogroup pat 3 1 2 2     autogroup groupby 4          autogroup bang
//! synth gen 2 3             synth gen 2 3 5              synth grouped 4 2
//! synth compound 4 2        synth bang
//! square pat 1 2            cube pat 1 2
//! ```

use crate::error::{PatternError, PatternResult};
use crate::grouping::{self, GroupToken};
use crate::permutation::Direction;

/// Pattern input in either encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternInput {
    Pat(Vec<i64>),
    Patbin(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PermuteMessage<T> {
    Load(T),
    Recall(i64),
    Circular(i64),
    Anticircular(i64),
    Mode(Direction),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoGroupMessage {
    Load(PatternInput),
    GroupBy(i64),
    Bang,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SynthMessage {
    Gen(i64, i64),
    Gen3(i64, i64, i64),
    Grouped(i64, i64),
    Compound(i64, i64),
    Bang,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `None` replays the last conversion
    Convert(Option<PatternInput>),
    Permute(PermuteMessage<PatternInput>),
    Group(PermuteMessage<Vec<GroupToken>>),
    AutoGroup(AutoGroupMessage),
    Synth(SynthMessage),
    Square(Vec<i64>),
    Cube(Vec<i64>),
}

fn parse_int(word: &str) -> PatternResult<i64> {
    word.parse::<i64>()
        .map_err(|_| PatternError::Parse(format!("'{}' is not an integer", word)))
}

fn parse_ints(words: &[&str]) -> PatternResult<Vec<i64>> {
    words.iter().map(|w| parse_int(w)).collect()
}

fn parse_flags(words: &[&str]) -> PatternResult<Vec<u8>> {
    words
        .iter()
        .map(|w| {
            w.parse::<u8>()
                .map_err(|_| PatternError::Parse(format!("'{}' is not an onset flag", w)))
        })
        .collect()
}

fn single(words: &[&str], what: &str) -> PatternResult<i64> {
    match words {
        [w] => parse_int(w),
        _ => Err(PatternError::Parse(format!("{} takes one integer", what))),
    }
}

fn pair(words: &[&str], what: &str) -> PatternResult<(i64, i64)> {
    match words {
        [a, b] => Ok((parse_int(a)?, parse_int(b)?)),
        _ => Err(PatternError::Parse(format!("{} takes two integers", what))),
    }
}

fn pattern_input(message: &str, args: &[&str]) -> PatternResult<Option<PatternInput>> {
    Ok(match message {
        "pat" => Some(PatternInput::Pat(parse_ints(args)?)),
        "patbin" => Some(PatternInput::Patbin(parse_flags(args)?)),
        _ => None,
    })
}

fn permute_message<T>(
    message: &str,
    args: &[&str],
    load: impl FnOnce() -> PatternResult<Option<T>>,
) -> PatternResult<PermuteMessage<T>> {
    match message {
        "recall" => Ok(PermuteMessage::Recall(single(args, "recall")?)),
        "circular" => Ok(PermuteMessage::Circular(single(args, "circular")?)),
        "anticircular" => Ok(PermuteMessage::Anticircular(single(args, "anticircular")?)),
        "mode" => match args {
            [d] => Ok(PermuteMessage::Mode(d.parse()?)),
            _ => Err(PatternError::Parse("mode takes one direction".to_string())),
        },
        other => load()?
            .map(PermuteMessage::Load)
            .ok_or_else(|| PatternError::Parse(format!("unknown message '{}'", other))),
    }
}

/// Parse one command line
pub fn parse(line: &str) -> PatternResult<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let (slot, message, args) = match words.as_slice() {
        [] => return Err(PatternError::Parse("empty command".to_string())),
        [slot] => (*slot, "", &[][..]),
        [slot, message, args @ ..] => (*slot, *message, args),
    };

    match slot {
        "conv" => match message {
            "bang" => Ok(Command::Convert(None)),
            _ => pattern_input(message, args)?
                .map(|input| Command::Convert(Some(input)))
                .ok_or_else(|| PatternError::Parse(format!("unknown message '{}'", message))),
        },
        "permute" => Ok(Command::Permute(permute_message(message, args, || {
            pattern_input(message, args)
        })?)),
        "group" => Ok(Command::Group(permute_message(message, args, || {
            // the message word is the first separator
            let all = &words[1..];
            if all.is_empty() {
                return Ok(None);
            }
            grouping::parse_tokens(all).map(Some)
        })?)),
        "autogroup" => match message {
            "groupby" => Ok(Command::AutoGroup(AutoGroupMessage::GroupBy(single(args, "groupby")?))),
            "bang" => Ok(Command::AutoGroup(AutoGroupMessage::Bang)),
            _ => pattern_input(message, args)?
                .map(|input| Command::AutoGroup(AutoGroupMessage::Load(input)))
                .ok_or_else(|| PatternError::Parse(format!("unknown message '{}'", message))),
        },
        "synth" => {
            let msg = match message {
                "gen" => match args {
                    [_, _] => {
                        let (a, b) = pair(args, "gen")?;
                        SynthMessage::Gen(a, b)
                    }
                    [a, b, c] => SynthMessage::Gen3(parse_int(a)?, parse_int(b)?, parse_int(c)?),
                    _ => return Err(PatternError::Parse("gen takes two or three integers".to_string())),
                },
                "grouped" => {
                    let (a, b) = pair(args, "grouped")?;
                    SynthMessage::Grouped(a, b)
                }
                "compound" => {
                    let (a, b) = pair(args, "compound")?;
                    SynthMessage::Compound(a, b)
                }
                "bang" => SynthMessage::Bang,
                other => return Err(PatternError::Parse(format!("unknown message '{}'", other))),
            };
            Ok(Command::Synth(msg))
        }
        "square" | "cube" => {
            if message != "pat" {
                return Err(PatternError::Parse(format!("{} expects 'pat'", slot)));
            }
            let values = parse_ints(args)?;
            Ok(if slot == "square" {
                Command::Square(values)
            } else {
                Command::Cube(values)
            })
        }
        other => Err(PatternError::Parse(format!("unknown slot '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conv() {
        assert_eq!(
            parse("conv pat 3 1 2").unwrap(),
            Command::Convert(Some(PatternInput::Pat(vec![3, 1, 2])))
        );
        assert_eq!(
            parse("conv patbin 1 0 1").unwrap(),
            Command::Convert(Some(PatternInput::Patbin(vec![1, 0, 1])))
        );
        assert_eq!(parse("conv bang").unwrap(), Command::Convert(None));
        assert!(parse("conv pat 1 x").is_err());
    }

    #[test]
    fn test_permute() {
        assert_eq!(
            parse("permute recall 4").unwrap(),
            Command::Permute(PermuteMessage::Recall(4))
        );
        assert_eq!(
            parse("permute circular -3").unwrap(),
            Command::Permute(PermuteMessage::Circular(-3))
        );
        assert_eq!(
            parse("permute mode reverse").unwrap(),
            Command::Permute(PermuteMessage::Mode(Direction::Anticlockwise))
        );
        assert!(parse("permute recall").is_err());
        assert!(parse("permute shuffle 1").is_err());
    }

    #[test]
    fn test_group() {
        use crate::grouping::GroupToken::{Duration as D, Separator as G};
        assert_eq!(
            parse("group g 1 2 g 3").unwrap(),
            Command::Group(PermuteMessage::Load(vec![G, D(1), D(2), G, D(3)]))
        );
        assert_eq!(
            parse("group anticircular 2").unwrap(),
            Command::Group(PermuteMessage::Anticircular(2))
        );
    }

    #[test]
    fn test_synth() {
        assert_eq!(parse("synth gen 2 3").unwrap(), Command::Synth(SynthMessage::Gen(2, 3)));
        assert_eq!(
            parse("synth gen 2 3 5").unwrap(),
            Command::Synth(SynthMessage::Gen3(2, 3, 5))
        );
        assert_eq!(
            parse("synth compound 4 2").unwrap(),
            Command::Synth(SynthMessage::Compound(4, 2))
        );
        assert!(parse("synth gen 2").is_err());
    }

    #[test]
    fn test_misc() {
        assert_eq!(parse("square pat 1 2").unwrap(), Command::Square(vec![1, 2]));
        assert_eq!(parse("  cube   pat 2 ").unwrap(), Command::Cube(vec![2]));
        assert_eq!(
            parse("autogroup groupby 4").unwrap(),
            Command::AutoGroup(AutoGroupMessage::GroupBy(4))
        );
        assert!(parse("").is_err());
        assert!(parse("player gen 1").is_err());
    }
}
