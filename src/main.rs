//! Schillinger CLI - rhythm pattern algebra from the command line

use clap::{Parser, Subcommand};
use schillinger::command::{AutoGroupMessage, Command, PatternInput, PermuteMessage, SynthMessage};
use schillinger::config::EngineConfig;
use schillinger::grouping;
use schillinger::permutation::Direction;
use schillinger::session::{Reply, Session};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "schillinger")]
#[command(about = "Schillinger rhythm pattern algebra", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/schillinger/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print replies as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a duration list to an onset vector
    Pat {
        #[arg(required = true, allow_negative_numbers = true)]
        durations: Vec<i64>,
    },

    /// Convert an onset vector to a duration list
    Patbin {
        #[arg(required = true)]
        onsets: Vec<u8>,
    },

    /// Distinct permutations of a pattern
    Permute {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,

        /// Treat the values as an onset vector
        #[arg(long)]
        patbin: bool,

        /// Recall this permutation (1-based, clamped)
        #[arg(short, long, allow_negative_numbers = true)]
        recall: Option<i64>,

        /// Rotate the selected permutation
        #[arg(long, allow_negative_numbers = true)]
        circular: Option<i64>,

        /// Reflect about the first element, then rotate
        #[arg(long, allow_negative_numbers = true)]
        anticircular: Option<i64>,

        /// Rotation direction (clockwise, anticlockwise)
        #[arg(short, long)]
        direction: Option<Direction>,
    },

    /// Permute whole groups, written `g 1 2 g 3`
    Group {
        #[arg(required = true, allow_negative_numbers = true)]
        tokens: Vec<String>,

        /// Recall this permutation (1-based, clamped)
        #[arg(short, long, allow_negative_numbers = true)]
        recall: Option<i64>,

        /// Rotate the selected permutation
        #[arg(long, allow_negative_numbers = true)]
        circular: Option<i64>,

        /// Reflect about the first group, then rotate
        #[arg(long, allow_negative_numbers = true)]
        anticircular: Option<i64>,

        /// Rotation direction (clockwise, anticlockwise)
        #[arg(short, long)]
        direction: Option<Direction>,
    },

    /// List the moduli a pattern can be grouped by, or group it
    Autogroup {
        #[arg(required = true)]
        durations: Vec<i64>,

        /// Group by this modulus
        #[arg(short, long)]
        by: Option<i64>,
    },

    /// Resultant of two or three generators
    Gen {
        #[arg(required = true, num_args = 2..=3, allow_negative_numbers = true)]
        generators: Vec<i64>,
    },

    /// Grouped resultant (a clamped to 1..=max_generator, b to 1..=a)
    Grouped {
        #[arg(allow_negative_numbers = true)]
        a: i64,
        #[arg(allow_negative_numbers = true)]
        b: i64,
    },

    /// Compound resultant (a clamped to 1..=max_generator, b to 1..=a)
    Compound {
        #[arg(allow_negative_numbers = true)]
        a: i64,
        #[arg(allow_negative_numbers = true)]
        b: i64,
    },

    /// Square of a duration pattern
    Square {
        #[arg(required = true)]
        durations: Vec<i64>,
    },

    /// Cube of a duration pattern
    Cube {
        #[arg(required = true)]
        durations: Vec<i64>,
    },

    /// Read commands from stdin, one per line
    Repl,

    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },
}

fn emit(reply: &Reply, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(reply)?);
    } else {
        print!("{}", reply);
    }
    Ok(())
}

/// Execute a build command followed by its selection and rotation messages
fn run_permute<T>(
    session: &mut Session,
    wrap: fn(PermuteMessage<T>) -> Command,
    load: T,
    direction: Option<Direction>,
    recall: Option<i64>,
    circular: Option<i64>,
    anticircular: Option<i64>,
) -> Result<Vec<Reply>, Box<dyn std::error::Error>> {
    let mut messages = Vec::new();
    if let Some(direction) = direction {
        messages.push(PermuteMessage::Mode(direction));
    }
    messages.push(PermuteMessage::Load(load));
    messages.extend(recall.map(PermuteMessage::Recall));
    messages.extend(circular.map(PermuteMessage::Circular));
    messages.extend(anticircular.map(PermuteMessage::Anticircular));

    let mut replies = Vec::new();
    for message in messages {
        let reply = session.execute(wrap(message))?;
        // mode changes are settings, not output
        if !matches!(reply, Reply::Direction { .. }) {
            replies.push(reply);
        }
    }
    Ok(replies)
}

fn repl(session: &mut Session, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match session.run_line(trimmed) {
            Ok(reply) => emit(&reply, json)?,
            Err(e) => eprintln!("error: {}", e),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs to stderr, replies to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_default()?,
    };
    let json = cli.json || config.output.json;
    let mut session = Session::new(config);

    let replies = match cli.command {
        Commands::Pat { durations } => {
            vec![session.execute(Command::Convert(Some(PatternInput::Pat(durations))))?]
        }
        Commands::Patbin { onsets } => {
            vec![session.execute(Command::Convert(Some(PatternInput::Patbin(onsets))))?]
        }
        Commands::Permute {
            values,
            patbin,
            recall,
            circular,
            anticircular,
            direction,
        } => {
            let input = if patbin {
                let onsets = values
                    .iter()
                    .map(|&v| u8::try_from(v))
                    .collect::<Result<Vec<u8>, _>>()?;
                PatternInput::Patbin(onsets)
            } else {
                PatternInput::Pat(values)
            };
            run_permute(
                &mut session,
                Command::Permute,
                input,
                direction,
                recall,
                circular,
                anticircular,
            )?
        }
        Commands::Group {
            tokens,
            recall,
            circular,
            anticircular,
            direction,
        } => {
            let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
            let tokens = grouping::parse_tokens(&words)?;
            run_permute(
                &mut session,
                Command::Group,
                tokens,
                direction,
                recall,
                circular,
                anticircular,
            )?
        }
        Commands::Autogroup { durations, by } => {
            let mut replies = vec![session.execute(Command::AutoGroup(AutoGroupMessage::Load(
                PatternInput::Pat(durations),
            )))?];
            if let Some(modulus) = by {
                replies.push(session.execute(Command::AutoGroup(AutoGroupMessage::GroupBy(modulus)))?);
            }
            replies
        }
        Commands::Gen { generators } => {
            let message = match generators.as_slice() {
                [a, b] => SynthMessage::Gen(*a, *b),
                [a, b, c] => SynthMessage::Gen3(*a, *b, *c),
                _ => return Err("gen takes two or three generators".into()),
            };
            vec![session.execute(Command::Synth(message))?]
        }
        Commands::Grouped { a, b } => {
            vec![session.execute(Command::Synth(SynthMessage::Grouped(a, b)))?]
        }
        Commands::Compound { a, b } => {
            vec![session.execute(Command::Synth(SynthMessage::Compound(a, b)))?]
        }
        Commands::Square { durations } => vec![session.execute(Command::Square(durations))?],
        Commands::Cube { durations } => vec![session.execute(Command::Cube(durations))?],
        Commands::Repl => {
            repl(&mut session, json)?;
            Vec::new()
        }
        Commands::Config { write } => {
            print!("{}", session.config().to_toml()?);
            if write {
                let path = cli
                    .config
                    .clone()
                    .or_else(EngineConfig::default_path)
                    .ok_or("no config directory on this platform")?;
                session.config().save(&path)?;
                eprintln!("Wrote {}", path.display());
            }
            Vec::new()
        }
    };

    for reply in &replies {
        emit(reply, json)?;
    }
    Ok(())
}
