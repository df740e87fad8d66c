//! # Schillinger - Rhythm Pattern Algebra
//!
//! Rhythmic transformations from Joseph Schillinger's system of musical
//! composition, working on integer rhythms.
//!
//! ## Core Features
//!
//! - **Codec**: duration lists (`3 1 2`) to onset vectors (`1 0 0 1 1 0`) and back
//! - **Permutation**: every distinct ordering of a multiset, with indexed recall
//! - **Rotation**: circular and anti-circular permutation of a pattern
//! - **Grouping**: split a rhythm into groups and permute whole groups
//! - **Interference**: resultants of two or three generators, grouped and
//!   compound resultants, and the square and cube of a pattern
//!
//! ## Quick Start
//!
//! ```rust
//! use schillinger::codec;
//! use schillinger::config::PermutationSettings;
//! use schillinger::permutation::PermutationEngine;
//! use schillinger::interference;
//!
//! assert_eq!(codec::to_onsets(&[3, 1, 2]).unwrap(), vec![1, 0, 0, 1, 1, 0]);
//!
//! let engine = PermutationEngine::build(&[1, 1, 2], &PermutationSettings::default()).unwrap();
//! assert_eq!(engine.count(), 3);
//! assert_eq!(engine.recall(3).permutation, vec![2, 1, 1]);
//!
//! let res = interference::resultant(2, 3).unwrap();
//! assert_eq!(res.r, vec![1, 0, 1, 1, 1, 0]);
//! ```
//!
//! ### Sessions
//!
//! A [`session::Session`] holds one of every slot and accepts text commands:
//!
//! ```rust
//! use schillinger::session::Session;
//!
//! let mut session = Session::default();
//! session.run_line("permute pat 1 2 3").unwrap();
//! let reply = session.run_line("permute recall 2").unwrap();
//! assert!(reply.to_string().starts_with("permutation 2 of 6: 1 3 2"));
//! ```

pub mod codec;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod grouping;
pub mod interference;
pub mod multiset;
pub mod permutation;
pub mod session;

pub use codec::{DurationList, OnsetVector, PatternConverter};
pub use config::EngineConfig;
pub use error::{PatternError, PatternResult};
pub use grouping::{AutoGrouper, GroupToken};
pub use interference::InterferenceSynthesizer;
pub use multiset::{GroupSymbol, Multiset};
pub use permutation::{Direction, PermutationEngine, Permuter, Recall};
pub use session::{Reply, Session};
