//! morpion-nrpa: a Morpion Solitaire engine + NRPA search policy
//!
//! This crate provides:
//! - A [`engine::Game`] type for Morpion Solitaire (5T and 5D variants) that
//!   maintains the set of legal moves incrementally and copies with a flat
//!   memcpy, so rollout searches can clone positions tens of millions of
//!   times.
//! - A Nested Rollout Policy Adaptation search (`nrpa` module): softmax
//!   policy weights, playouts, and the recursive adaptation loop.
//! - A batch experiment driver (`experiment` module) producing the best
//!   sequence, a length histogram and rollout counters.
//!
//! Quick start
//! ```
//! use morpion_nrpa::engine::{Game, Variant};
//!
//! let mut game = Game::new(Variant::T5);
//! assert_eq!(game.legal_moves().len(), 28);
//! let m = game.legal_moves()[0];
//! game.make_move(m);
//! assert!(!game.is_legal(m));
//! ```
//!
//! A single weighted playout
//! ```
//! use morpion_nrpa::engine::Sequence;
//! use morpion_nrpa::nrpa::{Nrpa, Weights};
//!
//! let mut search = Nrpa::new();
//! let mut seq = Sequence::new();
//! search.playout(&Weights::default(), &mut seq);
//! assert!(seq.len() > 0);
//! ```
//!
//! A full batch run
//! ```
//! use morpion_nrpa::experiment::{self, ExperimentParams};
//!
//! let report = experiment::run(&ExperimentParams {
//!     batch_size: 2,
//!     levels: 0,
//!     ..Default::default()
//! })?;
//! assert_eq!(report.sequences, 2);
//! assert_eq!(report.histogram.iter().sum::<u64>(), 2);
//! # Ok::<(), morpion_nrpa::nrpa::PolicyError>(())
//! ```
pub mod engine;
pub mod experiment;
pub mod nrpa;
