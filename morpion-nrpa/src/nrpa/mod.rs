//! Nested Rollout Policy Adaptation (Rosin, 2011) for Morpion Solitaire.
//!
//! This module provides:
//! - [`Weights`]: a dense table of policy logits, one per move slot, with
//!   softmax sampling and gradient-style adaptation toward a sequence.
//! - [`Nrpa`]: the recursive search. At every level it keeps a local weight
//!   copy, runs the level below, and adapts the copy toward the best sequence
//!   this invocation has seen.
//!
//! The search is single-threaded and fully deterministic for a given seed.
//!
//! Quick start
//! ```
//! use morpion_nrpa::engine::{Sequence, Variant};
//! use morpion_nrpa::nrpa::{Nrpa, NrpaConfig, Weights};
//!
//! let mut search = Nrpa::with_config(NrpaConfig {
//!     variant: Variant::T5,
//!     iterations: 5,
//!     alpha: 1.0,
//!     seed: 42,
//! });
//! let mut best = Sequence::new();
//! search.search(1, &Weights::default(), &mut best)?;
//! assert!(best.len() > 0);
//! assert_eq!(search.stats().sequences, 5);
//! # Ok::<(), morpion_nrpa::nrpa::PolicyError>(())
//! ```

use crate::engine::Variant;

mod search;
mod weights;

pub use search::Nrpa;
pub use weights::{PolicyError, Weights};
pub use weights::{ADAPT_SHIFT_CAP, DECAY_FLOOR, PARTITION_LIMIT, SAMPLE_SHIFT_CAP};

/// Knobs for one searcher. Defaults match the reference experiments.
///
/// - `variant`: game variant searched.
/// - `iterations`: rollouts (or recursive calls) per level; must be >= 1.
/// - `alpha`: adaptation step size; must be > 0.
/// - `seed`: RNG seed; one generator is drawn from it per searcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NrpaConfig {
    pub variant: Variant,
    pub iterations: u32,
    pub alpha: f32,
    pub seed: u64,
}

impl Default for NrpaConfig {
    fn default() -> Self {
        Self {
            variant: Variant::T5,
            iterations: 100,
            alpha: 1.0,
            seed: 1,
        }
    }
}

/// Rollout counters accumulated by a searcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Total moves played across all playouts.
    pub moves: u64,
    /// Number of playouts run to termination.
    pub sequences: u64,
}
