use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{Game, Sequence};

use super::{NrpaConfig, PolicyError, SearchStats, Weights};

/// Nested Rollout Policy Adaptation searcher.
///
/// Holds the start position, the RNG and the rollout counters; one instance
/// drives a whole batch. Construction is cheap next to any real search.
pub struct Nrpa {
    start: Game,
    iterations: u32,
    alpha: f32,
    rng: StdRng,
    stats: SearchStats,
}

impl Nrpa {
    pub fn new() -> Self {
        Self::with_config(NrpaConfig::default())
    }

    pub fn with_config(cfg: NrpaConfig) -> Self {
        Nrpa {
            start: Game::new(cfg.variant),
            iterations: cfg.iterations,
            alpha: cfg.alpha,
            rng: StdRng::seed_from_u64(cfg.seed),
            stats: SearchStats::default(),
        }
    }

    /// The position every rollout starts from.
    #[inline]
    pub fn start_position(&self) -> &Game {
        &self.start
    }

    /// Counters accumulated since construction (or the last reset).
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    /// Play one game to exhaustion under `w`, writing the moves to `out`.
    pub fn playout(&mut self, w: &Weights, out: &mut Sequence) {
        out.clear();
        let mut game = self.start.clone();
        while let Some(m) = w.sample(game.legal_moves(), &mut self.rng) {
            out.push(m);
            game.make_move(m);
        }
        self.stats.moves += out.len() as u64;
        self.stats.sequences += 1;
    }

    /// Run a search of the given nesting depth, leaving the best sequence
    /// found in `best`. Level 0 is a single playout.
    ///
    /// `best` is also the adaptation target: at every level the local weight
    /// copy is pulled toward the best sequence seen so far *by that level*,
    /// which is what nests the bias. Ties go to the newer sequence.
    pub fn search(
        &mut self,
        level: u32,
        w: &Weights,
        best: &mut Sequence,
    ) -> Result<(), PolicyError> {
        if level == 0 {
            self.playout(w, best);
            return Ok(());
        }
        self.nested(level, w, best)
    }

    fn nested(
        &mut self,
        level: u32,
        w: &Weights,
        best: &mut Sequence,
    ) -> Result<(), PolicyError> {
        let mut wc = w.clone();
        for _ in 0..self.iterations {
            let mut found = Sequence::new();
            if level == 1 {
                self.playout(&wc, &mut found);
            } else {
                self.nested(level - 1, &wc, &mut found)?;
            }
            if found.len() >= best.len() {
                *best = found;
            }
            wc.adapt(&*best, self.alpha, &self.start)?;
        }
        Ok(())
    }
}

impl Default for Nrpa {
    fn default() -> Self {
        Self::new()
    }
}
