use rand::Rng;

use crate::engine::{Game, Move, Sequence, MOVE_SLOTS};

/// Cap on `smax - shift` while sampling a move.
pub const SAMPLE_SHIFT_CAP: f32 = 10.0;
/// Cap on `smax - shift` while adapting; tighter than the sampling cap.
pub const ADAPT_SHIFT_CAP: f32 = 5.0;
/// Logits at or below this floor are treated as never reinforced and skip
/// the adaptation decay.
pub const DECAY_FLOOR: f32 = 2e-10;
/// Partition values above this abort the search as numerically divergent.
pub const PARTITION_LIMIT: f32 = 2e10;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// The adaptation partition function blew past [`PARTITION_LIMIT`]: the
    /// weights have diverged and further updates would corrupt the policy.
    #[error(
        "policy diverged: partition {partition:e} (smax {smax}, smin {smin}, shift {shift}) over {} legal moves",
        .logits.len()
    )]
    Diverged {
        partition: f32,
        smax: f32,
        smin: f32,
        shift: f32,
        /// Logits of the legal moves at the offending step.
        logits: Vec<f32>,
    },
    #[error("expected {MOVE_SLOTS} initial logits, got {got}")]
    LogitCount { got: usize },
}

/// Dense table of policy logits, one per move slot.
///
/// The table is interpreted through a softmax: the probability of a legal
/// move is proportional to `exp(logit)`. Logits are stored raw; the dynamic
/// range is tamed at read time by subtracting a shift capped relative to the
/// row maximum, so `exp` never overflows.
#[derive(Clone)]
pub struct Weights {
    w: [f32; MOVE_SLOTS],
}

impl Weights {
    pub fn zeroed() -> Self {
        Weights {
            w: [0.0; MOVE_SLOTS],
        }
    }

    /// Build a table from externally supplied logits (one per move slot).
    pub fn from_logits(logits: &[f32]) -> Result<Self, PolicyError> {
        if logits.len() != MOVE_SLOTS {
            return Err(PolicyError::LogitCount { got: logits.len() });
        }
        let mut w = [0.0; MOVE_SLOTS];
        w.copy_from_slice(logits);
        Ok(Weights { w })
    }

    #[inline]
    pub fn logit(&self, m: Move) -> f32 {
        self.w[m.weight_slot()]
    }

    pub fn as_logits(&self) -> &[f32] {
        &self.w
    }

    #[inline(always)]
    fn slot_value(&self, m: Move) -> f32 {
        let g = m.weight_slot();
        debug_assert!(g < MOVE_SLOTS);
        unsafe { *self.w.get_unchecked(g) }
    }

    fn spread(&self, moves: &[Move]) -> (f32, f32) {
        let mut smax = f32::NEG_INFINITY;
        let mut smin = f32::INFINITY;
        for &m in moves {
            let v = self.slot_value(m);
            smax = smax.max(v);
            smin = smin.min(v);
        }
        (smax, smin)
    }

    /// Draw one of `moves` with probability proportional to `exp(logit)`.
    ///
    /// Returns `None` when `moves` is empty. The logits are shifted by the
    /// midpoint of the row's range, capped at [`SAMPLE_SHIFT_CAP`] below the
    /// maximum, before exponentiating; the maximum's contribution is thereby
    /// preserved no matter how wide the range gets.
    pub fn sample<R: Rng + ?Sized>(&self, moves: &[Move], rng: &mut R) -> Option<Move> {
        let (&last, _) = moves.split_last()?;
        let (smax, smin) = self.spread(moves);
        let mut shift = 0.5 * (smax + smin);
        if smax - shift > SAMPLE_SHIFT_CAP {
            shift = smax - SAMPLE_SHIFT_CAP;
        }
        let total: f32 = moves
            .iter()
            .map(|&m| (self.slot_value(m) - shift).exp())
            .sum();
        let r = rng.gen_range(0.0..f64::from(total)) as f32;
        let mut acc = 0.0f32;
        for &m in moves {
            acc += (self.slot_value(m) - shift).exp();
            if acc >= r {
                return Some(m);
            }
        }
        // Accumulated rounding can leave r above the final acc.
        Some(last)
    }

    /// Pull the policy toward `seq`: gradient ascent on the log-likelihood of
    /// the realized sequence under the softmax policy.
    ///
    /// The sequence is replayed from `start`; at every step the move actually
    /// played gains `alpha` while each legal alternative loses its softmax
    /// share of `alpha`. Gradients are computed against a snapshot of the
    /// table taken on entry, while updates land in `self`.
    pub fn adapt(&mut self, seq: &Sequence, alpha: f32, start: &Game) -> Result<(), PolicyError> {
        let snapshot = self.clone();
        let mut replay = start.clone();
        for &chosen in seq.iter() {
            let legal = replay.legal_moves();
            let (smax, smin) = snapshot.spread(legal);
            let mut shift = 0.5 * (smax + smin);
            if smax - shift > ADAPT_SHIFT_CAP {
                shift = smax - ADAPT_SHIFT_CAP;
            }
            let partition: f32 = legal
                .iter()
                .map(|&m| (snapshot.slot_value(m) - shift).exp())
                .sum();
            if partition > PARTITION_LIMIT {
                return Err(PolicyError::Diverged {
                    partition,
                    smax,
                    smin,
                    shift,
                    logits: legal.iter().map(|&m| snapshot.slot_value(m)).collect(),
                });
            }
            for &m in legal {
                let g = m.weight_slot();
                // Logits still at their initial zero have never been
                // reinforced and are left untouched; only the played-move
                // bonus below can lift a logit past the floor.
                if snapshot.w[g] > DECAY_FLOOR {
                    self.w[g] -= alpha * (snapshot.w[g] - shift).exp() / partition;
                }
            }
            self.w[chosen.weight_slot()] += alpha;
            replay.make_move(chosen);
        }
        Ok(())
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Direction, Variant};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn from_logits_checks_length() {
        assert!(matches!(
            Weights::from_logits(&[0.0; 3]),
            Err(PolicyError::LogitCount { got: 3 })
        ));
        let w = Weights::from_logits(&vec![0.5; MOVE_SLOTS]).unwrap();
        assert_eq!(w.logit(Move::new(0, Direction::Horizontal)), 0.5);
    }

    #[test]
    fn sample_on_empty_and_singleton() {
        let w = Weights::zeroed();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(w.sample(&[], &mut rng), None);
        let only = Move::new(7, Direction::Vertical);
        for _ in 0..10 {
            assert_eq!(w.sample(&[only], &mut rng), Some(only));
        }
    }

    #[test]
    fn sample_matches_softmax() {
        let moves = [
            Move::new(0, Direction::Horizontal),
            Move::new(1, Direction::Horizontal),
            Move::new(2, Direction::Horizontal),
        ];
        let mut w = Weights::zeroed();
        for (i, &m) in moves.iter().enumerate() {
            w.w[m.weight_slot()] = i as f32;
        }
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0u32; 3];
        let draws = 200_000;
        for _ in 0..draws {
            let m = w.sample(&moves, &mut rng).unwrap();
            counts[m.pos as usize] += 1;
        }
        let z: f32 = (0..3).map(|i| (i as f32).exp()).sum();
        for (i, &c) in counts.iter().enumerate() {
            let expected = (i as f32).exp() / z;
            let observed = c as f32 / draws as f32;
            assert!(
                (observed - expected).abs() < 0.02,
                "move {i}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn sample_is_stable_under_dominant_logit() {
        let moves: Vec<Move> = (0..10).map(|p| Move::new(p, Direction::Rising)).collect();
        let mut w = Weights::zeroed();
        w.w[moves[4].weight_slot()] = 50.0;
        let mut rng = StdRng::seed_from_u64(3);
        let hits = (0..10_000)
            .filter(|_| w.sample(&moves, &mut rng) == Some(moves[4]))
            .count();
        assert!(hits >= 9_990, "dominant move drawn only {hits} times");
    }

    fn greedy_prefix(game: &Game, n: usize) -> Sequence {
        let mut game = game.clone();
        let mut seq = Sequence::new();
        for _ in 0..n {
            let m = game.legal_moves()[0];
            seq.push(m);
            game.make_move(m);
        }
        seq
    }

    #[test]
    fn adapt_reinforces_played_moves() {
        let start = Game::new(Variant::T5);
        let seq = greedy_prefix(&start, 3);
        let mut w = Weights::zeroed();
        w.adapt(&seq, 1.0, &start).unwrap();
        // From an all-zero table nothing clears the decay floor, so the only
        // updates are the per-step bonuses.
        for &m in seq.iter() {
            assert_eq!(w.logit(m), 1.0);
        }
        assert_eq!(w.as_logits().iter().sum::<f32>(), 3.0);
    }

    #[test]
    fn adapt_decays_reinforced_alternatives() {
        let start = Game::new(Variant::T5);
        let seq = greedy_prefix(&start, 3);
        let mut w = Weights::zeroed();
        w.adapt(&seq, 1.0, &start).unwrap();
        w.adapt(&seq, 1.0, &start).unwrap();
        // Second pass: each played move's logit is decayed where it shows up
        // as a legal alternative, then reinforced again when it is played.
        for &m in seq.iter() {
            let v = w.logit(m);
            assert!(v > 1.0 && v < 2.0, "logit of {m} is {v}");
        }
        // Unplayed moves never cleared the floor and stay at exactly zero.
        let reinforced: Vec<usize> = seq.iter().map(|m| m.weight_slot()).collect();
        for (slot, &v) in w.as_logits().iter().enumerate() {
            if !reinforced.contains(&slot) {
                assert_eq!(v, 0.0);
            }
        }
    }
}
