//! PyO3 bindings for the batch experiment driver

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use morpion_nrpa::engine::{Game, Move, Variant};
use morpion_nrpa::experiment::{self, ExperimentParams, ExperimentReport};

use crate::game::PyGame;

/// Results of one batch run
#[pyclass(name = "SearchReport")]
#[derive(Clone)]
pub struct PySearchReport {
    inner: ExperimentReport,
}

#[pymethods]
impl PySearchReport {
    /// Longest sequence found, as move ids `pos * 4 + dir`
    #[getter]
    fn best_sequence(&self) -> Vec<i32> {
        self.inner.best_sequence.clone()
    }

    #[getter]
    fn best_length(&self) -> usize {
        self.inner.best_length()
    }

    /// Count of batch entries by sequence length (200 buckets)
    #[getter]
    fn histogram(&self) -> Vec<u64> {
        self.inner.histogram.clone()
    }

    /// Total moves played across all playouts
    #[getter]
    fn moves(&self) -> u64 {
        self.inner.moves
    }

    /// Total playouts run
    #[getter]
    fn sequences(&self) -> u64 {
        self.inner.sequences
    }

    /// Wall-clock microseconds spent in the run
    #[getter]
    fn time_us(&self) -> u64 {
        self.inner.time_us
    }

    /// Replay the best sequence onto a fresh board of the given variant
    fn final_position(&self, variant: &str) -> PyResult<PyGame> {
        let variant = Variant::from_name(variant)
            .ok_or_else(|| PyValueError::new_err(format!("unknown variant {variant:?}")))?;
        let mut game = Game::new(variant);
        for &id in &self.inner.best_sequence {
            let m = Move::from_id(id)
                .ok_or_else(|| PyValueError::new_err(format!("move id {id} out of range")))?;
            if !game.is_legal(m) {
                return Err(PyValueError::new_err(format!(
                    "move {m} is illegal during replay (wrong variant?)"
                )));
            }
            game.make_move(m);
        }
        Ok(game.into())
    }

    fn __repr__(&self) -> String {
        format!(
            "SearchReport(best_length={}, sequences={}, moves={}, time_us={})",
            self.inner.best_length(),
            self.inner.sequences,
            self.inner.moves,
            self.inner.time_us
        )
    }
}

/// Run a batch of NRPA searches and return the report.
///
/// `weights` is an optional list of `4 * 40 * 40` initial policy logits;
/// omit it for an all-zero table. With `levels=0` each batch entry is a
/// single weighted playout.
#[pyfunction]
#[pyo3(signature = (
    batch_size = 1,
    random_seed = 1,
    levels = 1,
    iterations = 100,
    alpha = 1.0,
    variant = "T5",
    weights = None,
))]
#[allow(clippy::too_many_arguments)]
pub fn run(
    batch_size: u32,
    random_seed: u64,
    levels: u32,
    iterations: u32,
    alpha: f32,
    variant: &str,
    weights: Option<Vec<f32>>,
) -> PyResult<PySearchReport> {
    let variant = Variant::from_name(variant)
        .ok_or_else(|| PyValueError::new_err(format!("unknown variant {variant:?}")))?;
    let params = ExperimentParams {
        batch_size,
        random_seed,
        levels,
        iterations,
        alpha,
        variant,
        weights: weights.unwrap_or_default(),
    };
    experiment::run(&params)
        .map(|inner| PySearchReport { inner })
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}
