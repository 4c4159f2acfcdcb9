//! PyO3 bindings for the game engine

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use morpion_nrpa::engine::{position_of, Game, Move, Variant, SIZE};

fn parse_variant(name: &str) -> PyResult<Variant> {
    Variant::from_name(name)
        .ok_or_else(|| PyValueError::new_err(format!("unknown variant {name:?} (use T5 or D5)")))
}

fn parse_move(move_id: i32) -> PyResult<Move> {
    Move::from_id(move_id)
        .ok_or_else(|| PyValueError::new_err(format!("move id {move_id} out of range")))
}

/// A Morpion Solitaire position
#[pyclass(name = "Game")]
#[derive(Clone)]
pub struct PyGame {
    inner: Game,
}

#[pymethods]
impl PyGame {
    /// Create the starting cross for a variant ("T5" or "D5")
    #[new]
    #[pyo3(signature = (variant = "T5"))]
    fn new(variant: &str) -> PyResult<Self> {
        Ok(PyGame {
            inner: Game::new(parse_variant(variant)?),
        })
    }

    /// Currently legal moves, as dense ids `pos * 4 + dir`
    fn legal_moves(&self) -> Vec<i32> {
        self.inner.legal_moves().iter().map(|m| m.id()).collect()
    }

    fn is_legal(&self, move_id: i32) -> bool {
        Move::from_id(move_id).is_some_and(|m| self.inner.is_legal(m))
    }

    /// Play a move; raises ValueError if it is not currently legal
    fn make_move(&mut self, move_id: i32) -> PyResult<()> {
        let m = parse_move(move_id)?;
        if !self.inner.is_legal(m) {
            return Err(PyValueError::new_err(format!("illegal move {m}")));
        }
        self.inner.make_move(m);
        Ok(())
    }

    /// Mirror a move id through the cross's center of symmetry
    #[staticmethod]
    fn symmetric(move_id: i32) -> PyResult<i32> {
        Ok(parse_move(move_id)?.symmetric().id())
    }

    /// Block every move whose line leaves the given octagonal board
    /// (one bound per compass direction N..NW, 0 = unbounded)
    fn clip_board(&mut self, octagon: [i32; 8]) {
        self.inner.clip_board(&octagon);
    }

    /// Block the mirror half of the opening lines
    fn clip_asymmetric(&mut self) {
        self.inner.clip_asymmetric();
    }

    /// Number of dots on the board
    fn dots(&self) -> usize {
        self.inner.dots()
    }

    fn has_dot(&self, x: i32, y: i32) -> bool {
        (0..SIZE).contains(&x) && (0..SIZE).contains(&y) && self.inner.has_dot(position_of(x, y))
    }

    /// An independent copy of this position
    fn copy(&self) -> Self {
        self.clone()
    }

    #[getter]
    fn variant(&self) -> String {
        self.inner.variant().to_string()
    }

    /// Text rendering of the board
    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "Game(variant={}, dots={}, legal_moves={})",
            self.inner.variant(),
            self.inner.dots(),
            self.inner.legal_moves().len()
        )
    }
}

impl From<Game> for PyGame {
    fn from(inner: Game) -> Self {
        PyGame { inner }
    }
}
