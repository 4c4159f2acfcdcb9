//! PyO3 Python bindings for morpion-nrpa
//!
//! The Rust core is driven from Python hosts that schedule batches, keep
//! octagon presets and persist results; this crate exposes that boundary:
//! the batch `run(...)` entry point with its report, and a `Game` class for
//! replaying, inspecting and clipping positions. Moves cross the boundary as
//! dense integer ids `pos * 4 + dir`.

use pyo3::prelude::*;

mod experiment;
mod game;

pub use experiment::{run, PySearchReport};
pub use game::PyGame;

/// Initialize the morpion_nrpa Python module
#[pymodule]
fn morpion_nrpa(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<game::PyGame>()?;
    m.add_class::<experiment::PySearchReport>()?;
    m.add_function(wrap_pyfunction!(experiment::run, m)?)?;
    Ok(())
}
