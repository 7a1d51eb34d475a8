//! Wheelwright - reproducible cross-language build orchestration
//!
//! Coordinates a cargo workspace compile, a maturin wheel build, and an
//! offline pip install into one linear pipeline, with a shared
//! content-addressed artifact store so the workspace is built once and
//! reused by every downstream consumer.

pub mod cache;
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod stage;
pub mod toolchain;
pub mod ui;
pub mod workspace;

pub use error::{WheelwrightError, WwResult};
