//! Sheet state and logic.

mod graph;
mod ops;
mod print;
mod state;

pub use state::{CellView, Sheet};
