pub mod catalogue;
mod engine;

pub use engine::{Solver, SolverSnapshot};
