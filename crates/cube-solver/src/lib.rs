//! Heuristic solver for the 3x3x3 facelet cube.
//!
//! This crate models the cube as 54 colored facelets, applies the twelve
//! quarter turns to it, and runs a best-first search guided by a
//! local-similarity score to find a move sequence back to the solved state.
//! Solutions are short in practice but not guaranteed to be optimal.

pub mod cube;
pub mod error;
pub mod frontier;
pub mod index;
pub mod moves;
pub mod score;
pub mod solver;

// Re-export main types
pub use cube::{Color, Cube, Face, COLORS, FACELETS, FACES};
pub use error::{CubeError, SolveError};
pub use index::{NodeId, NodeIndex, SearchNode};
pub use moves::{apply, apply_sequence, parse_sequence, Move, MOVE_COUNT};
pub use score::{score, MAX_SCORE};
pub use solver::{solve, solve_encoding, SearchStats, Solution, SolverConfig, Step, Weighting};
