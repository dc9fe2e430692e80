//! Error types surfaced by the cube model and the solver.

use thiserror::Error;

use crate::cube::COLORS;

/// Problems with a cube description supplied by a caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("Cube string must be exactly 54 characters long, got {0}")]
    WrongLength(usize),
    #[error("Invalid facelet {found:?} at position {position}, expected a digit 0-5")]
    InvalidFacelet { position: usize, found: char },
    #[error("Invalid cube, every color must appear exactly 9 times (counts: {counts:?})")]
    InvalidConfiguration { counts: [usize; COLORS] },
    #[error("Unknown move {0:?}, expected one of F R L U D B with an optional '")]
    UnknownMove(String),
}

impl CubeError {
    /// True for the malformed-string family of errors.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            CubeError::WrongLength(_) | CubeError::InvalidFacelet { .. }
        )
    }
}

/// Reasons a search can end without a solution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    Cube(#[from] CubeError),
    #[error("Search exhausted after expanding {nodes_expanded} states without reaching the solved score")]
    SearchExhausted { nodes_expanded: usize },
    #[error("Search budget exceeded after expanding {nodes_expanded} states ({reason})")]
    BudgetExceeded {
        nodes_expanded: usize,
        reason: &'static str,
    },
    #[error("State {0} is missing from the search index while rebuilding the move path")]
    BrokenPath(String),
}
