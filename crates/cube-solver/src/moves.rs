//! Quarter-turn move engine.
//!
//! A move is an index in `0..12`: `0..6` turns face `m` clockwise (as seen
//! from outside that face), `6..12` turns face `m - 6` counter-clockwise.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cube::{Cube, Face, BACK, DOWN, FACES, FRONT, LEFT, RIGHT, UP};
use crate::error::CubeError;

/// Number of distinct quarter turns.
pub const MOVE_COUNT: usize = 12;

/// Face letters in face-index order.
const LABELS: [&str; FACES] = ["F", "R", "L", "U", "D", "B"];

/// One quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Move(u8);

impl Move {
    /// All moves in expansion order.
    pub const ALL: [Move; MOVE_COUNT] = [
        Move(0),
        Move(1),
        Move(2),
        Move(3),
        Move(4),
        Move(5),
        Move(6),
        Move(7),
        Move(8),
        Move(9),
        Move(10),
        Move(11),
    ];

    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < MOVE_COUNT).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Face turned by this move.
    pub fn face(self) -> usize {
        self.0 as usize % FACES
    }

    pub fn is_clockwise(self) -> bool {
        (self.0 as usize) < FACES
    }

    /// The move that undoes this one.
    pub fn inverse(self) -> Self {
        Self((self.0 + FACES as u8) % MOVE_COUNT as u8)
    }

    /// Human readable label, `F` for a clockwise front turn, `F'` for its inverse.
    pub fn label(self) -> String {
        let face = LABELS[self.face()];
        if self.is_clockwise() {
            face.to_string()
        } else {
            format!("{face}'")
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Move {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (letter, prime) = match trimmed.strip_suffix('\'') {
            Some(letter) => (letter, true),
            None => (trimmed, false),
        };
        let face = LABELS
            .iter()
            .position(|&label| label.eq_ignore_ascii_case(letter))
            .ok_or_else(|| CubeError::UnknownMove(s.to_string()))?;
        let offset = if prime { FACES } else { 0 };
        Ok(Self((face + offset) as u8))
    }
}

impl TryFrom<String> for Move {
    type Error = CubeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Move> for String {
    fn from(m: Move) -> Self {
        m.label()
    }
}

/// Parse a whitespace separated move list such as `"F R' U"`.
pub fn parse_sequence(text: &str) -> Result<Vec<Move>, CubeError> {
    text.split_whitespace().map(str::parse).collect()
}

/// A facelet position: `(face, row, col)`.
type Sticker = (usize, usize, usize);

/// Three stickers along one edge of a turning face.
type Strip = [Sticker; 3];

/// For each face, the four neighbor strips touching it, in clockwise order
/// around that face as seen from outside. Each strip also runs clockwise, so
/// a clockwise turn copies strip `k` onto strip `k + 1` element by element.
const NEIGHBOR_STRIPS: [[Strip; 4]; FACES] = [
    // FRONT: up bottom row, right left column, down top row, left right column
    [
        [(UP, 2, 0), (UP, 2, 1), (UP, 2, 2)],
        [(RIGHT, 0, 0), (RIGHT, 1, 0), (RIGHT, 2, 0)],
        [(DOWN, 0, 2), (DOWN, 0, 1), (DOWN, 0, 0)],
        [(LEFT, 2, 2), (LEFT, 1, 2), (LEFT, 0, 2)],
    ],
    // RIGHT
    [
        [(UP, 2, 2), (UP, 1, 2), (UP, 0, 2)],
        [(BACK, 0, 0), (BACK, 1, 0), (BACK, 2, 0)],
        [(DOWN, 2, 2), (DOWN, 1, 2), (DOWN, 0, 2)],
        [(FRONT, 2, 2), (FRONT, 1, 2), (FRONT, 0, 2)],
    ],
    // LEFT
    [
        [(UP, 0, 0), (UP, 1, 0), (UP, 2, 0)],
        [(FRONT, 0, 0), (FRONT, 1, 0), (FRONT, 2, 0)],
        [(DOWN, 0, 0), (DOWN, 1, 0), (DOWN, 2, 0)],
        [(BACK, 2, 2), (BACK, 1, 2), (BACK, 0, 2)],
    ],
    // UP
    [
        [(BACK, 0, 2), (BACK, 0, 1), (BACK, 0, 0)],
        [(RIGHT, 0, 2), (RIGHT, 0, 1), (RIGHT, 0, 0)],
        [(FRONT, 0, 2), (FRONT, 0, 1), (FRONT, 0, 0)],
        [(LEFT, 0, 2), (LEFT, 0, 1), (LEFT, 0, 0)],
    ],
    // DOWN
    [
        [(FRONT, 2, 0), (FRONT, 2, 1), (FRONT, 2, 2)],
        [(RIGHT, 2, 0), (RIGHT, 2, 1), (RIGHT, 2, 2)],
        [(BACK, 2, 0), (BACK, 2, 1), (BACK, 2, 2)],
        [(LEFT, 2, 0), (LEFT, 2, 1), (LEFT, 2, 2)],
    ],
    // BACK
    [
        [(UP, 0, 2), (UP, 0, 1), (UP, 0, 0)],
        [(LEFT, 0, 0), (LEFT, 1, 0), (LEFT, 2, 0)],
        [(DOWN, 2, 0), (DOWN, 2, 1), (DOWN, 2, 2)],
        [(RIGHT, 2, 2), (RIGHT, 1, 2), (RIGHT, 0, 2)],
    ],
];

/// Rotate a face a quarter turn clockwise.
pub fn rotate_cw(face: &Face) -> Face {
    let mut out = *face;
    for row in 0..3 {
        for col in 0..3 {
            out[row][col] = face[2 - col][row];
        }
    }
    out
}

/// Rotate a face a quarter turn counter-clockwise.
pub fn rotate_ccw(face: &Face) -> Face {
    let mut out = *face;
    for row in 0..3 {
        for col in 0..3 {
            out[row][col] = face[col][2 - row];
        }
    }
    out
}

/// Apply one move, returning the new state. The input is left untouched.
pub fn apply(cube: &Cube, m: Move) -> Cube {
    let mut next = *cube;
    let face = m.face();

    *next.face_mut(face) = if m.is_clockwise() {
        rotate_cw(cube.face(face))
    } else {
        rotate_ccw(cube.face(face))
    };

    let strips = &NEIGHBOR_STRIPS[face];
    // clockwise: strip k lands on strip k+1, counter-clockwise: on strip k-1
    let shift = if m.is_clockwise() { 1 } else { 3 };
    for (k, source) in strips.iter().enumerate() {
        let target = &strips[(k + shift) % 4];
        for (&(sf, sr, sc), &(tf, tr, tc)) in source.iter().zip(target) {
            next.set(tf, tr, tc, cube.get(sf, sr, sc));
        }
    }
    next
}

/// Apply moves in order.
pub fn apply_sequence<'a>(cube: &Cube, moves: impl IntoIterator<Item = &'a Move>) -> Cube {
    moves.into_iter().fold(*cube, |state, &m| apply(&state, m))
}
