//! Facelet model of the 3x3x3 cube.
//!
//! Faces are stored in the unfolded cross layout
//!
//! ```text
//!         3 (up)
//! 2 (left) 0 (front) 1 (right) 5 (back)
//!         4 (down)
//! ```
//!
//! Each face is a 3x3 grid viewed from outside the cube, row 0 on top and
//! column 0 on the left. The canonical encoding is one digit per facelet in
//! face, row, column order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CubeError;

/// Number of faces (and colors).
pub const FACES: usize = 6;
/// Number of colors, one per face in the solved state.
pub const COLORS: usize = 6;
/// Total facelets on the cube.
pub const FACELETS: usize = FACES * 9;

/// Sticker color, always in `0..6`.
pub type Color = u8;

/// A single 3x3 face, indexed `[row][col]`.
pub type Face = [[Color; 3]; 3];

/// Face indices, named after the physical side they sit on.
pub const FRONT: usize = 0;
pub const RIGHT: usize = 1;
pub const LEFT: usize = 2;
pub const UP: usize = 3;
pub const DOWN: usize = 4;
pub const BACK: usize = 5;

/// A full cube state. Two cubes are the same search state exactly when
/// their encodings are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cube {
    faces: [Face; FACES],
}

impl Cube {
    /// The solved cube: face `i` is entirely color `i`.
    pub fn solved() -> Self {
        let mut faces = [[[0; 3]; 3]; FACES];
        for (color, face) in faces.iter_mut().enumerate() {
            *face = [[color as Color; 3]; 3];
        }
        Self { faces }
    }

    /// Build a cube from raw faces. Colors outside `0..6` are rejected; the
    /// color counts are not checked.
    pub fn from_faces(faces: [Face; FACES]) -> Result<Self, CubeError> {
        let out_of_range = faces
            .iter()
            .flatten()
            .flatten()
            .enumerate()
            .find(|&(_, &color)| color as usize >= COLORS);
        if let Some((position, &color)) = out_of_range {
            return Err(CubeError::InvalidFacelet {
                position,
                found: char::from_digit(u32::from(color), 36).unwrap_or('?'),
            });
        }
        Ok(Self { faces })
    }

    pub fn faces(&self) -> &[Face; FACES] {
        &self.faces
    }

    pub fn face(&self, index: usize) -> &Face {
        &self.faces[index]
    }

    pub(crate) fn face_mut(&mut self, index: usize) -> &mut Face {
        &mut self.faces[index]
    }

    pub fn get(&self, face: usize, row: usize, col: usize) -> Color {
        self.faces[face][row][col]
    }

    pub(crate) fn set(&mut self, face: usize, row: usize, col: usize, color: Color) {
        self.faces[face][row][col] = color;
    }

    /// Iterate over all facelets in encoding order.
    pub fn facelets(&self) -> impl Iterator<Item = Color> + '_ {
        self.faces.iter().flatten().flatten().copied()
    }

    /// Serialize into the 54-character canonical encoding.
    pub fn encode(&self) -> String {
        self.facelets().map(|c| char::from(b'0' + c)).collect()
    }

    /// Parse a canonical encoding. Only the format is checked here, use
    /// [`Cube::is_valid`] or [`Cube::parse_valid`] for the color counts.
    pub fn decode(encoding: &str) -> Result<Self, CubeError> {
        let length = encoding.chars().count();
        if length != FACELETS {
            return Err(CubeError::WrongLength(length));
        }

        let mut faces = [[[0; 3]; 3]; FACES];
        for (position, ch) in encoding.chars().enumerate() {
            let color = match ch {
                '0'..='5' => ch as u8 - b'0',
                _ => {
                    return Err(CubeError::InvalidFacelet {
                        position,
                        found: ch,
                    })
                }
            };
            faces[position / 9][(position % 9) / 3][position % 3] = color;
        }
        Ok(Self { faces })
    }

    /// Decode and reject physically impossible color distributions.
    pub fn parse_valid(encoding: &str) -> Result<Self, CubeError> {
        let cube = Self::decode(encoding)?;
        cube.check_valid()?;
        Ok(cube)
    }

    /// How many facelets of each color the cube holds.
    pub fn color_counts(&self) -> [usize; COLORS] {
        let mut counts = [0; COLORS];
        for color in self.facelets() {
            counts[color as usize] += 1;
        }
        counts
    }

    /// True iff every color occurs exactly 9 times.
    pub fn is_valid(&self) -> bool {
        self.color_counts().iter().all(|&count| count == 9)
    }

    pub fn check_valid(&self) -> Result<(), CubeError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CubeError::InvalidConfiguration {
                counts: self.color_counts(),
            })
        }
    }

    /// Every face is a single color.
    pub fn is_solved(&self) -> bool {
        self.faces
            .iter()
            .all(|face| face.iter().flatten().all(|&c| c == face[1][1]))
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::solved()
    }
}

impl FromStr for Cube {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl TryFrom<String> for Cube {
    type Error = CubeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

impl From<Cube> for String {
    fn from(cube: Cube) -> Self {
        cube.encode()
    }
}

/// Prints the unfolded net, one digit per facelet.
impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_of = |face: usize, row: usize| -> String {
            self.faces[face][row]
                .iter()
                .map(|&c| char::from(b'0' + c))
                .collect()
        };

        for row in 0..3 {
            writeln!(f, "    {}", row_of(UP, row))?;
        }
        for row in 0..3 {
            writeln!(
                f,
                "{} {} {} {}",
                row_of(LEFT, row),
                row_of(FRONT, row),
                row_of(RIGHT, row),
                row_of(BACK, row)
            )?;
        }
        for row in 0..3 {
            writeln!(f, "    {}", row_of(DOWN, row))?;
        }
        Ok(())
    }
}
