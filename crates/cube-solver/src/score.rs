//! Local-similarity score used to guide the search.
//!
//! Every facelet counts the cells of its 3x3 neighborhood on the same face
//! (itself included, clipped at the face edge) that share its color. A
//! monochrome face scores 4 per corner, 6 per edge and 9 for the center,
//! 49 in total, so the solved cube scores [`MAX_SCORE`]. A face only reaches
//! 49 when monochrome, and with nine facelets per color that forces distinct
//! face colors, so the maximum doubles as the solved test.
//!
//! The score says nothing about the number of turns left. It is not an
//! admissible estimate and the search built on it is best-first, not A*.

use crate::cube::{Cube, Face};

/// Score of the solved cube.
pub const MAX_SCORE: u32 = 294;

fn face_score(face: &Face) -> u32 {
    let mut score = 0;
    for row in 0..3 {
        for col in 0..3 {
            let color = face[row][col];
            for r in row.saturating_sub(1)..=(row + 1).min(2) {
                for c in col.saturating_sub(1)..=(col + 1).min(2) {
                    if face[r][c] == color {
                        score += 1;
                    }
                }
            }
        }
    }
    score
}

/// Sum of the neighborhood matches over all six faces.
pub fn score(cube: &Cube) -> u32 {
    cube.faces().iter().map(face_score).sum()
}
