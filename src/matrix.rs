//! Mapping from logical layout positions to physical matrix key indices.
//!
//! The physical key matrix is irregular: some rows overflow into spare slots
//! of other rows, the space bar spans several columns, and a few keys are
//! wired off their reading-order position. Those irregularities are encoded
//! as an explicit correction table rather than inline conditionals, so a
//! different physical board only needs a different table.

use serde::{Deserialize, Serialize};

/// One physical-topology correction, matched against the logical (row, col).
///
/// Corrections are applied first-match-wins, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    /// Move a single logical position to another physical (row, col).
    Remap { from: (usize, usize), to: (usize, usize) },
    /// Shift every column of `row` strictly greater than `after` right by `by`.
    ShiftCols { row: usize, after: usize, by: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixMap {
    pub grid_width: usize,
    pub grid_height: usize,
    pub corrections: Vec<Correction>,
}

impl MatrixMap {
    #[must_use]
    pub fn new(grid_width: usize, grid_height: usize, corrections: Vec<Correction>) -> Self {
        Self {
            grid_width,
            grid_height,
            corrections,
        }
    }

    /// Apply the correction table to a logical position.
    #[must_use]
    pub fn adjust(&self, row: usize, col: usize) -> (usize, usize) {
        for c in &self.corrections {
            match *c {
                Correction::Remap { from, to } if from == (row, col) => return to,
                Correction::ShiftCols { row: r, after, by } if r == row && col > after => {
                    return (row, col + by);
                }
                _ => {}
            }
        }
        (row, col)
    }

    /// 1-based key index for a logical position, after correction.
    #[must_use]
    pub fn key_index(&self, row: usize, col: usize) -> usize {
        let (row, col) = self.adjust(row, col);
        row * self.grid_width + col + 1
    }

    /// Total number of slots in the maximal matrix template.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.grid_width * self.grid_height
    }
}
