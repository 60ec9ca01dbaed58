use serde::{Deserialize, Serialize};

use crate::card::{CardValue, HIDDEN_SENTINEL};
use crate::error::InvalidAction;

/// A player's grid of cards with a parallel face-up mask, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDeck {
    rows: usize,
    cols: usize,
    values: Vec<CardValue>,
    mask: Vec<bool>,
}

impl PlayerDeck {
    /// Lays `values` out row-major and turns the first `initial_visible` cells face up.
    pub fn new(rows: usize, cols: usize, values: &[CardValue], initial_visible: usize) -> Self {
        debug_assert_eq!(values.len(), rows * cols);
        let mask = (0..rows * cols).map(|idx| idx < initial_visible).collect();
        Self {
            rows,
            cols,
            values: values.to_vec(),
            mask,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, InvalidAction> {
        if row >= self.rows || col >= self.cols {
            return Err(InvalidAction::CellOutOfRange { row, col });
        }
        Ok(row * self.cols + col)
    }

    pub fn get_value(&self, row: usize, col: usize) -> Result<CardValue, InvalidAction> {
        Ok(self.values[self.index(row, col)?])
    }

    pub fn is_visible(&self, row: usize, col: usize) -> Result<bool, InvalidAction> {
        Ok(self.mask[self.index(row, col)?])
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: CardValue) -> Result<(), InvalidAction> {
        let idx = self.index(row, col)?;
        self.values[idx] = value;
        Ok(())
    }

    /// Turns a cell face up. Cells never turn back face down.
    pub fn reveal(&mut self, row: usize, col: usize) -> Result<(), InvalidAction> {
        let idx = self.index(row, col)?;
        self.mask[idx] = true;
        Ok(())
    }

    pub fn is_fully_visible(&self) -> bool {
        self.mask.iter().all(|&visible| visible)
    }

    pub fn hidden_count(&self) -> usize {
        self.mask.iter().filter(|&&visible| !visible).count()
    }

    /// Visible cards at face value, hidden cards at `hidden_value` each.
    pub fn expected_sum(&self, hidden_value: f64) -> f64 {
        self.values
            .iter()
            .zip(&self.mask)
            .map(|(&value, &visible)| if visible { value as f64 } else { hidden_value })
            .sum()
    }

    /// Sum of every card at its true value, face down or not.
    pub fn face_total(&self) -> i32 {
        self.values.iter().map(|&value| value as i32).sum()
    }

    /// Zeroes column `col` when all of its cells are face up and equal.
    /// Returns whether the column was cleared.
    pub fn maybe_clear_column(&mut self, col: usize) -> bool {
        if col >= self.cols {
            return false;
        }
        let cells: Vec<usize> = (0..self.rows).map(|row| row * self.cols + col).collect();
        if !cells.iter().all(|&idx| self.mask[idx]) {
            return false;
        }
        let first = self.values[cells[0]];
        if !cells.iter().all(|&idx| self.values[idx] == first) {
            return false;
        }
        for idx in cells {
            self.values[idx] = 0;
        }
        true
    }

    /// Zeroes row `row` when all of its cells are face up and equal.
    pub fn maybe_clear_row(&mut self, row: usize) -> bool {
        if row >= self.rows {
            return false;
        }
        let cells = row * self.cols..(row + 1) * self.cols;
        if !self.mask[cells.clone()].iter().all(|&visible| visible) {
            return false;
        }
        let first = self.values[cells.start];
        if !self.values[cells.clone()].iter().all(|&value| value == first) {
            return false;
        }
        self.values[cells].fill(0);
        true
    }

    /// Row-major copy of the values as a grid.
    pub fn value_grid(&self) -> Vec<Vec<CardValue>> {
        self.values.chunks(self.cols).map(<[CardValue]>::to_vec).collect()
    }

    /// Values as their owner sees them: face-down cells read [`HIDDEN_SENTINEL`].
    pub fn masked_values(&self) -> Vec<CardValue> {
        self.values
            .iter()
            .zip(&self.mask)
            .map(|(&value, &visible)| if visible { value } else { HIDDEN_SENTINEL })
            .collect()
    }

    pub fn masked_grid(&self) -> Vec<Vec<CardValue>> {
        self.masked_values()
            .chunks(self.cols)
            .map(<[CardValue]>::to_vec)
            .collect()
    }

    pub fn mask_grid(&self) -> Vec<Vec<bool>> {
        self.mask.chunks(self.cols).map(<[bool]>::to_vec).collect()
    }

    pub fn values(&self) -> &[CardValue] {
        &self.values
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_3x4() -> PlayerDeck {
        #[rustfmt::skip]
        let values = [
            5, 1, -2, 7,
            5, 3, 0, 7,
            5, 12, 4, 8,
        ];
        PlayerDeck::new(3, 4, &values, 2)
    }

    #[test]
    fn initial_visible_cells_are_leading_row_major() {
        let deck = deck_3x4();
        assert_eq!(deck.is_visible(0, 0), Ok(true));
        assert_eq!(deck.is_visible(0, 1), Ok(true));
        assert_eq!(deck.is_visible(0, 2), Ok(false));
        assert_eq!(deck.hidden_count(), 10);
    }

    #[test]
    fn access_is_bounds_checked() {
        let mut deck = deck_3x4();
        assert_eq!(
            deck.get_value(3, 0),
            Err(InvalidAction::CellOutOfRange { row: 3, col: 0 })
        );
        assert!(deck.reveal(0, 4).is_err());
        assert!(deck.set_value(2, 3, 1).is_ok());
    }

    #[test]
    fn expected_sum_uses_hidden_estimate() {
        let deck = deck_3x4();
        assert!((deck.expected_sum(5.0) - (5.0 + 1.0 + 10.0 * 5.0)).abs() < 1e-9);
    }

    #[test]
    fn masked_views_hide_face_down_values() {
        let mut deck = deck_3x4();
        assert_eq!(deck.masked_grid()[0], vec![5, 1, HIDDEN_SENTINEL, HIDDEN_SENTINEL]);
        assert!(deck.masked_grid()[1..].iter().flatten().all(|&v| v == HIDDEN_SENTINEL));
        deck.reveal(2, 1).unwrap();
        assert_eq!(deck.masked_values()[9], 12);
        assert_eq!(deck.values()[2], -2);
    }

    #[test]
    fn column_clears_only_when_visible_and_equal() {
        let mut deck = deck_3x4();
        assert!(!deck.maybe_clear_column(0));
        deck.reveal(1, 0).unwrap();
        deck.reveal(2, 0).unwrap();
        assert!(deck.maybe_clear_column(0));
        assert_eq!(deck.value_grid().iter().map(|row| row[0]).collect::<Vec<_>>(), vec![0, 0, 0]);
        assert!(deck.is_visible(2, 0).unwrap());

        let snapshot = deck.clone();
        deck.maybe_clear_column(0);
        assert_eq!(deck, snapshot);

        for row in 0..3 {
            deck.reveal(row, 3).unwrap();
        }
        assert!(!deck.maybe_clear_column(3));
    }
}
