use once_cell::sync::Lazy;

use crate::error::GameError;
use crate::types::{Cell, GameResult, Mark};

pub const BOARD_SIZE: usize = 3;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const FULL_MASK: u16 = (1 << NUM_SQUARES) - 1;

/// Winning index triples: rows, then columns, then diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

static WIN_MASKS: Lazy<[u16; 8]> = Lazy::new(|| {
    let mut masks = [0u16; 8];
    for (mask, line) in masks.iter_mut().zip(WIN_LINES) {
        *mask = line.into_iter().fold(0, |acc, index| acc | bit(index));
    }
    masks
});

/// Tic-tac-toe board state represented by two 9-bit boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    x: u16,
    o: u16,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from a numeric snapshot where 0=empty, 1=X, 2=O.
    pub fn from_cells(cells: &[u8]) -> Result<Self, GameError> {
        if cells.len() != NUM_SQUARES {
            return Err(GameError::InvalidBoardLength { got: cells.len() });
        }

        let mut board = Self::new();
        for (index, &value) in cells.iter().enumerate() {
            match value {
                0 => {}
                1 => board.x |= bit(index),
                2 => board.o |= bit(index),
                _ => return Err(GameError::InvalidCell { index, value }),
            }
        }
        Ok(board)
    }

    /// Mark occupying `index`, if any.
    pub fn mark_at(&self, index: usize) -> Option<Mark> {
        let square = bit(index);
        if (self.x & square) != 0 {
            Some(Mark::X)
        } else if (self.o & square) != 0 {
            Some(Mark::O)
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Cell {
        self.mark_at(index).map_or(Cell::Empty, Cell::from)
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        ((self.x | self.o) & bit(index)) != 0
    }

    /// Places `mark` on an empty cell. The board is left untouched on error.
    pub fn apply_move(&mut self, index: usize, mark: Mark) -> Result<(), GameError> {
        if index >= NUM_SQUARES {
            return Err(GameError::IndexOutOfRange { index });
        }
        if self.is_occupied(index) {
            return Err(GameError::CellOccupied { index });
        }

        match mark {
            Mark::X => self.x |= bit(index),
            Mark::O => self.o |= bit(index),
        }
        Ok(())
    }

    /// Clears a cell. Only search backtracking should need this.
    pub fn undo_move(&mut self, index: usize) {
        let square = bit(index);
        self.x &= !square;
        self.o &= !square;
    }

    /// Checks the win lines in their fixed order, then fullness.
    pub fn evaluate(&self) -> GameResult {
        for &mask in WIN_MASKS.iter() {
            if (self.x & mask) == mask {
                return GameResult::XWon;
            }
            if (self.o & mask) == mask {
                return GameResult::OWon;
            }
        }

        if self.empty_mask() == 0 {
            GameResult::Draw
        } else {
            GameResult::InProgress
        }
    }

    /// Empty indices in ascending order.
    pub fn available_moves(&self) -> Vec<usize> {
        bitmask_to_indices(self.empty_mask())
    }

    /// Bit `i` is set when cell `i` is empty.
    pub fn empty_mask(&self) -> u16 {
        FULL_MASK & !(self.x | self.o)
    }

    /// Returns `(x_count, o_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.x.count_ones() as u8, self.o.count_ones() as u8)
    }

    pub fn empty_count(&self) -> u8 {
        self.empty_mask().count_ones() as u8
    }

    /// Converts board to `[u8; 9]` where 0=empty, 1=X, 2=O.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut cells = [0u8; NUM_SQUARES];
        for (index, cell) in cells.iter_mut().enumerate() {
            *cell = self.mark_at(index).map_or(0, Mark::to_u8);
        }
        cells
    }

    pub fn cells(&self) -> Vec<Cell> {
        (0..NUM_SQUARES).map(|index| self.get(index)).collect()
    }
}

fn bit(index: usize) -> u16 {
    if index < NUM_SQUARES { 1u16 << index } else { 0 }
}

fn bitmask_to_indices(mask: u16) -> Vec<usize> {
    let mut bits = mask;
    let mut out = Vec::with_capacity(bits.count_ones() as usize);

    while bits != 0 {
        out.push(bits.trailing_zeros() as usize);
        bits &= bits - 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(cells: [u8; 9]) -> Board {
        Board::from_cells(&cells).unwrap()
    }

    #[test]
    fn empty_board_is_in_progress_with_all_moves_available() {
        let board = Board::new();

        assert_eq!(board.evaluate(), GameResult::InProgress);
        assert_eq!(board.available_moves(), (0..9).collect::<Vec<_>>());
        assert_eq!(board.empty_count(), 9);
    }

    #[test]
    fn every_win_line_is_detected_for_both_marks() {
        for line in WIN_LINES {
            let mut x_board = Board::new();
            let mut o_board = Board::new();
            for index in line {
                x_board.apply_move(index, Mark::X).unwrap();
                o_board.apply_move(index, Mark::O).unwrap();
            }
            assert_eq!(x_board.evaluate(), GameResult::XWon, "line {line:?}");
            assert_eq!(o_board.evaluate(), GameResult::OWon, "line {line:?}");
        }
    }

    #[test]
    fn full_board_without_line_is_draw() {
        // X O X / X O O / O X X
        let board = board([1, 2, 1, 1, 2, 2, 2, 1, 1]);

        assert_eq!(board.evaluate(), GameResult::Draw);
        assert!(board.available_moves().is_empty());
    }

    #[test]
    fn win_on_last_cell_beats_draw() {
        // X O X / O X O / O X X
        let board = board([1, 2, 1, 2, 1, 2, 2, 1, 1]);

        assert_eq!(board.empty_count(), 0);
        assert_eq!(board.evaluate(), GameResult::XWon);
    }

    #[test]
    fn occupied_cell_rejects_move_and_keeps_board_unchanged() {
        let mut board = Board::new();
        board.apply_move(4, Mark::X).unwrap();
        let before = board;

        assert_eq!(
            board.apply_move(4, Mark::O),
            Err(GameError::CellOccupied { index: 4 })
        );
        assert_eq!(
            board.apply_move(9, Mark::O),
            Err(GameError::IndexOutOfRange { index: 9 })
        );
        assert_eq!(board, before);
        assert!(board.is_occupied(4));
        assert!(!board.is_occupied(9));
    }

    #[test]
    fn apply_then_undo_restores_board_and_move_count() {
        let mut board = board([1, 0, 0, 0, 2, 0, 0, 0, 0]);
        let before = board;

        for index in before.available_moves() {
            let available = board.available_moves().len();
            board.apply_move(index, Mark::X).unwrap();
            assert_eq!(board.available_moves().len(), available - 1);
            board.undo_move(index);
            assert_eq!(board.available_moves().len(), available);
            assert_eq!(board, before);
        }
    }

    #[test]
    fn snapshot_conversion_validates_input() {
        assert_eq!(
            Board::from_cells(&[0; 8]),
            Err(GameError::InvalidBoardLength { got: 8 })
        );
        assert_eq!(
            Board::from_cells(&[0, 0, 3, 0, 0, 0, 0, 0, 0]),
            Err(GameError::InvalidCell { index: 2, value: 3 })
        );

        let cells = [1, 2, 0, 0, 1, 0, 0, 0, 2];
        let board = board(cells);
        assert_eq!(board.to_array(), cells);
        assert_eq!(board.count(), (2, 2));
        assert_eq!(board.get(1), Cell::O);
        assert_eq!(board.get(2), Cell::Empty);
        assert_eq!(board.mark_at(0), Some(Mark::X));
        assert_eq!(board.mark_at(2), None);
    }
}
