use thiserror::Error;

/// Errors raised by the board engine, the search and the game session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell {index} is already occupied")]
    CellOccupied { index: usize },

    #[error("cell index {index} is out of range (expected 0..=8)")]
    IndexOutOfRange { index: usize },

    #[error("game is already over")]
    GameOver,

    #[error("it is not the human player's turn")]
    NotHumanTurn,

    #[error("board snapshot must have 9 cells, got {got}")]
    InvalidBoardLength { got: usize },

    #[error("invalid cell value {value} at index {index} (expected 0, 1 or 2)")]
    InvalidCell { index: usize, value: u8 },

    #[error("invalid mark value {0} (expected 1 for X or 2 for O)")]
    InvalidMark(u8),

    #[error("search requested on a board that is already decided")]
    TerminalBoard,

    #[error("board is undecided but has no available moves")]
    NoAvailableMoves,

    #[error("move selector picked unavailable cell {index}")]
    IllegalSelection { index: usize },
}
