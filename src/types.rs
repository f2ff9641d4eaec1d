use serde::{Deserialize, Serialize};

use crate::board::BOARD_SIZE;
use crate::error::GameError;

/// A player identity. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// Numeric snapshot form: 1=X, 2=O.
    pub fn to_u8(self) -> u8 {
        match self {
            Self::X => 1,
            Self::O => 2,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self, GameError> {
        match value {
            1 => Ok(Self::X),
            2 => Ok(Self::O),
            other => Err(GameError::InvalidMark(other)),
        }
    }
}

/// Contents of one board cell, serialized the way the page writes tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cell {
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn from_index(index: usize) -> Self {
        Self {
            row: (index / BOARD_SIZE) as u8,
            col: (index % BOARD_SIZE) as u8,
        }
    }
}

/// Outcome of a board, always recomputed from the cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameResult {
    InProgress,
    XWon,
    OWon,
    Draw,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        self != Self::InProgress
    }

    pub fn winner(self) -> Option<Mark> {
        match self {
            Self::XWon => Some(Mark::X),
            Self::OWon => Some(Mark::O),
            Self::InProgress | Self::Draw => None,
        }
    }
}

/// Session options passed in from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub ai_enabled: bool,
    /// Side the computer plays when `ai_enabled` is set.
    pub ai_mark: Mark,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ai_enabled: false,
            ai_mark: Mark::O,
        }
    }
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Vec<Cell>,
    pub current_player: Mark,
    pub result: GameResult,
    pub is_game_active: bool,
    pub ai_enabled: bool,
    pub ai_mark: Mark,
    /// Index of the most recent move, `None` right after a reset.
    pub last_move: Option<u8>,
    pub x_count: u8,
    pub o_count: u8,
}
