use tracing::{debug, warn};

use crate::ai::best_move;
use crate::board::{BOARD_SIZE, Board, NUM_SQUARES};
use crate::error::GameError;
use crate::types::{GameConfig, GameResult, GameState, Mark, Position};

pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, mover: Mark) -> Result<usize, GameError>;
}

/// Plays the minimax-optimal move.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimaxSelector;

impl MoveSelector for MinimaxSelector {
    fn select_move(&self, board: &Board, mover: Mark) -> Result<usize, GameError> {
        best_move(board, mover).map(|mv| mv.index)
    }
}

/// Turn-level state restored when a computer reply fails.
#[derive(Debug, Clone, Copy)]
struct TurnSnapshot {
    board: Board,
    current_player: Mark,
    is_game_active: bool,
    last_move: Option<usize>,
}

/// One game session: the board plus whose turn it is and the AI toggle.
pub struct GameInstance {
    board: Board,
    pub current_player: Mark,
    pub is_game_active: bool,
    pub ai_enabled: bool,
    pub ai_mark: Mark,
    pub last_move: Option<usize>,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    pub fn new(config: GameConfig, selector: Box<dyn MoveSelector>) -> Result<Self, GameError> {
        let mut game = Self {
            board: Board::new(),
            current_player: Mark::X,
            is_game_active: true,
            ai_enabled: config.ai_enabled,
            ai_mark: config.ai_mark,
            last_move: None,
            selector,
        };
        game.reset()?;
        Ok(game)
    }

    pub fn new_with_default_selector(config: GameConfig) -> Result<Self, GameError> {
        Self::new(config, Box::new(MinimaxSelector))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Human move. A rejected move leaves the session untouched.
    pub fn play(&mut self, index: usize) -> Result<GameResult, GameError> {
        if !self.is_game_active {
            return Err(GameError::GameOver);
        }
        if self.is_ai_turn() {
            return Err(GameError::NotHumanTurn);
        }

        let snapshot = self.snapshot();
        if let Err(err) = self.board.apply_move(index, self.current_player) {
            warn!(index, error = %err, "rejected move");
            return Err(err);
        }
        self.finish_turn(index);

        if self.is_ai_turn()
            && let Err(err) = self.perform_ai_move()
        {
            warn!(index, error = %err, "computer reply failed, move rolled back");
            self.restore(snapshot);
            return Err(err);
        }
        Ok(self.result())
    }

    pub fn play_at(&mut self, row: u8, col: u8) -> Result<GameResult, GameError> {
        let index = row_col_to_pos(row, col)?;
        self.play(index)
    }

    pub fn perform_ai_move(&mut self) -> Result<GameResult, GameError> {
        if !self.is_game_active {
            return Err(GameError::GameOver);
        }

        let selected = self.selector.select_move(&self.board, self.current_player)?;
        if selected >= NUM_SQUARES || self.board.is_occupied(selected) {
            return Err(GameError::IllegalSelection { index: selected });
        }

        self.board.apply_move(selected, self.current_player)?;
        debug!(mark = ?self.current_player, index = selected, "computer moved");
        self.finish_turn(selected);
        Ok(self.result())
    }

    /// Empty board, X to move. The computer opens if it plays X.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.board = Board::new();
        self.current_player = Mark::X;
        self.is_game_active = true;
        self.last_move = None;
        debug!(ai_enabled = self.ai_enabled, ai_mark = ?self.ai_mark, "game reset");

        if self.is_ai_turn() {
            self.perform_ai_move()?;
        }
        Ok(())
    }

    pub fn enable_ai(&mut self) -> Result<(), GameError> {
        self.ai_enabled = true;
        self.reset()
    }

    pub fn disable_ai(&mut self) -> Result<(), GameError> {
        self.ai_enabled = false;
        self.reset()
    }

    pub fn result(&self) -> GameResult {
        self.board.evaluate()
    }

    pub fn is_ai_turn(&self) -> bool {
        self.ai_enabled && self.is_game_active && self.current_player == self.ai_mark
    }

    pub fn available_moves(&self) -> Vec<Position> {
        self.board
            .available_moves()
            .into_iter()
            .map(Position::from_index)
            .collect()
    }

    pub fn to_game_state(&self) -> GameState {
        let (x_count, o_count) = self.board.count();
        GameState {
            board: self.board.cells(),
            current_player: self.current_player,
            result: self.result(),
            is_game_active: self.is_game_active,
            ai_enabled: self.ai_enabled,
            ai_mark: self.ai_mark,
            last_move: self.last_move.map(|index| index as u8),
            x_count,
            o_count,
        }
    }

    fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            board: self.board,
            current_player: self.current_player,
            is_game_active: self.is_game_active,
            last_move: self.last_move,
        }
    }

    fn restore(&mut self, snapshot: TurnSnapshot) {
        self.board = snapshot.board;
        self.current_player = snapshot.current_player;
        self.is_game_active = snapshot.is_game_active;
        self.last_move = snapshot.last_move;
    }

    fn finish_turn(&mut self, index: usize) {
        self.last_move = Some(index);

        let result = self.result();
        if result.is_terminal() {
            self.is_game_active = false;
            debug!(?result, winner = ?result.winner(), "game over");
        } else {
            self.current_player = self.current_player.opponent();
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Mark) {
        self.board = board;
        self.current_player = current_player;
        self.is_game_active = !board.evaluate().is_terminal();
        self.last_move = None;
    }
}

fn row_col_to_pos(row: u8, col: u8) -> Result<usize, GameError> {
    if row >= BOARD_SIZE as u8 || col >= BOARD_SIZE as u8 {
        return Err(GameError::IndexOutOfRange {
            index: (row as usize) * BOARD_SIZE + col as usize,
        });
    }
    Ok((row as usize) * BOARD_SIZE + col as usize)
}
