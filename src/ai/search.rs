use std::time::Duration;

use tracing::debug;
use web_time::Instant;

use crate::board::Board;
use crate::error::GameError;
use crate::types::{GameResult, Mark};

/// Score when X can force a win.
pub const X_WINS: i8 = -1;
/// Score when O can force a win.
pub const O_WINS: i8 = 1;
pub const DRAW: i8 = 0;

/// A candidate cell and the score it leads to under optimal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub index: usize,
    pub score: i8,
}

/// Result of one search call. `index` is `None` only for terminal boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub index: Option<usize>,
    pub score: i8,
}

impl SearchOutcome {
    fn terminal(score: i8) -> Self {
        Self { index: None, score }
    }
}

impl From<Move> for SearchOutcome {
    fn from(mv: Move) -> Self {
        Self {
            index: Some(mv.index),
            score: mv.score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Full-width minimax over the whole game tree.
///
/// Scores are from a fixed perspective: O maximizes and X minimizes,
/// whichever side is to move at the root.
#[derive(Debug, Default)]
pub struct Searcher {
    nodes: u64,
    stats: SearchStats,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches the best move for `mover`.
    ///
    /// `board` is explored in place and restored before returning.
    /// A terminal board yields its score with no index.
    pub fn search(&mut self, board: &mut Board, mover: Mark) -> Result<SearchOutcome, GameError> {
        let start_time = Instant::now();
        self.nodes = 0;

        let outcome = self.minimax(board, mover)?;

        self.stats = SearchStats {
            nodes: self.nodes,
            elapsed: start_time.elapsed(),
        };
        debug!(
            ?mover,
            index = ?outcome.index,
            score = outcome.score,
            nodes = self.stats.nodes,
            elapsed_us = self.stats.elapsed.as_micros() as u64,
            "minimax search finished"
        );

        Ok(outcome)
    }

    /// Statistics for the most recent completed search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn minimax(&mut self, board: &mut Board, mover: Mark) -> Result<SearchOutcome, GameError> {
        self.nodes += 1;

        match board.evaluate() {
            GameResult::XWon => return Ok(SearchOutcome::terminal(X_WINS)),
            GameResult::OWon => return Ok(SearchOutcome::terminal(O_WINS)),
            GameResult::Draw => return Ok(SearchOutcome::terminal(DRAW)),
            GameResult::InProgress => {}
        }

        let mut best: Option<Move> = None;
        let mut empties = board.empty_mask();

        while empties != 0 {
            let index = empties.trailing_zeros() as usize;
            empties &= empties - 1;

            board.apply_move(index, mover)?;
            let child = self.minimax(board, mover.opponent());
            board.undo_move(index);

            let candidate = Move {
                index,
                score: child?.score,
            };
            if is_better_move(mover, candidate, best) {
                best = Some(candidate);
            }
        }

        best.map(SearchOutcome::from).ok_or(GameError::NoAvailableMoves)
    }
}

/// Strict comparison so the lowest index wins ties.
fn is_better_move(mover: Mark, candidate: Move, best: Option<Move>) -> bool {
    match best {
        None => true,
        Some(best) => match mover {
            Mark::O => candidate.score > best.score,
            Mark::X => candidate.score < best.score,
        },
    }
}

/// Picks the optimal cell for `mover` without touching the caller's board.
pub fn best_move(board: &Board, mover: Mark) -> Result<Move, GameError> {
    let mut scratch = *board;
    let outcome = Searcher::new().search(&mut scratch, mover)?;
    match outcome.index {
        Some(index) => Ok(Move {
            index,
            score: outcome.score,
        }),
        None => Err(GameError::TerminalBoard),
    }
}
