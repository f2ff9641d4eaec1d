use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod error;
pub mod game;
pub mod types;

use crate::board::Board;
use crate::game::GameInstance;
use crate::types::{GameConfig, Mark};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Game session exported to the page.
#[wasm_bindgen]
pub struct TicTacToe {
    inner: GameInstance,
}

#[wasm_bindgen]
impl TicTacToe {
    /// `config` may be `undefined`, in which case defaults apply.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TicTacToe, JsError> {
        let config = parse_config(config)?;
        let inner = GameInstance::new_with_default_selector(config)?;
        Ok(Self { inner })
    }

    /// Returns `false` when the move was rejected; the game is unchanged then.
    pub fn play(&mut self, index: usize) -> bool {
        self.inner.play(index).is_ok()
    }

    pub fn reset(&mut self) -> Result<(), JsError> {
        Ok(self.inner.reset()?)
    }

    #[wasm_bindgen(js_name = enableAi)]
    pub fn enable_ai(&mut self) -> Result<(), JsError> {
        Ok(self.inner.enable_ai()?)
    }

    #[wasm_bindgen(js_name = disableAi)]
    pub fn disable_ai(&mut self) -> Result<(), JsError> {
        Ok(self.inner.disable_ai()?)
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.to_game_state())?)
    }
}

/// Evaluates a numeric snapshot (0=empty, 1=X, 2=O).
#[wasm_bindgen(js_name = evaluateBoard)]
pub fn evaluate_board(cells: &[u8]) -> Result<JsValue, JsError> {
    let board = Board::from_cells(cells)?;
    Ok(serde_wasm_bindgen::to_value(&board.evaluate())?)
}

/// Optimal cell for `mover` (1=X, 2=O) on a numeric snapshot.
#[wasm_bindgen(js_name = bestMove)]
pub fn best_move(cells: &[u8], mover: u8) -> Result<usize, JsError> {
    let board = Board::from_cells(cells)?;
    let mover = Mark::from_u8(mover)?;
    Ok(ai::best_move(&board, mover)?.index)
}

fn parse_config(config: JsValue) -> Result<GameConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(GameConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(config)?)
}
