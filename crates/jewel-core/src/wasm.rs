//! WebAssembly bindings for the Jewelry engine.
//!
//! This module exposes a level to a JavaScript renderer through wasm-bindgen.
//! All structured data crosses the boundary as JSON strings.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::bot;
#[cfg(feature = "wasm")]
use crate::descriptor::LevelDescriptor;
#[cfg(feature = "wasm")]
use crate::level::{Level, LevelStatus};
#[cfg(feature = "wasm")]
use crate::tile::PresentationHandle;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed level wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmLevel {
    level: Level,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmLevel {
    /// Create a level from a level file's JSON text
    #[wasm_bindgen(constructor)]
    pub fn new(descriptor_json: &str) -> Result<WasmLevel, JsValue> {
        let descriptor = LevelDescriptor::from_json(descriptor_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid level: {}", e)))?;
        let level =
            Level::new(&descriptor).map_err(|e| JsValue::from_str(&format!("Invalid level: {}", e)))?;
        Ok(WasmLevel { level })
    }

    /// Get the board as JSON (for rendering)
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> String {
        serde_json::to_string(&self.level.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get all tiles on the board as a JSON array
    #[wasm_bindgen(js_name = getTiles)]
    pub fn get_tiles(&self) -> String {
        serde_json::to_string(&self.level.tiles()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Check a swap between two cells without applying it
    #[wasm_bindgen(js_name = isPossibleSwap)]
    pub fn is_possible_swap(&self, from_column: usize, from_row: usize, to_column: usize, to_row: usize) -> bool {
        self.level
            .swap_between((from_column, from_row), (to_column, to_row))
            .map(|swap| self.level.is_possible_swap(&swap))
            .unwrap_or(false)
    }

    /// Apply a swap, returns the move outcome JSON or an error
    #[wasm_bindgen(js_name = applySwap)]
    pub fn apply_swap(
        &mut self,
        from_column: usize,
        from_row: usize,
        to_column: usize,
        to_row: usize,
    ) -> Result<String, JsValue> {
        let swap = self
            .level
            .swap_between((from_column, from_row), (to_column, to_row))
            .map_err(|e| JsValue::from_str(&format!("Swap failed: {}", e)))?;

        match self.level.apply_swap(&swap) {
            Ok(outcome) => Ok(serde_json::to_string(&outcome).unwrap_or_else(|_| "{}".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Swap failed: {}", e))),
        }
    }

    /// Tag a tile with a renderer-side sprite id
    #[wasm_bindgen(js_name = attachHandle)]
    pub fn attach_handle(&mut self, column: usize, row: usize, handle: u64) -> bool {
        self.level.attach_handle(column, row, PresentationHandle(handle))
    }

    /// Get a suggested swap as JSON, or "null"
    #[wasm_bindgen(js_name = getHint)]
    pub fn get_hint(&self) -> String {
        match bot::hint(&self.level) {
            Some(swap) => serde_json::to_string(&swap).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    /// Start over with a fresh board; returns the new tiles as JSON
    #[wasm_bindgen(js_name = reset)]
    pub fn reset(&mut self) -> String {
        let tiles = self.level.reset();
        serde_json::to_string(&tiles).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.level.score()
    }

    #[wasm_bindgen(js_name = getMovesLeft)]
    pub fn get_moves_left(&self) -> u32 {
        self.level.moves_left()
    }

    /// Check if the level is finished, won or lost
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.level.status() != LevelStatus::InProgress
    }
}
