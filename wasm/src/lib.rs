use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

use stickfight_core::{Difficulty, Frame, Game, GameConfig, InputFrame, Prng};

/// Routes `log` records to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Install panic hook and console logger so WASM panics and game logs show
/// in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already set on hot reload
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

fn parse_difficulty(name: &str) -> Result<Difficulty, JsValue> {
    Difficulty::from_name(name)
        .ok_or_else(|| JsValue::from_str(&format!("unknown difficulty '{}'", name)))
}

#[wasm_bindgen]
pub struct WasmGame {
    inner: Game<Prng>,
}

#[wasm_bindgen]
impl WasmGame {
    /// New playthrough with default tuning. Unknown difficulty names fall
    /// back to medium.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, difficulty: &str) -> WasmGame {
        let difficulty = parse_difficulty(difficulty).unwrap_or_else(|_| {
            log::warn!("unknown difficulty '{}', using medium", difficulty);
            Difficulty::Medium
        });
        WasmGame {
            inner: Game::new(seed, difficulty),
        }
    }

    /// New playthrough with a JSON tuning override.
    pub fn with_config(seed: u32, difficulty: &str, config_json: &str) -> Result<WasmGame, JsValue> {
        let difficulty = parse_difficulty(difficulty)?;
        let config =
            GameConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame {
            inner: Game::with_config(config, difficulty, Prng::new(seed)),
        })
    }

    /// Advance one tick. `selection` is only read while power-ups are offered.
    pub fn tick(&mut self, buttons: u16, selection: Option<u8>) {
        let input = InputFrame { buttons, selection };
        self.inner.tick(&input);
    }

    /// Explicit power-up choice. Errors when nothing is on offer or the
    /// index is out of range.
    pub fn select_power_up(&mut self, choice: usize) -> Result<(), JsValue> {
        self.inner
            .select_power_up(choice)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render snapshot for the current tick as a JS object.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        let frame: Frame = self.inner.frame();
        serde_wasm_bindgen::to_value(&frame).map_err(JsValue::from)
    }

    /// Same snapshot as a JSON string, for recording or network relay.
    pub fn frame_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.frame()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // Quick accessors
    pub fn level(&self) -> u32 { self.inner.level }
    pub fn is_over(&self) -> bool { self.inner.phase.is_terminal() }
}
