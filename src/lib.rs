// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator

pub mod types;
pub mod error;
pub mod config;
pub mod model;
pub mod regime;
pub mod simulation;
pub mod table;
pub mod sweep;

pub use types::*;
pub use error::SimError;
pub use config::{Shock, SimulationConfig};
pub use simulation::{run, MarketBeliefSimulator};
pub use table::{write_jsonl, Candle, Column};
pub use sweep::{run_ratio_sweep, RatioSweep, SweepRow, SweepRun};

use wasm_bindgen::prelude::*;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl MarketBeliefSimulator {
    /// Build from a JS object shaped like `SimulationConfig`; missing
    /// fields take the defaults.
    #[wasm_bindgen(constructor)]
    pub fn js_new(config: JsValue) -> Result<MarketBeliefSimulator, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config: SimulationConfig = if config.is_undefined() || config.is_null() {
            SimulationConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        MarketBeliefSimulator::new(config).map_err(to_js_error)
    }

    /// One iteration; `null` once halted.
    pub fn step(&mut self) -> JsValue {
        match self.step_core() {
            Some(record) => serde_wasm_bindgen::to_value(&record).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Run up to `steps` iterations, returning how many actually ran.
    pub fn run_batch(&mut self, steps: u32) -> u32 {
        let mut ran = 0;
        for _ in 0..steps {
            if self.step_core().is_none() {
                break;
            }
            ran += 1;
        }
        ran
    }

    #[wasm_bindgen(js_name = isHalted)]
    pub fn js_is_halted(&self) -> bool {
        self.is_halted()
    }

    pub fn get_trace(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.trace).unwrap_or(JsValue::NULL)
    }

    pub fn get_candles(&self) -> JsValue {
        let candles: Vec<Candle> = self.trace.iter().map(Candle::from).collect();
        serde_wasm_bindgen::to_value(&candles).unwrap_or(JsValue::NULL)
    }

    pub fn get_final_state(&self) -> JsValue {
        match &self.final_state {
            Some(state) => serde_wasm_bindgen::to_value(state).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Restart from the same config and seed.
    pub fn reset(&mut self) {
        *self = MarketBeliefSimulator::from_valid(self.config.clone());
    }
}

/// Sweep `ratios` over a base config and return the merged, ratio-tagged rows.
#[wasm_bindgen]
pub fn run_ratio_sweep_js(config: JsValue, ratios: Vec<f64>) -> Result<JsValue, JsValue> {
    let base: SimulationConfig = if config.is_undefined() || config.is_null() {
        SimulationConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    let sweep = run_ratio_sweep(&base, &ratios).map_err(to_js_error)?;
    Ok(serde_wasm_bindgen::to_value(&sweep.rows())?)
}
