// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator - Simulation Core

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::model;
use crate::regime::MarketRegime;
use crate::types::*;

// ─── MarketBeliefSimulator struct ───────────────────────────────────────────

/// Step-wise Glosten-Milgrom run. Owns its random stream, so independent
/// simulators never share state.
#[wasm_bindgen]
pub struct MarketBeliefSimulator {
    pub(crate) config: SimulationConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) regime: MarketRegime,

    // Dealer belief carried into the next step
    pub(crate) theta: f64,

    pub(crate) trace: Vec<IterationRecord>,
    pub(crate) anomalies: Vec<NumericAnomaly>,

    // Set once the stop condition fires; no steps run afterwards
    pub(crate) final_state: Option<FinalState>,
}

/// Run a full simulation for `config`.
pub fn run(config: SimulationConfig) -> Result<SimulationResult, SimError> {
    Ok(MarketBeliefSimulator::new(config)?.finish())
}

// ─── Internal Logic (Testable, pure Rust) ───────────────────────────────────

impl MarketBeliefSimulator {
    /// Validate `config` and prepare a fresh run seeded from `config.seed`.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    pub(crate) fn from_valid(config: SimulationConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let regime = MarketRegime::new(config.bounds(), config.true_value);
        let theta = config.initial_belief;
        Self {
            config,
            rng,
            regime,
            theta,
            trace: Vec::new(),
            anomalies: Vec::new(),
            final_state: None,
        }
    }

    pub fn config(&self) -> &SimulationConfig { &self.config }
    pub fn theta(&self) -> f64 { self.theta }
    pub fn trace(&self) -> &[IterationRecord] { &self.trace }
    pub fn anomalies(&self) -> &[NumericAnomaly] { &self.anomalies }
    pub fn final_state(&self) -> Option<&FinalState> { self.final_state.as_ref() }
    pub fn is_halted(&self) -> bool { self.final_state.is_some() }

    /// Run one iteration. Returns `None` once the run has halted.
    pub fn step_core(&mut self) -> Option<IterationRecord> {
        if self.final_state.is_some() {
            return None;
        }
        let iteration = self.trace.len() as u32;
        let pi = self.config.informed_ratio;
        let b = self.config.uninformed_buy_probability;

        // 1. Scheduled shock takes effect before this step's value is read
        if self.config.shock_iteration == Some(iteration) {
            if let Some(shock) = self.config.shock {
                self.regime.apply_shock(&shock);
                log::debug!(
                    "shock at iteration {}: bounds=({}, {}) selector={:?}",
                    iteration, self.regime.bounds.low, self.regime.bounds.high,
                    self.regime.selector,
                );
            }
        }

        // 2. Quotes from the carried belief
        let bounds = self.regime.bounds;
        let realized_value = self.regime.realized_value();
        let theta = self.theta;
        let quote = model::quote(theta, pi, b, bounds);

        // 3. Trader type first; the direction draw is consumed only for
        //    uninformed flow
        let trader = if self.rng.gen_bool(pi) {
            TraderType::Informed
        } else {
            TraderType::Uninformed
        };
        let order = match trader {
            TraderType::Informed => model::informed_order(realized_value, &quote),
            TraderType::Uninformed => {
                if self.rng.gen_bool(b) { OrderDirection::Buy } else { OrderDirection::Sell }
            }
        };

        // 4. Bayes update
        let raw = model::update_belief(theta, pi, b, order);
        let posterior = self.settle_belief(iteration, raw);

        let record = IterationRecord {
            iteration,
            belief: theta,
            mu: quote.mu,
            ask: quote.ask,
            bid: quote.bid,
            spread: quote.spread,
            trader,
            order,
            realized_value,
            value_low: bounds.low,
            value_high: bounds.high,
        };
        log::trace!(
            "iter {} theta={:.6} ask={:.6} bid={:.6} {:?}/{:?}",
            iteration, theta, quote.ask, quote.bid, trader, order,
        );
        self.trace.push(record.clone());

        // 5. Stop condition
        let converged = quote.spread < self.config.convergence_threshold;
        if converged || iteration + 1 >= self.config.max_iterations {
            let stop_reason = if converged {
                StopReason::Converged
            } else {
                StopReason::IterationCap
            };
            log::info!(
                "halted at iteration {} ({:?}): belief={:.6} spread={:.3e}",
                iteration, stop_reason, posterior, quote.spread,
            );
            self.final_state = Some(FinalState {
                belief: posterior,
                bid: quote.bid,
                ask: quote.ask,
                mu: quote.mu,
                spread: quote.spread,
                iteration,
                stop_reason,
            });
        }
        self.theta = posterior;

        Some(record)
    }

    /// Keep the posterior a probability. Out-of-range updates are clamped
    /// and recorded; NaN keeps the prior.
    fn settle_belief(&mut self, iteration: u32, raw: f64) -> f64 {
        if (0.0..=1.0).contains(&raw) {
            return raw;
        }
        let clamped = if raw.is_nan() { self.theta } else { raw.clamp(0.0, 1.0) };
        log::warn!(
            "belief update left [0, 1] at iteration {}: {} clamped to {}",
            iteration, raw, clamped,
        );
        self.anomalies.push(NumericAnomaly {
            iteration,
            raw_belief: raw,
            clamped_belief: clamped,
        });
        clamped
    }

    /// Result so far, available once the run has halted.
    pub fn result(&self) -> Option<SimulationResult> {
        self.final_state.as_ref().map(|final_state| SimulationResult {
            trace: self.trace.clone(),
            final_state: final_state.clone(),
            anomalies: self.anomalies.clone(),
        })
    }

    /// Run to the stop condition and hand over the result.
    pub fn finish(mut self) -> SimulationResult {
        loop {
            if let Some(final_state) = self.final_state.take() {
                return SimulationResult {
                    trace: self.trace,
                    final_state,
                    anomalies: self.anomalies,
                };
            }
            self.step_core();
        }
    }
}
