// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator - Type Definitions

use serde::{Deserialize, Serialize};

// ─── Value Bounds ───────────────────────────────────────────────────────────

/// Which bound of the binary security is realized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValueBound {
    High,
    Low,
}

impl Default for ValueBound {
    fn default() -> Self { ValueBound::High }
}

/// Support of the security's true value: `low < high`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValueBounds {
    pub low: f64,
    pub high: f64,
}

impl ValueBounds {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn value_of(&self, bound: ValueBound) -> f64 {
        match bound {
            ValueBound::High => self.high,
            ValueBound::Low => self.low,
        }
    }
}

// ─── Traders and Orders ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraderType {
    Informed,
    Uninformed,
}

impl TraderType {
    /// Numeric flag used by the tabular export (informed = 1).
    pub fn flag(&self) -> f64 {
        match self {
            Self::Informed => 1.0,
            Self::Uninformed => 0.0,
        }
    }
}

/// Direction of the order that reached the dealer this step.
///
/// `None` only happens for an informed trader whose realized value sits
/// inside the quoted band; the dealer learns nothing from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Buy,
    Sell,
    None,
}

impl OrderDirection {
    /// +1 for buys, -1 for sells, 0 for no trade.
    pub fn sign(&self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
            Self::None => 0,
        }
    }
}

// ─── Quotes ─────────────────────────────────────────────────────────────────

/// Dealer quotes for one step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub mu: f64,
    pub ask: f64,
    pub bid: f64,
    pub spread: f64,
}

// ─── Trace ──────────────────────────────────────────────────────────────────

/// One row of the simulation trace. `belief` is the dealer's prior for
/// this step, i.e. before the step's order is observed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IterationRecord {
    pub iteration: u32,
    pub belief: f64,
    pub mu: f64,
    pub ask: f64,
    pub bid: f64,
    pub spread: f64,
    pub trader: TraderType,
    pub order: OrderDirection,
    pub realized_value: f64,
    pub value_low: f64,
    pub value_high: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Spread fell below the convergence threshold.
    Converged,
    /// `max_iterations` reached first.
    IterationCap,
}

/// Values at the stopping iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalState {
    /// Posterior after the stopping step's order.
    pub belief: f64,
    pub bid: f64,
    pub ask: f64,
    pub mu: f64,
    pub spread: f64,
    pub iteration: u32,
    pub stop_reason: StopReason,
}

/// A Bayes update that left [0, 1] and was clamped back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericAnomaly {
    pub iteration: u32,
    pub raw_belief: f64,
    pub clamped_belief: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub trace: Vec<IterationRecord>,
    pub final_state: FinalState,
    pub anomalies: Vec<NumericAnomaly>,
}

impl SimulationResult {
    pub fn iterations(&self) -> usize {
        self.trace.len()
    }

    pub fn converged(&self) -> bool {
        self.final_state.stop_reason == StopReason::Converged
    }

    /// Share of steps that drew an informed trader.
    pub fn informed_share(&self) -> f64 {
        if self.trace.is_empty() {
            return 0.0;
        }
        let informed = self.trace.iter()
            .filter(|r| r.trader == TraderType::Informed)
            .count();
        informed as f64 / self.trace.len() as f64
    }
}
