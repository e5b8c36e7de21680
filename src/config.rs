// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator - Configuration

//! Simulation inputs and their validation.
//!
//! A [`SimulationConfig`] is built once by the caller (struct literal, CLI
//! flags or a JSON file) and never mutated by the simulator. Missing JSON
//! fields fall back to the classroom defaults: a (0, 1) security whose true
//! value is high, 20% informed traders, fair uninformed flow, a 0.5 prior,
//! 500 iterations, seed 5000 and a 1e-5 spread threshold.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::types::{ValueBound, ValueBounds};

// ---------------------------------------------------------------------------
// Shock
// ---------------------------------------------------------------------------

/// Scheduled regime change. Either part may be absent; a shock with neither
/// part set is a no-op.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Shock {
    /// Overrides the realized-value selector.
    pub private_signal: Option<ValueBound>,
    /// Replaces the value bounds.
    pub public_bounds: Option<ValueBounds>,
}

impl Shock {
    pub fn private(signal: ValueBound) -> Self {
        Self { private_signal: Some(signal), public_bounds: None }
    }

    pub fn public(bounds: ValueBounds) -> Self {
        Self { private_signal: None, public_bounds: Some(bounds) }
    }

    pub fn both(signal: ValueBound, bounds: ValueBounds) -> Self {
        Self { private_signal: Some(signal), public_bounds: Some(bounds) }
    }

    pub fn is_empty(&self) -> bool {
        self.private_signal.is_none() && self.public_bounds.is_none()
    }
}

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub value_low: f64,
    pub value_high: f64,
    /// Bound realized absent a private shock.
    pub true_value: ValueBound,
    /// Fraction of informed traders (pi), open interval (0, 1).
    pub informed_ratio: f64,
    /// Probability an uninformed trader buys, open interval (0, 1).
    pub uninformed_buy_probability: f64,
    /// Dealer prior that the value is high.
    pub initial_belief: f64,
    pub max_iterations: u32,
    pub seed: u64,
    pub convergence_threshold: f64,
    pub shock_iteration: Option<u32>,
    pub shock: Option<Shock>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            value_low: 0.0,
            value_high: 1.0,
            true_value: ValueBound::High,
            informed_ratio: 0.2,
            uninformed_buy_probability: 0.5,
            initial_belief: 0.5,
            max_iterations: 500,
            seed: 5000,
            convergence_threshold: 1e-5,
            shock_iteration: None,
            shock: None,
        }
    }
}

impl SimulationConfig {
    pub fn bounds(&self) -> ValueBounds {
        ValueBounds::new(self.value_low, self.value_high)
    }

    /// Schedule `shock` at iteration `at`.
    pub fn with_shock(mut self, at: u32, shock: Shock) -> Self {
        self.shock_iteration = Some(at);
        self.shock = Some(shock);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check every parameter's domain. Called before any random draw.
    pub fn validate(&self) -> Result<(), SimError> {
        check_open_unit("informed_ratio", self.informed_ratio)?;
        check_open_unit("uninformed_buy_probability", self.uninformed_buy_probability)?;
        check_bounds("value_low/value_high", self.value_low, self.value_high)?;

        if !(0.0..=1.0).contains(&self.initial_belief) {
            return Err(SimError::invalid(
                "initial_belief",
                format!("must lie in [0, 1], got {}", self.initial_belief),
            ));
        }
        if self.max_iterations < 1 {
            return Err(SimError::invalid("max_iterations", "must be at least 1"));
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold > 0.0) {
            return Err(SimError::invalid(
                "convergence_threshold",
                format!("must be positive and finite, got {}", self.convergence_threshold),
            ));
        }
        if let Some(bounds) = self.shock.as_ref().and_then(|s| s.public_bounds) {
            check_bounds("shock.public_bounds", bounds.low, bounds.high)?;
        }
        Ok(())
    }
}

fn check_open_unit(field: &'static str, value: f64) -> Result<(), SimError> {
    // NaN fails both comparisons
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("must lie in (0, 1), got {}", value)))
    }
}

fn check_bounds(field: &'static str, low: f64, high: f64) -> Result<(), SimError> {
    if !(low.is_finite() && high.is_finite()) {
        return Err(SimError::invalid(field, "bounds must be finite"));
    }
    if high <= low {
        return Err(SimError::invalid(
            field,
            format!("high ({}) must exceed low ({})", high, low),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ratio_outside_open_interval() {
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let cfg = SimulationConfig { informed_ratio: bad, ..Default::default() };
            let err = cfg.validate().unwrap_err();
            assert_eq!(err.field(), Some("informed_ratio"), "ratio {}", bad);
        }
    }

    #[test]
    fn test_uninformed_probability_outside_open_interval() {
        let cfg = SimulationConfig { uninformed_buy_probability: 1.0, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().field(), Some("uninformed_buy_probability"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let cfg = SimulationConfig { value_low: 2.0, value_high: 2.0, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().field(), Some("value_low/value_high"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let cfg = SimulationConfig { max_iterations: 0, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().field(), Some("max_iterations"));
    }

    #[test]
    fn test_threshold_must_be_positive() {
        let cfg = SimulationConfig { convergence_threshold: 0.0, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().field(), Some("convergence_threshold"));
    }

    #[test]
    fn test_shock_bounds_checked() {
        let cfg = SimulationConfig::default()
            .with_shock(10, Shock::public(ValueBounds::new(3.0, 1.0)));
        assert_eq!(cfg.validate().unwrap_err().field(), Some("shock.public_bounds"));
    }

    #[test]
    fn test_json_missing_fields_take_defaults() {
        let cfg = SimulationConfig::from_json_str(
            r#"{ "informed_ratio": 0.4, "shock_iteration": 7,
                 "shock": { "private_signal": "low" } }"#,
        ).unwrap();
        assert_eq!(cfg.informed_ratio, 0.4);
        assert_eq!(cfg.max_iterations, 500);
        assert_eq!(cfg.seed, 5000);
        assert_eq!(cfg.shock_iteration, Some(7));
        assert_eq!(cfg.shock, Some(Shock::private(ValueBound::Low)));
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        let err = SimulationConfig::from_json_str(r#"{ "informed_ratio": 1.2 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { .. }));

        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }
}
