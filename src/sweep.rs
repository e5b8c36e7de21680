// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator - Informed-Ratio Sweep

//! Re-run one configuration across several informed-trader ratios and merge
//! the traces into a single table keyed by ratio, the shape a chart with a
//! ratio selector consumes.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::simulation::MarketBeliefSimulator;
use crate::types::{IterationRecord, SimulationResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepRun {
    pub ratio: f64,
    pub result: SimulationResult,
}

/// Trace row tagged with the ratio that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepRow {
    pub ratio: f64,
    #[serde(flatten)]
    pub record: IterationRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatioSweep {
    pub runs: Vec<SweepRun>,
}

impl RatioSweep {
    pub fn ratios(&self) -> Vec<f64> {
        self.runs.iter().map(|r| r.ratio).collect()
    }

    /// Result for `ratio`, matched exactly as it was passed in.
    pub fn slice(&self, ratio: f64) -> Option<&SimulationResult> {
        self.runs.iter().find(|r| r.ratio == ratio).map(|r| &r.result)
    }

    /// Merged, ratio-tagged table in sweep order.
    pub fn rows(&self) -> Vec<SweepRow> {
        self.runs.iter()
            .flat_map(|run| {
                run.result.trace.iter().map(move |record| SweepRow {
                    ratio: run.ratio,
                    record: record.clone(),
                })
            })
            .collect()
    }
}

/// Run `base` once per entry of `ratios`, each with its own seeded stream.
/// Every ratio is validated before the first run starts.
pub fn run_ratio_sweep(base: &SimulationConfig, ratios: &[f64]) -> Result<RatioSweep, SimError> {
    if ratios.is_empty() {
        return Err(SimError::invalid("ratios", "sweep needs at least one ratio"));
    }
    let configs = ratios.iter()
        .map(|&ratio| {
            let cfg = SimulationConfig { informed_ratio: ratio, ..base.clone() };
            cfg.validate().map(|_| cfg)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let runs = configs.into_iter()
        .map(|cfg| {
            let ratio = cfg.informed_ratio;
            let result = MarketBeliefSimulator::from_valid(cfg).finish();
            log::debug!(
                "ratio {}: {} iterations, final belief {:.6}",
                ratio, result.iterations(), result.final_state.belief,
            );
            SweepRun { ratio, result }
        })
        .collect();

    Ok(RatioSweep { runs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::run;

    #[test]
    fn test_empty_sweep_rejected() {
        let err = run_ratio_sweep(&SimulationConfig::default(), &[]).unwrap_err();
        assert_eq!(err.field(), Some("ratios"));
    }

    #[test]
    fn test_invalid_ratio_fails_before_any_run() {
        let err = run_ratio_sweep(&SimulationConfig::default(), &[0.2, 1.5]).unwrap_err();
        assert_eq!(err.field(), Some("informed_ratio"));
    }

    #[test]
    fn test_slice_matches_standalone_run() {
        let base = SimulationConfig { max_iterations: 100, ..Default::default() };
        let sweep = run_ratio_sweep(&base, &[0.1, 0.2, 0.4]).unwrap();
        assert_eq!(sweep.ratios(), vec![0.1, 0.2, 0.4]);

        let alone = run(SimulationConfig { informed_ratio: 0.4, ..base }).unwrap();
        assert_eq!(sweep.slice(0.4), Some(&alone));
        assert!(sweep.slice(0.3).is_none());
    }

    #[test]
    fn test_rows_are_tagged_and_complete() {
        let base = SimulationConfig { max_iterations: 50, ..Default::default() };
        let sweep = run_ratio_sweep(&base, &[0.15, 0.35]).unwrap();
        let rows = sweep.rows();
        let total: usize = sweep.runs.iter().map(|r| r.result.trace.len()).sum();
        assert_eq!(rows.len(), total);

        let first_len = sweep.runs[0].result.trace.len();
        assert!(rows[..first_len].iter().all(|r| r.ratio == 0.15));
        assert!(rows[first_len..].iter().all(|r| r.ratio == 0.35));
    }

    #[test]
    fn test_row_serializes_flat() {
        let base = SimulationConfig { max_iterations: 5, ..Default::default() };
        let sweep = run_ratio_sweep(&base, &[0.2]).unwrap();
        let json = serde_json::to_value(&sweep.rows()[0]).unwrap();
        assert_eq!(json["ratio"], 0.2);
        assert_eq!(json["iteration"], 0);
        assert!(json.get("record").is_none());
    }
}
