// Benchmark Report Types
// Structured output for seed-level Monte Carlo analysis of the dealer model

use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let half_width = 1.96 * std_dev / (n as f64).sqrt(); // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - half_width,
            ci_upper: mean + half_width,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    pub fn half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub iterations: usize,
    pub converged: bool,
    pub final_belief: f64,
    /// Distance of the final belief from the truth in force at the end.
    pub belief_error: f64,
    pub final_spread: f64,
    pub anomalies: usize,
    pub informed_share: f64,
    pub elapsed_us: u128,
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub convergence_rate: f64,
    pub iterations: Stats,
    pub belief_error: Stats,
    pub final_spread: Stats,
    pub anomalies: Stats,
    pub informed_share: Stats,
    pub elapsed_us: Stats,
    pub individual_runs: Vec<BenchResult>,
}

/// Share of seeds a scenario must pass.
pub const PASS_RATE: f64 = 0.933;

impl MonteCarloReport {
    pub fn failures(&self) -> usize {
        self.individual_runs.iter().filter(|r| !r.pass).count()
    }

    /// Misses tolerated at this run count. The shortfall from `PASS_RATE`
    /// is rounded, so 10 runs allow one miss and 30 runs allow two.
    pub fn allowed_failures(&self) -> usize {
        (self.n_runs as f64 * (1.0 - PASS_RATE)).round() as usize
    }

    pub fn passed(&self) -> bool {
        self.failures() <= self.allowed_failures()
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub base_seed: u64,
    pub summary: Summary,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}
