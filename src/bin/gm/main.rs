// Glosten-Milgrom CLI: single runs, informed-ratio sweeps and seeded Monte Carlo bench
//
// Usage:
//   cargo run --release --bin gm -- run                           # classroom defaults
//   cargo run --release --bin gm -- run --ratio 0.4 --out t.jsonl # export the trace
//   cargo run --release --bin gm -- run --shock-at 50 --shock-private low
//   cargo run --release --bin gm -- sweep --ratios 0.1,0.2,0.5    # one row per ratio
//   cargo run --release --bin gm -- bench --runs 5                # quick Monte Carlo
//   cargo run --release --bin gm -- bench SHOCK --time-series     # filter + JSONL traces

mod logging;
mod monte_carlo;
mod report;
mod scenarios;

use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gm_engine::*;

use report::*;
use scenarios::*;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "gm", about = "Glosten-Milgrom dealer belief simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one simulation and print the final state
    Run {
        #[command(flatten)]
        params: ParamArgs,
        /// Write the trace as JSON Lines
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write bid/ask candles as JSON Lines
        #[arg(long)]
        candles: Option<PathBuf>,
    },
    /// Re-run the same config across several informed ratios
    Sweep {
        #[command(flatten)]
        params: ParamArgs,
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.1, 0.2, 0.3, 0.4, 0.5])]
        ratios: Vec<f64>,
        /// Write the merged ratio-tagged table as JSON Lines
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Monte Carlo over seeds for the built-in scenarios
    Bench {
        #[arg(long, default_value_t = 30)]
        runs: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Write per-seed traces under benchmark-results/time-series
        #[arg(long)]
        time_series: bool,
        /// Only run scenarios whose name, label or category contains this
        filter: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BoundArg {
    High,
    Low,
}

impl From<BoundArg> for ValueBound {
    fn from(b: BoundArg) -> Self {
        match b {
            BoundArg::High => ValueBound::High,
            BoundArg::Low => ValueBound::Low,
        }
    }
}

#[derive(Args)]
struct ParamArgs {
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    value_low: Option<f64>,
    #[arg(long)]
    value_high: Option<f64>,
    #[arg(long, value_enum)]
    true_value: Option<BoundArg>,
    /// Informed trader ratio (pi)
    #[arg(long)]
    ratio: Option<f64>,
    /// Uninformed buy probability
    #[arg(long)]
    uninformed: Option<f64>,
    /// Dealer's starting belief that the value is high
    #[arg(long)]
    start_belief: Option<f64>,
    #[arg(long)]
    iterations: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Spread threshold for early stopping
    #[arg(long)]
    epsilon: Option<f64>,
    #[arg(long)]
    shock_at: Option<u32>,
    #[arg(long, value_enum)]
    shock_private: Option<BoundArg>,
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"])]
    shock_public: Option<Vec<f64>>,
}

impl ParamArgs {
    fn to_config(&self) -> Result<SimulationConfig> {
        let mut cfg = match &self.config {
            Some(path) => SimulationConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(v) = self.value_low { cfg.value_low = v; }
        if let Some(v) = self.value_high { cfg.value_high = v; }
        if let Some(v) = self.true_value { cfg.true_value = v.into(); }
        if let Some(v) = self.ratio { cfg.informed_ratio = v; }
        if let Some(v) = self.uninformed { cfg.uninformed_buy_probability = v; }
        if let Some(v) = self.start_belief { cfg.initial_belief = v; }
        if let Some(v) = self.iterations { cfg.max_iterations = v; }
        if let Some(v) = self.seed { cfg.seed = v; }
        if let Some(v) = self.epsilon { cfg.convergence_threshold = v; }

        let public_bounds = match self.shock_public.as_deref() {
            Some([low, high]) => Some(ValueBounds::new(*low, *high)),
            Some(_) => bail!("--shock-public takes exactly LOW HIGH"),
            None => None,
        };
        let shock = Shock {
            private_signal: self.shock_private.map(Into::into),
            public_bounds,
        };
        match (self.shock_at, shock.is_empty()) {
            (Some(at), false) => cfg = cfg.with_shock(at, shock),
            (Some(at), true) => cfg.shock_iteration = Some(at),
            (None, false) => bail!("a shock needs --shock-at"),
            (None, true) => {}
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn cmd_run(params: &ParamArgs, out: Option<&Path>, candles: Option<&Path>) -> Result<()> {
    let cfg = params.to_config()?;
    let result = run(cfg)?;
    let fs = &result.final_state;

    println!("\n  Glosten-Milgrom run");
    println!("  {:<20} {}", "Stop", match fs.stop_reason {
        StopReason::Converged => "spread below threshold",
        StopReason::IterationCap => "iteration cap",
    });
    println!("  {:<20} {}", "Equilibrium period", fs.iteration);
    println!("  {:<20} {:.8}", "Theta", fs.belief);
    println!("  {:<20} {:.8}", "Mu", fs.mu);
    println!("  {:<20} {:.8}", "Ask", fs.ask);
    println!("  {:<20} {:.8}", "Bid", fs.bid);
    println!("  {:<20} {:.3e}", "Spread", fs.spread);
    println!("  {:<20} {:.1}%", "Informed share", result.informed_share() * 100.0);
    if !result.anomalies.is_empty() {
        println!("  {:<20} {}", "Clamped updates", result.anomalies.len());
    }

    if let Some(path) = out {
        write_jsonl(path, &result.trace)
            .with_context(|| format!("writing trace to {}", path.display()))?;
        println!("\n  Trace saved to: {}", path.display());
    }
    if let Some(path) = candles {
        write_jsonl(path, &result.candles())
            .with_context(|| format!("writing candles to {}", path.display()))?;
        println!("  Candles saved to: {}", path.display());
    }
    println!();
    Ok(())
}

fn cmd_sweep(params: &ParamArgs, ratios: &[f64], out: Option<&Path>) -> Result<()> {
    let base = params.to_config()?;
    let sweep = run_ratio_sweep(&base, ratios)?;

    println!("\n  {:>8} {:>8} {:>12} {:>12} {:>12}  {}",
        "Ratio", "Iters", "Theta", "Mu", "Spread", "Stop");
    println!("  {}", "-".repeat(70));
    for entry in &sweep.runs {
        let fs = &entry.result.final_state;
        println!("  {:>8.3} {:>8} {:>12.8} {:>12.8} {:>12.3e}  {:?}",
            entry.ratio, entry.result.iterations(), fs.belief, fs.mu, fs.spread, fs.stop_reason);
    }

    if let Some(path) = out {
        write_jsonl(path, &sweep.rows())
            .with_context(|| format!("writing sweep to {}", path.display()))?;
        println!("\n  Merged table saved to: {}", path.display());
    }
    println!();
    Ok(())
}

fn cmd_bench(runs: usize, seed: u64, time_series: bool, filter: Option<&str>) -> Result<bool> {
    let all_scenarios = scenarios();
    let to_run: Vec<&Scenario> = match filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };
    if to_run.is_empty() {
        bail!("no scenarios match filter: {:?}", filter);
    }
    if runs == 0 {
        bail!("--runs must be at least 1");
    }

    let ts_dir = time_series.then(|| PathBuf::from("benchmark-results/time-series"));

    println!("\n  Glosten-Milgrom Monte Carlo");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", runs, seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<34} {:>5} {:>6} {:>14} {:>11} {:>7}",
        "Scenario", "Pass%", "Conv%", "Iterations", "BeliefErr", "Time");
    println!("  {}", "-".repeat(84));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, runs, seed, ts_dir.as_deref())?;
        let pass_pct = report.pass_rate * 100.0;
        let status = if report.passed() { "PASS" } else { "FAIL" };

        println!("  {:<34} {:>4}% {:>5}% {:>7.1}±{:<5.1} {:>11.2e} {:>5.0}us  {}",
            report.label,
            pass_pct as u32,
            (report.convergence_rate * 100.0) as u32,
            report.iterations.mean, report.iterations.half_width(),
            report.belief_error.mean,
            report.elapsed_us.mean,
            status,
        );
        mc_reports.push(report);
    }

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.passed()).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(84));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.2}s\n",
        total, passed, failed, suite_start.elapsed().as_secs_f64());

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let report = BenchReport {
        timestamp: ts.to_string(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: runs,
        base_seed: seed,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: mc_reports,
    };

    let dir = Path::new("benchmark-results");
    std::fs::create_dir_all(dir).context("creating benchmark-results/")?;
    let path = dir.join(format!("bench-{}.json", ts));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("  Results saved to: {}\n", path.display());

    Ok(failed == 0)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Command::Run { params, out, candles } => {
            cmd_run(params, out.as_deref(), candles.as_deref())
        }
        Command::Sweep { params, ratios, out } => cmd_sweep(params, ratios, out.as_deref()),
        Command::Bench { runs, seed, time_series, filter } => {
            let all_passed = cmd_bench(*runs, *seed, *time_series, filter.as_deref())?;
            if !all_passed {
                log::error!("one or more scenarios failed their pass criteria");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gm").chain(args.iter().copied())).unwrap()
    }

    fn params_of(cli: Cli) -> ParamArgs {
        match cli.command {
            Command::Run { params, .. } | Command::Sweep { params, .. } => params,
            Command::Bench { .. } => panic!("bench has no params"),
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let cfg = params_of(parse(&["run", "--ratio", "0.4", "--seed", "9", "--iterations", "20"]))
            .to_config()
            .unwrap();
        assert_eq!(cfg.informed_ratio, 0.4);
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.max_iterations, 20);
        assert_eq!(cfg.uninformed_buy_probability, 0.5);
    }

    #[test]
    fn test_shock_flags_build_shock() {
        let cfg = params_of(parse(&[
            "run", "--shock-at", "12", "--shock-private", "low", "--shock-public", "1", "2",
        ]))
        .to_config()
        .unwrap();
        assert_eq!(cfg.shock_iteration, Some(12));
        assert_eq!(cfg.shock, Some(Shock::both(ValueBound::Low, ValueBounds::new(1.0, 2.0))));
    }

    #[test]
    fn test_shock_without_iteration_rejected() {
        let params = params_of(parse(&["run", "--shock-private", "high"]));
        assert!(params.to_config().is_err());
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let params = params_of(parse(&["run", "--ratio", "1.5"]));
        assert!(params.to_config().is_err());
    }

    #[test]
    fn test_sweep_ratio_list() {
        match parse(&["sweep", "--ratios", "0.1,0.3"]).command {
            Command::Sweep { ratios, .. } => assert_eq!(ratios, vec![0.1, 0.3]),
            _ => panic!("expected sweep"),
        }
    }
}
