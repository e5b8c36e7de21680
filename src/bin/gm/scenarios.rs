// Scenario Definitions: baseline, shock regimes and trader-mix extremes
// Seeds are supplied by the Monte Carlo runner; everything else lives here

use gm_engine::{Shock, SimulationConfig, ValueBound, ValueBounds};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub config: SimulationConfig,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    pub require_convergence: bool,
    /// Largest allowed |final belief - truth| (truth is 1 for high, 0 for low).
    pub max_belief_error: Option<f64>,
    pub max_anomalies: Option<usize>,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            require_convergence: true,
            max_belief_error: Some(1e-3),
            max_anomalies: None,
        }
    }
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    let base = SimulationConfig::default();
    vec![
        Scenario {
            name: "GM_BASELINE",
            label: "Baseline (pi=0.2, b=0.5)",
            category: "baseline",
            config: base.clone(),
            criteria: PassCriteria {
                max_anomalies: Some(0),
                ..Default::default()
            },
        },
        Scenario {
            name: "GM_PRIVATE_SHOCK_LOW",
            label: "Private shock -> low @50",
            category: "shock",
            config: SimulationConfig { max_iterations: 1000, ..base.clone() }
                .with_shock(50, Shock::private(ValueBound::Low)),
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "GM_PUBLIC_SHOCK",
            label: "Public shock (1,3) @50",
            category: "shock",
            config: SimulationConfig { max_iterations: 1000, ..base.clone() }
                .with_shock(50, Shock::public(ValueBounds::new(1.0, 3.0))),
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "GM_COMBINED_SHOCK",
            label: "Combined shock low+(0.5,2) @50",
            category: "shock",
            config: SimulationConfig { max_iterations: 1000, ..base.clone() }
                .with_shock(50, Shock::both(ValueBound::Low, ValueBounds::new(0.5, 2.0))),
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "GM_THIN_INFORMED",
            label: "Thin informed flow (pi=0.05)",
            category: "trader-mix",
            config: SimulationConfig {
                informed_ratio: 0.05,
                max_iterations: 5000,
                ..base.clone()
            },
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "GM_HEAVY_INFORMED",
            label: "Heavy informed flow (pi=0.8)",
            category: "trader-mix",
            config: SimulationConfig { informed_ratio: 0.8, ..base.clone() },
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "GM_BUY_PRESSURE",
            label: "Buy-biased noise (b=0.7)",
            category: "trader-mix",
            config: SimulationConfig { uninformed_buy_probability: 0.7, ..base },
            // Overshooting buy updates are clamped, so anomalies are expected
            criteria: PassCriteria::default(),
        },
    ]
}
