// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator - Tabular Export
//
// Column, candlestick and JSON Lines views of a trace for charting
// front ends. Nothing here mutates the result it reads.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::types::{IterationRecord, SimulationResult};

// ─── Columns ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Iteration,
    #[serde(rename = "theta", alias = "belief")]
    Belief,
    Mu,
    Ask,
    Bid,
    Spread,
    Trader,
    Order,
    #[serde(rename = "v", alias = "realized_value")]
    RealizedValue,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Iteration,
        Column::Belief,
        Column::Mu,
        Column::Ask,
        Column::Bid,
        Column::Spread,
        Column::Trader,
        Column::Order,
        Column::RealizedValue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Iteration => "iteration",
            Self::Belief => "theta",
            Self::Mu => "mu",
            Self::Ask => "ask",
            Self::Bid => "bid",
            Self::Spread => "spread",
            Self::Trader => "trader",
            Self::Order => "order",
            Self::RealizedValue => "v",
        }
    }

    /// Numeric cell for one record. Trader is 1/0, order is +1/-1/0.
    pub fn value(&self, record: &IterationRecord) -> f64 {
        match self {
            Self::Iteration => record.iteration as f64,
            Self::Belief => record.belief,
            Self::Mu => record.mu,
            Self::Ask => record.ask,
            Self::Bid => record.bid,
            Self::Spread => record.spread,
            Self::Trader => record.trader.flag(),
            Self::Order => record.order.sign() as f64,
            Self::RealizedValue => record.realized_value,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "iteration" => Ok(Self::Iteration),
            "theta" | "belief" => Ok(Self::Belief),
            "mu" => Ok(Self::Mu),
            "ask" => Ok(Self::Ask),
            "bid" => Ok(Self::Bid),
            "spread" | "gap" => Ok(Self::Spread),
            "trader" => Ok(Self::Trader),
            "order" => Ok(Self::Order),
            "v" | "realized_value" => Ok(Self::RealizedValue),
            _ => Err(SimError::invalid("column", format!("unknown column `{}`", s))),
        }
    }
}

// ─── Candles ────────────────────────────────────────────────────────────────

/// OCHL row of the quote band: opens at the bid, closes at the ask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub iteration: u32,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

impl From<&IterationRecord> for Candle {
    fn from(r: &IterationRecord) -> Self {
        Self {
            iteration: r.iteration,
            open: r.bid,
            close: r.ask,
            high: r.ask,
            low: r.bid,
        }
    }
}

impl SimulationResult {
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.trace.iter().map(|r| column.value(r)).collect()
    }

    pub fn candles(&self) -> Vec<Candle> {
        self.trace.iter().map(Candle::from).collect()
    }

    /// `(x, y)` pairs for a line chart.
    pub fn series(&self, x: Column, y: Column) -> Vec<(f64, f64)> {
        self.trace.iter().map(|r| (x.value(r), y.value(r))).collect()
    }
}

// ─── JSON Lines ─────────────────────────────────────────────────────────────

/// Write one JSON object per row.
pub fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    let mut out = std::io::BufWriter::new(file);
    for row in rows {
        let line = serde_json::to_string(row)?;
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}
