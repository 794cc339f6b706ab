//! Session options, loadable from JSON.
//!
//! JSON shape (every field optional):
//! {
//!   "polarized": true,
//!   "occupancy": { "policy": "cutoff", "threshold": 0.1 }
//! }

use anyhow::{Context, bail};
use serde::Deserialize;
use std::fs;

/// Decides whether a state counts as occupied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum OccupancyPolicy {
    /// Any nonzero occupation is occupied.
    #[default]
    Nonzero,
    /// Occupied iff `occupation >= threshold`.
    Cutoff { threshold: f64 },
}

impl OccupancyPolicy {
    pub fn is_occupied(&self, occupation: f64) -> bool {
        match *self {
            OccupancyPolicy::Nonzero => occupation != 0.0,
            OccupancyPolicy::Cutoff { threshold } => occupation >= threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Read two spin channels instead of a single table.
    pub polarized: bool,
    pub occupancy: OccupancyPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            polarized: true,
            occupancy: OccupancyPolicy::default(),
        }
    }
}

impl Options {
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let options: Options = serde_json::from_str(text).context("parse options JSON")?;
        if let OccupancyPolicy::Cutoff { threshold } = options.occupancy {
            if !threshold.is_finite() || threshold <= 0.0 {
                bail!("occupancy cutoff must be a positive finite number, got {}", threshold);
            }
        }
        Ok(options)
    }

    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read options file {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("bad options file {}", path))
    }
}
