use serde::Serialize;
use std::fmt;

/// Spin channel a state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Spin {
    None,
    Up,
    Down,
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spin::None => write!(f, "none"),
            Spin::Up => write!(f, "up"),
            Spin::Down => write!(f, "down"),
        }
    }
}

/// A single row of an eigenvalue/occupation table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateRecord {
    /// 1-based ordinal as printed in the table; unique only within a channel.
    pub band_index: u32,
    pub energy: f64,
    pub occupation: f64,
    pub spin: Spin,
}

/// Parsed electronic configuration of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
    Unpolarized(Vec<StateRecord>),
    Polarized {
        up: Vec<StateRecord>,
        down: Vec<StateRecord>,
    },
}

impl Configuration {
    pub fn is_polarized(&self) -> bool {
        matches!(self, Configuration::Polarized { .. })
    }

    /// States of one channel. `Spin::None` addresses the unpolarized table.
    pub fn channel(&self, spin: Spin) -> Option<&[StateRecord]> {
        match (self, spin) {
            (Configuration::Unpolarized(states), Spin::None) => Some(states),
            (Configuration::Polarized { up, .. }, Spin::Up) => Some(up),
            (Configuration::Polarized { down, .. }, Spin::Down) => Some(down),
            _ => None,
        }
    }

    /// Channels in their fixed order (UP before DOWN).
    pub fn channels(&self) -> Vec<(Spin, &[StateRecord])> {
        match self {
            Configuration::Unpolarized(states) => vec![(Spin::None, states.as_slice())],
            Configuration::Polarized { up, down } => {
                vec![(Spin::Up, up.as_slice()), (Spin::Down, down.as_slice())]
            }
        }
    }

    /// Every state, channel by channel.
    pub fn all(&self) -> Vec<StateRecord> {
        self.channels()
            .into_iter()
            .flat_map(|(_, states)| states.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.channels().iter().map(|(_, s)| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
