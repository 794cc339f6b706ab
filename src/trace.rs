//! Structured trace events emitted by the parser, selector and session.
//!
//! Components receive an `&dyn Observer` instead of consulting a global
//! verbosity switch. `LogObserver` forwards to the `log` facade, so the host
//! application decides what is shown through its logger configuration.

use crate::outcar::Spin;
use crate::select::Extremum;

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent<'a> {
    /// About to read a source (file path or a label for in-memory text).
    Loading { source: &'a str },
    /// A table region was located.
    SectionFound { spin: Spin, anchor: &'static str },
    /// A line matched the row pattern but mentions a k-point.
    KPointSkipped { spin: Spin, line: usize },
    /// A table region was fully scanned.
    ChannelParsed { spin: Spin, states: usize },
    Filtered {
        occupied: bool,
        kept: usize,
        total: usize,
    },
    Ranking {
        n: usize,
        extremum: Extremum,
        candidates: usize,
    },
    ValenceSelected {
        spin: Spin,
        band_index: u32,
        energy: f64,
    },
    ConductionSelected {
        spin: Spin,
        band_index: u32,
        energy: f64,
    },
}

pub trait Observer {
    fn event(&self, event: &TraceEvent<'_>);
}

/// Forwards events to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn event(&self, event: &TraceEvent<'_>) {
        match event {
            TraceEvent::Loading { source } => {
                log::info!("reading electronic configuration from {source}")
            }
            TraceEvent::SectionFound { spin, anchor } => {
                log::debug!("spin={spin} section located at anchor {anchor:?}")
            }
            TraceEvent::KPointSkipped { spin, line } => {
                log::debug!("spin={spin} line={line} ignoring k-point line")
            }
            TraceEvent::ChannelParsed { spin, states } => {
                log::info!("spin={spin} parsed {states} states")
            }
            TraceEvent::Filtered {
                occupied,
                kept,
                total,
            } => log::debug!("occupied={occupied} kept {kept}/{total} states"),
            TraceEvent::Ranking {
                n,
                extremum,
                candidates,
            } => log::debug!("selecting #{n} {extremum} energetic of {candidates} states"),
            TraceEvent::ValenceSelected {
                spin,
                band_index,
                energy,
            } => log::info!("spin={spin} valence band {band_index} at {energy}"),
            TraceEvent::ConductionSelected {
                spin,
                band_index,
                energy,
            } => log::info!("spin={spin} conduction band {band_index} at {energy}"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn event(&self, _event: &TraceEvent<'_>) {}
}
