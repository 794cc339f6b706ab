//! Plain-data summary handed to diagram renderers.

use crate::outcar::{Configuration, StateRecord};
use crate::select::BandGap;
use crate::session::ElectronicStructure;
use crate::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub polarized: bool,
    pub configuration: Configuration,
    pub homo: StateRecord,
    pub lumo: StateRecord,
    pub band_gap: BandGap,
    /// Only present for spin-polarized runs.
    pub net_spin: Option<f64>,
    /// Unoccupied states above the gap (highest first), then occupied ones.
    pub fermi_window: Vec<StateRecord>,
}

/// Collect the headline quantities of a session.
///
/// `below`/`above` size the window of states around the Fermi level.
pub fn build_report(session: &ElectronicStructure, below: usize, above: usize) -> Result<Report> {
    let configuration = session.configuration()?.clone();
    let polarized = configuration.is_polarized();

    let net_spin = if polarized {
        Some(session.net_spin()?)
    } else {
        None
    };

    Ok(Report {
        polarized,
        homo: session.homo()?,
        lumo: session.lumo()?,
        band_gap: session.band_gap()?,
        net_spin,
        fermi_window: session.states_about_fermi_level(below, above)?,
        configuration,
    })
}

/// Serialize a report as pretty-printed JSON.
pub fn render_json(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

impl ElectronicStructure {
    pub fn report(&self, below: usize, above: usize) -> Result<Report> {
        build_report(self, below, above)
    }
}
