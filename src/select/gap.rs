use crate::error::Error;
use crate::outcar::{Configuration, Spin, StateRecord};
use crate::select::{Extremum, Selector};
use crate::trace::TraceEvent;
use crate::Result;
use serde::Serialize;

/// Valence/conduction pair and the signed gap between them.
///
/// A negative `gap` means the conduction state lies below the valence state
/// and is reported as is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandGap {
    pub valence: StateRecord,
    pub conduction: StateRecord,
    pub gap: f64,
}

impl BandGap {
    fn new(valence: StateRecord, conduction: StateRecord) -> Self {
        Self {
            valence,
            conduction,
            gap: conduction.energy - valence.energy,
        }
    }
}

impl Selector<'_> {
    /// Band gap of the configuration.
    ///
    /// Without spin polarization this is LUMO - HOMO. With two channels each
    /// channel contributes its highest occupied state and the band right
    /// above it; the higher valence and the lower conduction state are kept.
    pub fn band_gap(&self, cfg: &Configuration) -> Result<BandGap> {
        match cfg {
            Configuration::Unpolarized(_) => Ok(BandGap::new(self.homo(cfg)?, self.lumo(cfg)?)),
            Configuration::Polarized { up, down } => {
                let (valence_up, conduction_up) = self.channel_edges(Spin::Up, up)?;
                let (valence_down, conduction_down) = self.channel_edges(Spin::Down, down)?;

                let valence = if valence_down.energy > valence_up.energy {
                    valence_down
                } else {
                    valence_up
                };
                let conduction = if conduction_down.energy < conduction_up.energy {
                    conduction_down
                } else {
                    conduction_up
                };
                Ok(BandGap::new(valence, conduction))
            }
        }
    }

    /// Highest occupied state of one channel and its successor band.
    fn channel_edges(
        &self,
        spin: Spin,
        states: &[StateRecord],
    ) -> Result<(StateRecord, StateRecord)> {
        let occupied = self.filter_by_occupation(states, true);
        let valence = self.nth_extremal(&occupied, 1, Extremum::Most)?;
        self.observer.event(&TraceEvent::ValenceSelected {
            spin,
            band_index: valence.band_index,
            energy: valence.energy,
        });

        let conduction = valence
            .band_index
            .checked_add(1)
            .and_then(|next| states.iter().find(|s| s.band_index == next))
            .copied()
            .ok_or(Error::NoConductionState {
                spin,
                band_index: valence.band_index,
            })?;
        self.observer.event(&TraceEvent::ConductionSelected {
            spin,
            band_index: conduction.band_index,
            energy: conduction.energy,
        });
        Ok((valence, conduction))
    }
}
