//! Ranking and extremal-state queries over parsed configurations.
//!
//! Every query works on an immutable view of the configuration and builds
//! its own working copies, so the cached configuration is never touched.
//! Ranking is a stable sort on energy: among equal energies the state met
//! first (UP before DOWN when channels are merged) wins.

pub mod gap;

pub use gap::BandGap;

use crate::config::OccupancyPolicy;
use crate::error::Error;
use crate::outcar::{Configuration, Spin, StateRecord};
use crate::trace::{Observer, TraceEvent};
use crate::Result;
use std::cmp::Ordering;
use std::fmt;

/// Which end of the energy axis a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Most,
    Least,
}

impl Extremum {
    /// Orders two energies so that the preferred one comes first.
    fn compare(self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Extremum::Most => ord.reverse(),
            Extremum::Least => ord,
        }
    }
}

impl fmt::Display for Extremum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extremum::Most => write!(f, "most"),
            Extremum::Least => write!(f, "least"),
        }
    }
}

pub struct Selector<'o> {
    policy: OccupancyPolicy,
    observer: &'o dyn Observer,
}

impl<'o> Selector<'o> {
    pub fn new(policy: OccupancyPolicy, observer: &'o dyn Observer) -> Self {
        Self { policy, observer }
    }

    pub fn policy(&self) -> OccupancyPolicy {
        self.policy
    }

    /// Keep occupied (or unoccupied) states, in their original order.
    pub fn filter_by_occupation(&self, states: &[StateRecord], occupied: bool) -> Vec<StateRecord> {
        let kept: Vec<StateRecord> = states
            .iter()
            .filter(|s| self.policy.is_occupied(s.occupation) == occupied)
            .copied()
            .collect();
        self.observer.event(&TraceEvent::Filtered {
            occupied,
            kept: kept.len(),
            total: states.len(),
        });
        kept
    }

    /// All states ordered from the most (or least) energetic onwards.
    pub fn ranked(&self, states: &[StateRecord], extremum: Extremum) -> Vec<StateRecord> {
        let mut ranked = states.to_vec();
        // Stable: equal energies keep their encounter order.
        ranked.sort_by(|a, b| extremum.compare(a.energy, b.energy));
        ranked
    }

    /// The `n`th (1-based) most or least energetic state of `states`.
    pub fn nth_extremal(
        &self,
        states: &[StateRecord],
        n: usize,
        extremum: Extremum,
    ) -> Result<StateRecord> {
        self.observer.event(&TraceEvent::Ranking {
            n,
            extremum,
            candidates: states.len(),
        });
        if n == 0 || n > states.len() {
            return Err(Error::Rank {
                requested: n,
                available: states.len(),
            });
        }
        Ok(self.ranked(states, extremum)[n - 1])
    }

    /// States of one channel filtered by occupation.
    ///
    /// Polarized configurations need `Some(Spin::Up | Spin::Down)`,
    /// unpolarized ones need `None`.
    pub fn channel_states(
        &self,
        cfg: &Configuration,
        spin: Option<Spin>,
        occupied: bool,
    ) -> Result<Vec<StateRecord>> {
        let states = match (cfg, spin) {
            (Configuration::Unpolarized(states), None) => states.as_slice(),
            (Configuration::Polarized { up, .. }, Some(Spin::Up)) => up.as_slice(),
            (Configuration::Polarized { down, .. }, Some(Spin::Down)) => down.as_slice(),
            (Configuration::Polarized { .. }, _) => {
                return Err(Error::Configuration(
                    "spin must be up or down for a spin-polarized configuration".to_string(),
                ));
            }
            (Configuration::Unpolarized(_), Some(spin)) => {
                return Err(Error::Configuration(format!(
                    "spin {spin} requested from a configuration without spin polarization"
                )));
            }
        };
        Ok(self.filter_by_occupation(states, occupied))
    }

    /// Occupation-filtered states of every channel, UP before DOWN.
    pub fn merged_states(&self, cfg: &Configuration, occupied: bool) -> Vec<StateRecord> {
        cfg.channels()
            .into_iter()
            .flat_map(|(_, states)| self.filter_by_occupation(states, occupied))
            .collect()
    }

    /// `nth_extremal` over the merged channels.
    pub fn nth_extremal_across_spins(
        &self,
        cfg: &Configuration,
        n: usize,
        extremum: Extremum,
        occupied: bool,
    ) -> Result<StateRecord> {
        let states = self.merged_states(cfg, occupied);
        self.nth_extremal(&states, n, extremum)
    }

    /// Highest occupied state.
    pub fn homo(&self, cfg: &Configuration) -> Result<StateRecord> {
        self.nth_extremal_across_spins(cfg, 1, Extremum::Most, true)
    }

    /// Lowest unoccupied state.
    pub fn lumo(&self, cfg: &Configuration) -> Result<StateRecord> {
        self.nth_extremal_across_spins(cfg, 1, Extremum::Least, false)
    }

    /// |sum of occupied UP occupations - sum of occupied DOWN occupations|.
    pub fn net_spin(&self, cfg: &Configuration) -> Result<f64> {
        let Configuration::Polarized { up, down } = cfg else {
            return Err(Error::Configuration(
                "net spin requires a spin-polarized configuration".to_string(),
            ));
        };
        let total = |states: &[StateRecord]| -> f64 {
            self.filter_by_occupation(states, true)
                .iter()
                .map(|s| s.occupation)
                .sum()
        };
        Ok((total(up) - total(down)).abs())
    }

    /// States bracketing the Fermi level.
    ///
    /// The `above` lowest unoccupied states come first, listed from the
    /// highest of them down to the LUMO, followed by the `below` highest
    /// occupied states from the HOMO downwards.
    pub fn states_about_fermi_level(
        &self,
        cfg: &Configuration,
        below: usize,
        above: usize,
    ) -> Result<Vec<StateRecord>> {
        let unoccupied = self.ranked(&self.merged_states(cfg, false), Extremum::Least);
        let occupied = self.ranked(&self.merged_states(cfg, true), Extremum::Most);
        if above > unoccupied.len() {
            return Err(Error::Rank {
                requested: above,
                available: unoccupied.len(),
            });
        }
        if below > occupied.len() {
            return Err(Error::Rank {
                requested: below,
                available: occupied.len(),
            });
        }

        let mut out: Vec<StateRecord> = unoccupied[..above].iter().rev().copied().collect();
        out.extend_from_slice(&occupied[..below]);
        Ok(out)
    }

    /// Signed rank: `n > 0` is the nth highest occupied state, `n < 0` the
    /// |n|th lowest unoccupied one.
    pub fn excited_state(&self, cfg: &Configuration, n: i64) -> Result<StateRecord> {
        let rank = n.unsigned_abs() as usize;
        match n.signum() {
            1 => self.nth_extremal_across_spins(cfg, rank, Extremum::Most, true),
            -1 => self.nth_extremal_across_spins(cfg, rank, Extremum::Least, false),
            _ => Err(Error::Rank {
                requested: 0,
                available: cfg.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::NullObserver;
    use pretty_assertions::assert_eq;

    fn state(band_index: u32, energy: f64, occupation: f64, spin: Spin) -> StateRecord {
        StateRecord {
            band_index,
            energy,
            occupation,
            spin,
        }
    }

    fn selector() -> Selector<'static> {
        Selector::new(OccupancyPolicy::Nonzero, &NullObserver)
    }

    fn polarized() -> Configuration {
        Configuration::Polarized {
            up: vec![
                state(1, -2.0, 1.0, Spin::Up),
                state(2, -1.0, 1.0, Spin::Up),
                state(3, 0.5, 0.0, Spin::Up),
                state(4, 1.5, 0.0, Spin::Up),
            ],
            down: vec![
                state(1, -2.5, 1.0, Spin::Down),
                state(2, -0.9, 0.5, Spin::Down),
                state(3, 0.6, 0.0, Spin::Down),
            ],
        }
    }

    #[test]
    fn most_energetic_is_the_maximum() {
        let states = vec![
            state(1, -3.0, 2.0, Spin::None),
            state(2, 4.0, 2.0, Spin::None),
            state(3, 1.0, 2.0, Spin::None),
        ];
        let s = selector();
        assert_eq!(s.nth_extremal(&states, 1, Extremum::Most).unwrap().band_index, 2);
        assert_eq!(s.nth_extremal(&states, 2, Extremum::Most).unwrap().band_index, 3);
        assert_eq!(s.nth_extremal(&states, 1, Extremum::Least).unwrap().band_index, 1);
        assert_eq!(s.nth_extremal(&states, 3, Extremum::Least).unwrap().band_index, 2);
    }

    #[test]
    fn equal_energies_resolve_to_first_encountered() {
        let states = vec![
            state(1, 2.0, 2.0, Spin::None),
            state(2, -1.0, 2.0, Spin::None),
            state(3, 2.0, 2.0, Spin::None),
        ];
        let s = selector();
        assert_eq!(s.nth_extremal(&states, 1, Extremum::Most).unwrap().band_index, 1);
        assert_eq!(s.nth_extremal(&states, 2, Extremum::Most).unwrap().band_index, 3);

        let lows = vec![
            state(7, -5.0, 0.0, Spin::None),
            state(8, -5.0, 0.0, Spin::None),
        ];
        assert_eq!(s.nth_extremal(&lows, 1, Extremum::Least).unwrap().band_index, 7);
    }

    #[test]
    fn energies_out_of_band_order_are_sorted() {
        let states = vec![
            state(1, -1.0, 2.0, Spin::None),
            state(2, -1.5, 2.0, Spin::None),
            state(3, 0.2, 2.0, Spin::None),
        ];
        let ranked = selector().ranked(&states, Extremum::Least);
        let order: Vec<u32> = ranked.iter().map(|s| s.band_index).collect();
        assert_eq!(order, vec![2, 1, 3]);
        // the caller's slice keeps band order
        assert_eq!(states[0].band_index, 1);
    }

    #[test]
    fn rank_past_the_end_is_an_error() {
        let states = vec![state(1, -1.0, 2.0, Spin::None)];
        let s = selector();
        match s.nth_extremal(&states, 2, Extremum::Most) {
            Err(Error::Rank {
                requested,
                available,
            }) => {
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            other => panic!("expected rank error, got {other:?}"),
        }
        assert!(matches!(
            s.nth_extremal(&states, 0, Extremum::Most),
            Err(Error::Rank { requested: 0, .. })
        ));
        assert!(matches!(
            s.nth_extremal(&[], 1, Extremum::Least),
            Err(Error::Rank { available: 0, .. })
        ));
    }

    #[test]
    fn filter_splits_on_raw_occupation() {
        let states = vec![
            state(1, -1.0, 2.0, Spin::None),
            state(2, 0.0, 0.02, Spin::None),
            state(3, 1.0, 0.0, Spin::None),
        ];
        let s = selector();
        assert_eq!(s.filter_by_occupation(&states, true).len(), 2);
        assert_eq!(s.filter_by_occupation(&states, false), vec![states[2]]);

        let cutoff = Selector::new(OccupancyPolicy::Cutoff { threshold: 0.1 }, &NullObserver);
        assert_eq!(cutoff.filter_by_occupation(&states, true), vec![states[0]]);
        assert_eq!(cutoff.filter_by_occupation(&states, false).len(), 2);
    }

    #[test]
    fn cross_spin_ties_prefer_up() {
        let cfg = Configuration::Polarized {
            up: vec![state(1, -1.0, 1.0, Spin::Up)],
            down: vec![state(1, -1.0, 1.0, Spin::Down)],
        };
        let homo = selector().homo(&cfg).unwrap();
        assert_eq!(homo.spin, Spin::Up);
    }

    #[test]
    fn homo_and_lumo_span_both_channels() {
        let s = selector();
        let cfg = polarized();
        assert_eq!(s.homo(&cfg).unwrap(), state(2, -0.9, 0.5, Spin::Down));
        assert_eq!(s.lumo(&cfg).unwrap(), state(3, 0.5, 0.0, Spin::Up));
        assert_eq!(
            s.nth_extremal_across_spins(&cfg, 2, Extremum::Most, true).unwrap(),
            state(2, -1.0, 1.0, Spin::Up)
        );
    }

    #[test]
    fn channel_states_check_spin_argument() {
        let s = selector();
        let cfg = polarized();
        assert_eq!(s.channel_states(&cfg, Some(Spin::Down), true).unwrap().len(), 2);
        assert!(matches!(
            s.channel_states(&cfg, None, true),
            Err(Error::Configuration(_))
        ));

        let flat = Configuration::Unpolarized(vec![state(1, -1.0, 2.0, Spin::None)]);
        assert_eq!(s.channel_states(&flat, None, true).unwrap().len(), 1);
        assert!(matches!(
            s.channel_states(&flat, Some(Spin::Up), true),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn net_spin_is_absolute_difference() {
        let s = selector();
        let spin = s.net_spin(&polarized()).unwrap();
        assert!((spin - 0.5).abs() < 1.0e-12);

        let flat = Configuration::Unpolarized(vec![]);
        assert!(matches!(s.net_spin(&flat), Err(Error::Configuration(_))));
    }

    #[test]
    fn fermi_level_window_lists_unoccupied_then_occupied() {
        let s = selector();
        let window = s.states_about_fermi_level(&polarized(), 2, 2).unwrap();
        let energies: Vec<f64> = window.iter().map(|s| s.energy).collect();
        assert_eq!(energies, vec![0.6, 0.5, -0.9, -1.0]);

        assert!(matches!(
            s.states_about_fermi_level(&polarized(), 5, 0),
            Err(Error::Rank {
                requested: 5,
                available: 4
            })
        ));
    }

    #[test]
    fn excited_state_sign_selects_side() {
        let s = selector();
        let cfg = polarized();
        assert_eq!(s.excited_state(&cfg, 1).unwrap().energy, -0.9);
        assert_eq!(s.excited_state(&cfg, -1).unwrap().energy, 0.5);
        assert_eq!(s.excited_state(&cfg, -3).unwrap().energy, 1.5);
        assert!(matches!(s.excited_state(&cfg, 0), Err(Error::Rank { .. })));
    }
}
