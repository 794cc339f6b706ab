//! A parsed calculation and the queries asked of it.

use crate::config::Options;
use crate::outcar::{Configuration, FileLoader, Loader, Spin, StateRecord, TextLoader};
use crate::select::{BandGap, Extremum, Selector};
use crate::trace::{LogObserver, Observer};
use crate::Result;
use std::cell::OnceCell;
use std::path::PathBuf;

/// Owns a configuration source and memoizes what it produces.
///
/// The loader runs on the first query that needs states. A successful result
/// is kept for the lifetime of the session and only ever read afterwards; a
/// failed load is not cached, so the next query tries again.
pub struct ElectronicStructure {
    loader: Box<dyn Loader>,
    options: Options,
    observer: Box<dyn Observer>,
    configuration: OnceCell<Configuration>,
}

impl ElectronicStructure {
    pub fn new(loader: impl Loader + 'static, options: Options) -> Self {
        Self {
            loader: Box::new(loader),
            options,
            observer: Box::new(LogObserver),
            configuration: OnceCell::new(),
        }
    }

    /// Session over an OUTCAR file; `options.polarized` picks the table layout.
    pub fn open(path: impl Into<PathBuf>, options: Options) -> Self {
        Self::new(FileLoader::new(path, options.polarized), options)
    }

    pub fn from_text(text: impl Into<String>, options: Options) -> Self {
        Self::new(TextLoader::new(text, options.polarized), options)
    }

    /// Session over states built elsewhere.
    pub fn from_configuration(configuration: Configuration, options: Options) -> Self {
        let options = Options {
            polarized: configuration.is_polarized(),
            ..options
        };
        Self::new(configuration, options)
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn configuration(&self) -> Result<&Configuration> {
        if let Some(cfg) = self.configuration.get() {
            return Ok(cfg);
        }
        let cfg = self.loader.load(self.observer.as_ref())?;
        Ok(self.configuration.get_or_init(|| cfg))
    }

    fn selector(&self) -> Selector<'_> {
        Selector::new(self.options.occupancy, self.observer.as_ref())
    }

    /// Occupied or unoccupied states of one channel (`None` when unpolarized).
    pub fn states_with(&self, spin: Option<Spin>, occupied: bool) -> Result<Vec<StateRecord>> {
        self.selector()
            .channel_states(self.configuration()?, spin, occupied)
    }

    pub fn occupied_states(&self, spin: Option<Spin>) -> Result<Vec<StateRecord>> {
        self.states_with(spin, true)
    }

    pub fn unoccupied_states(&self, spin: Option<Spin>) -> Result<Vec<StateRecord>> {
        self.states_with(spin, false)
    }

    pub fn nth_most_energetic_with(
        &self,
        n: usize,
        spin: Option<Spin>,
        occupied: bool,
    ) -> Result<StateRecord> {
        let states = self.states_with(spin, occupied)?;
        self.selector().nth_extremal(&states, n, Extremum::Most)
    }

    pub fn nth_least_energetic_with(
        &self,
        n: usize,
        spin: Option<Spin>,
        occupied: bool,
    ) -> Result<StateRecord> {
        let states = self.states_with(spin, occupied)?;
        self.selector().nth_extremal(&states, n, Extremum::Least)
    }

    /// `n`th extremal state regardless of spin; UP precedes DOWN on ties.
    pub fn nth_extremal(&self, n: usize, extremum: Extremum, occupied: bool) -> Result<StateRecord> {
        self.selector()
            .nth_extremal_across_spins(self.configuration()?, n, extremum, occupied)
    }

    pub fn nth_most_energetic(&self, n: usize, occupied: bool) -> Result<StateRecord> {
        self.nth_extremal(n, Extremum::Most, occupied)
    }

    pub fn nth_least_energetic(&self, n: usize, occupied: bool) -> Result<StateRecord> {
        self.nth_extremal(n, Extremum::Least, occupied)
    }

    pub fn homo(&self) -> Result<StateRecord> {
        self.selector().homo(self.configuration()?)
    }

    pub fn lumo(&self) -> Result<StateRecord> {
        self.selector().lumo(self.configuration()?)
    }

    pub fn band_gap(&self) -> Result<BandGap> {
        self.selector().band_gap(self.configuration()?)
    }

    pub fn net_spin(&self) -> Result<f64> {
        self.selector().net_spin(self.configuration()?)
    }

    pub fn states_about_fermi_level(&self, below: usize, above: usize) -> Result<Vec<StateRecord>> {
        self.selector()
            .states_about_fermi_level(self.configuration()?, below, above)
    }

    pub fn excited_state(&self, n: i64) -> Result<StateRecord> {
        self.selector().excited_state(self.configuration()?, n)
    }
}
