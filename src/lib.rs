//! Parse electronic configurations (band energies and occupations) from VASP
//! OUTCAR text and rank the states they contain.
//!
//! ```text
//!  OUTCAR text
//!       │
//!       ▼
//!  ┌─────────┐
//!  │ outcar  │  anchors → table region → StateRecord rows
//!  └─────────┘
//!       │  Configuration (memoized by ElectronicStructure)
//!       ▼
//!  ┌─────────┐
//!  │ select  │  occupation filter, ranking, HOMO/LUMO, band gap
//!  └─────────┘
//!       │
//!       ▼
//!  ┌─────────┐
//!  │ report  │  serde-serializable summary for renderers
//!  └─────────┘
//! ```

pub mod config;
pub mod error;
pub mod outcar;
pub mod report;
pub mod select;
pub mod session;
pub mod trace;

pub use config::{OccupancyPolicy, Options};
pub use error::Error;
pub use outcar::{Configuration, Spin, StateRecord};
pub use report::{Report, build_report, render_json};
pub use select::{BandGap, Extremum, Selector};
pub use session::ElectronicStructure;

pub type Result<T> = std::result::Result<T, Error>;
