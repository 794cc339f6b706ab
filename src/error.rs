//! Error taxonomy shared by the parser, the selector and the session.

use crate::outcar::Spin;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required anchor, header or separator is absent from the input.
    #[error("missing section '{section}': anchor {anchor:?} not found")]
    MissingSection {
        section: &'static str,
        anchor: &'static str,
    },

    /// Requested rank exceeds the states left after filtering (or is zero).
    #[error("requested state #{requested} but only {available} states are available")]
    Rank { requested: usize, available: usize },

    /// The band directly above the channel's valence state does not exist.
    #[error("no conduction state after band {band_index} in spin channel {spin}")]
    NoConductionState { spin: Spin, band_index: u32 },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("line {line}: cannot convert {token:?} to {kind}")]
    Conversion {
        line: usize,
        token: String,
        kind: &'static str,
    },

    #[error("invalid row pattern")]
    Pattern(#[from] regex::Error),

    #[error("read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
