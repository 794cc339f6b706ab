use crate::error::Error;
use crate::outcar::parse::Parser;
use crate::outcar::record::Configuration;
use crate::trace::{Observer, TraceEvent};
use crate::Result;
use std::fs;
use std::path::PathBuf;

/// Source of a `Configuration`. Sessions call `load` at most once.
pub trait Loader {
    fn load(&self, observer: &dyn Observer) -> Result<Configuration>;
}

/// Reads and parses an OUTCAR file.
#[derive(Debug, Clone)]
pub struct FileLoader {
    pub path: PathBuf,
    pub polarized: bool,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>, polarized: bool) -> Self {
        Self {
            path: path.into(),
            polarized,
        }
    }
}

impl Loader for FileLoader {
    fn load(&self, observer: &dyn Observer) -> Result<Configuration> {
        let source = self.path.display().to_string();
        observer.event(&TraceEvent::Loading { source: &source });

        let text = fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        Parser::new(observer)?.parse(&text, self.polarized)
    }
}

/// Parses text that is already in memory.
#[derive(Debug, Clone)]
pub struct TextLoader {
    pub text: String,
    pub polarized: bool,
}

impl TextLoader {
    pub fn new(text: impl Into<String>, polarized: bool) -> Self {
        Self {
            text: text.into(),
            polarized,
        }
    }
}

impl Loader for TextLoader {
    fn load(&self, observer: &dyn Observer) -> Result<Configuration> {
        observer.event(&TraceEvent::Loading { source: "<memory>" });
        Parser::new(observer)?.parse(&self.text, self.polarized)
    }
}

/// An already built configuration injected directly, bypassing any text.
impl Loader for Configuration {
    fn load(&self, _observer: &dyn Observer) -> Result<Configuration> {
        Ok(self.clone())
    }
}
