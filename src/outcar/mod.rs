//! OUTCAR eigenvalue/occupation tables: records, parsing and loading.

pub mod load;
pub mod parse;
pub mod record;

pub use load::{FileLoader, Loader, TextLoader};
pub use parse::{Parser, parse};
pub use record::{Configuration, Spin, StateRecord};
