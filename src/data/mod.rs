//! Data module - file loading and series parsing

mod loader;
mod parser;

pub use loader::{FileLoader, FileSource, LoadResult};
#[cfg(test)]
pub use loader::LoaderError;
pub use parser::{parse_series, ParseError, TimeSeries};
