//! Stats module - summary statistics of the visible data

mod summary;

pub use summary::SeriesSummary;
