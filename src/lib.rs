// EV Market Dataset Generator - Core Library
// Exposes all modules for use in the CLI and tests

pub mod config;
pub mod generator;
pub mod timeline;
pub mod writer;

// Re-export commonly used types
pub use config::{ConfigError, DatasetConfig, ModelSpec};
pub use generator::{DatasetRow, NationalAggregate, SeriesGenerator};
pub use timeline::{build_timeline, TimePeriod};
pub use writer::{csv_header, print_summary, write_csv, write_csv_to};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
