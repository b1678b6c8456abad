//! Command implementations.

pub mod fmt;

pub use fmt::{run_format, FormatConfig, Mode};
