//! Autopia Common Library
//!
//! Shared error types, framework configuration, time helpers and spreadsheet
//! access used by the datatable and reporting crates.

pub mod config;
pub mod error;
pub mod excel;
mod properties;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use config::{FrameworkParameters, RunContext, Settings, StopSignal};
pub use error::{AutopiaError, Result};
pub use excel::{ExcelCellFormatting, ExcelDataAccess, DATATABLE_WRITE_LOCK};
pub use types::*;

/// Autopia version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
