//! Autopia Datatables
//!
//! Test data lives in `.xlsx` workbooks. Each datasheet starts with a header
//! row; the first column holds the test case name, and iterative datatables
//! add the iteration (column 1) and sub-iteration (column 2) numbers.
//!
//! Three flavours are provided:
//! - [`NonIterativeDatatable`]: one row per test case
//! - [`IterativeDatatable`]: one row per test case iteration
//! - [`SubIterativeDatatable`]: one row per sub-iteration of an iteration

mod iterative;
mod lookup;
mod non_iterative;
mod selector;
mod sub_iterative;

use autopia_common::{FrameworkType, Result};
use std::path::{Path, PathBuf};

pub use crate::lookup::{
    CHECKPOINTS_SHEET, COMMON_TESTDATA_SHEET, COMMON_TESTDATA_WORKBOOK,
    DEFAULT_DATA_REFERENCE_IDENTIFIER,
};
pub use iterative::IterativeDatatable;
pub use non_iterative::NonIterativeDatatable;
pub use selector::RowSelector;
pub use sub_iterative::SubIterativeDatatable;

/// Datatable for simple, single-row-per-test scripts
pub type SimpleDatatable = NonIterativeDatatable;
/// Datatable used by modular scripts
pub type ModularDatatable = IterativeDatatable;
/// Datatable used by keyword-driven scripts
pub type KeywordDatatable = SubIterativeDatatable;

/// Access to the test data of the current test script
pub trait Datatable: Send {
    /// Folder containing the datatable workbooks
    fn datatable_path(&self) -> &Path;

    /// Name of the workbook, without extension
    fn datatable_name(&self) -> &str;

    /// Change the prefix marking references into the common test data
    fn set_data_reference_identifier(&mut self, identifier: &str) -> Result<()>;

    /// Select the row used by subsequent lookups
    fn set_current_row(&mut self, selector: RowSelector) -> Result<()>;

    fn current_iteration(&self) -> u32;

    /// Value of `field` for the current row of `datasheet`
    ///
    /// Values starting with the data reference identifier are resolved
    /// against the common test data workbook.
    fn get_data(&self, datasheet: &str, field: &str) -> Result<String>;

    /// Store `value` under `field` for the current row of `datasheet`
    fn put_data(&self, datasheet: &str, field: &str, value: &str) -> Result<()>;

    /// Expected value of `field` for the current row
    fn get_expected_result(&self, field: &str) -> Result<String>;
}

/// Datatable matching the way a framework type organizes its test data
pub fn datatable_for(
    framework_type: FrameworkType,
    path: impl Into<PathBuf>,
    name: impl Into<String>,
) -> Box<dyn Datatable> {
    match framework_type {
        FrameworkType::KeywordDriven => Box::new(SubIterativeDatatable::new(path, name)),
        FrameworkType::Modular => Box::new(IterativeDatatable::new(path, name)),
    }
}
