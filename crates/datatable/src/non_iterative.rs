use autopia_common::{AutopiaError, Result};
use std::path::{Path, PathBuf};
use tracing::error;

use crate::lookup::{DatatableCore, Depth};
use crate::{Datatable, RowSelector};

/// Datatable with a single row per test case
#[derive(Debug, Clone)]
pub struct NonIterativeDatatable {
    core: DatatableCore,
}

impl NonIterativeDatatable {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            core: DatatableCore::new(path.into(), name.into(), Depth::TestCase),
        }
    }

    pub fn current_testcase(&self) -> Option<&str> {
        self.core.testcase()
    }

    pub fn data_reference_identifier(&self) -> &str {
        self.core.identifier()
    }
}

impl Datatable for NonIterativeDatatable {
    fn datatable_path(&self) -> &Path {
        self.core.path()
    }

    fn datatable_name(&self) -> &str {
        self.core.name()
    }

    fn set_data_reference_identifier(&mut self, identifier: &str) -> Result<()> {
        self.core.set_identifier(identifier)
    }

    fn set_current_row(&mut self, selector: RowSelector) -> Result<()> {
        let message = match selector.arity() {
            0 => {
                self.core.set_row(selector.testcase, 0, 0);
                return Ok(());
            }
            1 => "setCurrentRow(): Unrecognized integer argument!",
            _ => "setCurrentRow(): Unrecognized integer arguments!",
        };
        error!("{}", message);
        Err(AutopiaError::autopia(message))
    }

    /// Always 1, a single row serves every iteration
    fn current_iteration(&self) -> u32 {
        1
    }

    fn get_data(&self, datasheet: &str, field: &str) -> Result<String> {
        self.core.get_data(datasheet, field)
    }

    fn put_data(&self, datasheet: &str, field: &str, value: &str) -> Result<()> {
        self.core.put_data(datasheet, field, value)
    }

    fn get_expected_result(&self, field: &str) -> Result<String> {
        self.core.get_expected_result(field)
    }
}
