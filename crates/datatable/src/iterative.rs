use autopia_common::{AutopiaError, Result};
use std::path::{Path, PathBuf};
use tracing::error;

use crate::lookup::{DatatableCore, Depth};
use crate::{Datatable, RowSelector};

/// Datatable with one row per iteration of a test case
#[derive(Debug, Clone)]
pub struct IterativeDatatable {
    core: DatatableCore,
}

impl IterativeDatatable {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            core: DatatableCore::new(path.into(), name.into(), Depth::Iteration),
        }
    }

    pub fn current_testcase(&self) -> Option<&str> {
        self.core.testcase()
    }

    pub fn data_reference_identifier(&self) -> &str {
        self.core.identifier()
    }
}

impl Datatable for IterativeDatatable {
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
        let message = match (selector.iteration, selector.sub_iteration) {
            (Some(iteration), None) => {
                self.core.set_row(selector.testcase, iteration, 0);
                return Ok(());
            }
            (None, None) => "setCurrentRow(): Missing argument 'currentIteration'!",
            _ => "setCurrentRow(): Unrecognized integer argument!",
        };
        error!("{}", message);
        Err(AutopiaError::autopia(message))
    }

    fn current_iteration(&self) -> u32 {
        self.core.iteration()
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
