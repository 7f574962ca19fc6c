use autopia_common::{AutopiaError, Result};
use std::path::{Path, PathBuf};
use tracing::error;

use crate::lookup::{DatatableCore, Depth};
use crate::{Datatable, RowSelector};

/// Datatable with one row per sub-iteration of a test case iteration
///
/// Keyword-driven scripts call the same business component several times
/// within one iteration; each call reads its own sub-iteration row.
#[derive(Debug, Clone)]
pub struct SubIterativeDatatable {
    core: DatatableCore,
}

impl SubIterativeDatatable {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            core: DatatableCore::new(path.into(), name.into(), Depth::SubIteration),
        }
    }

    pub fn current_testcase(&self) -> Option<&str> {
        self.core.testcase()
    }

    pub fn current_sub_iteration(&self) -> u32 {
        self.core.sub_iteration()
    }

    pub fn data_reference_identifier(&self) -> &str {
        self.core.identifier()
    }
}

impl Datatable for SubIterativeDatatable {
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
            (Some(iteration), Some(sub_iteration)) => {
                self.core.set_row(selector.testcase, iteration, sub_iteration);
                return Ok(());
            }
            (None, None) => {
                "setCurrentRow(): Missing arguments 'currentIteration' & 'currentSubIteration'!"
            }
            (Some(_), None) => "setCurrentRow(): Missing argument 'currentSubIteration'!",
            (None, Some(_)) => "setCurrentRow(): Missing argument 'currentIteration'!",
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
