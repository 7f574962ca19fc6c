//! Row lookup shared by all datatable flavours

use autopia_common::excel::EXCEL_EXTENSION;
use autopia_common::{AutopiaError, ExcelDataAccess, Result, DATATABLE_WRITE_LOCK};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Workbook holding data shared between test cases
pub const COMMON_TESTDATA_WORKBOOK: &str = "Common Testdata";
/// Sheet within [`COMMON_TESTDATA_WORKBOOK`] holding the shared rows
pub const COMMON_TESTDATA_SHEET: &str = "Common_Testdata";
/// Sheet holding expected results
pub const CHECKPOINTS_SHEET: &str = "Parametrized_Checkpoints";
/// Prefix marking a value as a reference into the common test data
pub const DEFAULT_DATA_REFERENCE_IDENTIFIER: &str = "#";

/// How many key columns a datatable uses to identify a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Depth {
    TestCase,
    Iteration,
    SubIteration,
}

/// Sheet a lookup runs against, used to word lookup errors
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    TestData(&'a str),
    Checkpoints,
}

impl Target<'_> {
    fn sheet(&self) -> &str {
        match self {
            Target::TestData(sheet) => sheet,
            Target::Checkpoints => CHECKPOINTS_SHEET,
        }
    }

    fn location(&self) -> String {
        match self {
            Target::TestData(sheet) => format!("the test data sheet \"{}\"", sheet),
            Target::Checkpoints => "the parametrized checkpoints sheet".to_string(),
        }
    }
}

fn lookup_error(message: String) -> AutopiaError {
    error!("{}", message);
    AutopiaError::autopia(message)
}

#[derive(Debug, Clone)]
pub(crate) struct DatatableCore {
    path: PathBuf,
    name: String,
    identifier: String,
    depth: Depth,
    testcase: Option<String>,
    iteration: u32,
    sub_iteration: u32,
}

impl DatatableCore {
    pub(crate) fn new(path: PathBuf, name: String, depth: Depth) -> Self {
        info!(
            "Initializing datatable @ {}",
            path.join(format!("{}.{}", name, EXCEL_EXTENSION)).display()
        );
        Self {
            path,
            name,
            identifier: DEFAULT_DATA_REFERENCE_IDENTIFIER.to_string(),
            depth,
            testcase: None,
            iteration: 0,
            sub_iteration: 0,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn iteration(&self) -> u32 {
        self.iteration
    }

    pub(crate) fn sub_iteration(&self) -> u32 {
        self.sub_iteration
    }

    pub(crate) fn testcase(&self) -> Option<&str> {
        self.testcase.as_deref()
    }

    pub(crate) fn set_identifier(&mut self, identifier: &str) -> Result<()> {
        if identifier.chars().count() != 1 {
            return Err(lookup_error(
                "The data reference identifier must be a single character!".to_string(),
            ));
        }
        self.identifier = identifier.to_string();
        Ok(())
    }

    pub(crate) fn set_row(&mut self, testcase: String, iteration: u32, sub_iteration: u32) {
        debug!(
            "Setting current row: {}, {}, {}",
            testcase, iteration, sub_iteration
        );
        self.testcase = Some(testcase);
        self.iteration = iteration;
        self.sub_iteration = sub_iteration;
    }

    fn check_prerequisites(&self) -> Result<&str> {
        let testcase = match self.testcase.as_deref() {
            Some(testcase) => testcase,
            None => return Err(lookup_error("The currentTestCase is not set!".to_string())),
        };
        if self.depth >= Depth::Iteration && self.iteration == 0 {
            return Err(lookup_error("The currentIteration is not set!".to_string()));
        }
        if self.depth >= Depth::SubIteration && self.sub_iteration == 0 {
            return Err(lookup_error("The currentSubIteration is not set!".to_string()));
        }
        Ok(testcase)
    }

    /// Find the current row: the test case in column 0 (below the header),
    /// then the iteration in column 1 and the sub-iteration in column 2,
    /// each scan starting at the row found by the previous one.
    fn locate(&self, access: &mut ExcelDataAccess, target: Target<'_>) -> Result<usize> {
        let testcase = self.check_prerequisites()?;
        access.set_datasheet_name(target.sheet());

        let mut row = match access.row_num(testcase, 0, 1)? {
            Some(row) => row,
            None => {
                return Err(lookup_error(format!(
                    "The test case \"{}\" is not found in {}!",
                    testcase,
                    target.location()
                )))
            }
        };

        if self.depth >= Depth::Iteration {
            row = match access.row_num(&self.iteration.to_string(), 1, row)? {
                Some(row) => row,
                None => {
                    return Err(lookup_error(format!(
                        "The iteration number \"{}\" of the test case \"{}\" is not found in {}!",
                        self.iteration,
                        testcase,
                        target.location()
                    )))
                }
            };
        }

        if self.depth >= Depth::SubIteration {
            row = match access.row_num(&self.sub_iteration.to_string(), 2, row)? {
                Some(row) => row,
                None => {
                    return Err(lookup_error(format!(
                        "The sub iteration number \"{}\" under iteration number \"{}\" of the test case \"{}\" is not found in {}!",
                        self.sub_iteration,
                        self.iteration,
                        testcase,
                        target.location()
                    )))
                }
            };
        }

        Ok(row)
    }

    fn access(&self) -> ExcelDataAccess {
        ExcelDataAccess::new(&self.path, &self.name)
    }

    pub(crate) fn get_data(&self, datasheet: &str, field: &str) -> Result<String> {
        let mut access = self.access();
        let row = self.locate(&mut access, Target::TestData(datasheet))?;
        let value = access.value(row, field)?;

        if value.starts_with(self.identifier.as_str()) {
            return self.common_data(field, &value);
        }
        Ok(value)
    }

    fn common_data(&self, field: &str, value: &str) -> Result<String> {
        let reference = value.split(self.identifier.as_str()).nth(1).unwrap_or("");

        let mut access = ExcelDataAccess::new(&self.path, COMMON_TESTDATA_WORKBOOK);
        access.set_datasheet_name(COMMON_TESTDATA_SHEET);

        match access.row_num(reference, 0, 1)? {
            Some(row) => {
                debug!(reference, field, "Resolved common test data");
                access.value(row, field)
            }
            None => Err(lookup_error(format!(
                "The common test data row identified by \"{}\" is not found in the common test data sheet!",
                reference
            ))),
        }
    }

    pub(crate) fn put_data(&self, datasheet: &str, field: &str, value: &str) -> Result<()> {
        // hold the lock across load, update and save
        let _guard = DATATABLE_WRITE_LOCK.lock();

        let mut access = self.access();
        let row = self.locate(&mut access, Target::TestData(datasheet))?;
        access.set_value(row, field, value, None)?;
        access.save()?;

        debug!(datasheet, field, row, "Stored test data");
        Ok(())
    }

    pub(crate) fn get_expected_result(&self, field: &str) -> Result<String> {
        let mut access = self.access();
        let row = self.locate(&mut access, Target::Checkpoints)?;
        access.value(row, field)
    }
}
