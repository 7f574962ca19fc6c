//! Datatable Commands

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use autopia_datatable::{
    Datatable, IterativeDatatable, NonIterativeDatatable, RowSelector, SubIterativeDatatable,
};

use crate::output::{print_item, print_success, OutputFormat, TableDisplay};

/// How rows of the datatable are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum DatatableKind {
    /// One row per test case
    NonIterative,
    /// One row per test case iteration
    #[default]
    Iterative,
    /// One row per sub-iteration
    SubIterative,
}

/// Datatable and row to operate on
#[derive(Debug, Args)]
pub struct RowArgs {
    /// Folder containing the datatable workbooks
    #[arg(long, env = "AUTOPIA_DATATABLE_PATH")]
    pub path: PathBuf,

    /// Workbook name, without extension
    #[arg(long)]
    pub name: String,

    /// Datatable flavour
    #[arg(long, value_enum, default_value_t = DatatableKind::Iterative)]
    pub kind: DatatableKind,

    /// Test case owning the row
    #[arg(long)]
    pub testcase: String,

    /// Iteration number
    #[arg(long)]
    pub iteration: Option<u32>,

    /// Sub-iteration number
    #[arg(long)]
    pub sub_iteration: Option<u32>,

    /// Prefix marking references into the common test data
    #[arg(long)]
    pub reference_identifier: Option<String>,
}

impl RowArgs {
    fn selector(&self) -> RowSelector {
        RowSelector {
            testcase: self.testcase.clone(),
            iteration: self.iteration,
            sub_iteration: self.sub_iteration,
        }
    }

    /// Open the datatable and select the requested row
    pub fn open(&self) -> Result<Box<dyn Datatable>> {
        let mut datatable: Box<dyn Datatable> = match self.kind {
            DatatableKind::NonIterative => Box::new(NonIterativeDatatable::new(&self.path, &self.name)),
            DatatableKind::Iterative => Box::new(IterativeDatatable::new(&self.path, &self.name)),
            DatatableKind::SubIterative => Box::new(SubIterativeDatatable::new(&self.path, &self.name)),
        };

        if let Some(identifier) = &self.reference_identifier {
            datatable.set_data_reference_identifier(identifier)?;
        }

        let selector = self.selector();
        debug!(kind = ?self.kind, row = %selector, "Selecting datatable row");
        datatable.set_current_row(selector)?;
        Ok(datatable)
    }
}

#[derive(Debug, Subcommand)]
pub enum DataCommands {
    /// Read a field from a test data sheet
    Get {
        #[command(flatten)]
        row: RowArgs,

        /// Test data sheet
        #[arg(long)]
        datasheet: String,

        /// Column header
        #[arg(long)]
        field: String,
    },

    /// Write a field of a test data sheet
    Put {
        #[command(flatten)]
        row: RowArgs,

        /// Test data sheet
        #[arg(long)]
        datasheet: String,

        /// Column header
        #[arg(long)]
        field: String,

        /// Value to store
        #[arg(long)]
        value: String,
    },

    /// Read an expected result from the checkpoints sheet
    Expected {
        #[command(flatten)]
        row: RowArgs,

        /// Column header
        #[arg(long)]
        field: String,
    },
}

/// A single datatable value
#[derive(Debug, Serialize)]
pub struct DataValue {
    pub datatable: String,
    pub row: String,
    pub datasheet: String,
    pub field: String,
    pub value: String,
}

impl TableDisplay for DataValue {
    fn headers() -> Vec<&'static str> {
        vec!["Datatable", "Row", "Sheet", "Field", "Value"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.datatable.clone(),
            self.row.clone(),
            self.datasheet.clone(),
            self.field.clone(),
            self.value.clone(),
        ]
    }
}

/// Run a data command, returning the value it read or wrote
pub fn run(cmd: DataCommands) -> Result<DataValue> {
    match cmd {
        DataCommands::Get { row, datasheet, field } => {
            let datatable = row.open()?;
            let value = datatable.get_data(&datasheet, &field)?;
            Ok(data_value(&row, datasheet, field, value))
        }

        DataCommands::Put { row, datasheet, field, value } => {
            let datatable = row.open()?;
            datatable.put_data(&datasheet, &field, &value)?;
            Ok(data_value(&row, datasheet, field, value))
        }

        DataCommands::Expected { row, field } => {
            let datatable = row.open()?;
            let value = datatable.get_expected_result(&field)?;
            Ok(data_value(
                &row,
                autopia_datatable::CHECKPOINTS_SHEET.to_string(),
                field,
                value,
            ))
        }
    }
}

pub fn execute(cmd: DataCommands, format: OutputFormat) -> Result<()> {
    let is_put = matches!(cmd, DataCommands::Put { .. });
    let value = run(cmd)?;

    if is_put && format == OutputFormat::Table {
        print_success(&format!(
            "Stored \"{}\" in {}.{} for {}",
            value.value, value.datasheet, value.field, value.row
        ));
        return Ok(());
    }
    print_item(&value, format)
}

fn data_value(row: &RowArgs, datasheet: String, field: String, value: String) -> DataValue {
    DataValue {
        datatable: row.name.clone(),
        row: row.selector().to_string(),
        datasheet,
        field,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopia_common::ExcelDataAccess;
    use autopia_datatable::{CHECKPOINTS_SHEET, COMMON_TESTDATA_SHEET, COMMON_TESTDATA_WORKBOOK};
    use std::path::Path;
    use tempfile::TempDir;

    fn add_sheet(access: &mut ExcelDataAccess, sheet: &str, header: &[&str], rows: &[&[&str]]) {
        access.add_sheet(sheet).unwrap();
        for column in header {
            access.add_column(column, None).unwrap();
        }
        for row in rows {
            let index = access.add_row().unwrap();
            for (col, value) in row.iter().enumerate() {
                access.set_value_at(index, col, value, None).unwrap();
            }
        }
        access.save().unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();

        let mut orders = ExcelDataAccess::new(dir.path(), "Orders");
        orders.create_workbook().unwrap();
        add_sheet(
            &mut orders,
            "Checkout",
            &["TC_ID", "Iteration", "Item"],
            &[&["TC_001", "1", "book"], &["TC_001", "2", "#LAMP"]],
        );
        add_sheet(
            &mut orders,
            CHECKPOINTS_SHEET,
            &["TC_ID", "Iteration", "Total"],
            &[&["TC_001", "1", "12.50"], &["TC_001", "2", "40.00"]],
        );

        let mut common = ExcelDataAccess::new(dir.path(), COMMON_TESTDATA_WORKBOOK);
        common.create_workbook().unwrap();
        add_sheet(&mut common, COMMON_TESTDATA_SHEET, &["Key", "Item"], &[&["LAMP", "desk lamp"]]);
        dir
    }

    fn row(path: &Path, iteration: u32) -> RowArgs {
        RowArgs {
            path: path.to_path_buf(),
            name: "Orders".to_string(),
            kind: DatatableKind::Iterative,
            testcase: "TC_001".to_string(),
            iteration: Some(iteration),
            sub_iteration: None,
            reference_identifier: None,
        }
    }

    fn get(path: &Path, iteration: u32, field: &str) -> DataValue {
        run(DataCommands::Get {
            row: row(path, iteration),
            datasheet: "Checkout".to_string(),
            field: field.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_get_resolves_common_references() {
        let dir = fixture();
        assert_eq!(get(dir.path(), 1, "Item").value, "book");

        let value = get(dir.path(), 2, "Item");
        assert_eq!(value.value, "desk lamp");
        assert_eq!(value.row, "TC_001, 2");
    }

    #[test]
    fn test_put_then_get() {
        let dir = fixture();
        run(DataCommands::Put {
            row: row(dir.path(), 1),
            datasheet: "Checkout".to_string(),
            field: "Item".to_string(),
            value: "notebook".to_string(),
        })
        .unwrap();

        assert_eq!(get(dir.path(), 1, "Item").value, "notebook");
        assert_eq!(get(dir.path(), 2, "Item").value, "desk lamp");
    }

    #[test]
    fn test_expected_result() {
        let dir = fixture();
        let value = run(DataCommands::Expected {
            row: row(dir.path(), 2),
            field: "Total".to_string(),
        })
        .unwrap();
        assert_eq!(value.datasheet, CHECKPOINTS_SHEET);
        assert_eq!(value.value, "40.00");
    }

    #[test]
    fn test_row_arity_must_match_kind() {
        let dir = fixture();
        let mut args = row(dir.path(), 1);
        args.kind = DatatableKind::NonIterative;
        assert!(args.open().is_err());
    }

    #[test]
    fn test_missing_field() {
        let dir = fixture();
        let result = run(DataCommands::Get {
            row: row(dir.path(), 1),
            datasheet: "Checkout".to_string(),
            field: "Quantity".to_string(),
        });
        assert!(result.is_err());
    }
}
