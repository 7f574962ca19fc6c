//! Datatable lookup tests
//!
//! Builds small test data workbooks in a scratch directory and checks row
//! selection, common data references, expected results and write-back.

use std::path::Path;

use autopia_common::{ExcelDataAccess, FrameworkType};
use autopia_datatable::{
    datatable_for, Datatable, IterativeDatatable, NonIterativeDatatable, RowSelector,
    SubIterativeDatatable, CHECKPOINTS_SHEET, COMMON_TESTDATA_SHEET, COMMON_TESTDATA_WORKBOOK,
};
use tempfile::TempDir;
use test_case::test_case;

fn create_workbook(dir: &Path, workbook: &str) -> ExcelDataAccess {
    let mut access = ExcelDataAccess::new(dir, workbook);
    access.create_workbook().unwrap();
    access
}

/// Add a sheet built from a header row and data rows, then save
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

fn simple_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();

    let mut login = create_workbook(dir.path(), "Login");
    add_sheet(
        &mut login,
        "Credentials",
        &["TC_ID", "Username", "Password"],
        &[&["TC_001", "alice", "secret"], &["TC_002", "bob", "#ADMIN"]],
    );
    add_sheet(
        &mut login,
        CHECKPOINTS_SHEET,
        &["TC_ID", "Greeting"],
        &[&["TC_001", "Welcome alice"], &["TC_002", "Welcome admin"]],
    );

    let mut common = create_workbook(dir.path(), COMMON_TESTDATA_WORKBOOK);
    add_sheet(
        &mut common,
        COMMON_TESTDATA_SHEET,
        &["Key", "Username", "Password"],
        &[&["GUEST", "guest", "guest"], &["ADMIN", "root", "toor"]],
    );
    dir
}

fn iterative_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();

    let mut orders = create_workbook(dir.path(), "Orders");
    add_sheet(
        &mut orders,
        "Checkout",
        &["TC_ID", "Iteration", "SubIteration", "Item"],
        &[
            &["TC_001", "1", "1", "book"],
            &["TC_001", "1", "2", "pen"],
            &["TC_001", "2", "1", "lamp"],
            &["TC_001", "2", "2", "desk"],
            &["TC_002", "1", "1", "chair"],
            &["TC_002", "2", "1", "table"],
        ],
    );
    add_sheet(
        &mut orders,
        CHECKPOINTS_SHEET,
        &["TC_ID", "Iteration", "SubIteration", "Total"],
        &[
            &["TC_001", "1", "1", "10"],
            &["TC_001", "2", "2", "40"],
            &["TC_002", "2", "1", "75"],
        ],
    );
    dir
}

#[test]
fn non_iterative_reads_the_test_case_row() {
    let dir = simple_fixture();
    let mut datatable = NonIterativeDatatable::new(dir.path(), "Login");
    datatable.set_current_row(RowSelector::testcase("TC_001")).unwrap();

    assert_eq!(datatable.get_data("Credentials", "Username").unwrap(), "alice");
    assert_eq!(datatable.get_data("Credentials", "Password").unwrap(), "secret");
    assert_eq!(datatable.current_iteration(), 1);
}

#[test]
fn data_references_resolve_against_common_test_data() {
    let dir = simple_fixture();
    let mut datatable = NonIterativeDatatable::new(dir.path(), "Login");
    datatable.set_current_row(RowSelector::testcase("TC_002")).unwrap();

    // "#ADMIN" in the Password column points at the ADMIN common row
    assert_eq!(datatable.get_data("Credentials", "Password").unwrap(), "toor");
    assert_eq!(datatable.get_data("Credentials", "Username").unwrap(), "bob");
}

#[test]
fn custom_reference_identifier() {
    let dir = simple_fixture();
    let mut datatable = NonIterativeDatatable::new(dir.path(), "Login");
    datatable.set_data_reference_identifier("$").unwrap();
    datatable.set_current_row(RowSelector::testcase("TC_002")).unwrap();

    // "#" no longer marks a reference
    assert_eq!(datatable.get_data("Credentials", "Password").unwrap(), "#ADMIN");
}

#[test_case("")]
#[test_case("##")]
fn reference_identifier_must_be_one_character(identifier: &str) {
    let mut datatable = NonIterativeDatatable::new("/tmp", "Unused");
    let err = datatable.set_data_reference_identifier(identifier).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The data reference identifier must be a single character!"
    );
    assert_eq!(datatable.data_reference_identifier(), "#");
}

#[test]
fn missing_common_reference_is_reported() {
    let dir = simple_fixture();
    let mut broken = create_workbook(dir.path(), "Broken");
    add_sheet(
        &mut broken,
        "Credentials",
        &["TC_ID", "Password"],
        &[&["TC_001", "#NOBODY"]],
    );
    let mut datatable = NonIterativeDatatable::new(dir.path(), "Broken");
    datatable.set_current_row(RowSelector::testcase("TC_001")).unwrap();

    let err = datatable.get_data("Credentials", "Password").unwrap_err();
    assert_eq!(
        err.to_string(),
        "The common test data row identified by \"NOBODY\" is not found in the common test data sheet!"
    );
}

#[test]
fn missing_test_case_is_reported() {
    let dir = simple_fixture();
    let mut datatable = NonIterativeDatatable::new(dir.path(), "Login");
    datatable.set_current_row(RowSelector::testcase("TC_404")).unwrap();

    let err = datatable.get_data("Credentials", "Username").unwrap_err();
    assert_eq!(
        err.to_string(),
        "The test case \"TC_404\" is not found in the test data sheet \"Credentials\"!"
    );

    let err = datatable.get_expected_result("Greeting").unwrap_err();
    assert_eq!(
        err.to_string(),
        "The test case \"TC_404\" is not found in the parametrized checkpoints sheet!"
    );
}

#[test]
fn lookups_require_a_current_row() {
    let dir = simple_fixture();
    let datatable = NonIterativeDatatable::new(dir.path(), "Login");
    let err = datatable.get_data("Credentials", "Username").unwrap_err();
    assert_eq!(err.to_string(), "The currentTestCase is not set!");
}

#[test]
fn expected_results_are_not_resolved_as_references() {
    let dir = simple_fixture();
    let mut datatable = NonIterativeDatatable::new(dir.path(), "Login");
    datatable.set_current_row(RowSelector::testcase("TC_002")).unwrap();
    assert_eq!(datatable.get_expected_result("Greeting").unwrap(), "Welcome admin");
}

#[test_case(RowSelector::iteration("TC_001", 1), "setCurrentRow(): Unrecognized integer argument!")]
#[test_case(RowSelector::sub_iteration("TC_001", 1, 1), "setCurrentRow(): Unrecognized integer arguments!")]
fn non_iterative_rejects_iterations(selector: RowSelector, message: &str) {
    let mut datatable = NonIterativeDatatable::new("/tmp", "Unused");
    let err = datatable.set_current_row(selector).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test_case(RowSelector::testcase("TC_001"), "setCurrentRow(): Missing argument 'currentIteration'!")]
#[test_case(RowSelector::sub_iteration("TC_001", 1, 1), "setCurrentRow(): Unrecognized integer argument!")]
fn iterative_selector_arity(selector: RowSelector, message: &str) {
    let mut datatable = IterativeDatatable::new("/tmp", "Unused");
    let err = datatable.set_current_row(selector).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test_case(RowSelector::testcase("TC_001"), "setCurrentRow(): Missing arguments 'currentIteration' & 'currentSubIteration'!")]
#[test_case(RowSelector::iteration("TC_001", 1), "setCurrentRow(): Missing argument 'currentSubIteration'!")]
fn sub_iterative_selector_arity(selector: RowSelector, message: &str) {
    let mut datatable = SubIterativeDatatable::new("/tmp", "Unused");
    let err = datatable.set_current_row(selector).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test_case("TC_001", 1, "book")]
#[test_case("TC_001", 2, "lamp")]
#[test_case("TC_002", 2, "table")]
fn iterative_reads_the_first_row_of_the_iteration(testcase: &str, iteration: u32, item: &str) {
    let dir = iterative_fixture();
    let mut datatable = IterativeDatatable::new(dir.path(), "Orders");
    datatable
        .set_current_row(RowSelector::iteration(testcase, iteration))
        .unwrap();

    assert_eq!(datatable.current_iteration(), iteration);
    assert_eq!(datatable.get_data("Checkout", "Item").unwrap(), item);
}

#[test]
fn iterative_missing_iteration() {
    let dir = iterative_fixture();
    let mut datatable = IterativeDatatable::new(dir.path(), "Orders");
    datatable.set_current_row(RowSelector::iteration("TC_002", 3)).unwrap();

    let err = datatable.get_data("Checkout", "Item").unwrap_err();
    assert_eq!(
        err.to_string(),
        "The iteration number \"3\" of the test case \"TC_002\" is not found in the test data sheet \"Checkout\"!"
    );
}

#[test]
fn iterative_rejects_iteration_zero() {
    let dir = iterative_fixture();
    let mut datatable = IterativeDatatable::new(dir.path(), "Orders");
    datatable.set_current_row(RowSelector::iteration("TC_001", 0)).unwrap();

    let err = datatable.get_data("Checkout", "Item").unwrap_err();
    assert_eq!(err.to_string(), "The currentIteration is not set!");
}

#[test_case("TC_001", 1, 2, "pen")]
#[test_case("TC_001", 2, 2, "desk")]
#[test_case("TC_002", 1, 1, "chair")]
fn sub_iterative_reads_the_exact_row(testcase: &str, iteration: u32, sub: u32, item: &str) {
    let dir = iterative_fixture();
    let mut datatable = SubIterativeDatatable::new(dir.path(), "Orders");
    datatable
        .set_current_row(RowSelector::sub_iteration(testcase, iteration, sub))
        .unwrap();

    assert_eq!(datatable.current_sub_iteration(), sub);
    assert_eq!(datatable.get_data("Checkout", "Item").unwrap(), item);
}

#[test]
fn sub_iterative_missing_sub_iteration() {
    let dir = iterative_fixture();
    let mut datatable = SubIterativeDatatable::new(dir.path(), "Orders");
    datatable
        .set_current_row(RowSelector::sub_iteration("TC_002", 1, 2))
        .unwrap();

    let err = datatable.get_data("Checkout", "Item").unwrap_err();
    assert_eq!(
        err.to_string(),
        "The sub iteration number \"2\" under iteration number \"1\" of the test case \"TC_002\" is not found in the test data sheet \"Checkout\"!"
    );
}

#[test]
fn sub_iterative_expected_results() {
    let dir = iterative_fixture();
    let mut datatable = SubIterativeDatatable::new(dir.path(), "Orders");
    datatable
        .set_current_row(RowSelector::sub_iteration("TC_001", 2, 2))
        .unwrap();
    assert_eq!(datatable.get_expected_result("Total").unwrap(), "40");

    datatable
        .set_current_row(RowSelector::sub_iteration("TC_001", 2, 1))
        .unwrap();
    let err = datatable.get_expected_result("Total").unwrap_err();
    assert!(err.to_string().ends_with("is not found in the parametrized checkpoints sheet!"));
}

#[test]
fn put_data_persists_the_value() {
    let dir = iterative_fixture();
    let mut datatable = IterativeDatatable::new(dir.path(), "Orders");
    datatable.set_current_row(RowSelector::iteration("TC_001", 2)).unwrap();
    datatable.put_data("Checkout", "Item", "sofa").unwrap();

    let mut reader = IterativeDatatable::new(dir.path(), "Orders");
    reader.set_current_row(RowSelector::iteration("TC_001", 2)).unwrap();
    assert_eq!(reader.get_data("Checkout", "Item").unwrap(), "sofa");

    // other rows are left alone
    reader.set_current_row(RowSelector::iteration("TC_001", 1)).unwrap();
    assert_eq!(reader.get_data("Checkout", "Item").unwrap(), "book");
}

#[test]
fn put_data_from_several_threads() {
    let dir = simple_fixture();
    let path = dir.path().to_path_buf();

    let handles: Vec<_> = [("TC_001", "first"), ("TC_002", "second")]
        .into_iter()
        .map(|(testcase, value)| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut datatable = NonIterativeDatatable::new(&path, "Login");
                datatable.set_current_row(RowSelector::testcase(testcase)).unwrap();
                datatable.put_data("Credentials", "Username", value).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut datatable = NonIterativeDatatable::new(&path, "Login");
    datatable.set_current_row(RowSelector::testcase("TC_001")).unwrap();
    assert_eq!(datatable.get_data("Credentials", "Username").unwrap(), "first");
    datatable.set_current_row(RowSelector::testcase("TC_002")).unwrap();
    assert_eq!(datatable.get_data("Credentials", "Username").unwrap(), "second");
}

#[test]
fn factory_picks_the_datatable_for_the_framework() {
    let dir = iterative_fixture();

    let mut keyword = datatable_for(FrameworkType::KeywordDriven, dir.path(), "Orders");
    assert!(keyword.set_current_row(RowSelector::iteration("TC_001", 1)).is_err());
    keyword
        .set_current_row(RowSelector::sub_iteration("TC_001", 1, 2))
        .unwrap();
    assert_eq!(keyword.get_data("Checkout", "Item").unwrap(), "pen");

    let mut modular = datatable_for(FrameworkType::Modular, dir.path(), "Orders");
    modular.set_current_row(RowSelector::iteration("TC_001", 1)).unwrap();
    assert_eq!(modular.get_data("Checkout", "Item").unwrap(), "book");
    assert_eq!(modular.datatable_name(), "Orders");
    assert_eq!(modular.datatable_path(), dir.path());
}

#[test]
fn typed_cells_come_back_as_displayed_text() {
    let dir = TempDir::new().unwrap();
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let date_format = rust_xlsxwriter::Format::new().set_num_format("dd/mm/yyyy");
    let price_format = rust_xlsxwriter::Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name("Customer").unwrap();
    for (col, header) in ["TC_ID", "Iteration", "DOB", "Price", "Active"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    sheet.write_string(1, 0, "TC_001").unwrap();
    sheet.write_number(1, 1, 1.0).unwrap();
    let dob = rust_xlsxwriter::ExcelDateTime::from_ymd(1990, 5, 17).unwrap();
    sheet.write_datetime_with_format(1, 2, &dob, &date_format).unwrap();
    sheet.write_number_with_format(1, 3, 12.5, &price_format).unwrap();
    sheet.write_boolean(1, 4, true).unwrap();
    workbook.save(dir.path().join("Typed.xlsx")).unwrap();

    let mut datatable = NonIterativeDatatable::new(dir.path(), "Typed");
    datatable.set_current_row(RowSelector::testcase("TC_001")).unwrap();

    assert_eq!(datatable.get_data("Customer", "Iteration").unwrap(), "1");
    assert_eq!(datatable.get_data("Customer", "DOB").unwrap(), "1990-05-17");
    assert_eq!(datatable.get_data("Customer", "Price").unwrap(), "12.5");
    assert_eq!(datatable.get_data("Customer", "Active").unwrap(), "TRUE");
}
