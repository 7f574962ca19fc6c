//! Excel report writer

use autopia_common::{ExcelCellFormatting, ExcelDataAccess, Result, Status};
use std::path::PathBuf;
use tracing::debug;

use crate::settings::ReportSettings;
use crate::theme::ReportTheme;
use crate::writer::{ReportType, SummaryEntry, TestLogEntry};
use crate::EXCEL_RESULTS;

const COVER_PAGE: &str = "Cover_Page";
const TEST_LOG: &str = "Test_Log";
const RESULT_SUMMARY: &str = "Result_Summary";

const FONT_NAME: &str = "Verdana";
const HEADING_FONT_NAME: &str = "Copperplate Gothic Bold";

const STEP_NO: &str = "Step_No";
const STEP_NAME: &str = "Step_Name";
const STEP_DESCRIPTION: &str = "Description";
const STATUS: &str = "Status";
const STEP_TIME: &str = "Step_Time";

const MODULE: &str = "Module";
const TEST_CASE: &str = "Test_Case";
const TEST_INSTANCE: &str = "Test_Instance";
const TEST_DESCRIPTION: &str = "Test_Description";
const ADDITIONAL_DETAILS: &str = "Additional_Details";
const EXECUTION_TIME: &str = "Execution_Time";
const TEST_STATUS: &str = "Test_Status";

// Custom palette slots
const HEADING_BACK: u8 = 0x8;
const HEADING_FORE: u8 = 0x9;
const SECTION_BACK: u8 = 0xA;
const SECTION_FORE: u8 = 0xB;
const CONTENT_BACK: u8 = 0xC;
const CONTENT_FORE: u8 = 0xD;
const PASS_COLOR: u8 = 0xE;
const FAIL_COLOR: u8 = 0xF;
const WARNING_COLOR: u8 = 0x10;
const DONE_COLOR: u8 = 0x11;
const SCREENSHOT_COLOR: u8 = 0x12;

fn status_color(status: Status) -> u8 {
    match status {
        Status::Pass => PASS_COLOR,
        Status::Fail => FAIL_COLOR,
        Status::Warning => WARNING_COLOR,
        Status::Done => DONE_COLOR,
    }
}

fn formatting(bold: bool, centered: bool, back: u8, fore: u8) -> Result<ExcelCellFormatting> {
    ExcelCellFormatting::new(FONT_NAME, 10)
        .bold(bold)
        .centered(centered)
        .with_colors(back, fore)
}

fn theme_palette(access: &mut ExcelDataAccess, theme: &ReportTheme) -> Result<()> {
    access.set_custom_palette_color(HEADING_BACK, &theme.heading_back_color)?;
    access.set_custom_palette_color(HEADING_FORE, &theme.heading_fore_color)?;
    access.set_custom_palette_color(SECTION_BACK, &theme.section_back_color)?;
    access.set_custom_palette_color(SECTION_FORE, &theme.section_fore_color)?;
    access.set_custom_palette_color(CONTENT_BACK, &theme.content_back_color)?;
    access.set_custom_palette_color(CONTENT_FORE, &theme.content_fore_color)?;
    access.set_custom_palette_color(PASS_COLOR, "#008000")?;
    access.set_custom_palette_color(FAIL_COLOR, "#FF0000")
}

fn add_heading(access: &mut ExcelDataAccess, heading: &str) -> Result<()> {
    access.set_datasheet_name(COVER_PAGE);
    let mut row = access.last_row_num()?;
    if row != 0 {
        row = access.add_row()?;
    }

    let format = ExcelCellFormatting::new(HEADING_FONT_NAME, 12)
        .bold(true)
        .centered(true)
        .with_colors(HEADING_BACK, HEADING_FORE)?;
    access.set_value_at(row, 0, heading, Some(&format))?;
    access.merge_cells(row, row, 0, 4)?;
    access.save()
}

fn add_sub_heading(access: &mut ExcelDataAccess, sub_headings: [&str; 4]) -> Result<()> {
    access.set_datasheet_name(COVER_PAGE);
    let row = access.add_row()?;

    let format = formatting(true, false, HEADING_FORE, HEADING_BACK)?;
    let [first, second, third, fourth] = sub_headings;
    for (column, value) in [first, second, "", third, fourth].into_iter().enumerate() {
        access.set_value_at(row, column, value, Some(&format))?;
    }
    access.save()
}

fn add_columns(access: &mut ExcelDataAccess, sheet: &str, headers: &[&str]) -> Result<()> {
    access.set_datasheet_name(sheet);
    let format = formatting(true, true, HEADING_BACK, HEADING_FORE)?;
    for header in headers {
        access.add_column(header, Some(&format))?;
    }
    access.save()
}

/// Autofit and border the table sheet and the cover page
fn wrap_up(access: &mut ExcelDataAccess, sheet: &str) -> Result<()> {
    access.set_datasheet_name(sheet);
    access.auto_fit_contents()?;
    access.add_borders()?;
    access.set_datasheet_name(COVER_PAGE);
    access.auto_fit_contents()?;
    access.add_borders()?;
    access.save()
}

/// Writes `<report>/Excel Results/<name>.xlsx` and `.../Summary.xlsx`
///
/// The test log workbook carries a `Cover_Page` and a `Test_Log` sheet; the
/// summary workbook a `Cover_Page` and a `Result_Summary` sheet. Colors are
/// resolved through the custom palette registered on initialization.
#[derive(Debug)]
pub struct ExcelReport {
    settings: ReportSettings,
    theme: ReportTheme,
    test_log: ExcelDataAccess,
    result_summary: ExcelDataAccess,
}

impl ExcelReport {
    pub fn new(settings: ReportSettings, theme: ReportTheme) -> Self {
        let results = settings.report_path().join(EXCEL_RESULTS);
        Self {
            test_log: ExcelDataAccess::new(&results, settings.report_name.clone()),
            result_summary: ExcelDataAccess::new(&results, "Summary"),
            settings,
            theme,
        }
    }

    /// Path of the test log workbook
    pub fn test_log_file(&self) -> PathBuf {
        self.test_log.file()
    }

    pub fn result_summary_file(&self) -> PathBuf {
        self.result_summary.file()
    }
}

impl ReportType for ExcelReport {
    fn initialize_test_log(&mut self) -> Result<()> {
        let access = &mut self.test_log;
        access.create_workbook()?;
        access.add_sheet(COVER_PAGE)?;
        access.add_sheet(TEST_LOG)?;

        theme_palette(access, &self.theme)?;
        access.set_custom_palette_color(WARNING_COLOR, "#FF8000")?;
        access.set_custom_palette_color(DONE_COLOR, "#000000")?;
        access.set_custom_palette_color(SCREENSHOT_COLOR, "#00FF80")?;

        debug!(file = %access.file().display(), "Initialized Excel test log");
        access.save()
    }

    fn add_test_log_heading(&mut self, heading: &str) -> Result<()> {
        add_heading(&mut self.test_log, heading)
    }

    fn add_test_log_sub_heading(&mut self, sub_headings: [&str; 4]) -> Result<()> {
        add_sub_heading(&mut self.test_log, sub_headings)
    }

    fn add_test_log_table_headings(&mut self) -> Result<()> {
        add_columns(
            &mut self.test_log,
            TEST_LOG,
            &[STEP_NO, STEP_NAME, STEP_DESCRIPTION, STATUS, STEP_TIME],
        )
    }

    fn add_test_log_section(&mut self, section: &str) -> Result<()> {
        let access = &mut self.test_log;
        access.set_datasheet_name(TEST_LOG);
        let row = access.add_row()?;

        let format = formatting(true, false, SECTION_BACK, SECTION_FORE)?;
        access.set_value_at(row, 0, section, Some(&format))?;
        access.merge_cells(row, row, 0, 4)?;
        access.save()
    }

    fn add_test_log_sub_section(&mut self, sub_section: &str) -> Result<()> {
        let access = &mut self.test_log;
        access.set_datasheet_name(TEST_LOG);
        let row = access.add_row()?;

        let format = formatting(true, false, HEADING_FORE, HEADING_BACK)?;
        access.set_value_at(row, 0, &format!(" {}", sub_section), Some(&format))?;
        access.merge_cells(row, row, 0, 4)?;
        access.save()
    }

    fn update_test_log(&mut self, entry: &TestLogEntry<'_>) -> Result<()> {
        let access = &mut self.test_log;
        access.set_datasheet_name(TEST_LOG);
        let row = access.add_row()?;

        let status_format = formatting(true, true, CONTENT_BACK, status_color(entry.status))?;
        let status_column = access.header_column(STATUS)?;
        access.set_value_at(row, status_column, &entry.status.to_string(), Some(&status_format))?;

        let centered = formatting(false, true, CONTENT_BACK, CONTENT_FORE)?;
        access.set_value(row, STEP_NO, &entry.step_number.to_string(), Some(&centered))?;
        access.set_value(row, STEP_TIME, entry.step_time, Some(&centered))?;

        let content = formatting(false, false, CONTENT_BACK, CONTENT_FORE)?;
        access.set_value(row, STEP_NAME, entry.step_name, Some(&content))?;

        match entry.screenshot {
            Some(name) if self.settings.link_screenshots_to_test_log => {
                access.set_hyperlink(row, status_column, &format!("..\\Screenshots\\{}", name))?;
                access.set_value(row, STEP_DESCRIPTION, entry.description, Some(&content))?;
            }
            Some(name) => {
                let description = format!("{} (Refer screenshot @ {})", entry.description, name);
                access.set_value(row, STEP_DESCRIPTION, &description, Some(&content))?;
            }
            None => {
                access.set_value(row, STEP_DESCRIPTION, entry.description, Some(&content))?;
            }
        }
        access.save()
    }

    fn add_test_log_footer(
        &mut self,
        execution_time: &str,
        steps_passed: u32,
        steps_failed: u32,
    ) -> Result<()> {
        let access = &mut self.test_log;
        access.set_datasheet_name(TEST_LOG);

        let row = access.add_row()?;
        let heading = formatting(true, true, HEADING_BACK, HEADING_FORE)?;
        access.set_value_at(
            row,
            0,
            &format!("Execution Duration: {}", execution_time),
            Some(&heading),
        )?;
        access.merge_cells(row, row, 0, 4)?;

        let row = access.add_row()?;
        let passed = formatting(true, false, HEADING_FORE, PASS_COLOR)?;
        let blank = formatting(true, false, HEADING_FORE, HEADING_BACK)?;
        let failed = formatting(true, false, HEADING_FORE, FAIL_COLOR)?;
        access.set_value(row, STEP_NO, "Steps passed", Some(&passed))?;
        access.set_value(row, STEP_NAME, &format!(": {}", steps_passed), Some(&passed))?;
        access.set_value(row, STEP_DESCRIPTION, "", Some(&blank))?;
        access.set_value(row, STATUS, "Steps failed", Some(&failed))?;
        access.set_value(row, STEP_TIME, &format!(": {}", steps_failed), Some(&failed))?;

        wrap_up(access, TEST_LOG)
    }

    fn initialize_result_summary(&mut self) -> Result<()> {
        let access = &mut self.result_summary;
        access.create_workbook()?;
        access.add_sheet(COVER_PAGE)?;
        access.add_sheet(RESULT_SUMMARY)?;
        theme_palette(access, &self.theme)?;

        debug!(file = %access.file().display(), "Initialized Excel result summary");
        access.save()
    }

    fn add_result_summary_heading(&mut self, heading: &str) -> Result<()> {
        add_heading(&mut self.result_summary, heading)
    }

    fn add_result_summary_sub_heading(&mut self, sub_headings: [&str; 4]) -> Result<()> {
        add_sub_heading(&mut self.result_summary, sub_headings)
    }

    fn add_result_summary_table_headings(&mut self) -> Result<()> {
        add_columns(
            &mut self.result_summary,
            RESULT_SUMMARY,
            &[
                MODULE,
                TEST_CASE,
                TEST_INSTANCE,
                TEST_DESCRIPTION,
                ADDITIONAL_DETAILS,
                EXECUTION_TIME,
                TEST_STATUS,
            ],
        )
    }

    fn update_result_summary(&mut self, entry: &SummaryEntry<'_>) -> Result<()> {
        let params = entry.test_parameters;
        let access = &mut self.result_summary;
        access.set_datasheet_name(RESULT_SUMMARY);
        let row = access.add_row()?;

        let content = formatting(false, false, CONTENT_BACK, CONTENT_FORE)?;
        access.set_value(row, MODULE, params.module(), Some(&content))?;
        access.set_value(row, TEST_CASE, params.testcase(), Some(&content))?;
        access.set_value(row, TEST_INSTANCE, &params.instance, Some(&content))?;
        if entry.link_test_log {
            let column = access.header_column(TEST_INSTANCE)?;
            access.set_hyperlink(row, column, &format!("{}.xlsx", entry.report_name))?;
        }
        access.set_value(row, TEST_DESCRIPTION, &params.description, Some(&content))?;
        access.set_value(row, ADDITIONAL_DETAILS, &params.additional_details, Some(&content))?;

        let centered = formatting(false, true, CONTENT_BACK, CONTENT_FORE)?;
        access.set_value(row, EXECUTION_TIME, entry.execution_time, Some(&centered))?;

        let status_fore = if entry.status.eq_ignore_ascii_case("passed") {
            PASS_COLOR
        } else if entry.status.eq_ignore_ascii_case("failed") {
            FAIL_COLOR
        } else {
            CONTENT_FORE
        };
        let status = formatting(true, true, CONTENT_BACK, status_fore)?;
        access.set_value(row, TEST_STATUS, entry.status, Some(&status))?;
        access.save()
    }

    fn add_result_summary_footer(
        &mut self,
        total_execution_time: &str,
        tests_passed: u32,
        tests_failed: u32,
    ) -> Result<()> {
        let access = &mut self.result_summary;
        access.set_datasheet_name(RESULT_SUMMARY);

        let row = access.add_row()?;
        let heading = formatting(true, true, HEADING_BACK, HEADING_FORE)?;
        access.set_value_at(
            row,
            0,
            &format!("Total Duration: {}", total_execution_time),
            Some(&heading),
        )?;
        access.merge_cells(row, row, 0, 6)?;

        let row = access.add_row()?;
        let passed = formatting(true, false, HEADING_FORE, PASS_COLOR)?;
        let blank = formatting(true, false, HEADING_FORE, HEADING_BACK)?;
        let failed = formatting(true, false, HEADING_FORE, FAIL_COLOR)?;
        access.set_value(row, MODULE, "Tests passed", Some(&passed))?;
        access.set_value(row, TEST_CASE, &format!(": {}", tests_passed), Some(&passed))?;
        for header in [TEST_INSTANCE, TEST_DESCRIPTION, ADDITIONAL_DETAILS] {
            access.set_value(row, header, "", Some(&blank))?;
        }
        access.set_value(row, EXECUTION_TIME, "Tests failed", Some(&failed))?;
        access.set_value(row, TEST_STATUS, &format!(": {}", tests_failed), Some(&failed))?;

        wrap_up(access, RESULT_SUMMARY)
    }
}
