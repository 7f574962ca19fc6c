//! Report writer interface

use autopia_common::{Result, Status, TestParameters};

/// A row of the test log
#[derive(Debug, Clone)]
pub struct TestLogEntry<'a> {
    pub step_number: u32,
    pub step_name: &'a str,
    pub description: &'a str,
    pub status: Status,
    /// File name of the screenshot taken for this step, if any
    pub screenshot: Option<&'a str>,
    /// Formatted time at which the step was logged
    pub step_time: &'a str,
}

/// A row of the result summary
#[derive(Debug, Clone)]
pub struct SummaryEntry<'a> {
    pub test_parameters: &'a TestParameters,
    /// Name of the test log the row links to
    pub report_name: &'a str,
    pub execution_time: &'a str,
    pub status: &'a str,
    pub link_test_log: bool,
}

/// A report output format
///
/// Every call appends to the underlying file; the test log and the result
/// summary are independent documents.
pub trait ReportType: Send {
    fn initialize_test_log(&mut self) -> Result<()>;

    fn add_test_log_heading(&mut self, heading: &str) -> Result<()>;

    fn add_test_log_sub_heading(&mut self, sub_headings: [&str; 4]) -> Result<()>;

    fn add_test_log_table_headings(&mut self) -> Result<()>;

    fn add_test_log_section(&mut self, section: &str) -> Result<()>;

    fn add_test_log_sub_section(&mut self, sub_section: &str) -> Result<()>;

    fn update_test_log(&mut self, entry: &TestLogEntry<'_>) -> Result<()>;

    fn add_test_log_footer(
        &mut self,
        execution_time: &str,
        steps_passed: u32,
        steps_failed: u32,
    ) -> Result<()>;

    fn initialize_result_summary(&mut self) -> Result<()>;

    fn add_result_summary_heading(&mut self, heading: &str) -> Result<()>;

    fn add_result_summary_sub_heading(&mut self, sub_headings: [&str; 4]) -> Result<()>;

    fn add_result_summary_table_headings(&mut self) -> Result<()>;

    fn update_result_summary(&mut self, entry: &SummaryEntry<'_>) -> Result<()>;

    fn add_result_summary_footer(
        &mut self,
        total_execution_time: &str,
        tests_passed: u32,
        tests_failed: u32,
    ) -> Result<()>;
}
