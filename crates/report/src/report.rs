//! Test report fan-out

use autopia_common::{util, AutopiaError, Result, RunContext, Status, TestOutcome, TestParameters};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::excel::ExcelReport;
use crate::html::HtmlReport;
use crate::names::screenshot_step_name;
use crate::screenshot::{NoCapture, ScreenCapture};
use crate::settings::ReportSettings;
use crate::theme::ReportTheme;
use crate::writer::{ReportType, SummaryEntry, TestLogEntry};
use crate::{EXCEL_RESULTS, HTML_RESULTS, SCREENSHOTS};

/// Longest screenshot path accepted by common file systems
pub const MAX_SCREENSHOT_PATH_LENGTH: usize = 256;

/// Receives the outcome of individual test steps
pub trait StepReporter {
    fn update_test_log(
        &mut self,
        step_name: &str,
        description: &str,
        status: Status,
        take_screenshot: bool,
    ) -> Result<()>;
}

impl<R: StepReporter + ?Sized> StepReporter for &mut R {
    fn update_test_log(
        &mut self,
        step_name: &str,
        description: &str,
        status: Status,
        take_screenshot: bool,
    ) -> Result<()> {
        (**self).update_test_log(step_name, description, status, take_screenshot)
    }
}

/// A test report written to every enabled output format
///
/// Keeps the step and test counters shared by the formats and decides which
/// steps make it into the test log.
pub struct Report {
    settings: ReportSettings,
    theme: ReportTheme,
    report_types: Vec<Box<dyn ReportType>>,
    screen_capture: Box<dyn ScreenCapture>,

    step_number: u32,
    steps_passed: u32,
    steps_failed: u32,
    tests_passed: u32,
    tests_failed: u32,

    test_status: TestOutcome,
    failure_description: Option<String>,
}

impl Report {
    pub fn new(settings: ReportSettings, theme: ReportTheme) -> Self {
        Self {
            settings,
            theme,
            report_types: Vec::new(),
            screen_capture: Box::new(NoCapture),
            step_number: 0,
            steps_passed: 0,
            steps_failed: 0,
            tests_passed: 0,
            tests_failed: 0,
            test_status: TestOutcome::Passed,
            failure_description: None,
        }
    }

    pub fn with_screen_capture(mut self, screen_capture: impl ScreenCapture + 'static) -> Self {
        self.screen_capture = Box::new(screen_capture);
        self
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub fn theme(&self) -> &ReportTheme {
        &self.theme
    }

    /// `Passed` until a step fails
    pub fn test_status(&self) -> TestOutcome {
        self.test_status
    }

    /// Descriptions of the failed steps, joined with `"; "`
    pub fn failure_description(&self) -> Option<&str> {
        self.failure_description.as_deref()
    }

    pub fn steps_passed(&self) -> u32 {
        self.steps_passed
    }

    pub fn steps_failed(&self) -> u32 {
        self.steps_failed
    }

    pub fn tests_passed(&self) -> u32 {
        self.tests_passed
    }

    pub fn tests_failed(&self) -> u32 {
        self.tests_failed
    }

    /// Register an additional output format
    pub fn add_report_type(&mut self, report_type: Box<dyn ReportType>) {
        self.report_types.push(report_type);
    }

    /// Create the result folders and the enabled writers
    pub fn initialize(&mut self) -> Result<()> {
        let report_path = self.settings.report_path().to_path_buf();

        if self.settings.generate_excel_reports {
            create_folder(&report_path.join(EXCEL_RESULTS))?;
            self.report_types.push(Box::new(ExcelReport::new(
                self.settings.clone(),
                self.theme.clone(),
            )));
        }

        if self.settings.generate_html_reports {
            create_folder(&report_path.join(HTML_RESULTS))?;
            self.report_types.push(Box::new(HtmlReport::new(
                self.settings.clone(),
                self.theme.clone(),
            )));
        }

        create_folder(&report_path.join(SCREENSHOTS))?;
        info!(
            path = %report_path.display(),
            writers = self.report_types.len(),
            "Initialized report"
        );
        Ok(())
    }

    /// Create (if needed) and return a folder below the report path
    pub fn create_results_sub_folder(&self, name: &str) -> Result<PathBuf> {
        let folder = self.settings.report_path().join(name);
        std::fs::create_dir_all(&folder)?;
        Ok(folder)
    }

    fn each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut dyn ReportType) -> Result<()>,
    {
        for report_type in self.report_types.iter_mut() {
            f(report_type.as_mut())?;
        }
        Ok(())
    }

    // ===== Test log =====

    pub fn initialize_test_log(&mut self) -> Result<()> {
        if self.settings.report_name.is_empty() {
            let description = "The report name cannot be empty!";
            error!("{}", description);
            return Err(AutopiaError::autopia(description));
        }
        self.each(|r| r.initialize_test_log())
    }

    pub fn add_test_log_heading(&mut self, heading: &str) -> Result<()> {
        self.each(|r| r.add_test_log_heading(heading))
    }

    pub fn add_test_log_sub_heading(
        &mut self,
        sub_heading1: &str,
        sub_heading2: &str,
        sub_heading3: &str,
        sub_heading4: &str,
    ) -> Result<()> {
        let sub_headings = [sub_heading1, sub_heading2, sub_heading3, sub_heading4];
        self.each(|r| r.add_test_log_sub_heading(sub_headings))
    }

    pub fn add_test_log_table_headings(&mut self) -> Result<()> {
        self.each(|r| r.add_test_log_table_headings())
    }

    /// Start a new section; step numbering restarts at 1
    pub fn add_test_log_section(&mut self, section: &str) -> Result<()> {
        self.each(|r| r.add_test_log_section(section))?;
        self.step_number = 1;
        Ok(())
    }

    pub fn add_test_log_sub_section(&mut self, sub_section: &str) -> Result<()> {
        self.each(|r| r.add_test_log_sub_section(sub_section))
    }

    /// Log a step, taking a screenshot when `take_screenshot` is set
    ///
    /// Pass/fail counters are updated for every step; the row itself is only
    /// written when the status is within the configured log level.
    pub fn update_test_log_with_screenshot(
        &mut self,
        step_name: &str,
        description: &str,
        status: Status,
        take_screenshot: bool,
    ) -> Result<()> {
        self.record_outcome(description, status);

        if status.level() > self.settings.log_level() {
            debug!(step = step_name, %status, "Step filtered by log level");
            return Ok(());
        }

        let screenshot = self.screenshot_name(step_name, take_screenshot)?;
        let step_time = util::current_formatted_time(&self.settings.date_format)?;
        let entry = TestLogEntry {
            step_number: self.step_number,
            step_name,
            description,
            status,
            screenshot: take_screenshot.then_some(screenshot.as_str()),
            step_time: &step_time,
        };
        self.each(|r| r.update_test_log(&entry))?;
        self.step_number += 1;
        Ok(())
    }

    pub fn update_test_log(&mut self, step_name: &str, description: &str, status: Status) -> Result<()> {
        self.update_test_log_with_screenshot(step_name, description, status, false)
    }

    fn record_outcome(&mut self, description: &str, status: Status) {
        match status {
            Status::Fail => {
                self.test_status = TestOutcome::Failed;
                self.failure_description = Some(match self.failure_description.take() {
                    Some(previous) => format!("{}; {}", previous, description),
                    None => description.to_string(),
                });
                self.steps_failed += 1;
            }
            Status::Pass => self.steps_passed += 1,
            Status::Warning | Status::Done => {}
        }
    }

    /// Name of the screenshot for a step, capturing it when requested
    ///
    /// Returns the file name including the `.png` extension.
    fn screenshot_name(&self, step_name: &str, take_screenshot: bool) -> Result<String> {
        let mut name = format!(
            "{}_{}_{}",
            self.settings.report_name,
            util::timestamp_for_path(&self.settings.date_format)?,
            screenshot_step_name(step_name)
        );

        if take_screenshot {
            let folder = self.settings.report_path().join(SCREENSHOTS);
            let path_length = folder.join(format!("{}.png", name)).to_string_lossy().chars().count();
            if path_length > MAX_SCREENSHOT_PATH_LENGTH {
                let excess = path_length - MAX_SCREENSHOT_PATH_LENGTH;
                let keep = name.chars().count().saturating_sub(excess);
                name = name.chars().take(keep).collect();
                debug!(excess, "Truncated screenshot name");
            }
            self.screen_capture
                .capture(&folder.join(format!("{}.png", name)))?;
        }

        name.push_str(".png");
        Ok(name)
    }

    pub fn add_test_log_footer(&mut self, execution_time: &str) -> Result<()> {
        let (passed, failed) = (self.steps_passed, self.steps_failed);
        self.each(|r| r.add_test_log_footer(execution_time, passed, failed))
    }

    // ===== Result summary =====

    pub fn initialize_result_summary(&mut self) -> Result<()> {
        self.each(|r| r.initialize_result_summary())
    }

    pub fn add_result_summary_heading(&mut self, heading: &str) -> Result<()> {
        self.each(|r| r.add_result_summary_heading(heading))
    }

    pub fn add_result_summary_sub_heading(
        &mut self,
        sub_heading1: &str,
        sub_heading2: &str,
        sub_heading3: &str,
        sub_heading4: &str,
    ) -> Result<()> {
        let sub_headings = [sub_heading1, sub_heading2, sub_heading3, sub_heading4];
        self.each(|r| r.add_result_summary_sub_heading(sub_headings))
    }

    pub fn add_result_summary_table_headings(&mut self) -> Result<()> {
        self.each(|r| r.add_result_summary_table_headings())
    }

    /// Add the outcome of one test instance to the summary
    ///
    /// An aborted test leaves no usable test log, so linking from the summary
    /// is switched off for this and every later row.
    pub fn update_result_summary(
        &mut self,
        test_parameters: &TestParameters,
        report_name: &str,
        execution_time: &str,
        test_status: &str,
    ) -> Result<()> {
        match test_status.parse::<TestOutcome>() {
            Ok(TestOutcome::Failed) => self.tests_failed += 1,
            Ok(TestOutcome::Passed) => self.tests_passed += 1,
            Ok(TestOutcome::Aborted) => self.settings.link_test_logs_to_summary = false,
            Err(_) => debug!(status = test_status, "Uncounted test status"),
        }

        let entry = SummaryEntry {
            test_parameters,
            report_name,
            execution_time,
            status: test_status,
            link_test_log: self.settings.link_test_logs_to_summary,
        };
        self.each(|r| r.update_result_summary(&entry))
    }

    pub fn add_result_summary_footer(&mut self, total_execution_time: &str) -> Result<()> {
        let (passed, failed) = (self.tests_passed, self.tests_failed);
        self.each(|r| r.add_result_summary_footer(total_execution_time, passed, failed))
    }

    /// Copy the harness execution log next to the report
    pub fn copy_log_file(&self, context: &RunContext) -> Result<()> {
        let source = context.execution_log_path()?;
        let destination = self.settings.report_path().join("test.execution.log");
        copy_file(&source, &destination)
    }
}

impl StepReporter for Report {
    fn update_test_log(
        &mut self,
        step_name: &str,
        description: &str,
        status: Status,
        take_screenshot: bool,
    ) -> Result<()> {
        self.update_test_log_with_screenshot(step_name, description, status, take_screenshot)
    }
}

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Report")
            .field("settings", &self.settings)
            .field("report_types", &self.report_types.len())
            .field("step_number", &self.step_number)
            .field("test_status", &self.test_status)
            .finish()
    }
}

fn create_folder(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to create results folder");
        AutopiaError::from(e)
    })
}

fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    match std::fs::copy(source, destination) {
        Ok(_) => Ok(()),
        Err(e) => {
            let description = "Error while copying the log file";
            error!(source = %source.display(), error = %e, "{}", description);
            Err(AutopiaError::autopia(description))
        }
    }
}
