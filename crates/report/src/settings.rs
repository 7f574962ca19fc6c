//! Report settings

use autopia_common::config::DEFAULT_DATE_FORMAT;
use autopia_common::{AutopiaError, Result, RunContext};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Highest log level; every status is written to the test log
pub const MAX_LOG_LEVEL: u8 = 4;

/// Options controlling where and how a test report is written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    report_path: PathBuf,
    pub report_name: String,
    pub project_name: String,
    log_level: u8,
    pub generate_excel_reports: bool,
    pub generate_html_reports: bool,
    pub link_screenshots_to_test_log: bool,
    pub link_test_logs_to_summary: bool,
    /// strftime pattern used for step times and screenshot names
    pub date_format: String,
}

impl ReportSettings {
    /// Settings for a report written below `report_path`, which must be an existing folder
    pub fn new(report_path: impl Into<PathBuf>, report_name: impl Into<String>) -> Result<Self> {
        let report_path = report_path.into();
        if !report_path.is_dir() {
            error!(path = %report_path.display(), "Report path does not exist");
            return Err(AutopiaError::autopia("The given report path does not exist!"));
        }

        Ok(Self {
            report_path,
            report_name: report_name.into(),
            project_name: String::new(),
            log_level: 3,
            generate_excel_reports: true,
            generate_html_reports: true,
            link_screenshots_to_test_log: true,
            link_test_logs_to_summary: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        })
    }

    /// Settings for a report in the run's results folder
    ///
    /// `ProjectName`, `LogLevel`, `ExcelReport`, `HtmlReport`,
    /// `LinkScreenshotsToTestLog` and `LinkTestLogsToSummary` are read from
    /// the properties file when present.
    pub fn for_run(context: &RunContext, report_name: impl Into<String>) -> Result<Self> {
        let mut settings = Self::new(context.results_folder()?, report_name)?;
        settings.date_format = context.date_format();

        let properties = context.settings();
        if let Some(project_name) = properties.get("ProjectName") {
            settings.project_name = project_name.to_string();
        }
        if let Some(log_level) = properties.get("LogLevel").and_then(|v| v.trim().parse().ok()) {
            settings.set_log_level(log_level);
        }
        if let Some(excel) = properties.get_bool("ExcelReport") {
            settings.generate_excel_reports = excel;
        }
        if let Some(html) = properties.get_bool("HtmlReport") {
            settings.generate_html_reports = html;
        }
        if let Some(link) = properties.get_bool("LinkScreenshotsToTestLog") {
            settings.link_screenshots_to_test_log = link;
        }
        if let Some(link) = properties.get_bool("LinkTestLogsToSummary") {
            settings.link_test_logs_to_summary = link;
        }

        debug!(path = %settings.report_path.display(), "Resolved report settings");
        Ok(settings)
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    pub fn log_level(&self) -> u8 {
        self.log_level
    }

    /// Set the log level, clamped to `0..=4`
    pub fn set_log_level(&mut self, log_level: i32) {
        self.log_level = log_level.clamp(0, MAX_LOG_LEVEL as i32) as u8;
    }

    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = project_name.into();
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReportSettings::new(dir.path(), "TC1_Instance1").unwrap();

        assert_eq!(settings.project_name, "");
        assert_eq!(settings.log_level(), 3);
        assert!(settings.generate_excel_reports);
        assert!(settings.generate_html_reports);
        assert!(settings.link_screenshots_to_test_log);
        assert!(settings.link_test_logs_to_summary);
        assert_eq!(settings.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_missing_report_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReportSettings::new(dir.path().join("missing"), "Report").unwrap_err();
        assert_eq!(err.to_string(), "The given report path does not exist!");
    }

    #[test]
    fn test_for_run_reads_properties() {
        use autopia_common::{FrameworkParameters, Settings};
        use std::collections::HashMap;

        let base = tempfile::tempdir().unwrap();
        let properties: HashMap<String, String> = [
            ("ProjectName", "Shop"),
            ("LogLevel", "9"),
            ("HtmlReport", "false"),
            ("DateFormatString", "yyyy-MM-dd HH:mm:ss"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let context = RunContext::new(
            FrameworkParameters::new(base.path()).with_run_configuration("Smoke"),
            Settings::from_map(properties),
        );

        let settings = ReportSettings::for_run(&context, "TC1").unwrap();
        assert!(settings.report_path().starts_with(base.path().join("test-results").join("Smoke")));
        assert_eq!(settings.project_name, "Shop");
        assert_eq!(settings.log_level(), 4);
        assert!(settings.generate_excel_reports);
        assert!(!settings.generate_html_reports);
        assert_eq!(settings.date_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test_case(-3 => 0; "below range")]
    #[test_case(0 => 0; "lower bound")]
    #[test_case(2 => 2; "within range")]
    #[test_case(4 => 4; "upper bound")]
    #[test_case(10 => 4; "above range")]
    fn test_log_level_is_clamped(level: i32) -> u8 {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = ReportSettings::new(dir.path(), "Report").unwrap();
        settings.set_log_level(level);
        settings.log_level()
    }
}
