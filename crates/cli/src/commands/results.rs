//! Results Commands

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use autopia_common::{FrameworkParameters, FrameworkType, RunContext};
use autopia_report::{ReportSettings, ReportTheme, EXCEL_RESULTS, HTML_RESULTS, SCREENSHOTS};

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Debug, Subcommand)]
pub enum ResultsCommands {
    /// Create the timestamped results folder of a run
    Init {
        /// Project base folder holding the properties file
        #[arg(long, env = "AUTOPIA_BASE_PATH")]
        base: PathBuf,

        /// Run configuration naming the results subfolder
        #[arg(long)]
        run: String,

        /// Framework type (keyword-driven or modular)
        #[arg(long, value_parser = parse_framework_type)]
        framework: Option<FrameworkType>,
    },
}

/// Resolved results location and report options of a run
#[derive(Debug, Serialize)]
pub struct RunFolder {
    pub run_configuration: String,
    pub results_folder: PathBuf,
    pub project_name: String,
    pub date_format: String,
    pub excel_reports: bool,
    pub html_reports: bool,
    pub theme: ReportTheme,
}

impl TableDisplay for RunFolder {
    fn headers() -> Vec<&'static str> {
        vec!["Run", "Results Folder", "Project", "Excel", "HTML"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.run_configuration.clone(),
            self.results_folder.display().to_string(),
            self.project_name.clone(),
            yes_no(self.excel_reports),
            yes_no(self.html_reports),
        ]
    }
}

fn parse_framework_type(value: &str) -> std::result::Result<FrameworkType, String> {
    value.parse().map_err(|e: autopia_common::AutopiaError| e.to_string())
}

fn yes_no(enabled: bool) -> String {
    let text = if enabled { "yes" } else { "no" };
    text.to_string()
}

/// Load the run settings and create the results folder with its report subfolders
pub fn init(base: PathBuf, run: String, framework: Option<FrameworkType>) -> Result<RunFolder> {
    let mut params = FrameworkParameters::new(base).with_run_configuration(&run);
    params.framework_type = framework;

    let context = RunContext::load(params)?;
    let settings = ReportSettings::for_run(&context, "Summary")?;
    let theme = ReportTheme::from_settings(context.settings())?;

    let results_folder = settings.report_path().to_path_buf();
    for folder in [EXCEL_RESULTS, HTML_RESULTS, SCREENSHOTS] {
        std::fs::create_dir_all(results_folder.join(folder))?;
    }
    info!(path = %results_folder.display(), "Initialized results folder");

    Ok(RunFolder {
        run_configuration: run,
        results_folder,
        project_name: settings.project_name,
        date_format: settings.date_format,
        excel_reports: settings.generate_excel_reports,
        html_reports: settings.generate_html_reports,
        theme,
    })
}

pub fn execute(cmd: ResultsCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        ResultsCommands::Init { base, run, framework } => {
            let folder = init(base, run, framework)?;
            if format == OutputFormat::Table {
                println!(
                    "{} Results folder for {}",
                    "→".cyan(),
                    folder.run_configuration.cyan().bold()
                );
            }
            print_item(&folder, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_properties(base: &Path, contents: &str) {
        let folder = base.join("src").join("test").join("resources");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("config.default.properties"), contents).unwrap();
    }

    #[test]
    fn test_init_creates_run_folder() {
        let base = TempDir::new().unwrap();
        write_properties(
            base.path(),
            "ProjectName=Shop\nHtmlReport=false\nReportTheme=Olive\n",
        );

        let folder = init(base.path().to_path_buf(), "Smoke".to_string(), None).unwrap();
        assert!(folder
            .results_folder
            .starts_with(base.path().join("test-results").join("Smoke")));
        assert!(folder
            .results_folder
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("Run_"));
        for sub in [EXCEL_RESULTS, HTML_RESULTS, SCREENSHOTS] {
            assert!(folder.results_folder.join(sub).is_dir());
        }

        assert_eq!(folder.project_name, "Shop");
        assert!(folder.excel_reports);
        assert!(!folder.html_reports);
        assert_eq!(folder.theme, autopia_report::Theme::Olive.report_theme());
    }

    #[test]
    fn test_init_rejects_unknown_theme() {
        let base = TempDir::new().unwrap();
        write_properties(base.path(), "ReportTheme=Neon\n");
        assert!(init(base.path().to_path_buf(), "Smoke".to_string(), None).is_err());
    }
}
