//! Autopia Reporting
//!
//! A [`Report`] fans every call out to the enabled writers ([`ExcelReport`],
//! [`HtmlReport`] or any other [`ReportType`]). Each test gets a test log;
//! a batch of tests shares one result summary. Results are laid out as:
//!
//! ```text
//! <report path>/
//!   Excel Results/<report name>.xlsx, Summary.xlsx
//!   HTML Results/<report name>.html, Summary.html
//!   Screenshots/
//! ```
//!
//! [`Assert`] turns checks into logged steps with a selectable
//! [`FailurePolicy`].

pub mod assertions;
pub mod excel;
pub mod html;
mod names;
pub mod report;
pub mod screenshot;
pub mod settings;
pub mod theme;
pub mod writer;

pub use assertions::{Assert, AssertionFailure, FailurePolicy};
pub use excel::ExcelReport;
pub use html::HtmlReport;
pub use report::{Report, StepReporter};
pub use screenshot::{NoCapture, ScreenCapture};
pub use settings::ReportSettings;
pub use theme::{ReportTheme, Theme};
pub use writer::{ReportType, SummaryEntry, TestLogEntry};

/// Folder holding the Excel workbooks
pub const EXCEL_RESULTS: &str = "Excel Results";
/// Folder holding the HTML documents
pub const HTML_RESULTS: &str = "HTML Results";
/// Folder holding step screenshots
pub const SCREENSHOTS: &str = "Screenshots";
