//! HTML report writer
//!
//! The test log and the result summary are plain HTML documents built by
//! appending fragments as the test progresses. Sections of the test log are
//! collapsible through two small scripts embedded in the page head.

use autopia_common::{AutopiaError, Result, Status};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::names::element_id;
use crate::settings::ReportSettings;
use crate::theme::ReportTheme;
use crate::writer::{ReportType, SummaryEntry, TestLogEntry};
use crate::HTML_RESULTS;

const JAVASCRIPT: &str = "\t\t <script> \n\
\t\t\t function toggleMenu(objID) { \n\
\t\t\t\t if (!document.getElementById) return; \n\
\t\t\t\t var ob = document.getElementById(objID).style; \n\
\t\t\t\t if(ob.display === 'none') { \n\
\t\t\t\t\t try { \n\
\t\t\t\t\t\t ob.display='table-row-group'; \n\
\t\t\t\t\t } catch(ex) { \n\
\t\t\t\t\t\t ob.display='block'; \n\
\t\t\t\t\t } \n\
\t\t\t\t } \n\
\t\t\t\t else { \n\
\t\t\t\t\t ob.display='none'; \n\
\t\t\t\t } \n\
\t\t\t } \n\
\t\t\t function toggleSubMenu(objId) { \n\
\t\t\t\t for(i=1; i<10000; i++) { \n\
\t\t\t\t\t var ob = document.getElementById(objId.concat(i)); \n\
\t\t\t\t\t if(ob === null) { \n\
\t\t\t\t\t\t break; \n\
\t\t\t\t\t } \n\
\t\t\t\t\t if(ob.style.display === 'none') { \n\
\t\t\t\t\t\t try { \n\
\t\t\t\t\t\t\t ob.style.display='table-row'; \n\
\t\t\t\t\t\t } catch(ex) { \n\
\t\t\t\t\t\t\t ob.style.display='block'; \n\
\t\t\t\t\t\t } \n\
\t\t\t\t\t } \n\
\t\t\t\t\t else { \n\
\t\t\t\t\t\t ob.style.display='none'; \n\
\t\t\t\t\t } \n\
\t\t\t\t } \n\
\t\t\t } \n\
\t\t </script> \n";

const FOOTER_COLUMNS: &str = "\t\t\t <colgroup> \n\
\t\t\t\t <col style='width: 25%' /> \n\
\t\t\t\t <col style='width: 25%' /> \n\
\t\t\t\t <col style='width: 25%' /> \n\
\t\t\t\t <col style='width: 25%' /> \n\
\t\t\t </colgroup> \n\n";

/// Writes `<report>/HTML Results/<name>.html` and `.../Summary.html`
#[derive(Debug)]
pub struct HtmlReport {
    settings: ReportSettings,
    theme: ReportTheme,
    test_log_path: PathBuf,
    result_summary_path: PathBuf,

    test_log_header_table_created: bool,
    test_log_main_table_created: bool,
    result_summary_header_table_created: bool,
    result_summary_main_table_created: bool,

    current_section: String,
    current_sub_section: String,
    current_content_number: u32,
    section_open: bool,
}

impl HtmlReport {
    pub fn new(settings: ReportSettings, theme: ReportTheme) -> Self {
        let results = settings.report_path().join(HTML_RESULTS);
        Self {
            test_log_path: results.join(format!("{}.html", settings.report_name)),
            result_summary_path: results.join("Summary.html"),
            settings,
            theme,
            test_log_header_table_created: false,
            test_log_main_table_created: false,
            result_summary_header_table_created: false,
            result_summary_main_table_created: false,
            current_section: String::new(),
            current_sub_section: String::new(),
            current_content_number: 1,
            section_open: false,
        }
    }

    pub fn test_log_path(&self) -> &Path {
        &self.test_log_path
    }

    pub fn result_summary_path(&self) -> &Path {
        &self.result_summary_path
    }

    fn theme_css(&self) -> String {
        let t = &self.theme;
        format!(
            "\t\t <style type='text/css'> \n\
\t\t\t body {{ \n\
\t\t\t\t background-color: {content_fore}; \n\
\t\t\t\t font-family: Verdana, Geneva, sans-serif; \n\
\t\t\t\t text-align: center; \n\
\t\t\t }} \n\n\
\t\t\t small {{ \n\
\t\t\t\t font-size: 0.7em; \n\
\t\t\t }} \n\n\
\t\t\t table {{ \n\
\t\t\t\t border: 1px solid #4D7C7B; \n\
\t\t\t\t border-collapse: collapse; \n\
\t\t\t\t border-spacing: 0px; \n\
\t\t\t\t width: 95%; \n\
\t\t\t\t margin-left: auto; \n\
\t\t\t\t margin-right: auto; \n\
\t\t\t }} \n\n\
\t\t\t tr.heading {{ \n\
\t\t\t\t background-color: {heading_back}; \n\
\t\t\t\t color: {heading_fore}; \n\
\t\t\t\t font-size: 0.9em; \n\
\t\t\t\t font-weight: bold; \n\
\t\t\t }} \n\n\
\t\t\t tr.subheading {{ \n\
\t\t\t\t background-color: {heading_fore}; \n\
\t\t\t\t color: {heading_back}; \n\
\t\t\t\t font-weight: bold; \n\
\t\t\t\t font-size: 0.9em; \n\
\t\t\t\t text-align: justify; \n\
\t\t\t }} \n\n\
\t\t\t tr.section {{ \n\
\t\t\t\t background-color: {section_back}; \n\
\t\t\t\t color: {section_fore}; \n\
\t\t\t\t cursor: pointer; \n\
\t\t\t\t font-weight: bold; \n\
\t\t\t\t font-size: 0.9em; \n\
\t\t\t\t text-align: justify; \n\
\t\t\t }} \n\n\
\t\t\t tr.subsection {{ \n\
\t\t\t\t cursor: pointer; \n\
\t\t\t }} \n\n\
\t\t\t tr.content {{ \n\
\t\t\t\t background-color: {content_back}; \n\
\t\t\t\t color: {content_fore}; \n\
\t\t\t\t font-size: 0.9em; \n\
\t\t\t\t display: table-row; \n\
\t\t\t }} \n\n\
\t\t\t td {{ \n\
\t\t\t\t padding: 4px; \n\
\t\t\t\t text-align: inherit\\0/; \n\
\t\t\t\t word-wrap: break-word; \n\
\t\t\t\t max-width: 450px; \n\
\t\t\t }} \n\n\
\t\t\t th {{ \n\
\t\t\t\t padding: 4px; \n\
\t\t\t\t text-align: inherit\\0/; \n\
\t\t\t\t word-break: break-all; \n\
\t\t\t\t max-width: 450px; \n\
\t\t\t }} \n\n\
\t\t\t td.justified {{ \n\
\t\t\t\t text-align: justify; \n\
\t\t\t }} \n\n\
\t\t\t td.pass {{ \n\
\t\t\t\t font-weight: bold; \n\
\t\t\t\t color: green; \n\
\t\t\t }} \n\n\
\t\t\t td.fail {{ \n\
\t\t\t\t font-weight: bold; \n\
\t\t\t\t color: red; \n\
\t\t\t }} \n\n\
\t\t\t td.done, td.screenshot {{ \n\
\t\t\t\t font-weight: bold; \n\
\t\t\t\t color: black; \n\
\t\t\t }} \n\n\
\t\t\t td.debug {{ \n\
\t\t\t\t font-weight: bold; \n\
\t\t\t\t color: blue; \n\
\t\t\t }} \n\n\
\t\t\t td.warning {{ \n\
\t\t\t\t font-weight: bold; \n\
\t\t\t\t color: orange; \n\
\t\t\t }} \n\
\t\t </style> \n\n",
            content_fore = t.content_fore_color,
            content_back = t.content_back_color,
            heading_back = t.heading_back_color,
            heading_fore = t.heading_fore_color,
            section_back = t.section_back_color,
            section_fore = t.section_fore_color,
        )
    }

    fn head(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html> \n\
<html> \n\
\t <head> \n\
\t\t <meta http-equiv='Content-Type' content='text/html; charset=UTF-8'> \n\
\t\t <title>{}</title> \n\n\
{}{}\t </head> \n\n",
            title,
            self.theme_css(),
            JAVASCRIPT
        )
    }
}

fn create(path: &Path, contents: &str, context: &str) -> Result<()> {
    File::create(path)
        .and_then(|mut file| file.write_all(contents.as_bytes()))
        .map_err(|e| {
            error!(path = %path.display(), error = %e, "{}", context);
            AutopiaError::framework(context)
        })
}

fn append(path: &Path, fragment: &str, context: &str) -> Result<()> {
    OpenOptions::new()
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(fragment.as_bytes()))
        .map_err(|e| {
            error!(path = %path.display(), error = %e, "{}", context);
            AutopiaError::framework(context)
        })
}

fn heading_row(heading: &str) -> String {
    format!(
        "\t\t\t\t <tr class='heading'> \n\
\t\t\t\t\t <th colspan='4' style='font-family:Copperplate Gothic; font-size:1.4em;'> \n\
\t\t\t\t\t\t {} \n\
\t\t\t\t\t </th> \n\
\t\t\t\t </tr> \n",
        heading
    )
}

fn sub_heading_row(sub_headings: [&str; 4]) -> String {
    let mut row = String::from("\t\t\t\t <tr class='subheading'> \n");
    for sub_heading in sub_headings {
        row.push_str(&format!(
            "\t\t\t\t\t <th>&nbsp;{}</th> \n",
            sub_heading.replace(' ', "&nbsp;")
        ));
    }
    row.push_str("\t\t\t\t </tr> \n");
    row
}

fn table_headings(headings: &[&str]) -> String {
    let mut row = String::from("\t\t\t <thead> \n\t\t\t\t <tr class='heading'> \n");
    for heading in headings {
        row.push_str(&format!("\t\t\t\t\t <th>{}</th> \n", heading));
    }
    row.push_str("\t\t\t\t </tr> \n\t\t\t </thead> \n\n");
    row
}

fn footer(duration_label: &str, duration: &str, noun: &str, passed: u32, failed: u32) -> String {
    format!(
        "\t\t\t </tbody> \n\
\t\t </table> \n\n\
\t\t <table id='footer'> \n\
{columns}\
\t\t\t <tfoot> \n\
\t\t\t\t <tr class='heading'> \n\
\t\t\t\t\t <th colspan='4'>{label}: {duration}</th> \n\
\t\t\t\t </tr> \n\
\t\t\t\t <tr class='subheading'> \n\
\t\t\t\t\t <td class='pass'>&nbsp;{noun} passed</td> \n\
\t\t\t\t\t <td class='pass'>&nbsp;: {passed}</td> \n\
\t\t\t\t\t <td class='fail'>&nbsp;{noun} failed</td> \n\
\t\t\t\t\t <td class='fail'>&nbsp;: {failed}</td> \n\
\t\t\t\t </tr> \n\
\t\t\t </tfoot> \n\
\t\t </table> \n\
\t </body> \n\
</html>",
        columns = FOOTER_COLUMNS,
        label = duration_label,
        duration = duration,
        noun = noun,
        passed = passed,
        failed = failed,
    )
}

const HEADER_TABLE: &str = "\t <body> \n\t\t <table id='header'> \n\t\t\t <thead> \n";

fn status_cells(description: &str, status: Status, screenshot: Option<&str>, link: bool) -> String {
    let class = status.css_class();
    match screenshot {
        Some(name) if link => format!(
            "\t\t\t\t\t <td class='justified'>{}</td> \n\
\t\t\t\t\t <td class='{}'><a href='..\\Screenshots\\{}'>{}</a></td> \n",
            description, class, name, status
        ),
        Some(name) => format!(
            "\t\t\t\t\t <td class='justified'>{} (Refer Screenshot @ {})</td> \n\
\t\t\t\t\t <td class='{}'>{}</td> \n",
            description, name, class, status
        ),
        None => format!(
            "\t\t\t\t\t <td class='justified'>{}</td> \n\
\t\t\t\t\t <td class='{}'>{}</td> \n",
            description, class, status
        ),
    }
}

impl ReportType for HtmlReport {
    fn initialize_test_log(&mut self) -> Result<()> {
        let title = format!(
            "{} - {} Automation Execution Results",
            self.settings.project_name, self.settings.report_name
        );
        debug!(path = %self.test_log_path.display(), "Creating HTML test log");
        create(
            &self.test_log_path,
            &self.head(&title),
            "Error while creating HTML test log file",
        )
    }

    fn add_test_log_heading(&mut self, heading: &str) -> Result<()> {
        if !self.test_log_header_table_created {
            append(
                &self.test_log_path,
                HEADER_TABLE,
                "Error while adding header table to HTML test log",
            )?;
            self.test_log_header_table_created = true;
        }
        append(
            &self.test_log_path,
            &heading_row(heading),
            "Error while adding heading to HTML test log",
        )
    }

    fn add_test_log_sub_heading(&mut self, sub_headings: [&str; 4]) -> Result<()> {
        append(
            &self.test_log_path,
            &sub_heading_row(sub_headings),
            "Error while adding sub-heading to HTML test log",
        )
    }

    fn add_test_log_table_headings(&mut self) -> Result<()> {
        if !self.test_log_main_table_created {
            append(
                &self.test_log_path,
                "\t\t\t </thead> \n\t\t </table> \n\n\t\t <table id='main'> \n",
                "Error while adding main table to HTML test log",
            )?;
            self.test_log_main_table_created = true;
        }
        append(
            &self.test_log_path,
            &table_headings(&["Step No", "Step Name", "Description", "Status", "Step Time"]),
            "Error while adding main table headings to HTML test log",
        )
    }

    fn add_test_log_section(&mut self, section: &str) -> Result<()> {
        let mut fragment = String::new();
        if self.section_open {
            fragment.push_str("\t\t\t </tbody> \n");
        }
        self.current_section = element_id(section);
        self.section_open = true;

        fragment.push_str(&format!(
            "\t\t\t <tbody> \n\
\t\t\t\t <tr class='section'> \n\
\t\t\t\t\t <td colspan='5' onclick=\"toggleMenu('{id}')\">+ {section}</td> \n\
\t\t\t\t </tr> \n\
\t\t\t </tbody> \n\
\t\t\t <tbody id='{id}' style='display:table-row-group'> \n",
            id = self.current_section,
            section = section,
        ));
        append(
            &self.test_log_path,
            &fragment,
            "Error while adding section to HTML test log",
        )
    }

    fn add_test_log_sub_section(&mut self, sub_section: &str) -> Result<()> {
        self.current_sub_section = element_id(sub_section);
        self.current_content_number = 1;

        let fragment = format!(
            "\t\t\t\t <tr class='subheading subsection'> \n\
\t\t\t\t\t <td colspan='5' onclick=\"toggleSubMenu('{}{}')\">&nbsp;+ {}</td> \n\
\t\t\t\t </tr> \n",
            self.current_section, self.current_sub_section, sub_section
        );
        append(
            &self.test_log_path,
            &fragment,
            "Error while adding sub-section to HTML test log",
        )
    }

    fn update_test_log(&mut self, entry: &TestLogEntry<'_>) -> Result<()> {
        let mut row = format!(
            "\t\t\t\t <tr class='content' id='{}{}{}'> \n\
\t\t\t\t\t <td>{}</td> \n\
\t\t\t\t\t <td class='justified'>{}</td> \n",
            self.current_section,
            self.current_sub_section,
            self.current_content_number,
            entry.step_number,
            entry.step_name
        );
        self.current_content_number += 1;

        row.push_str(&status_cells(
            entry.description,
            entry.status,
            entry.screenshot,
            self.settings.link_screenshots_to_test_log,
        ));
        row.push_str(&format!(
            "\t\t\t\t\t <td><small>{}</small></td> \n\t\t\t\t </tr> \n",
            entry.step_time
        ));

        append(&self.test_log_path, &row, "Error while updating HTML test log")
    }

    fn add_test_log_footer(
        &mut self,
        execution_time: &str,
        steps_passed: u32,
        steps_failed: u32,
    ) -> Result<()> {
        append(
            &self.test_log_path,
            &footer("Execution Duration", execution_time, "Steps", steps_passed, steps_failed),
            "Error while adding footer to HTML test log",
        )
    }

    fn initialize_result_summary(&mut self) -> Result<()> {
        let title = format!(
            "{} - Automation Execution Results Summary",
            self.settings.project_name
        );
        debug!(path = %self.result_summary_path.display(), "Creating HTML result summary");
        create(
            &self.result_summary_path,
            &self.head(&title),
            "Error while creating HTML result summary file",
        )
    }

    fn add_result_summary_heading(&mut self, heading: &str) -> Result<()> {
        if !self.result_summary_header_table_created {
            append(
                &self.result_summary_path,
                HEADER_TABLE,
                "Error while adding header table to HTML result summary",
            )?;
            self.result_summary_header_table_created = true;
        }
        append(
            &self.result_summary_path,
            &heading_row(heading),
            "Error while adding heading to HTML result summary",
        )
    }

    fn add_result_summary_sub_heading(&mut self, sub_headings: [&str; 4]) -> Result<()> {
        append(
            &self.result_summary_path,
            &sub_heading_row(sub_headings),
            "Error while adding sub-heading to HTML result summary",
        )
    }

    fn add_result_summary_table_headings(&mut self) -> Result<()> {
        if !self.result_summary_main_table_created {
            append(
                &self.result_summary_path,
                "\t\t\t </thead> \n\t\t </table> \n\n\t\t <table id='main'> \n",
                "Error while adding main table to HTML result summary",
            )?;
            self.result_summary_main_table_created = true;
        }
        let mut headings = table_headings(&[
            "Module",
            "Test Case",
            "Test Instance",
            "Test Description",
            "Additional Details",
            "Execution Time",
            "Test Status",
        ]);
        headings.push_str("\t\t\t <tbody> \n");
        append(
            &self.result_summary_path,
            &headings,
            "Error while adding main table headings to HTML result summary",
        )
    }

    fn update_result_summary(&mut self, entry: &SummaryEntry<'_>) -> Result<()> {
        let params = entry.test_parameters;
        let instance = if entry.link_test_log {
            format!(
                "<a href='{}.html' target='about_blank'>{}</a>",
                entry.report_name, params.instance
            )
        } else {
            params.instance.clone()
        };
        let class = if entry.status.eq_ignore_ascii_case("passed") {
            "pass"
        } else {
            "fail"
        };

        let row = format!(
            "\t\t\t\t <tr class='content' > \n\
\t\t\t\t\t <td class='justified'>{}</td> \n\
\t\t\t\t\t <td class='justified'>{}</td> \n\
\t\t\t\t\t <td class='justified'>{}</td> \n\
\t\t\t\t\t <td class='justified'>{}</td> \n\
\t\t\t\t\t <td class='justified'>{}</td> \n\
\t\t\t\t\t <td>{}</td> \n\
\t\t\t\t\t <td class='{}'>{}</td> \n\
\t\t\t\t </tr> \n",
            params.module(),
            params.testcase(),
            instance,
            params.description,
            params.additional_details,
            entry.execution_time,
            class,
            entry.status
        );
        append(
            &self.result_summary_path,
            &row,
            "Error while updating HTML result summary",
        )
    }

    fn add_result_summary_footer(
        &mut self,
        total_execution_time: &str,
        tests_passed: u32,
        tests_failed: u32,
    ) -> Result<()> {
        append(
            &self.result_summary_path,
            &footer("Total Duration", total_execution_time, "Tests", tests_passed, tests_failed),
            "Error while adding footer to HTML result summary",
        )
    }
}
