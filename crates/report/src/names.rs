//! Identifiers derived from free-text report names

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").ok());
static NOT_FILE_SAFE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9.-]").ok());

fn strip(pattern: &Lazy<Option<Regex>>, input: &str) -> String {
    match pattern.as_ref() {
        Some(re) => re.replace_all(input, "").into_owned(),
        None => input.to_string(),
    }
}

/// HTML element id for a section or sub-section title
pub(crate) fn element_id(title: &str) -> String {
    strip(&NON_ALPHANUMERIC, title)
}

/// Step name as it appears in a screenshot file name
///
/// Spaces become underscores; anything else outside `[a-zA-Z0-9.-]` is
/// dropped, the underscores included.
pub(crate) fn screenshot_step_name(step_name: &str) -> String {
    strip(&NOT_FILE_SAFE, &step_name.replace(' ', "_"))
}
