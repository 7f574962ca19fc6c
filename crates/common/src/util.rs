//! Time and string helpers

use chrono::{DateTime, Local};
use std::fmt::Write;
use tracing::error;

use crate::error::{AutopiaError, Result};

/// Current local time
pub fn current_time() -> DateTime<Local> {
    Local::now()
}

/// Current local time rendered with a strftime pattern
pub fn current_formatted_time(format: &str) -> Result<String> {
    formatted_time(&Local::now(), format)
}

/// Render `time` with a strftime pattern; unknown specifiers are an error
pub fn formatted_time(time: &DateTime<Local>, format: &str) -> Result<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", time.format(format)).map_err(|_| {
        error!(format, "Invalid date format");
        AutopiaError::framework(format!("Invalid date format: {}", format))
    })?;
    Ok(rendered)
}

/// Formatted current time that is safe to use in file and folder names
pub fn timestamp_for_path(format: &str) -> Result<String> {
    Ok(current_formatted_time(format)?
        .replace(' ', "_")
        .replace(':', "-"))
}

/// Elapsed time between two instants in hours, minutes and seconds
///
/// Hours are only included once the difference reaches 60 minutes.
pub fn time_difference(start: &DateTime<Local>, end: &DateTime<Local>) -> String {
    let seconds = (*end - *start).num_seconds();
    let minutes = seconds / 60;

    if minutes >= 60 {
        format!(
            "{} hour(s), {} minute(s), {} second(s)",
            minutes / 60,
            minutes % 60,
            seconds % 60
        )
    } else {
        format!("{} minute(s), {} second(s)", minutes, seconds % 60)
    }
}

pub fn capitalize_first_letter(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn uncapitalize_first_letter(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a `SimpleDateFormat` style pattern (`dd-MMM-yyyy hh:mm:ss a`)
/// into a strftime pattern. Patterns that already contain `%` are returned
/// unchanged.
pub fn to_strftime(pattern: &str) -> String {
    if pattern.contains('%') {
        return pattern.to_string();
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // quoted literal; '' is an escaped quote
            i += 1;
            if i < chars.len() && chars[i] == '\'' {
                out.push('\'');
                i += 1;
                continue;
            }
            while i < chars.len() && chars[i] != '\'' {
                out.push(chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let token = match (c, run) {
            ('y', 2) => "%y".to_string(),
            ('y', _) => "%Y".to_string(),
            ('M', 1) => "%-m".to_string(),
            ('M', 2) => "%m".to_string(),
            ('M', 3) => "%b".to_string(),
            ('M', _) => "%B".to_string(),
            ('d', 1) => "%-d".to_string(),
            ('d', _) => "%d".to_string(),
            ('H', 1) => "%-H".to_string(),
            ('H', _) => "%H".to_string(),
            ('h', 1) => "%-I".to_string(),
            ('h', _) => "%I".to_string(),
            ('m', _) => "%M".to_string(),
            ('s', _) => "%S".to_string(),
            ('S', _) => "%3f".to_string(),
            ('a', _) => "%p".to_string(),
            ('E', 1..=3) => "%a".to_string(),
            ('E', _) => "%A".to_string(),
            ('z', _) => "%Z".to_string(),
            ('Z', _) => "%z".to_string(),
            _ => std::iter::repeat(c).take(run).collect(),
        };

        out.push_str(&token);
        i += run;
    }

    out
}
