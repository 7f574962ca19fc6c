//! `.properties` syntax
//!
//! Settings files follow the Java properties format: `#` and `!` comment
//! lines, `=`, `:` or whitespace separators, backslash line continuations
//! and `\t`, `\n`, `\r`, `\f`, `\uXXXX` escapes. [`to_ini`] decodes that
//! format into plain `key=value` lines escaped for the `ini` parser.

use crate::error::{AutopiaError, Result};

const WHITESPACE: &[char] = &[' ', '\t', '\x0c'];

/// Rewrite properties text as an `ini` general section
pub(crate) fn to_ini(source: &str) -> Result<String> {
    let mut out = String::with_capacity(source.len());

    for line in logical_lines(source) {
        let (key, value) = split_entry(&line);
        let key = unescape(key)?;
        if key.is_empty() {
            continue;
        }

        escape_into(&key, &mut out);
        out.push('=');
        escape_into(&unescape(value)?, &mut out);
        out.push('\n');
    }
    Ok(out)
}

/// Join continued lines, dropping blank and comment lines
fn logical_lines(source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in source.lines() {
        let line = raw.trim_start_matches(WHITESPACE);

        let mut current = match pending.take() {
            Some(current) => current,
            None if line.is_empty() || line.starts_with(&['#', '!'][..]) => continue,
            None => String::new(),
        };

        let (text, continues) = strip_continuation(line);
        current.push_str(text);
        if continues {
            pending = Some(current);
        } else {
            lines.push(current);
        }
    }

    lines.extend(pending);
    lines
}

/// A line continues when it ends in an odd number of backslashes
fn strip_continuation(line: &str) -> (&str, bool) {
    let backslashes = line.chars().rev().take_while(|&c| c == '\\').count();
    if backslashes % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

/// Split a logical line into its raw key and value
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start_matches(WHITESPACE);
    let value = match rest.strip_prefix(&['=', ':'][..]) {
        Some(value) => value.trim_start_matches(WHITESPACE),
        None => rest,
    };
    (&line[..key_end], value)
}

fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                let decoded = match code.len() {
                    4 => u32::from_str_radix(&code, 16).ok().and_then(char::from_u32),
                    _ => None,
                };
                match decoded {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(AutopiaError::Properties(format!(
                            "Malformed \\uxxxx encoding: \\u{}",
                            code
                        )))
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Escape `text` so the `ini` parser reads it back unchanged
fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\\' | '=' | ':' | ';' | '#' | '[' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:04x}", c as u32)),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Key=Value" => ("Key", "Value"); "equals")]
    #[test_case("Key: Value" => ("Key", "Value"); "colon")]
    #[test_case("Key   Value" => ("Key", "Value"); "whitespace")]
    #[test_case("Key = =Value" => ("Key", "=Value"); "second separator kept")]
    #[test_case("my\\ key=1" => ("my\\ key", "1"); "escaped space in key")]
    #[test_case("Flag" => ("Flag", ""); "key only")]
    fn test_split_entry(line: &str) -> (&str, &str) {
        split_entry(line)
    }

    #[test]
    fn test_comments_and_continuations() {
        let source = "# hash comment\n! bang comment\n\n  Browser = chrome\nList=one, \\\n     two\n";
        assert_eq!(
            logical_lines(source),
            vec!["Browser = chrome".to_string(), "List=one, two".to_string()]
        );
    }

    #[test]
    fn test_escaped_backslash_does_not_continue() {
        let source = "Path=C:\\\\\nNext=1\n";
        assert_eq!(
            logical_lines(source),
            vec!["Path=C:\\\\".to_string(), "Next=1".to_string()]
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("C:\\\\tests\\\\data").unwrap(), "C:\\tests\\data");
        assert_eq!(unescape("a\\tb\\u0041\\=").unwrap(), "a\tbA=");
        assert!(unescape("\\u00G1").is_err());
        assert!(unescape("\\u12").is_err());
    }

    #[test]
    fn test_to_ini_escapes_reserved_characters() {
        let ini = to_ini("Url=http://host:8080/#top\n").unwrap();
        assert_eq!(ini, "Url=http\\://host\\:8080/\\#top\n");
    }
}
