//! Output formatting for CLI

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain `header: value` lines
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn table<T: TableDisplay>(item: &T) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(T::headers());
    table.add_row(item.row());
    table.to_string()
}

fn plain<T: TableDisplay>(item: &T) -> String {
    T::headers()
        .iter()
        .zip(item.row())
        .map(|(header, value)| format!("{}: {}", header, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single item
pub fn render_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Table => table(item),
        OutputFormat::Json => serde_json::to_string_pretty(item)?,
        OutputFormat::Yaml => serde_yaml::to_string(item)?,
        OutputFormat::Plain => plain(item),
    })
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_item(item, format)?);
    Ok(())
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Field {
        name: String,
        value: String,
    }

    impl TableDisplay for Field {
        fn headers() -> Vec<&'static str> {
            vec!["Field", "Value"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.name.clone(), self.value.clone()]
        }
    }

    fn field(name: &str, value: &str) -> Field {
        Field {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_plain_item() {
        let rendered = render_item(&field("Username", "alice"), OutputFormat::Plain).unwrap();
        assert_eq!(rendered, "Field: Username\nValue: alice");
    }

    #[test]
    fn test_json_item() {
        let rendered = render_item(&field("Password", "secret"), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["name"], "Password");
        assert_eq!(parsed["value"], "secret");
    }

    #[test]
    fn test_yaml_item() {
        let rendered = render_item(&field("Username", "alice"), OutputFormat::Yaml).unwrap();
        assert!(rendered.contains("name: Username"));
        assert!(rendered.contains("value: alice"));
    }

    #[test]
    fn test_table_contains_headers_and_values() {
        let rendered = render_item(&field("Username", "alice"), OutputFormat::Table).unwrap();
        assert!(rendered.contains("Field"));
        assert!(rendered.contains("alice"));
    }
}
