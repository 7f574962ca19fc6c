//! Report color themes

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use autopia_common::{AutopiaError, Result, Settings};

/// Colors (`#RRGGBB`) used by the Excel and HTML writers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTheme {
    pub heading_back_color: String,
    pub heading_fore_color: String,
    pub section_back_color: String,
    pub section_fore_color: String,
    pub content_back_color: String,
    pub content_fore_color: String,
}

impl ReportTheme {
    /// Theme named by the `ReportTheme` property, or the default theme
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        match settings.get("ReportTheme") {
            Some(name) if !name.trim().is_empty() => Ok(name.trim().parse::<Theme>()?.report_theme()),
            _ => Ok(Self::default()),
        }
    }
}

impl Default for ReportTheme {
    fn default() -> Self {
        Theme::Classic.report_theme()
    }
}

/// Built-in color presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Autumn,
    Classic,
    Mystic,
    Olive,
    Retro,
    Serene,
}

impl Theme {
    pub fn report_theme(self) -> ReportTheme {
        let (hb, hf, sb, sf, cb, cf) = match self {
            Theme::Autumn => ("#7B4B2A", "#FFF5E6", "#D9A066", "#3B2314", "#FFF5E6", "#3B2314"),
            Theme::Classic => ("#12579D", "#FFFFFF", "#BCBCBC", "#000000", "#F6F3E4", "#000000"),
            Theme::Mystic => ("#4D7C7B", "#FFFF95", "#89B6B5", "#333300", "#FAFAC5", "#000000"),
            Theme::Olive => ("#686145", "#EDE9CE", "#C5AF7D", "#000000", "#EDE9CE", "#333300"),
            Theme::Retro => ("#CE824E", "#F4E6D6", "#D8B48C", "#3B2314", "#F4E6D6", "#000000"),
            Theme::Serene => ("#7B597A", "#FFFFFF", "#CCCCFF", "#000000", "#FFFFFF", "#000000"),
        };

        ReportTheme {
            heading_back_color: hb.to_string(),
            heading_fore_color: hf.to_string(),
            section_back_color: sb.to_string(),
            section_fore_color: sf.to_string(),
            content_back_color: cb.to_string(),
            content_fore_color: cf.to_string(),
        }
    }
}

impl FromStr for Theme {
    type Err = AutopiaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "autumn" => Ok(Theme::Autumn),
            "classic" => Ok(Theme::Classic),
            "mystic" => Ok(Theme::Mystic),
            "olive" => Ok(Theme::Olive),
            "retro" => Ok(Theme::Retro),
            "serene" => Ok(Theme::Serene),
            _ => Err(AutopiaError::framework(format!("Unknown report theme: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopia_common::excel::parse_hex_color;

    #[test]
    fn test_presets_are_valid_colors() {
        for theme in [
            Theme::Autumn,
            Theme::Classic,
            Theme::Mystic,
            Theme::Olive,
            Theme::Retro,
            Theme::Serene,
        ] {
            let colors = theme.report_theme();
            for hex in [
                &colors.heading_back_color,
                &colors.heading_fore_color,
                &colors.section_back_color,
                &colors.section_fore_color,
                &colors.content_back_color,
                &colors.content_fore_color,
            ] {
                assert!(parse_hex_color(hex).is_ok(), "{:?}: {}", theme, hex);
            }
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("MYSTIC".parse::<Theme>().unwrap(), Theme::Mystic);
        assert!("neon".parse::<Theme>().is_err());
        assert_eq!(ReportTheme::default(), Theme::Classic.report_theme());
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        assert_eq!(ReportTheme::from_settings(&settings).unwrap(), ReportTheme::default());

        settings.set("ReportTheme", "Olive");
        assert_eq!(ReportTheme::from_settings(&settings).unwrap(), Theme::Olive.report_theme());

        settings.set("ReportTheme", "Plaid");
        assert!(ReportTheme::from_settings(&settings).is_err());
    }
}
