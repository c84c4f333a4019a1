//! # viz-core
//!
//! Core domain types for the Asset Chart Visualizer.
//! Holds the OHLCV data model, the user-facing selection enums and the
//! formatting strategies shared by every chart variant.

pub mod palette;
pub mod sample;

pub use palette::*;
pub use sample::*;

use serde::{Deserialize, Serialize};

// ============================================================================
// CHART SELECTION ENUMS
// ============================================================================

/// Which chart the display should draw. `None` means "draw nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "pie")]
    Pie,
}

impl ChartKind {
    /// Parse a selector string. Anything unrecognized falls back to `None`,
    /// which the render host treats as "leave the surface blank".
    pub fn parse(s: &str) -> Self {
        match s {
            "bar" => Self::Bar,
            "line" => Self::Line,
            "pie" => Self::Pie,
            _ => Self::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Bar => "Bar",
            Self::Line => "Line",
            Self::Pie => "Pie",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Bar, Self::Line, Self::Pie]
    }
}

/// Requested sampling resolution of the upstream dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "minute")]
    Minute,
    #[serde(rename = "hour")]
    Hour,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "week")]
    Week,
}

impl Granularity {
    /// Minute and hour data is too dense to display one slot per sample,
    /// so those two get folded into calendar-day buckets before drawing.
    pub fn buckets_to_day(&self) -> bool {
        matches!(self, Self::Minute | Self::Hour)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Minute, Self::Hour, Self::Day, Self::Week]
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::Day
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Application theme. Purely a styling parameter, threaded through
/// every renderer via [`palette::Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Dark => "theme-dark",
            Self::Light => "theme-light",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for price/currency formatting
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// Strategy trait for count-like values (volume, trade counts)
pub trait CountFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// USD formatter: `$1,234.56`, grouped thousands, two decimals.
#[derive(Debug, Clone, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format(&self, value: f64) -> String {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}${}", sign, group_thousands(value.abs(), 2))
    }
}

/// Grouped integer formatter: `1,234,567` (locale-string analog).
#[derive(Debug, Clone, Default)]
pub struct GroupedCountFormatter;

impl CountFormatter for GroupedCountFormatter {
    fn format(&self, value: f64) -> String {
        group_thousands(value, 0)
    }
}

/// Format `value` with comma-grouped thousands and `decimals` fraction digits.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.prec$}", value.abs(), prec = decimals);
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Currency string, or `"N/A"` when the field came through malformed.
pub fn format_currency_or_na(value: f64) -> String {
    if value.is_finite() {
        UsdFormatter.format(value)
    } else {
        "N/A".to_string()
    }
}

/// Grouped count string, or `"N/A"` for malformed fields.
pub fn format_count_or_na(value: f64) -> String {
    if value.is_finite() {
        GroupedCountFormatter.format(value)
    } else {
        "N/A".to_string()
    }
}

/// Signed delta string: `+12.34` / `-5.00`.
pub fn format_signed(value: f64, decimals: usize) -> String {
    if value >= 0.0 {
        format!("+{:.prec$}", value, prec = decimals)
    } else {
        format!("{:.prec$}", value, prec = decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_parse_silent_fallback() {
        assert_eq!(ChartKind::parse("bar"), ChartKind::Bar);
        assert_eq!(ChartKind::parse("pie"), ChartKind::Pie);
        assert_eq!(ChartKind::parse("scatter"), ChartKind::None);
        assert_eq!(ChartKind::parse(""), ChartKind::None);
    }

    #[test]
    fn test_granularity_day_bucketing() {
        assert!(Granularity::Minute.buckets_to_day());
        assert!(Granularity::Hour.buckets_to_day());
        assert!(!Granularity::Day.buckets_to_day());
        assert!(!Granularity::Week.buckets_to_day());
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemeMode::Dark.toggle(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggle(), ThemeMode::Dark);
    }

    #[test]
    fn test_grouped_currency() {
        assert_eq!(UsdFormatter.format(1234567.891), "$1,234,567.89");
        assert_eq!(UsdFormatter.format(-45.5), "-$45.50");
        assert_eq!(UsdFormatter.format(999.0), "$999.00");
    }

    #[test]
    fn test_grouped_count() {
        assert_eq!(GroupedCountFormatter.format(1234567.0), "1,234,567");
        assert_eq!(GroupedCountFormatter.format(950.0), "950");
    }

    #[test]
    fn test_na_fallback() {
        assert_eq!(format_currency_or_na(f64::NAN), "N/A");
        assert_eq!(format_count_or_na(f64::INFINITY), "N/A");
        assert_eq!(format_currency_or_na(10.0), "$10.00");
    }

    #[test]
    fn test_signed() {
        assert_eq!(format_signed(5.0, 2), "+5.00");
        assert_eq!(format_signed(-5.0, 2), "-5.00");
    }
}
