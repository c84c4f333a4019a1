//! Theme-keyed color tables for the chart renderers.
//!
//! Every color a renderer needs comes through [`Palette`] so the theme flag
//! is consulted in exactly one place.

use crate::ThemeMode;

/// Two-stop vertical gradient specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientStops {
    pub top: &'static str,
    pub bottom: &'static str,
}

/// Categorical palette for pie slices, dark theme (ColorBrewer Set2).
const PIE_DARK: &[&str] = &[
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// Categorical palette for pie slices, light theme (saturated material tones).
const PIE_LIGHT: &[&str] = &[
    "#ff7043", "#42a5f5", "#66bb6a", "#ab47bc", "#ffca28", "#26c6da", "#ec407a", "#7e57c2",
    "#9ccc65", "#5c6bc0", "#ff9800", "#29b6f6", "#f44336", "#2196f3", "#4caf50",
];

/// Theme-resolved color lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub mode: ThemeMode,
}

impl Palette {
    pub fn new(mode: ThemeMode) -> Self {
        Self { mode }
    }

    fn pick(&self, dark: &'static str, light: &'static str) -> &'static str {
        if self.mode.is_dark() { dark } else { light }
    }

    // ------------------------------------------------------------------
    // Chrome: tooltip, axes, grid
    // ------------------------------------------------------------------

    pub fn tooltip_bg(&self) -> &'static str {
        self.pick("#333", "white")
    }

    pub fn tooltip_fg(&self) -> &'static str {
        self.pick("white", "black")
    }

    pub fn tooltip_border(&self) -> &'static str {
        self.pick("#555", "#ccc")
    }

    pub fn tooltip_divider(&self) -> &'static str {
        self.pick("#555", "#ddd")
    }

    pub fn axis(&self) -> &'static str {
        self.pick("white", "black")
    }

    pub fn grid(&self) -> &'static str {
        self.pick("rgba(255,255,255,0.15)", "rgba(0,0,0,0.08)")
    }

    pub fn reference_line(&self) -> &'static str {
        self.pick("rgba(255,255,255,0.5)", "rgba(0,0,0,0.5)")
    }

    pub fn reference_label(&self) -> &'static str {
        self.pick("rgba(255,255,255,0.7)", "rgba(0,0,0,0.7)")
    }

    // ------------------------------------------------------------------
    // Bar chart
    // ------------------------------------------------------------------

    pub fn bar_positive(&self) -> GradientStops {
        if self.mode.is_dark() {
            GradientStops { top: "#4caf50", bottom: "#1b5e20" }
        } else {
            GradientStops { top: "#66bb6a", bottom: "#43a047" }
        }
    }

    pub fn bar_negative(&self) -> GradientStops {
        if self.mode.is_dark() {
            GradientStops { top: "#f44336", bottom: "#b71c1c" }
        } else {
            GradientStops { top: "#ef5350", bottom: "#c62828" }
        }
    }

    pub fn bar_neutral(&self) -> GradientStops {
        if self.mode.is_dark() {
            GradientStops { top: "#9c27b0", bottom: "#4a148c" }
        } else {
            GradientStops { top: "#ab47bc", bottom: "#8e24aa" }
        }
    }

    pub fn bar_highlight(&self) -> &'static str {
        self.pick("#ff9800", "#ffa726")
    }

    // ------------------------------------------------------------------
    // Line chart
    // ------------------------------------------------------------------

    pub fn area_gradient(&self) -> GradientStops {
        if self.mode.is_dark() {
            GradientStops { top: "#4fc3f7", bottom: "#0d47a1" }
        } else {
            GradientStops { top: "#29b6f6", bottom: "#e1f5fe" }
        }
    }

    /// Three-stop stroke gradient, low value to high: (low, mid, high).
    pub fn line_gradient(&self) -> (&'static str, &'static str, &'static str) {
        if self.mode.is_dark() {
            ("#00e676", "#2196f3", "#f06292")
        } else {
            ("#00c853", "#1976d2", "#ec407a")
        }
    }

    pub fn marker_fill(&self) -> &'static str {
        self.pick("#e1f5fe", "#01579b")
    }

    pub fn marker_stroke(&self) -> &'static str {
        self.pick("#0d47a1", "#b3e5fc")
    }

    pub fn marker_highlight(&self) -> &'static str {
        self.pick("#ffab40", "#ff6d00")
    }

    // ------------------------------------------------------------------
    // Pie chart
    // ------------------------------------------------------------------

    pub fn pie_color(&self, index: usize) -> &'static str {
        let table = if self.mode.is_dark() { PIE_DARK } else { PIE_LIGHT };
        table[index % table.len()]
    }

    pub fn pie_stroke(&self) -> &'static str {
        self.pick("#222", "#fff")
    }

    pub fn subtitle_muted(&self) -> &'static str {
        self.pick("#ccc", "#555")
    }

    pub fn title(&self) -> &'static str {
        self.pick("white", "black")
    }

    pub fn label_leader(&self) -> &'static str {
        self.pick("rgba(255,255,255,0.5)", "rgba(0,0,0,0.5)")
    }

    pub fn center_label(&self) -> &'static str {
        self.pick("#e0e0e0", "#333")
    }

    pub fn volume_high_annotation(&self) -> &'static str {
        self.pick("#ffc107", "#ff6d00")
    }

    pub fn volume_low_annotation(&self) -> &'static str {
        self.pick("#4fc3f7", "#0288d1")
    }

    pub fn volume_avg_annotation(&self) -> &'static str {
        self.pick("#e0e0e0", "#555")
    }

    // ------------------------------------------------------------------
    // Shared annotations
    // ------------------------------------------------------------------

    pub fn change_up(&self) -> &'static str {
        self.pick("#4caf50", "#2e7d32")
    }

    pub fn change_down(&self) -> &'static str {
        self.pick("#f44336", "#c62828")
    }

    /// Tooltip rows use the same up/down pair in both themes.
    pub fn delta_color(&self, delta: f64) -> &'static str {
        if delta >= 0.0 { "#4caf50" } else { "#f44336" }
    }

    pub fn max_marker_fill(&self) -> &'static str {
        "#ffeb3b"
    }

    pub fn max_marker_text(&self) -> &'static str {
        self.pick("#ffeb3b", "#ff6d00")
    }

    pub fn min_marker_fill(&self) -> &'static str {
        self.pick("#ff5252", "#d50000")
    }

    pub fn marker_outline(&self) -> &'static str {
        self.pick("#333", "white")
    }
}

/// Move a `#rrggbb` color toward white (`amount > 0`) or black
/// (`amount < 0`), `amount` in `[-1, 1]`. Used for per-slice gradient
/// stops; unparseable input is returned unchanged.
pub fn shade(hex: &str, amount: f64) -> String {
    let Some(stripped) = hex.strip_prefix('#') else {
        return hex.to_string();
    };
    if stripped.len() != 6 {
        return hex.to_string();
    }

    let parse = |s: &str| u8::from_str_radix(s, 16).ok();
    let (Some(r), Some(g), Some(b)) = (
        parse(&stripped[0..2]),
        parse(&stripped[2..4]),
        parse(&stripped[4..6]),
    ) else {
        return hex.to_string();
    };

    let blend = |ch: u8| -> u8 {
        let ch = ch as f64;
        let out = if amount >= 0.0 {
            ch + (255.0 - ch) * amount
        } else {
            ch * (1.0 + amount)
        };
        out.round().clamp(0.0, 255.0) as u8
    };

    format!("#{:02x}{:02x}{:02x}", blend(r), blend(g), blend(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_split() {
        let dark = Palette::new(ThemeMode::Dark);
        let light = Palette::new(ThemeMode::Light);

        assert_eq!(dark.tooltip_bg(), "#333");
        assert_eq!(light.tooltip_bg(), "white");
        assert_ne!(dark.bar_highlight(), light.bar_highlight());
    }

    #[test]
    fn test_pie_colors_cycle() {
        let dark = Palette::new(ThemeMode::Dark);
        assert_eq!(dark.pie_color(0), dark.pie_color(PIE_DARK.len()));

        let light = Palette::new(ThemeMode::Light);
        assert_eq!(light.pie_color(14), "#4caf50");
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade("#000000", 1.0), "#ffffff");
        assert_eq!(shade("#ffffff", -1.0), "#000000");
        assert_eq!(shade("#808080", 0.0), "#808080");
        // garbage passes through untouched
        assert_eq!(shade("red", 0.4), "red");
    }

    #[test]
    fn test_delta_color_sign() {
        let p = Palette::new(ThemeMode::Dark);
        assert_eq!(p.delta_color(1.0), "#4caf50");
        assert_eq!(p.delta_color(-1.0), "#f44336");
        assert_eq!(p.delta_color(0.0), "#4caf50");
    }
}
