//! # viz-state
//!
//! Reactive state management for the Asset Chart Visualizer.
//! Leptos signals hold the user's selections and the loaded dataset;
//! the display panel derives a render context from them.

use chrono::NaiveDate;
use leptos::prelude::*;
use viz_core::{ChartKind, Granularity, OhlcvSeries, RenderContext, ThemeMode};

// ============================================================================
// ASSET SELECTION
// ============================================================================

/// Selectable instruments. `None` until the user picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Asset {
    #[default]
    None,
    Aapl,
    Msft,
    Tsla,
    Baba,
    Qqq,
}

impl Asset {
    pub fn parse(s: &str) -> Self {
        match s {
            "AAPL" => Self::Aapl,
            "MSFT" => Self::Msft,
            "TSLA" => Self::Tsla,
            "BABA" => Self::Baba,
            "QQQ" => Self::Qqq,
            _ => Self::None,
        }
    }

    pub fn ticker(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Aapl => "AAPL",
            Self::Msft => "MSFT",
            Self::Tsla => "TSLA",
            Self::Baba => "BABA",
            Self::Qqq => "QQQ",
        }
    }

    pub fn company(&self) -> &'static str {
        match self {
            Self::None => "Select",
            Self::Aapl => "Apple",
            Self::Msft => "Microsoft",
            Self::Tsla => "Tesla",
            Self::Baba => "Alibaba, ADR",
            Self::Qqq => "Nasdaq-100 ETF",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Aapl, Self::Msft, Self::Tsla, Self::Baba, Self::Qqq]
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Global application state with reactive signals
#[derive(Clone, Copy)]
pub struct AppState {
    /// Loaded dataset for the current selection
    pub series: RwSignal<OhlcvSeries>,
    /// Selected chart kind (`None` until the user picks one)
    pub chart: RwSignal<ChartKind>,
    /// Selected instrument
    pub asset: RwSignal<Asset>,
    /// Selected sampling granularity
    pub granularity: RwSignal<Granularity>,
    /// Start of the requested period
    pub start_date: RwSignal<Option<NaiveDate>>,
    /// End of the requested period
    pub end_date: RwSignal<Option<NaiveDate>>,
    /// Theme (threaded into every renderer)
    pub theme: RwSignal<ThemeMode>,
    /// Dataset load in flight
    pub loading: RwSignal<bool>,
    /// Current error message
    pub error: RwSignal<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            series: RwSignal::new(OhlcvSeries::default()),
            chart: RwSignal::new(ChartKind::None),
            asset: RwSignal::new(Asset::None),
            granularity: RwSignal::new(Granularity::Day),
            start_date: RwSignal::new(None),
            end_date: RwSignal::new(None),
            theme: RwSignal::new(ThemeMode::Dark),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    // ========================================================================
    // Selections
    // ========================================================================

    /// Chart selector change. Unrecognized values land on `ChartKind::None`
    /// and the display quietly draws nothing.
    pub fn select_chart(&self, value: &str) {
        self.chart.set(ChartKind::parse(value));
    }

    pub fn select_asset(&self, value: &str) {
        self.asset.set(Asset::parse(value));
    }

    pub fn select_granularity(&self, value: &str) {
        let granularity = match value {
            "minute" => Some(Granularity::Minute),
            "hour" => Some(Granularity::Hour),
            "day" => Some(Granularity::Day),
            "week" => Some(Granularity::Week),
            _ => None,
        };
        if let Some(g) = granularity {
            self.granularity.set(g);
        }
    }

    /// Date picker change. Empty or malformed values clear the selection.
    pub fn select_start_date(&self, value: &str) {
        self.start_date.set(NaiveDate::parse_from_str(value, "%Y-%m-%d").ok());
    }

    pub fn select_end_date(&self, value: &str) {
        self.end_date.set(NaiveDate::parse_from_str(value, "%Y-%m-%d").ok());
    }

    pub fn toggle_theme(&self) {
        self.theme.update(|t| *t = t.toggle());
    }

    /// True once every selection needed for a render is made.
    pub fn selection_complete(&self) -> bool {
        self.chart.get() != ChartKind::None
            && self.asset.get() != Asset::None
            && self.date_range().is_some()
    }

    /// The selected period, normalized so start <= end.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.start_date.get()?;
        let end = self.end_date.get()?;
        if start <= end {
            Some((start, end))
        } else {
            Some((end, start))
        }
    }

    /// Snapshot the signals into the immutable per-render input bundle.
    /// `None` while the selection is incomplete.
    pub fn render_context(&self) -> Option<RenderContext> {
        if !self.selection_complete() {
            return None;
        }
        Some(RenderContext::new(
            self.series.get(),
            self.chart.get(),
            self.asset.get().ticker(),
            self.granularity.get(),
            self.theme.get(),
        ))
    }

    // ========================================================================
    // Dataset
    // ========================================================================

    pub fn set_series(&self, series: OhlcvSeries) {
        self.series.set(series);
        self.loading.set(false);
    }

    pub fn set_loading(&self) {
        self.loading.set(true);
        self.error.set(None);
    }

    pub fn set_error(&self, msg: impl Into<String>) {
        self.error.set(Some(msg.into()));
        self.loading.set(false);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide app state context to component tree
pub fn provide_app_state() -> AppState {
    let state = AppState::new();
    provide_context(state);
    state
}

/// Use app state from context
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::Sample;

    #[test]
    fn test_asset_parse_round_trip() {
        for asset in Asset::all() {
            assert_eq!(Asset::parse(asset.ticker()), *asset);
        }
        assert_eq!(Asset::parse("NONE"), Asset::None);
        assert_eq!(Asset::parse("GME"), Asset::None);
    }

    #[test]
    fn test_render_context_requires_complete_selection() {
        let state = AppState::new();
        assert!(state.render_context().is_none());

        state.select_chart("bar");
        assert!(state.render_context().is_none());

        state.select_asset("AAPL");
        assert!(state.render_context().is_none());

        state.select_start_date("2024-01-02");
        state.select_end_date("2024-02-15");
        let ctx = state.render_context().unwrap();
        assert_eq!(ctx.chart, ChartKind::Bar);
        assert_eq!(ctx.asset_label, "AAPL");
    }

    #[test]
    fn test_date_range_normalizes_reversed_bounds() {
        let state = AppState::new();
        state.select_start_date("2024-03-10");
        state.select_end_date("2024-03-01");
        let (start, end) = state.date_range().unwrap();
        assert!(start <= end);
        assert_eq!(start.to_string(), "2024-03-01");

        state.select_end_date("not-a-date");
        assert!(state.date_range().is_none());
    }

    #[test]
    fn test_unrecognized_chart_selector_is_silent() {
        let state = AppState::new();
        state.select_chart("bar");
        state.select_chart("scatter");
        assert_eq!(state.chart.get(), ChartKind::None);
    }

    #[test]
    fn test_set_series_clears_loading() {
        let state = AppState::new();
        state.set_loading();
        assert!(state.loading.get());

        state.set_series(OhlcvSeries::new(vec![Sample::new(0, 1.0, 2.0, 0.5, 1.5, 10.0)]));
        assert!(!state.loading.get());
        assert_eq!(state.series.get().len(), 1);
    }
}
