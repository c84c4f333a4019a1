//! # viz-charts
//!
//! D3.js-style SVG charting pipeline for OHLCV data.
//! Renderers are pure: they turn a [`viz_core::RenderContext`] into a
//! [`scene::Scene`] that the view layer projects into SVG.
//!
//! ## Architecture
//!
//! Uses Strategy pattern for:
//! - Scale computation (linear, time, band)
//! - Path generation (monotone line, area, donut arcs)
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, paths, formatters
//! - `aggregate` - Calendar-day bucketing of dense series
//! - `stats` - Series summaries and the volume distribution
//! - `scene` - Renderer output model
//! - `bar` / `line` / `pie` - Scene builders, one per chart kind
//! - `host` - The render-replace lifecycle owner

pub mod aggregate;
pub mod bar;
pub mod chartkit;
pub mod host;
pub mod line;
pub mod pie;
pub mod scales;
pub mod scene;
pub mod stats;

pub use aggregate::aggregate;
pub use chartkit::*;
pub use host::{ActiveTooltip, RenderHost, RenderOutcome, RenderPhase};
pub use scene::*;
pub use stats::{distribute, summarize, Distribution, Summary, VolumeSlice};

/// Chart margin configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::new(30.0, 30.0, 60.0, 70.0)
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}
