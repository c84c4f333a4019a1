//! OHLCV sample types and the per-render input bundle.

use crate::{ChartKind, Granularity, ThemeMode};
use serde::{Deserialize, Serialize};

/// Upstream cap on dataset length. The fetch layer truncates to the top
/// 5000 rows; the pipeline only relies on the bound, it never enforces it.
pub const MAX_SAMPLES: usize = 5000;

/// One OHLCV observation. Field names mirror the upstream wire shape.
///
/// `l <= o,c <= h` is assumed, not enforced; malformed fields surface as
/// "N/A" in tooltips rather than blocking a render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix timestamp in milliseconds
    pub t: i64,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
    pub v: f64,
}

impl Sample {
    pub fn new(t: i64, o: f64, h: f64, l: f64, c: f64, v: f64) -> Self {
        Self { t, o, h, l, c, v }
    }
}

/// Ordered, bounded sequence of samples. May be empty while upstream data
/// is still pending; that is steady state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    pub samples: Vec<Sample>,
}

impl OhlcvSeries {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the upstream cap was hit (drives the truncation notice).
    pub fn is_capped(&self) -> bool {
        self.samples.len() == MAX_SAMPLES
    }

    /// Copy of the samples ordered by timestamp ascending. The series
    /// itself is never reordered in place; render cycles sort locally.
    pub fn sorted_by_time(&self) -> Vec<Sample> {
        let mut sorted = self.samples.clone();
        sorted.sort_by_key(|s| s.t);
        sorted
    }

    /// (min close, max close) across the series
    pub fn close_range(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for s in &self.samples {
            min = min.min(s.c);
            max = max.max(s.c);
        }
        Some((min, max))
    }

    /// (first timestamp, last timestamp) in time order
    pub fn time_range(&self) -> Option<(i64, i64)> {
        let min = self.samples.iter().map(|s| s.t).min()?;
        let max = self.samples.iter().map(|s| s.t).max()?;
        Some((min, max))
    }
}

impl From<Vec<Sample>> for OhlcvSeries {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

/// A sample plus the number of raw rows folded into it. Wherever no
/// aggregation occurred, `data_points` is 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    pub sample: Sample,
    pub data_points: usize,
}

impl AggregatedPoint {
    pub fn single(sample: Sample) -> Self {
        Self {
            sample,
            data_points: 1,
        }
    }

    pub fn t(&self) -> i64 {
        self.sample.t
    }

    pub fn close(&self) -> f64 {
        self.sample.c
    }

    pub fn volume(&self) -> f64 {
        self.sample.v
    }
}

/// The single immutable input bundle for one render cycle. Owned by the
/// caller and passed by value; the pipeline never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub series: OhlcvSeries,
    pub chart: ChartKind,
    pub asset_label: String,
    pub granularity: Granularity,
    pub theme: ThemeMode,
}

impl RenderContext {
    pub fn new(
        series: OhlcvSeries,
        chart: ChartKind,
        asset_label: impl Into<String>,
        granularity: Granularity,
        theme: ThemeMode,
    ) -> Self {
        Self {
            series,
            chart,
            asset_label: asset_label.into(),
            granularity,
            theme,
        }
    }
}
