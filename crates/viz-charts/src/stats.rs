//! Summary statistics and the volume distribution breakdown.

use crate::chartkit::format_day_short;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use viz_core::{AggregatedPoint, Sample};

/// Display cap for the distribution view: 14 ranked slices plus one
/// overflow slice folding everything else.
pub const MAX_SLICES: usize = 15;

// ============================================================================
// SERIES SUMMARY (bar / line views)
// ============================================================================

/// Headline figures for a time-ordered close series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// `last.c - first.c`
    pub total_change: f64,
    /// Percent of the first close, rounded to 2 decimals; 0 when the
    /// baseline close is 0 (never NaN/inf).
    pub percent_change: f64,
    /// Arithmetic mean of closes
    pub average: f64,
    /// First point in time order achieving the max close
    pub max_point: AggregatedPoint,
    /// First point in time order achieving the min close
    pub min_point: AggregatedPoint,
}

/// Percent change of `delta` against `base`, 2-decimal rounded, with the
/// zero-baseline case defined as 0 rather than a division by zero.
pub fn percent_of(delta: f64, base: f64) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    (delta / base * 100.0 * 100.0).round() / 100.0
}

/// Summarize a time-ordered series. `None` only for empty input.
pub fn summarize(points: &[AggregatedPoint]) -> Option<Summary> {
    let first = points.first()?;
    let last = points.last()?;

    let total_change = last.close() - first.close();
    let percent_change = percent_of(total_change, first.close());
    let average = points.iter().map(|p| p.close()).sum::<f64>() / points.len() as f64;

    // ties resolve to the earliest point, so strict comparisons only
    let mut max_point = *first;
    let mut min_point = *first;
    for p in &points[1..] {
        if p.close() > max_point.close() {
            max_point = *p;
        }
        if p.close() < min_point.close() {
            min_point = *p;
        }
    }

    Some(Summary {
        total_change,
        percent_change,
        average,
        max_point,
        min_point,
    })
}

// ============================================================================
// VOLUME DISTRIBUTION (pie view)
// ============================================================================

/// One ranked day-group of trading volume. `children` is non-empty only
/// on the single overflow slice that folds the long tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSlice {
    pub label: String,
    pub volume: f64,
    pub is_overflow: bool,
    pub children: Vec<VolumeSlice>,
}

impl VolumeSlice {
    fn plain(label: String, volume: f64) -> Self {
        Self {
            label,
            volume,
            is_overflow: false,
            children: Vec::new(),
        }
    }
}

/// Ranked, capped volume breakdown by calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Volume-descending slices, at most [`MAX_SLICES`], overflow last.
    pub slices: Vec<VolumeSlice>,
    /// Sum over the raw dataset, computed before capping.
    pub total_volume: f64,
    /// Number of day groups before capping.
    pub day_count: usize,
}

impl Distribution {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Largest ungrouped day (rank 1 survives capping by construction).
    pub fn max_slice(&self) -> Option<&VolumeSlice> {
        self.slices.first()
    }

    /// Smallest ungrouped day: the tail of the overflow children when
    /// capping happened, otherwise the last ranked slice.
    pub fn min_slice(&self) -> Option<&VolumeSlice> {
        match self.slices.last() {
            Some(last) if last.is_overflow => last.children.last(),
            other => other,
        }
    }

    /// Mean volume across the uncapped day groups.
    pub fn average_volume(&self) -> f64 {
        if self.day_count == 0 {
            return 0.0;
        }
        self.total_volume / self.day_count as f64
    }

    /// Share of the total taken by `volume`, in `[0, 1]`.
    pub fn share(&self, volume: f64) -> f64 {
        if self.total_volume == 0.0 {
            return 0.0;
        }
        volume / self.total_volume
    }
}

fn day_of(timestamp_ms: i64) -> NaiveDate {
    DateTime::from_timestamp_millis(timestamp_ms)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .date_naive()
}

/// Group RAW samples by calendar day and rank the groups by volume.
///
/// This deliberately re-derives day buckets from the raw sequence instead
/// of reusing an aggregation pass: the distribution view always reads at
/// daily resolution, whatever granularity the other views display.
pub fn distribute(samples: &[Sample]) -> Distribution {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for s in samples {
        *days.entry(day_of(s.t)).or_insert(0.0) += s.v;
    }

    let day_count = days.len();
    let total_volume: f64 = days.values().sum();

    // chronological before the volume sort keeps ties deterministic
    let mut ranked: Vec<VolumeSlice> = days
        .into_iter()
        .map(|(date, volume)| {
            VolumeSlice::plain(format_day_short(day_start_of(date)), volume)
        })
        .collect();
    ranked.sort_by(|a, b| b.volume.partial_cmp(&a.volume).unwrap_or(std::cmp::Ordering::Equal));

    let slices = if ranked.len() > MAX_SLICES {
        let tail = ranked.split_off(MAX_SLICES - 1);
        let folded_volume: f64 = tail.iter().map(|s| s.volume).sum();
        ranked.push(VolumeSlice {
            label: "Others".to_string(),
            volume: folded_volume,
            is_overflow: true,
            children: tail,
        });
        ranked
    } else {
        ranked
    };

    Distribution {
        slices,
        total_volume,
        day_count,
    }
}

fn day_start_of(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    fn point(t: i64, c: f64) -> AggregatedPoint {
        AggregatedPoint::single(Sample::new(t, c, c, c, c, 1.0))
    }

    fn vol_sample(day: i64, v: f64) -> Sample {
        Sample::new(day * DAY, 1.0, 1.0, 1.0, 1.0, v)
    }

    #[test]
    fn test_summary_reference_vector() {
        // closes [100, 105, 95] over three days
        let points = vec![point(0, 100.0), point(DAY, 105.0), point(2 * DAY, 95.0)];
        let summary = summarize(&points).unwrap();

        assert_eq!(summary.total_change, -5.0);
        assert_eq!(summary.percent_change, -5.00);
        assert_eq!(summary.average, 100.0);
        assert_eq!(summary.max_point.close(), 105.0);
        assert_eq!(summary.min_point.close(), 95.0);
    }

    #[test]
    fn test_summary_zero_baseline() {
        let points = vec![point(0, 0.0), point(DAY, 50.0)];
        let summary = summarize(&points).unwrap();

        assert_eq!(summary.total_change, 50.0);
        assert_eq!(summary.percent_change, 0.0);
    }

    #[test]
    fn test_summary_ties_take_first() {
        let points = vec![point(0, 7.0), point(DAY, 7.0), point(2 * DAY, 7.0)];
        let summary = summarize(&points).unwrap();

        assert_eq!(summary.max_point.t(), 0);
        assert_eq!(summary.min_point.t(), 0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_distribute_sums_days() {
        // two samples on the same day merge
        let samples = vec![vol_sample(0, 100.0), vol_sample(0, 50.0), vol_sample(1, 30.0)];
        let dist = distribute(&samples);

        assert_eq!(dist.slices.len(), 2);
        assert_eq!(dist.slices[0].volume, 150.0);
        assert_eq!(dist.slices[1].volume, 30.0);
        assert_eq!(dist.total_volume, 180.0);
        assert_eq!(dist.day_count, 2);
        assert!(!dist.slices[0].is_overflow);
    }

    #[test]
    fn test_distribute_caps_at_fifteen() {
        // 20 days, volumes 1..=20
        let samples: Vec<Sample> = (0..20).map(|d| vol_sample(d, (d + 1) as f64)).collect();
        let dist = distribute(&samples);

        assert_eq!(dist.slices.len(), MAX_SLICES);

        let overflow = dist.slices.last().unwrap();
        assert!(overflow.is_overflow);
        assert_eq!(overflow.label, "Others");
        // the 14 biggest (20..=7) stay; 6..=1 fold into the overflow
        assert_eq!(overflow.children.len(), 6);
        assert_eq!(overflow.volume, (1..=6).sum::<i64>() as f64);

        // capping conserves total volume
        let visible: f64 = dist.slices.iter().map(|s| s.volume).sum();
        assert_eq!(visible, dist.total_volume);
        assert_eq!(dist.total_volume, (1..=20).sum::<i64>() as f64);

        // children ranked descending for drill-down display
        let child_vols: Vec<f64> = overflow.children.iter().map(|c| c.volume).collect();
        assert_eq!(child_vols, vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_distribute_extremes_and_average() {
        let samples: Vec<Sample> = (0..20).map(|d| vol_sample(d, (d + 1) as f64)).collect();
        let dist = distribute(&samples);

        assert_eq!(dist.max_slice().unwrap().volume, 20.0);
        assert_eq!(dist.min_slice().unwrap().volume, 1.0);
        assert_eq!(dist.average_volume(), 210.0 / 20.0);
    }

    #[test]
    fn test_distribute_empty() {
        let dist = distribute(&[]);
        assert!(dist.is_empty());
        assert_eq!(dist.total_volume, 0.0);
        assert_eq!(dist.average_volume(), 0.0);
    }
}
