//! Axis domain computation for the chart variants.
//!
//! Derives the categorical, temporal and linear scales from an aggregated
//! dataset, with the guards the degenerate cases need (single point,
//! all-equal closes).

use crate::chartkit::{format_day_iso, BandScale, LinearScale, TimeScale};
use viz_core::AggregatedPoint;

/// Scales for the bar chart: one band per day label, value axis from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BarScales {
    pub x: BandScale,
    pub y: LinearScale,
}

/// Scales for the line chart: continuous time axis, value axis clipped
/// around the close range.
#[derive(Debug, Clone, PartialEq)]
pub struct LineScales {
    pub x: TimeScale,
    pub y: LinearScale,
}

/// Headroom above the top of the value domain.
const UPPER_PAD: f64 = 1.05;
/// Floor below the bottom of the line value domain.
const LOWER_PAD: f64 = 0.95;

fn max_close(points: &[AggregatedPoint]) -> f64 {
    points.iter().map(|p| p.close()).fold(f64::MIN, f64::max)
}

fn min_close(points: &[AggregatedPoint]) -> f64 {
    points.iter().map(|p| p.close()).fold(f64::MAX, f64::min)
}

/// Bar scales over `points`, mapping into a `width` x `height` plot area.
/// The y domain is anchored at zero so bar heights read as magnitudes.
pub fn bar_scales(points: &[AggregatedPoint], width: f64, height: f64) -> BarScales {
    let labels = points.iter().map(|p| format_day_iso(p.t())).collect();

    let x = BandScale::new(labels).range(0.0, width).padding(0.2);
    let y = LinearScale::new()
        .domain(0.0, max_close(points) * UPPER_PAD)
        .nice(10)
        .range(height, 0.0);

    BarScales { x, y }
}

/// Line scales over `points`. The y domain hugs the close range with 5%
/// padding either side; a single point or all-equal closes still yield a
/// usable nonzero span via the nice() guard.
pub fn line_scales(points: &[AggregatedPoint], width: f64, height: f64) -> LineScales {
    let t_min = points.iter().map(|p| p.t()).min().unwrap_or(0);
    let t_max = points.iter().map(|p| p.t()).max().unwrap_or(1);

    let x = TimeScale::new().domain(t_min, t_max).range(0.0, width);
    let y = LinearScale::new()
        .domain(min_close(points) * LOWER_PAD, max_close(points) * UPPER_PAD)
        .nice(8)
        .range(height, 0.0);

    LineScales { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::Sample;

    fn point(t: i64, c: f64) -> AggregatedPoint {
        AggregatedPoint::single(Sample::new(t, c, c, c, c, 1.0))
    }

    #[test]
    fn test_bar_domain_zero_anchored() {
        let points = vec![point(1, 100.0), point(2, 200.0)];
        let scales = bar_scales(&points, 700.0, 310.0);

        let (lo, hi) = scales.y.domain_bounds();
        assert_eq!(lo, 0.0);
        assert!(hi >= 200.0 * 1.05);
    }

    #[test]
    fn test_line_domain_bounds() {
        let points = vec![point(1, 100.0), point(2, 150.0), point(3, 120.0)];
        let scales = line_scales(&points, 700.0, 310.0);

        let (lo, hi) = scales.y.domain_bounds();
        // nice() only ever widens the padded bounds
        assert!(lo <= 100.0 * 0.95);
        assert!(hi >= 150.0 * 1.05);
        // and not by more than one nice step
        assert!(lo > 100.0 * 0.95 - 20.0);
        assert!(hi < 150.0 * 1.05 + 20.0);
    }

    #[test]
    fn test_single_point_is_not_degenerate() {
        let points = vec![point(5, 42.0)];
        let scales = line_scales(&points, 700.0, 310.0);

        let (lo, hi) = scales.y.domain_bounds();
        assert!(hi > lo);
        use crate::chartkit::Scale;
        assert!(scales.y.scale(42.0).is_finite());
        // single instant lands mid-range
        assert_eq!(scales.x.scale(5), 350.0);
    }

    #[test]
    fn test_band_labels_are_day_keys() {
        let day_ms = 86_400_000;
        let points = vec![point(0, 1.0), point(day_ms, 2.0)];
        let scales = bar_scales(&points, 700.0, 310.0);

        assert_eq!(scales.x.labels()[0], "1970-01-01");
        assert_eq!(scales.x.labels()[1], "1970-01-02");
    }
}
