//! # chartkit
//!
//! Core chart primitives: scales, path builders, label formatting.
//! Implements Strategy pattern for flexible scale behaviors.

use chrono::{DateTime, Utc};
use std::fmt::Write;

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Expand the domain outward to "nice" round boundaries, sized for
    /// roughly `count` ticks (D3 `.nice()` behavior). A collapsed domain
    /// (single point or all-equal data) is first widened to a minimal
    /// nonzero span so downstream math never divides by zero.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut min, mut max) = self.domain;

        if (max - min).abs() < f64::EPSILON {
            min -= 0.5;
            max += 0.5;
        }

        let step = nice_step(max - min, count.max(1));
        self.domain = ((min / step).floor() * step, (max / step).ceil() * step);
        self
    }

    /// Get domain bounds
    pub fn domain_bounds(&self) -> (f64, f64) {
        self.domain
    }

    /// Get range bounds
    pub fn range_bounds(&self) -> (f64, f64) {
        self.range
    }

    /// Generate tick values at "nice" round intervals within the domain.
    pub fn nice_ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.domain;
        let range = max - min;

        if range <= 0.0 || count == 0 {
            return vec![min];
        }

        let step = nice_step(range, count);
        let first = (min / step).ceil() * step;

        let mut ticks = Vec::new();
        let mut tick = first;
        while tick <= max + step * 0.5 {
            ticks.push(tick);
            tick += step;
        }

        ticks
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (value - d_min) / (d_max - d_min);
        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        d_min + normalized * (d_max - d_min)
    }
}

/// Round a raw step to the nearest 1/2/5 x 10^k.
fn nice_step(span: f64, count: usize) -> f64 {
    let rough = span / count as f64;
    let magnitude = 10.0_f64.powf(rough.log10().floor());
    let residual = rough / magnitude;

    if residual <= 1.0 {
        magnitude
    } else if residual <= 2.0 {
        2.0 * magnitude
    } else if residual <= 5.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

// ============================================================================
// TIME SCALE
// ============================================================================

/// Time scale (maps millisecond timestamps to pixel positions)
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new() -> Self {
        Self {
            domain: (0, 1),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: i64, max: i64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn domain_bounds(&self) -> (i64, i64) {
        self.domain
    }

    /// Scale timestamp to pixel position. A single-instant domain maps
    /// everything to the range midpoint rather than dividing by zero.
    pub fn scale(&self, timestamp: i64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if d_max == d_min {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (timestamp - d_min) as f64 / (d_max - d_min) as f64;
        r_min + normalized * (r_max - r_min)
    }

    /// Inverse scale (pixel to timestamp)
    pub fn invert(&self, value: f64) -> i64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        (d_min as f64 + normalized * (d_max - d_min) as f64) as i64
    }

    /// Evenly spaced tick timestamps across the domain, endpoints included.
    pub fn ticks(&self, count: usize) -> Vec<i64> {
        let (min, max) = self.domain;
        if count <= 1 || max == min {
            return vec![min];
        }

        let step = (max - min) as f64 / (count - 1) as f64;
        (0..count)
            .map(|i| min + (step * i as f64).round() as i64)
            .collect()
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// BAND SCALE (categorical x positions, one band per day label)
// ============================================================================

/// Band scale over an ordered list of category labels.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            range: (0.0, 1.0),
            padding: 0.2,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Uniform inner and outer padding, as a fraction of the step.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding.clamp(0.0, 1.0);
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Step size (band + gap)
    pub fn step(&self) -> f64 {
        let n = self.labels.len();
        if n == 0 {
            return 0.0;
        }

        let (r_min, r_max) = self.range;
        // D3 band formula with uniform padding
        (r_max - r_min) / (n as f64 - self.padding + 2.0 * self.padding)
    }

    /// Band width (width of each bar)
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Left edge of the band at `index`
    pub fn position(&self, index: usize) -> f64 {
        let step = self.step();
        self.range.0 + step * self.padding + index as f64 * step
    }

    /// Center of the band at `index`
    pub fn center(&self, index: usize) -> f64 {
        self.position(index) + self.bandwidth() / 2.0
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn cubic_to(mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        let _ = write!(
            self.commands,
            "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            x1, y1, x2, y2, x, y
        );
        self
    }

    pub fn arc_to(
        mut self,
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    ) -> Self {
        let _ = write!(
            self.commands,
            "A{:.2},{:.2},{:.2},{},{},{:.2},{:.2}",
            rx, ry, rotation, large_arc as u8, sweep as u8, x, y
        );
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

// ============================================================================
// MONOTONE CURVE (D3 curveMonotoneX)
// ============================================================================

/// Tangent slope preserving monotonicity between three consecutive points.
fn monotone_slope(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let h0 = x1 - x0;
    let h1 = x2 - x1;

    let s0 = if h0 != 0.0 { (y1 - y0) / h0 } else { 0.0 };
    let s1 = if h1 != 0.0 { (y2 - y1) / h1 } else { 0.0 };

    if s0 * s1 <= 0.0 {
        return 0.0;
    }

    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let limit = 3.0 * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    p.signum() * limit.min(p.abs())
}

/// Append the bezier segments of a monotone-cubic interpolation to `builder`.
fn monotone_segments(mut builder: PathBuilder, points: &[(f64, f64)]) -> PathBuilder {
    let n = points.len();
    if n == 2 {
        return builder.line_to(points[1].0, points[1].1);
    }

    // shape-preserving tangents inside, adjacent secant at the ends
    let secant = |a: (f64, f64), b: (f64, f64)| -> f64 {
        let dx = b.0 - a.0;
        if dx != 0.0 { (b.1 - a.1) / dx } else { 0.0 }
    };

    let mut tangents = Vec::with_capacity(n);
    tangents.push(secant(points[0], points[1]));
    for i in 1..n - 1 {
        tangents.push(monotone_slope(
            points[i - 1].0,
            points[i - 1].1,
            points[i].0,
            points[i].1,
            points[i + 1].0,
            points[i + 1].1,
        ));
    }
    tangents.push(secant(points[n - 2], points[n - 1]));

    for i in 1..n {
        let (x0, y0) = points[i - 1];
        let (x1, y1) = points[i];
        let dx = (x1 - x0) / 3.0;

        builder = builder.cubic_to(
            x0 + dx,
            y0 + tangents[i - 1] * dx,
            x1 - dx,
            y1 - tangents[i] * dx,
            x1,
            y1,
        );
    }

    builder
}

/// Smooth open path through `points` (monotone in x, no overshoot).
pub fn monotone_line_path(points: &[(f64, f64)]) -> String {
    match points {
        [] => String::new(),
        [(x, y)] => PathBuilder::new().move_to(*x, *y).build(),
        _ => {
            let builder = PathBuilder::new().move_to(points[0].0, points[0].1);
            monotone_segments(builder, points).build()
        }
    }
}

/// Closed area between the monotone curve and a horizontal baseline.
pub fn monotone_area_path(points: &[(f64, f64)], baseline_y: f64) -> String {
    if points.is_empty() {
        return String::new();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut builder = PathBuilder::new()
        .move_to(first.0, baseline_y)
        .line_to(first.0, first.1);

    if points.len() >= 2 {
        builder = monotone_segments(builder, points);
    }

    builder.line_to(last.0, baseline_y).close().build()
}

/// Straight polyline path (non-smoothed)
pub fn line_path(points: &[(f64, f64)]) -> String {
    if points.is_empty() {
        return String::new();
    }

    let mut builder = PathBuilder::new().move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        builder = builder.line_to(x, y);
    }
    builder.build()
}

/// Upper bound on the rendered length of the curve through `points`,
/// used to size the stroke-dash entrance reveal. Chord length with a
/// margin for curvature; overshooting only makes the trace finish early.
pub fn trace_length(points: &[(f64, f64)]) -> f64 {
    let chord: f64 = points
        .windows(2)
        .map(|w| {
            let dx = w[1].0 - w[0].0;
            let dy = w[1].1 - w[0].1;
            (dx * dx + dy * dy).sqrt()
        })
        .sum();
    chord * 1.2
}

// ============================================================================
// DONUT ARCS (D3 arc generator subset)
// ============================================================================

/// Angles in radians, 0 at 12 o'clock, increasing clockwise.
fn arc_point(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Path for one donut slice between `start_angle` and `end_angle`.
pub fn donut_slice_path(inner_r: f64, outer_r: f64, start_angle: f64, end_angle: f64) -> String {
    let (ox0, oy0) = arc_point(outer_r, start_angle);
    let (ox1, oy1) = arc_point(outer_r, end_angle);
    let (ix0, iy0) = arc_point(inner_r, end_angle);
    let (ix1, iy1) = arc_point(inner_r, start_angle);

    let large = (end_angle - start_angle).abs() > std::f64::consts::PI;

    PathBuilder::new()
        .move_to(ox0, oy0)
        .arc_to(outer_r, outer_r, 0.0, large, true, ox1, oy1)
        .line_to(ix0, iy0)
        .arc_to(inner_r, inner_r, 0.0, large, false, ix1, iy1)
        .close()
        .build()
}

/// Midpoint of a slice at `radius` (label anchoring).
pub fn arc_centroid(radius: f64, start_angle: f64, end_angle: f64) -> (f64, f64) {
    arc_point(radius, (start_angle + end_angle) / 2.0)
}

// ============================================================================
// CATEGORY TICK THINNING
// ============================================================================

/// Show every Nth categorical label as the point count grows, so axis
/// labels never collide.
pub fn category_tick_step(count: usize) -> usize {
    if count <= 10 {
        1
    } else if count <= 30 {
        2
    } else if count <= 60 {
        5
    } else {
        10
    }
}

// ============================================================================
// DATE LABEL FORMATTERS
// ============================================================================

fn datetime(timestamp_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp_ms).unwrap_or(DateTime::UNIX_EPOCH)
}

/// `YYYY-MM-DD`, the categorical day key for the bar axis.
pub fn format_day_iso(timestamp_ms: i64) -> String {
    datetime(timestamp_ms).format("%Y-%m-%d").to_string()
}

/// Compact `M/D` used once category counts get large.
pub fn format_month_day(timestamp_ms: i64) -> String {
    datetime(timestamp_ms).format("%-m/%-d").to_string()
}

/// `Mon D, YY` day label for the volume distribution view.
pub fn format_day_short(timestamp_ms: i64) -> String {
    datetime(timestamp_ms).format("%b %-d, %y").to_string()
}

/// `M/D/YYYY` tooltip heading (en-US locale date).
pub fn format_date_locale(timestamp_ms: i64) -> String {
    datetime(timestamp_ms).format("%-m/%-d/%Y").to_string()
}

/// `Mon D` tick label for coarse-granularity time axes.
pub fn format_month_day_name(timestamp_ms: i64) -> String {
    datetime(timestamp_ms).format("%b %-d").to_string()
}

/// Currency tick label: `$250`, `$1250.5`. Raw tick value, no grouping,
/// integer ticks shown without a fraction.
pub fn format_currency_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("${}", value as i64)
    } else {
        format!("${}", value)
    }
}

// ============================================================================
// TESTS
// ============================================================================
