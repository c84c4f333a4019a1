//! Bar chart renderer: one gradient-filled bar per point, colored by the
//! close's direction against the previous bar, rising from the baseline,
//! with average/extreme annotations fading in after the bars.

use crate::chartkit::{
    category_tick_step, format_currency_tick, format_date_locale, format_day_iso,
    format_month_day, Scale,
};
use crate::scales::bar_scales;
use crate::scene::{
    FontWeight, HoverSpec, Node, Reveal, Scene, SceneBuilder, Shape, Style, TextAnchor,
    TooltipContent,
};
use crate::stats::percent_of;
use crate::{ChartDimensions, ChartMargin};
use viz_core::{
    format_count_or_na, format_currency_or_na, AggregatedPoint, Palette, RenderContext,
};

pub const BAR_CHART_HEIGHT: f64 = 400.0;

/// Per-bar reveal stagger, capped so huge datasets still settle quickly.
const BAR_STAGGER_MS: u32 = 15;
const BAR_STAGGER_CAP_MS: u32 = 2000;
const BAR_RISE_MS: u32 = 1500;
/// Annotations appear once the bar cascade is underway.
const ANNOTATION_DELAY_MS: u32 = 2000;
const ANNOTATION_FADE_MS: u32 = 500;

pub fn margin() -> ChartMargin {
    ChartMargin {
        top: 30.0,
        right: 30.0,
        bottom: 60.0,
        left: 70.0,
    }
}

/// Close direction relative to the previous bar. The first bar has no
/// reference point and stays neutral.
fn close_direction(points: &[AggregatedPoint], i: usize) -> std::cmp::Ordering {
    if i == 0 {
        return std::cmp::Ordering::Equal;
    }
    points[i]
        .close()
        .partial_cmp(&points[i - 1].close())
        .unwrap_or(std::cmp::Ordering::Equal)
}

/// Build the bar scene for already-aggregated points.
pub fn build(ctx: &RenderContext, points: &[AggregatedPoint], width: f64, cycle: u64) -> Scene {
    let dims = ChartDimensions::new(width, BAR_CHART_HEIGHT).with_margin(margin());
    let mut builder = SceneBuilder::new(width, BAR_CHART_HEIGHT, cycle);

    if points.is_empty() {
        return builder.finish();
    }

    let palette = Palette::new(ctx.theme);
    let scales = bar_scales(points, dims.inner_width(), dims.inner_height());
    let (left, top) = (dims.margin.left, dims.margin.top);
    let baseline = top + dims.inner_height();

    push_headings(&mut builder, ctx, points, &palette, width);
    push_axes(&mut builder, &scales, points, &palette, &dims);

    // ------------------------------------------------------------------
    // Bars
    // ------------------------------------------------------------------
    for (i, point) in points.iter().enumerate() {
        let stops = match close_direction(points, i) {
            std::cmp::Ordering::Greater => palette.bar_positive(),
            std::cmp::Ordering::Less => palette.bar_negative(),
            std::cmp::Ordering::Equal => palette.bar_neutral(),
        };

        let fill = builder.gradient(stops.top, stops.bottom);
        let y_top = top + scales.y.scale(point.close());
        let height = (baseline - y_top).max(0.0);

        let prev_close = if i > 0 { points[i - 1].close() } else { point.close() };
        let delay = (i as u32 * BAR_STAGGER_MS).min(BAR_STAGGER_CAP_MS);
        let anchor_x = left + scales.x.center(i);

        builder.push(
            Node::new(
                Shape::Rect {
                    x: left + scales.x.position(i),
                    y: y_top,
                    width: scales.x.bandwidth(),
                    height,
                    rx: 3.0,
                },
                Style::filled(fill),
            )
            .reveal(Reveal::rise(baseline, delay, BAR_RISE_MS))
            .hover(
                HoverSpec::new(ohlcv_tooltip(point, prev_close, None, &palette), (anchor_x, y_top))
                    .highlight(palette.bar_highlight()),
            ),
        );
    }

    push_annotations(&mut builder, &scales, points, &palette, &dims);

    builder.finish()
}

/// Shared OHLCV tooltip: Close and Change lead, both colored by the
/// direction against the previous close.
pub(crate) fn ohlcv_tooltip(
    point: &AggregatedPoint,
    prev_close: f64,
    title_suffix: Option<&str>,
    palette: &Palette,
) -> TooltipContent {
    let s = &point.sample;
    let delta = s.c - prev_close;
    let color = palette.delta_color(delta);

    let change = if delta.is_finite() {
        let sign = if delta >= 0.0 { "+" } else { "" };
        format!(
            "{}{:.2} ({}{:.2}%)",
            sign,
            delta,
            sign,
            percent_of(delta, prev_close)
        )
    } else {
        "N/A".to_string()
    };

    let title = match title_suffix {
        Some(suffix) => format!("{} ({})", format_date_locale(s.t), suffix),
        None => format_date_locale(s.t),
    };

    let mut tip = TooltipContent::new(title)
        .colored_row("Close", format_currency_or_na(s.c), color)
        .colored_row("Change", change, color)
        .row("Open", format_currency_or_na(s.o))
        .row("High", format_currency_or_na(s.h))
        .row("Low", format_currency_or_na(s.l))
        .row("Volume", format_count_or_na(s.v));

    if point.data_points > 1 {
        tip = tip.footer(format!("Daily Aggregate: {} data points", point.data_points));
    }
    tip
}

fn push_headings(
    builder: &mut SceneBuilder,
    ctx: &RenderContext,
    points: &[AggregatedPoint],
    palette: &Palette,
    width: f64,
) {
    let aggregated = ctx.granularity.buckets_to_day();
    let title = if aggregated {
        format!(
            "{} Stock Price ({}, Daily Aggregated)",
            ctx.asset_label, ctx.granularity
        )
    } else {
        format!("{} Stock Price ({})", ctx.asset_label, ctx.granularity)
    };

    builder.push(Node::new(
        Shape::Text {
            x: width / 2.0,
            y: 20.0,
            content: title,
            size: 16.0,
            anchor: TextAnchor::Middle,
            weight: FontWeight::Bold,
        },
        Style::filled(palette.title()),
    ));

    if let Some(summary) = crate::stats::summarize(points) {
        let sign = if summary.total_change >= 0.0 { "+" } else { "" };
        let fill = if summary.total_change >= 0.0 {
            palette.change_up()
        } else {
            palette.change_down()
        };
        builder.push(Node::new(
            Shape::Text {
                x: width / 2.0,
                y: 40.0,
                content: format!(
                    "{}{:.2} ({}{:.2}%)",
                    sign, summary.total_change, sign, summary.percent_change
                ),
                size: 12.0,
                anchor: TextAnchor::Middle,
                weight: FontWeight::Normal,
            },
            Style::filled(fill),
        ));
    }
}

fn push_axes(
    builder: &mut SceneBuilder,
    scales: &crate::scales::BarScales,
    points: &[AggregatedPoint],
    palette: &Palette,
    dims: &ChartDimensions,
) {
    let (left, top) = (dims.margin.left, dims.margin.top);
    let right = left + dims.inner_width();
    let bottom = top + dims.inner_height();

    // axis spines
    builder.push(Node::new(
        Shape::Line { x1: left, y1: bottom, x2: right, y2: bottom },
        Style::stroked(palette.axis(), 1.0),
    ));
    builder.push(Node::new(
        Shape::Line { x1: left, y1: top, x2: left, y2: bottom },
        Style::stroked(palette.axis(), 1.0),
    ));

    for tick in scales.y.nice_ticks(10) {
        let y = top + scales.y.scale(tick);
        builder.push(Node::new(
            Shape::Text {
                x: left - 8.0,
                y: y + 4.0,
                content: format_currency_tick(tick),
                size: 11.0,
                anchor: TextAnchor::End,
                weight: FontWeight::Normal,
            },
            Style::filled(palette.axis()),
        ));
    }

    // slanted category labels, thinned as the count grows; compact M/D
    // form once the full day key would collide
    let step = category_tick_step(points.len());
    let compact = points.len() > 30;
    for (i, point) in points.iter().enumerate() {
        if i % step != 0 {
            continue;
        }
        let x = left + scales.x.center(i);
        let y = bottom + 16.0;
        let label = if compact {
            format_month_day(point.t())
        } else {
            format_day_iso(point.t())
        };
        builder.push(
            Node::new(
                Shape::Text {
                    x,
                    y,
                    content: label,
                    size: 11.0,
                    anchor: TextAnchor::End,
                    weight: FontWeight::Normal,
                },
                Style::filled(palette.axis()),
            )
            .rotated(-45.0, x, y),
        );
    }

    push_axis_captions(builder, palette, dims);
}

pub(crate) fn push_axis_captions(
    builder: &mut SceneBuilder,
    palette: &Palette,
    dims: &ChartDimensions,
) {
    let (left, top) = (dims.margin.left, dims.margin.top);
    let cy = top + dims.inner_height() / 2.0;

    builder.push(Node::new(
        Shape::Text {
            x: left + dims.inner_width() / 2.0,
            y: top + dims.inner_height() + 50.0,
            content: "Date".to_string(),
            size: 12.0,
            anchor: TextAnchor::Middle,
            weight: FontWeight::Normal,
        },
        Style::filled(palette.title()),
    ));
    builder.push(
        Node::new(
            Shape::Text {
                x: left - 50.0,
                y: cy,
                content: "Closing Price ($)".to_string(),
                size: 12.0,
                anchor: TextAnchor::Middle,
                weight: FontWeight::Normal,
            },
            Style::filled(palette.title()),
        )
        .rotated(-90.0, left - 50.0, cy),
    );
}

fn push_annotations(
    builder: &mut SceneBuilder,
    scales: &crate::scales::BarScales,
    points: &[AggregatedPoint],
    palette: &Palette,
    dims: &ChartDimensions,
) {
    let Some(summary) = crate::stats::summarize(points) else {
        return;
    };

    let (left, top) = (dims.margin.left, dims.margin.top);
    let right = left + dims.inner_width();
    let fade = Reveal::fade_in(ANNOTATION_DELAY_MS, ANNOTATION_FADE_MS);

    // mean close reference line
    let avg_y = top + scales.y.scale(summary.average);
    builder.push(
        Node::new(
            Shape::Line { x1: left, y1: avg_y, x2: right, y2: avg_y },
            Style::stroked(palette.reference_line(), 1.0).dashed("4,4"),
        )
        .reveal(fade),
    );
    builder.push(
        Node::new(
            Shape::Text {
                x: right - 5.0,
                y: avg_y - 5.0,
                content: format!("Avg: ${:.2}", summary.average),
                size: 11.0,
                anchor: TextAnchor::End,
                weight: FontWeight::Normal,
            },
            Style::filled(palette.reference_label()),
        )
        .reveal(fade),
    );

    // extreme markers above the tallest and shortest bars; the min marker
    // is skipped when one bar is both
    let max_close = summary.max_point.close();
    let min_close = summary.min_point.close();
    let max_idx = points.iter().position(|p| p.close() == max_close);
    let min_idx = points.iter().position(|p| p.close() == min_close);

    let mut marker_specs = vec![(
        max_idx,
        max_close,
        "High",
        palette.max_marker_fill(),
        palette.max_marker_text(),
    )];
    if min_idx != max_idx {
        marker_specs.push((
            min_idx,
            min_close,
            "Low",
            palette.min_marker_fill(),
            palette.min_marker_fill(),
        ));
    }

    for (idx, close, caption, fill, text_fill) in marker_specs {
        let Some(i) = idx else { continue };
        let cx = left + scales.x.center(i);
        let cy = top + scales.y.scale(close);

        builder.push(
            Node::new(
                Shape::Circle { cx, cy, r: 4.0 },
                Style::filled(fill).with_stroke(palette.marker_outline(), 2.0),
            )
            .reveal(fade),
        );
        builder.push(
            Node::new(
                Shape::Text {
                    x: cx,
                    y: cy - 10.0,
                    content: format!("{}: ${:.2}", caption, close),
                    size: 11.0,
                    anchor: TextAnchor::Middle,
                    weight: FontWeight::Bold,
                },
                Style::filled(text_fill),
            )
            .reveal(fade),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::{ChartKind, Granularity, OhlcvSeries, Sample, ThemeMode};

    const DAY: i64 = 86_400_000;

    fn ctx() -> RenderContext {
        RenderContext::new(
            OhlcvSeries::default(),
            ChartKind::Bar,
            "AAPL",
            Granularity::Day,
            ThemeMode::Dark,
        )
    }

    fn points(closes: &[f64]) -> Vec<AggregatedPoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                AggregatedPoint::single(Sample::new(i as i64 * DAY, c - 1.0, c + 1.0, c - 2.0, c, 500.0))
            })
            .collect()
    }

    fn bars(scene: &Scene) -> Vec<&Node> {
        scene
            .nodes
            .iter()
            .filter(|n| matches!(n.shape, Shape::Rect { .. }))
            .collect()
    }

    #[test]
    fn test_one_bar_per_point() {
        let pts = points(&[100.0, 105.0, 95.0]);
        let scene = build(&ctx(), &pts, 800.0, 1);
        assert_eq!(bars(&scene).len(), 3);
    }

    #[test]
    fn test_empty_points_empty_scene() {
        let scene = build(&ctx(), &[], 800.0, 1);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_bar_stagger_capped() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64).collect();
        let pts = points(&closes);
        let scene = build(&ctx(), &pts, 800.0, 1);

        for bar in bars(&scene) {
            let reveal = bar.reveal.unwrap();
            assert!(reveal.delay_ms <= BAR_STAGGER_CAP_MS);
            assert_eq!(reveal.duration_ms, BAR_RISE_MS);
            assert!(matches!(reveal.kind, crate::scene::RevealKind::Rise { .. }));
        }
    }

    #[test]
    fn test_gradient_keyed_to_previous_close() {
        // first bar neutral, then up, then down
        let pts = points(&[100.0, 108.0, 92.0]);
        let scene = build(&ctx(), &pts, 800.0, 7);

        assert_eq!(scene.gradients.len(), 3);
        assert!(scene.gradients.iter().all(|g| g.id.starts_with("grad-7-")));
        let palette = Palette::new(ThemeMode::Dark);
        assert_eq!(scene.gradients[0].top, palette.bar_neutral().top);
        assert_eq!(scene.gradients[1].top, palette.bar_positive().top);
        assert_eq!(scene.gradients[2].top, palette.bar_negative().top);
    }

    #[test]
    fn test_tooltip_change_vs_previous_bar() {
        let pts = points(&[100.0, 105.0]);
        let scene = build(&ctx(), &pts, 800.0, 1);

        let tip = &bars(&scene)[1].hover.as_ref().unwrap().tooltip;
        let change = tip.rows.iter().find(|r| r.label == "Change").unwrap();
        assert_eq!(change.value, "+5.00 (+5.00%)");
        assert_eq!(change.value_color.as_deref(), Some("#4caf50"));

        // first bar has no reference, so zero change
        let first_tip = &bars(&scene)[0].hover.as_ref().unwrap().tooltip;
        let first_change = first_tip.rows.iter().find(|r| r.label == "Change").unwrap();
        assert_eq!(first_change.value, "+0.00 (+0.00%)");
    }

    #[test]
    fn test_tooltip_marks_aggregation() {
        let mut pt = AggregatedPoint::single(Sample::new(0, 1.0, 2.0, 0.5, 1.5, 10.0));
        pt.data_points = 24;
        let scene = build(&ctx(), &[pt], 800.0, 1);

        let tip = &bars(&scene)[0].hover.as_ref().unwrap().tooltip;
        assert_eq!(tip.footer.as_deref(), Some("Daily Aggregate: 24 data points"));
        assert!(tip.rows.iter().any(|r| r.label == "Volume"));
    }

    #[test]
    fn test_net_change_subtitle() {
        let scene = build(&ctx(), &points(&[100.0, 105.0, 95.0]), 800.0, 1);
        assert!(scene.nodes.iter().any(|n| match &n.shape {
            Shape::Text { content, .. } => content == "-5.00 (-5.00%)",
            _ => false,
        }));
    }

    #[test]
    fn test_annotations_follow_bars() {
        let pts = points(&[100.0, 105.0, 95.0]);
        let scene = build(&ctx(), &pts, 800.0, 1);

        let dashed = scene
            .nodes
            .iter()
            .find(|n| n.style.stroke_dash.is_some())
            .unwrap();
        assert_eq!(dashed.reveal.unwrap().delay_ms, ANNOTATION_DELAY_MS);

        let circles = scene
            .nodes
            .iter()
            .filter(|n| matches!(n.shape, Shape::Circle { .. }))
            .count();
        assert_eq!(circles, 2);
    }

    #[test]
    fn test_flat_series_gets_single_marker() {
        // one bar is both extreme: only the high marker is drawn
        let scene = build(&ctx(), &points(&[100.0]), 800.0, 1);
        let circles = scene
            .nodes
            .iter()
            .filter(|n| matches!(n.shape, Shape::Circle { .. }))
            .count();
        assert_eq!(circles, 1);
    }

    #[test]
    fn test_category_labels_rotated() {
        let scene = build(&ctx(), &points(&[100.0, 101.0]), 800.0, 1);
        let slanted = scene
            .nodes
            .iter()
            .filter(|n| matches!(n.rotate, Some((d, _, _)) if d == -45.0))
            .count();
        assert_eq!(slanted, 2);
    }

    #[test]
    fn test_malformed_fields_render_na() {
        let pt = AggregatedPoint::single(Sample::new(0, f64::NAN, 2.0, 0.5, 1.5, 10.0));
        let scene = build(&ctx(), &[pt], 800.0, 1);

        let tip = &bars(&scene)[0].hover.as_ref().unwrap().tooltip;
        let open = tip.rows.iter().find(|r| r.label == "Open").unwrap();
        assert_eq!(open.value, "N/A");
    }
}
