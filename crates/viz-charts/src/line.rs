//! Line chart renderer: monotone-smoothed close curve over a gradient
//! area fill, traced left to right, markers popping in behind the sweep.

use crate::bar::{ohlcv_tooltip, push_axis_captions};
use crate::chartkit::{
    format_currency_tick, format_date_locale, format_month_day_name, monotone_area_path,
    monotone_line_path, trace_length, Scale,
};
use crate::scales::line_scales;
use crate::scene::{
    FontWeight, HoverSpec, Node, Reveal, Scene, SceneBuilder, Shape, Style, TextAnchor,
};
use crate::{ChartDimensions, ChartMargin};
use viz_core::{AggregatedPoint, Granularity, Palette, RenderContext};

pub const LINE_CHART_HEIGHT: f64 = 400.0;

/// The curve sweeps in over this window; everything else keys off it.
const TRACE_MS: u32 = 2000;
const DOT_STAGGER_MS: u32 = 20;
const DOT_POP_MS: u32 = 100;
const ANNOTATION_DELAY_MS: u32 = 2500;
const ANNOTATION_FADE_MS: u32 = 500;

const Y_TICK_TARGET: usize = 8;

pub fn margin() -> ChartMargin {
    ChartMargin {
        top: 30.0,
        right: 30.0,
        bottom: 60.0,
        left: 70.0,
    }
}

/// Build the line scene for already-aggregated points.
pub fn build(ctx: &RenderContext, points: &[AggregatedPoint], width: f64, cycle: u64) -> Scene {
    let dims = ChartDimensions::new(width, LINE_CHART_HEIGHT).with_margin(margin());
    let mut builder = SceneBuilder::new(width, LINE_CHART_HEIGHT, cycle);

    if points.is_empty() {
        return builder.finish();
    }

    let palette = Palette::new(ctx.theme);
    let scales = line_scales(points, dims.inner_width(), dims.inner_height());
    let (left, top) = (dims.margin.left, dims.margin.top);
    let bottom = top + dims.inner_height();

    push_headings(&mut builder, ctx, points, &palette, width);
    push_axes(&mut builder, &scales, ctx.granularity, points.len(), &palette, &dims);

    let coords: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (left + scales.x.scale(p.t()), top + scales.y.scale(p.close())))
        .collect();

    // ------------------------------------------------------------------
    // Area fill under the curve
    // ------------------------------------------------------------------
    let area = palette.area_gradient();
    let area_fill = builder.gradient(area.top, area.bottom);
    builder.push(
        Node::new(
            Shape::Path { d: monotone_area_path(&coords, bottom) },
            Style::filled(area_fill).with_opacity(0.8),
        )
        .reveal(Reveal::fade_in(0, TRACE_MS)),
    );

    // ------------------------------------------------------------------
    // The curve itself, dash-offset traced
    // ------------------------------------------------------------------
    let (stroke_low, _, stroke_high) = palette.line_gradient();
    let stroke = builder.gradient(stroke_high, stroke_low);
    builder.push(
        Node::new(
            Shape::Path { d: monotone_line_path(&coords) },
            Style::stroked(stroke, 3.0),
        )
        .reveal(Reveal::trace(trace_length(&coords), 0, TRACE_MS)),
    );

    // ------------------------------------------------------------------
    // Data markers, staggered in after the trace lands
    // ------------------------------------------------------------------
    for (i, (point, &(cx, cy))) in points.iter().zip(&coords).enumerate() {
        let prev_close = if i > 0 { points[i - 1].close() } else { point.close() };
        let tooltip = ohlcv_tooltip(point, prev_close, Some(ctx.granularity.label()), &palette);

        builder.push(
            Node::new(
                Shape::Circle { cx, cy, r: 4.0 },
                Style::filled(palette.marker_fill())
                    .with_stroke(palette.marker_stroke(), 2.0)
                    .with_opacity(0.7),
            )
            .reveal(Reveal::fade_in(
                TRACE_MS + i as u32 * DOT_STAGGER_MS,
                DOT_POP_MS,
            ))
            .hover(
                HoverSpec::new(tooltip, (cx, cy))
                    .highlight(palette.marker_highlight())
                    .highlight_opacity(1.0)
                    .highlight_radius(8.0)
                    .guide(cx, top, bottom),
            ),
        );
    }

    push_annotations(&mut builder, &scales, points, &coords, &palette, &dims);

    builder.finish()
}

fn push_headings(
    builder: &mut SceneBuilder,
    ctx: &RenderContext,
    points: &[AggregatedPoint],
    palette: &Palette,
    width: f64,
) {
    builder.push(Node::new(
        Shape::Text {
            x: width / 2.0,
            y: 20.0,
            content: format!(
                "{} Stock Price Trends ({})",
                ctx.asset_label, ctx.granularity
            ),
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
    scales: &crate::scales::LineScales,
    granularity: Granularity,
    point_count: usize,
    palette: &Palette,
    dims: &ChartDimensions,
) {
    let (left, top) = (dims.margin.left, dims.margin.top);
    let right = left + dims.inner_width();
    let bottom = top + dims.inner_height();

    builder.push(Node::new(
        Shape::Line { x1: left, y1: bottom, x2: right, y2: bottom },
        Style::stroked(palette.axis(), 1.0),
    ));
    builder.push(Node::new(
        Shape::Line { x1: left, y1: top, x2: left, y2: bottom },
        Style::stroked(palette.axis(), 1.0),
    ));

    // dashed horizontal grid plus currency labels
    for tick in scales.y.nice_ticks(Y_TICK_TARGET) {
        let y = top + scales.y.scale(tick);
        builder.push(Node::new(
            Shape::Line { x1: left, y1: y, x2: right, y2: y },
            Style::stroked(palette.grid(), 1.0).dashed("3,3"),
        ));
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

    // time ticks: compact month/day names for coarse granularities,
    // full dates for the dense ones
    let tick_count = point_count.clamp(1, 10);
    for tick in scales.x.ticks(tick_count) {
        let x = left + scales.x.scale(tick);
        let y = bottom + 16.0;
        let label = match granularity {
            Granularity::Day | Granularity::Week => format_month_day_name(tick),
            Granularity::Minute | Granularity::Hour => format_date_locale(tick),
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

fn push_annotations(
    builder: &mut SceneBuilder,
    scales: &crate::scales::LineScales,
    points: &[AggregatedPoint],
    coords: &[(f64, f64)],
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
            Style::stroked(palette.reference_line(), 1.5).dashed("5,5"),
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

    let max_close = summary.max_point.close();
    let min_close = summary.min_point.close();
    let extremes = [
        (max_close, "High", palette.max_marker_fill(), palette.max_marker_text()),
        (min_close, "Low", palette.min_marker_fill(), palette.min_marker_fill()),
    ];
    for (close, caption, fill, text_fill) in extremes {
        let Some(i) = points.iter().position(|p| p.close() == close) else {
            continue;
        };
        let (cx, cy) = coords[i];

        builder.push(
            Node::new(
                Shape::Circle { cx, cy, r: 6.0 },
                Style::filled(fill).with_stroke(palette.marker_outline(), 2.0),
            )
            .reveal(fade),
        );
        builder.push(
            Node::new(
                Shape::Text {
                    x: cx,
                    y: cy - 15.0,
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
    use crate::scene::RevealKind;
    use viz_core::{ChartKind, OhlcvSeries, Sample, ThemeMode};

    const DAY: i64 = 86_400_000;

    fn ctx() -> RenderContext {
        RenderContext::new(
            OhlcvSeries::default(),
            ChartKind::Line,
            "MSFT",
            Granularity::Day,
            ThemeMode::Dark,
        )
    }

    fn points(closes: &[f64]) -> Vec<AggregatedPoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                AggregatedPoint::single(Sample::new(i as i64 * DAY, c, c + 1.0, c - 1.0, c, 300.0))
            })
            .collect()
    }

    fn dots(scene: &Scene) -> Vec<&Node> {
        scene
            .nodes
            .iter()
            .filter(|n| n.hover.is_some() && matches!(n.shape, Shape::Circle { .. }))
            .collect()
    }

    #[test]
    fn test_curve_is_traced() {
        let scene = build(&ctx(), &points(&[100.0, 102.0, 99.0]), 800.0, 1);

        let traced = scene
            .nodes
            .iter()
            .find(|n| matches!(n.reveal, Some(r) if matches!(r.kind, RevealKind::Trace { .. })))
            .unwrap();
        let reveal = traced.reveal.unwrap();
        assert_eq!(reveal.duration_ms, TRACE_MS);
        assert!(matches!(traced.shape, Shape::Path { .. }));
        match reveal.kind {
            RevealKind::Trace { length } => assert!(length > 0.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_markers_pop_after_trace() {
        let pts = points(&[100.0, 102.0, 99.0, 101.0]);
        let scene = build(&ctx(), &pts, 800.0, 1);
        let markers = dots(&scene);
        assert_eq!(markers.len(), 4);

        for (i, dot) in markers.iter().enumerate() {
            let reveal = dot.reveal.unwrap();
            assert_eq!(reveal.delay_ms, TRACE_MS + i as u32 * DOT_STAGGER_MS);
            assert_eq!(reveal.duration_ms, DOT_POP_MS);
        }
    }

    #[test]
    fn test_marker_hover_has_guide_line() {
        let scene = build(&ctx(), &points(&[100.0, 102.0]), 800.0, 1);
        for dot in dots(&scene) {
            let spec = dot.hover.as_ref().unwrap();
            let guide = spec.guide.unwrap();
            assert!(guide.y2 > guide.y1);
            assert_eq!(spec.highlight_radius, Some(8.0));
        }
    }

    #[test]
    fn test_tooltip_title_carries_granularity() {
        let scene = build(&ctx(), &points(&[100.0]), 800.0, 1);
        let tip = &dots(&scene)[0].hover.as_ref().unwrap().tooltip;
        assert!(tip.title.ends_with("(day)"));
        assert!(tip.rows.iter().any(|r| r.label == "Close"));
    }

    #[test]
    fn test_annotations_after_markers() {
        let scene = build(&ctx(), &points(&[100.0, 102.0, 99.0]), 800.0, 1);
        let dashed = scene
            .nodes
            .iter()
            .find(|n| n.style.stroke_dash.as_deref() == Some("5,5"))
            .unwrap();
        assert_eq!(dashed.reveal.unwrap().delay_ms, ANNOTATION_DELAY_MS);
    }

    #[test]
    fn test_empty_points_empty_scene() {
        let scene = build(&ctx(), &[], 800.0, 1);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_single_point_stays_finite() {
        let scene = build(&ctx(), &points(&[42.0]), 800.0, 1);

        for node in &scene.nodes {
            if let Shape::Circle { cx, cy, .. } = node.shape {
                assert!(cx.is_finite());
                assert!(cy.is_finite());
            }
        }
    }
}
