//! Donut chart renderer: daily volume distribution, slices ranked by
//! volume with the long tail folded into one overflow slice.

use crate::chartkit::{arc_centroid, donut_slice_path};
use crate::scene::{
    FontWeight, HoverSpec, Node, Reveal, Scene, SceneBuilder, Shape, Style, TextAnchor,
    TooltipContent,
};
use crate::stats::{distribute, Distribution, VolumeSlice};
use crate::{ChartDimensions, ChartMargin};
use std::f64::consts::{PI, TAU};
use viz_core::{format_count_or_na, shade, Palette, RenderContext};

pub const PIE_CHART_HEIGHT: f64 = 500.0;

/// Donut radii as fractions of the chart radius.
const INNER_RADIUS: f64 = 0.4;
const OUTER_RADIUS: f64 = 0.8;
/// Label leader lines bend at this radius.
const LABEL_RADIUS: f64 = 0.95;

/// Slices below this share of total volume get no outside label.
const LABEL_THRESHOLD: f64 = 0.05;

const SLICE_SWEEP_MS: u32 = 1000;
const LABEL_FADE_MS: u32 = 500;
/// Bottom annotations cascade in one line at a time.
const ANNOTATION_BASE_DELAY_MS: u32 = 1500;
const ANNOTATION_STEP_MS: u32 = 100;

pub fn margin() -> ChartMargin {
    ChartMargin {
        top: 50.0,
        right: 20.0,
        bottom: 50.0,
        left: 20.0,
    }
}

/// Build the donut scene. Works from the raw series, not the aggregated
/// points: the distribution always reads at daily resolution.
pub fn build(ctx: &RenderContext, width: f64, cycle: u64) -> Scene {
    let dims = ChartDimensions::new(width, PIE_CHART_HEIGHT).with_margin(margin());
    let mut builder = SceneBuilder::new(width, PIE_CHART_HEIGHT, cycle);

    let dist = distribute(&ctx.series.samples);
    if dist.is_empty() || dist.total_volume <= 0.0 {
        return builder.finish();
    }

    let palette = Palette::new(ctx.theme);
    let radius = dims.inner_width().min(dims.inner_height()) / 2.0;
    let center = (
        dims.margin.left + dims.inner_width() / 2.0,
        dims.margin.top + dims.inner_height() / 2.0,
    );

    push_headings(&mut builder, ctx, &palette, center, radius);
    push_slices(&mut builder, &dist, &palette, center, radius);
    push_center_stats(&mut builder, &dist, &palette, center);
    push_annotations(&mut builder, &dist, &palette, center, radius);

    builder.finish()
}

fn push_slices(
    builder: &mut SceneBuilder,
    dist: &Distribution,
    palette: &Palette,
    center: (f64, f64),
    radius: f64,
) {
    let inner_r = radius * INNER_RADIUS;
    let outer_r = radius * OUTER_RADIUS;

    let mut acc = 0.0;
    for (i, slice) in dist.slices.iter().enumerate() {
        let start = acc / dist.total_volume * TAU;
        acc += slice.volume;
        let end = acc / dist.total_volume * TAU;

        let base = palette.pie_color(i);
        let fill = builder.gradient(shade(base, 0.4), shade(base, -0.4));

        builder.push(
            Node::new(
                Shape::Path { d: donut_slice_path(inner_r, outer_r, start, end) },
                Style::filled(fill)
                    .with_stroke(palette.pie_stroke(), 2.0)
                    .with_opacity(0.95),
            )
            .at(center.0, center.1)
            .reveal(Reveal::fade_in(0, SLICE_SWEEP_MS))
            .hover(
                HoverSpec::new(
                    slice_tooltip(slice, dist, base),
                    arc_point_at(center, (inner_r + outer_r) / 2.0, (start + end) / 2.0),
                )
                .highlight_opacity(1.0),
            ),
        );

        if dist.share(slice.volume) >= LABEL_THRESHOLD {
            push_slice_label(builder, slice, dist, palette, center, radius, start, end);
        }
    }
}

/// Outside label plus the polyline leader connecting it to the slice.
#[allow(clippy::too_many_arguments)]
fn push_slice_label(
    builder: &mut SceneBuilder,
    slice: &VolumeSlice,
    dist: &Distribution,
    palette: &Palette,
    center: (f64, f64),
    radius: f64,
    start: f64,
    end: f64,
) {
    let mid = (start + end) / 2.0;
    let right_side = mid < PI;
    let side = if right_side { 1.0 } else { -1.0 };
    let fade = Reveal::fade_in(SLICE_SWEEP_MS, LABEL_FADE_MS);

    let elbow = arc_centroid(radius * LABEL_RADIUS, start, end);
    let origin = arc_centroid(radius * (INNER_RADIUS + OUTER_RADIUS) / 2.0, start, end);

    builder.push(
        Node::new(
            Shape::Polyline {
                points: vec![origin, elbow, (radius * 0.9 * side, elbow.1)],
            },
            Style::stroked(palette.label_leader(), 1.5).with_opacity(0.7),
        )
        .at(center.0, center.1)
        .reveal(fade),
    );

    let share_pct = dist.share(slice.volume) * 100.0;
    builder.push(
        Node::new(
            Shape::Text {
                x: radius * side,
                y: elbow.1,
                content: format!("{} ({:.1}%)", slice.label, share_pct),
                size: 12.0,
                anchor: if right_side { TextAnchor::Start } else { TextAnchor::End },
                weight: FontWeight::Normal,
            },
            Style::filled(palette.title()),
        )
        .at(center.0, center.1)
        .reveal(fade),
    );
}

fn slice_tooltip(slice: &VolumeSlice, dist: &Distribution, base_color: &str) -> TooltipContent {
    let share_pct = dist.share(slice.volume) * 100.0;
    let mut tip = TooltipContent::new(slice.label.as_str())
        .title_color(base_color)
        .row("Volume", format_count_or_na(slice.volume))
        .row("Percentage", format!("{:.1}%", share_pct));

    if slice.is_overflow {
        tip = tip.row("Includes", format!("{} smaller segments", slice.children.len()));
        for child in slice.children.iter().take(3) {
            let child_pct = dist.share(child.volume) * 100.0;
            tip = tip.row(child.label.as_str(), format!("{:.1}%", child_pct));
        }
        if slice.children.len() > 3 {
            tip = tip.footer(format!("...and {} more", slice.children.len() - 3));
        }
    }
    tip
}

fn push_headings(
    builder: &mut SceneBuilder,
    ctx: &RenderContext,
    palette: &Palette,
    center: (f64, f64),
    radius: f64,
) {
    builder.push(Node::new(
        Shape::Text {
            x: center.0,
            y: center.1 - radius - 15.0,
            content: format!("{} Trading Volume Distribution", ctx.asset_label),
            size: 18.0,
            anchor: TextAnchor::Middle,
            weight: FontWeight::Bold,
        },
        Style::filled(palette.title()),
    ));
    builder.push(Node::new(
        Shape::Text {
            x: center.0,
            y: center.1 - radius + 10.0,
            content: format!("{} data", ctx.granularity),
            size: 14.0,
            anchor: TextAnchor::Middle,
            weight: FontWeight::Normal,
        },
        Style::filled(palette.subtitle_muted()),
    ));
}

fn push_center_stats(
    builder: &mut SceneBuilder,
    dist: &Distribution,
    palette: &Palette,
    center: (f64, f64),
) {
    builder.push(Node::new(
        Shape::Text {
            x: center.0,
            y: center.1 - 15.0,
            content: "Total Volume".to_string(),
            size: 14.0,
            anchor: TextAnchor::Middle,
            weight: FontWeight::Normal,
        },
        Style::filled(palette.center_label()),
    ));
    builder.push(Node::new(
        Shape::Text {
            x: center.0,
            y: center.1 + 15.0,
            content: format_count_or_na(dist.total_volume),
            size: 18.0,
            anchor: TextAnchor::Middle,
            weight: FontWeight::Bold,
        },
        Style::filled(palette.title()),
    ));
}

fn push_annotations(
    builder: &mut SceneBuilder,
    dist: &Distribution,
    palette: &Palette,
    center: (f64, f64),
    radius: f64,
) {
    let (Some(max), Some(min)) = (dist.max_slice(), dist.min_slice()) else {
        return;
    };

    let lines = [
        (
            format!(
                "Highest Volume: {} ({})",
                max.label,
                format_count_or_na(max.volume)
            ),
            palette.volume_high_annotation(),
            5.0,
        ),
        (
            format!(
                "Lowest Volume: {} ({})",
                min.label,
                format_count_or_na(min.volume)
            ),
            palette.volume_low_annotation(),
            25.0,
        ),
        (
            format!(
                "Average Daily Volume: {} ({:.1}%)",
                format_count_or_na(dist.average_volume()),
                dist.share(dist.average_volume()) * 100.0
            ),
            palette.volume_avg_annotation(),
            45.0,
        ),
    ];

    for (i, (content, fill, dy)) in lines.into_iter().enumerate() {
        builder.push(
            Node::new(
                Shape::Text {
                    x: center.0,
                    y: center.1 + radius + dy,
                    content,
                    size: 12.0,
                    anchor: TextAnchor::Middle,
                    weight: FontWeight::Normal,
                },
                Style::filled(fill),
            )
            .reveal(Reveal::fade_in(
                ANNOTATION_BASE_DELAY_MS + i as u32 * ANNOTATION_STEP_MS,
                LABEL_FADE_MS,
            )),
        );
    }
}

fn arc_point_at(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    let (dx, dy) = arc_centroid(radius, angle, angle);
    (center.0 + dx, center.1 + dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MAX_SLICES;
    use viz_core::{ChartKind, Granularity, OhlcvSeries, Sample, ThemeMode};

    const DAY: i64 = 86_400_000;

    fn ctx(samples: Vec<Sample>) -> RenderContext {
        RenderContext::new(
            OhlcvSeries::new(samples),
            ChartKind::Pie,
            "TSLA",
            Granularity::Day,
            ThemeMode::Dark,
        )
    }

    fn day_sample(day: i64, v: f64) -> Sample {
        Sample::new(day * DAY, 1.0, 1.0, 1.0, 1.0, v)
    }

    fn slice_paths(scene: &Scene) -> Vec<&Node> {
        scene
            .nodes
            .iter()
            .filter(|n| n.hover.is_some() && matches!(n.shape, Shape::Path { .. }))
            .collect()
    }

    #[test]
    fn test_slice_count_capped() {
        let samples: Vec<Sample> = (0..30).map(|d| day_sample(d, (d + 1) as f64)).collect();
        let scene = build(&ctx(samples), 800.0, 1);
        assert_eq!(slice_paths(&scene).len(), MAX_SLICES);
    }

    #[test]
    fn test_slices_are_translated_to_center() {
        let scene = build(&ctx(vec![day_sample(0, 10.0), day_sample(1, 20.0)]), 800.0, 1);
        for slice in slice_paths(&scene) {
            assert!(slice.offset.is_some());
        }
    }

    #[test]
    fn test_labels_only_above_threshold() {
        // one dominant day plus 24 tiny ones: only the dominant slice
        // earns an outside label
        let mut samples = vec![day_sample(0, 10_000.0)];
        samples.extend((1..25).map(|d| day_sample(d, 1.0)));
        let scene = build(&ctx(samples), 800.0, 1);

        let leaders = scene
            .nodes
            .iter()
            .filter(|n| matches!(n.shape, Shape::Polyline { .. }))
            .count();
        assert_eq!(leaders, 1);
    }

    #[test]
    fn test_overflow_tooltip_lists_top_children() {
        let samples: Vec<Sample> = (0..25).map(|d| day_sample(d, (d + 1) as f64)).collect();
        let scene = build(&ctx(samples), 800.0, 1);

        let overflow_tip = slice_paths(&scene)
            .iter()
            .map(|n| &n.hover.as_ref().unwrap().tooltip)
            .find(|t| t.rows.iter().any(|r| r.label == "Includes"))
            .unwrap();

        // 25 days -> 14 ranked + 11 folded; 3 listed, 8 elided
        assert!(overflow_tip
            .rows
            .iter()
            .any(|r| r.value == "11 smaller segments"));
        assert_eq!(overflow_tip.footer.as_deref(), Some("...and 8 more"));
    }

    #[test]
    fn test_annotation_cascade() {
        let scene = build(&ctx(vec![day_sample(0, 10.0), day_sample(1, 20.0)]), 800.0, 1);

        let delays: Vec<u32> = scene
            .nodes
            .iter()
            .filter_map(|n| n.reveal)
            .map(|r| r.delay_ms)
            .filter(|&d| d >= ANNOTATION_BASE_DELAY_MS)
            .collect();
        assert_eq!(delays, vec![1500, 1600, 1700]);
    }

    #[test]
    fn test_center_shows_total() {
        let scene = build(&ctx(vec![day_sample(0, 1_000.0), day_sample(1, 500.0)]), 800.0, 1);
        assert!(scene.nodes.iter().any(|n| match &n.shape {
            Shape::Text { content, .. } => content == "1,500",
            _ => false,
        }));
    }

    #[test]
    fn test_empty_and_zero_volume_stay_blank() {
        assert!(build(&ctx(vec![]), 800.0, 1).is_empty());
        let zeros = vec![day_sample(0, 0.0), day_sample(1, 0.0)];
        assert!(build(&ctx(zeros), 800.0, 1).is_empty());
    }
}
