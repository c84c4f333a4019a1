//! Render host: owns the at-most-one live scene, the replace lifecycle,
//! and the tooltip slot. The view layer drives it and projects the scene
//! it holds; the host itself never touches the DOM.

use crate::scene::{Scene, TooltipContent};
use crate::{aggregate, bar, line, pie};
use tracing::debug;
use viz_core::{ChartKind, RenderContext};

/// Where the host is in the render-replace lifecycle. `Clearing` and
/// `Building` are transient within [`RenderHost::render`]; callers observe
/// them only if they poll mid-call, which the synchronous API rules out,
/// but the states keep the lifecycle explicit in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    /// Nothing drawn yet, or the surface was never populated.
    #[default]
    Idle,
    /// Previous scene torn down, new one not yet built.
    Clearing,
    /// Renderer running.
    Building,
    /// Scene installed, entrance reveals still playing.
    Entering,
    /// Reveals settled; hover is live.
    Interactive,
}

/// Active tooltip: content plus the scene-space anchor it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTooltip {
    pub content: TooltipContent,
    pub anchor: (f64, f64),
    /// Index of the hovered node, for highlight restyling.
    pub node_index: usize,
}

/// What a render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A new scene was installed.
    Replaced,
    /// Input gave nothing to draw; the current scene was left in place.
    Skipped,
}

/// Owns the single chart surface. Every render replaces the previous
/// scene wholesale; nothing is patched incrementally.
#[derive(Debug, Default)]
pub struct RenderHost {
    scene: Option<Scene>,
    phase: RenderPhase,
    tooltip: Option<ActiveTooltip>,
    /// Monotonic render counter; namespaces gradient ids across replaces.
    cycle: u64,
}

impl RenderHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn tooltip(&self) -> Option<&ActiveTooltip> {
        self.tooltip.as_ref()
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Render `ctx` into the surface, replacing whatever was there.
    ///
    /// An empty series or a `None` chart kind leaves the current scene
    /// untouched: data may still be loading, and an unrecognized selector
    /// is not worth blanking a working chart over.
    pub fn render(&mut self, ctx: &RenderContext, width: f64) -> RenderOutcome {
        if ctx.series.is_empty() || ctx.chart == ChartKind::None {
            debug!(
                chart = ctx.chart.label(),
                samples = ctx.series.len(),
                "render skipped"
            );
            return RenderOutcome::Skipped;
        }

        self.phase = RenderPhase::Clearing;
        self.tooltip = None;
        self.scene = None;

        self.phase = RenderPhase::Building;
        self.cycle += 1;
        let sorted = ctx.series.sorted_by_time();
        let points = aggregate(&sorted, ctx.granularity);

        let scene = match ctx.chart {
            ChartKind::Bar => bar::build(ctx, &points, width, self.cycle),
            ChartKind::Line => line::build(ctx, &points, width, self.cycle),
            ChartKind::Pie => pie::build(ctx, width, self.cycle),
            ChartKind::None => unreachable!("handled above"),
        };

        debug!(
            chart = ctx.chart.label(),
            cycle = self.cycle,
            samples = ctx.series.len(),
            points = points.len(),
            nodes = scene.nodes.len(),
            settle_ms = scene.settle_ms(),
            "scene installed"
        );

        self.phase = if scene.settle_ms() > 0 {
            RenderPhase::Entering
        } else {
            RenderPhase::Interactive
        };
        self.scene = Some(scene);
        RenderOutcome::Replaced
    }

    /// View layer callback once the entrance reveals finish.
    pub fn mark_settled(&mut self) {
        if self.phase == RenderPhase::Entering {
            self.phase = RenderPhase::Interactive;
        }
    }

    /// Pointer entered node `index`. Installs the node's tooltip if it
    /// has hover metadata; nodes without it are inert.
    pub fn hover(&mut self, index: usize) {
        let Some(scene) = &self.scene else { return };
        let Some(node) = scene.nodes.get(index) else { return };
        let Some(spec) = &node.hover else { return };

        self.tooltip = Some(ActiveTooltip {
            content: spec.tooltip.clone(),
            anchor: spec.anchor,
            node_index: index,
        });
    }

    pub fn clear_hover(&mut self) {
        self.tooltip = None;
    }

    /// Tear down the surface entirely.
    pub fn clear(&mut self) {
        self.scene = None;
        self.tooltip = None;
        self.phase = RenderPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::{Granularity, OhlcvSeries, Sample, ThemeMode};

    const DAY: i64 = 86_400_000;

    fn series(closes: &[f64]) -> OhlcvSeries {
        OhlcvSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Sample::new(i as i64 * DAY, c, c + 1.0, c - 1.0, c, 100.0))
                .collect(),
        )
    }

    fn ctx(chart: ChartKind, closes: &[f64]) -> RenderContext {
        RenderContext::new(series(closes), chart, "AAPL", Granularity::Day, ThemeMode::Dark)
    }

    #[test]
    fn test_render_installs_scene() {
        let mut host = RenderHost::new();
        assert_eq!(host.phase(), RenderPhase::Idle);

        let outcome = host.render(&ctx(ChartKind::Bar, &[100.0, 105.0, 95.0]), 800.0);
        assert_eq!(outcome, RenderOutcome::Replaced);
        assert_eq!(host.phase(), RenderPhase::Entering);
        assert!(host.scene().is_some());

        host.mark_settled();
        assert_eq!(host.phase(), RenderPhase::Interactive);
    }

    #[test]
    fn test_empty_series_is_noop() {
        let mut host = RenderHost::new();
        host.render(&ctx(ChartKind::Bar, &[100.0, 105.0]), 800.0);
        let cycle = host.cycle();

        let outcome = host.render(&ctx(ChartKind::Line, &[]), 800.0);
        assert_eq!(outcome, RenderOutcome::Skipped);
        // previous scene survives an empty render
        assert!(host.scene().is_some());
        assert_eq!(host.cycle(), cycle);
    }

    #[test]
    fn test_unrecognized_chart_is_silent() {
        let mut host = RenderHost::new();
        let kind = ChartKind::parse("scatter");
        assert_eq!(kind, ChartKind::None);

        let outcome = host.render(&ctx(kind, &[100.0]), 800.0);
        assert_eq!(outcome, RenderOutcome::Skipped);
        assert!(host.scene().is_none());
        assert_eq!(host.phase(), RenderPhase::Idle);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut host = RenderHost::new();
        host.render(&ctx(ChartKind::Bar, &[100.0, 105.0]), 800.0);
        host.hover(0);

        host.render(&ctx(ChartKind::Pie, &[100.0, 105.0]), 800.0);

        // tooltip never outlives the scene it was raised on
        assert!(host.tooltip().is_none());
        // gradient ids from the new cycle cannot alias the old ones
        let scene = host.scene().unwrap();
        assert!(scene.gradients.iter().all(|g| g.id.starts_with("grad-2-")));
    }

    #[test]
    fn test_rerender_same_input_is_equivalent() {
        let input = ctx(ChartKind::Bar, &[100.0, 105.0, 95.0]);

        let mut host = RenderHost::new();
        host.render(&input, 800.0);
        let first: Vec<_> = host.scene().unwrap().nodes.iter().map(|n| n.shape.clone()).collect();

        host.render(&input, 800.0);
        let second: Vec<_> = host.scene().unwrap().nodes.iter().map(|n| n.shape.clone()).collect();

        // geometry identical across cycles; only gradient ids differ
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsorted_input_renders_in_time_order() {
        let mut samples = series(&[100.0, 105.0, 95.0]).samples;
        samples.swap(0, 2);
        let input = RenderContext::new(
            OhlcvSeries::new(samples),
            ChartKind::Bar,
            "AAPL",
            Granularity::Day,
            ThemeMode::Dark,
        );

        let mut host = RenderHost::new();
        host.render(&input, 800.0);

        let scene = host.scene().unwrap();
        let tips: Vec<&str> = scene
            .nodes
            .iter()
            .filter_map(|n| n.hover.as_ref())
            .map(|h| h.tooltip.title.as_str())
            .collect();
        // tooltips appear left to right in date order
        assert_eq!(tips, vec!["1/1/1970", "1/2/1970", "1/3/1970"]);
    }

    #[test]
    fn test_hover_on_inert_node_does_nothing() {
        let mut host = RenderHost::new();
        host.render(&ctx(ChartKind::Bar, &[100.0]), 800.0);

        // node 0 is the title text, no hover metadata
        host.hover(0);
        assert!(host.tooltip().is_none());

        // out of bounds is ignored too
        host.hover(9999);
        assert!(host.tooltip().is_none());
    }

    #[test]
    fn test_hover_and_clear() {
        let mut host = RenderHost::new();
        host.render(&ctx(ChartKind::Bar, &[100.0, 105.0]), 800.0);

        let scene = host.scene().unwrap();
        let bar_idx = scene
            .nodes
            .iter()
            .position(|n| n.hover.is_some())
            .unwrap();

        host.hover(bar_idx);
        let tip = host.tooltip().unwrap();
        assert_eq!(tip.node_index, bar_idx);
        assert!(!tip.content.rows.is_empty());

        host.clear_hover();
        assert!(host.tooltip().is_none());
    }

    #[test]
    fn test_minute_data_buckets_before_bar_render() {
        // 48 hourly samples over two days -> two bars
        let samples: Vec<Sample> = (0..48)
            .map(|h| Sample::new(h * 3_600_000, 10.0, 11.0, 9.0, 10.5, 5.0))
            .collect();
        let input = RenderContext::new(
            OhlcvSeries::new(samples),
            ChartKind::Bar,
            "AAPL",
            Granularity::Hour,
            ThemeMode::Dark,
        );

        let mut host = RenderHost::new();
        host.render(&input, 800.0);

        let bars = host
            .scene()
            .unwrap()
            .nodes
            .iter()
            .filter(|n| n.hover.is_some())
            .count();
        assert_eq!(bars, 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut host = RenderHost::new();
        host.render(&ctx(ChartKind::Line, &[100.0, 101.0]), 800.0);
        host.clear();

        assert!(host.scene().is_none());
        assert_eq!(host.phase(), RenderPhase::Idle);
    }
}
