//! Renderer output model.
//!
//! A renderer is a pure function from data to a [`Scene`]: a flat list of
//! styled shapes plus the gradients, reveal schedule, and hover metadata the
//! view layer needs to project it into SVG. Nothing in this module touches
//! the DOM, which is what keeps the renderers testable headlessly.

use serde::{Deserialize, Serialize};

// ============================================================================
// SHAPES
// ============================================================================

/// Geometry of a single scene node, in chart-local pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    /// SVG path data string, as produced by `PathBuilder`.
    Path {
        d: String,
    },
    Polyline {
        points: Vec<(f64, f64)>,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        size: f64,
        anchor: TextAnchor,
        weight: FontWeight,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_svg(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

// ============================================================================
// STYLE, REVEAL, HOVER
// ============================================================================

/// Paint and stroke attributes. Fills referencing a gradient use the
/// `url(#id)` form already baked into the string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub stroke_dash: Option<String>,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            stroke_dash: None,
            opacity: 1.0,
        }
    }
}

impl Style {
    pub fn filled(fill: impl Into<String>) -> Self {
        Self {
            fill: Some(fill.into()),
            ..Self::default()
        }
    }

    pub fn stroked(stroke: impl Into<String>, width: f64) -> Self {
        Self {
            stroke: Some(stroke.into()),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(stroke.into());
        self.stroke_width = width;
        self
    }

    pub fn dashed(mut self, pattern: impl Into<String>) -> Self {
        self.stroke_dash = Some(pattern.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// How a node enters the scene during the staged reveal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RevealKind {
    /// Opacity 0 -> target over the duration.
    FadeIn,
    /// Bars: grow from the baseline to full height.
    Rise { baseline: f64 },
    /// Stroked paths: dash-offset sweep over the path length.
    Trace { length: f64 },
}

/// Reveal schedule entry for one node. Delays are absolute from render
/// start, so a sorted dump of a scene's reveals reads as the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    pub kind: RevealKind,
    pub delay_ms: u32,
    pub duration_ms: u32,
}

impl Reveal {
    pub fn fade_in(delay_ms: u32, duration_ms: u32) -> Self {
        Self {
            kind: RevealKind::FadeIn,
            delay_ms,
            duration_ms,
        }
    }

    pub fn rise(baseline: f64, delay_ms: u32, duration_ms: u32) -> Self {
        Self {
            kind: RevealKind::Rise { baseline },
            delay_ms,
            duration_ms,
        }
    }

    pub fn trace(length: f64, delay_ms: u32, duration_ms: u32) -> Self {
        Self {
            kind: RevealKind::Trace { length },
            delay_ms,
            duration_ms,
        }
    }

    /// Instant when this node is fully on screen.
    pub fn settles_at(&self) -> u32 {
        self.delay_ms + self.duration_ms
    }
}

/// One label/value pair inside a tooltip body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
    /// Accent color for the value text, e.g. signed-change coloring.
    pub value_color: Option<String>,
}

impl TooltipRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            value_color: None,
        }
    }

    pub fn colored(
        label: impl Into<String>,
        value: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            value_color: Some(color.into()),
        }
    }
}

/// Structured tooltip payload. The view layer owns positioning; renderers
/// only provide the anchor point and the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub title: String,
    /// Accent color for the title, e.g. the hovered slice's base color.
    pub title_color: Option<String>,
    pub rows: Vec<TooltipRow>,
    /// Trailing muted line, e.g. "and 3 more days".
    pub footer: Option<String>,
}

impl TooltipContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_color: None,
            rows: Vec::new(),
            footer: None,
        }
    }

    pub fn title_color(mut self, color: impl Into<String>) -> Self {
        self.title_color = Some(color.into());
        self
    }

    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push(TooltipRow::new(label, value));
        self
    }

    pub fn colored_row(
        mut self,
        label: impl Into<String>,
        value: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        self.rows.push(TooltipRow::colored(label, value, color));
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// Vertical guide shown while its owner node is hovered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Hover behavior for one node: what the tooltip shows and how the node
/// restyles while the pointer is over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverSpec {
    pub tooltip: TooltipContent,
    /// Anchor for tooltip placement, chart-local coordinates.
    pub anchor: (f64, f64),
    /// Fill swapped in while hovered, restored on leave.
    pub highlight_fill: Option<String>,
    /// Opacity applied while hovered.
    pub highlight_opacity: Option<f64>,
    /// Radius applied to circle nodes while hovered.
    pub highlight_radius: Option<f64>,
    /// Dashed vertical reference line shown while hovered.
    pub guide: Option<GuideLine>,
}

impl HoverSpec {
    pub fn new(tooltip: TooltipContent, anchor: (f64, f64)) -> Self {
        Self {
            tooltip,
            anchor,
            highlight_fill: None,
            highlight_opacity: None,
            highlight_radius: None,
            guide: None,
        }
    }

    pub fn highlight(mut self, fill: impl Into<String>) -> Self {
        self.highlight_fill = Some(fill.into());
        self
    }

    pub fn highlight_opacity(mut self, opacity: f64) -> Self {
        self.highlight_opacity = Some(opacity);
        self
    }

    pub fn highlight_radius(mut self, radius: f64) -> Self {
        self.highlight_radius = Some(radius);
        self
    }

    pub fn guide(mut self, x: f64, y1: f64, y2: f64) -> Self {
        self.guide = Some(GuideLine { x, y1, y2 });
        self
    }
}

// ============================================================================
// SCENE
// ============================================================================

/// One styled shape with optional reveal and hover behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub shape: Shape,
    pub style: Style,
    /// Translation applied to the whole shape, the SVG `transform` analog.
    /// Radial charts build geometry around the origin and shift it here.
    pub offset: Option<(f64, f64)>,
    /// Rotation in degrees about a pivot point: `(degrees, cx, cy)`.
    /// Used for slanted tick labels and the vertical axis caption.
    pub rotate: Option<(f64, f64, f64)>,
    pub reveal: Option<Reveal>,
    pub hover: Option<HoverSpec>,
}

impl Node {
    pub fn new(shape: Shape, style: Style) -> Self {
        Self {
            shape,
            style,
            offset: None,
            rotate: None,
            reveal: None,
            hover: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.offset = Some((x, y));
        self
    }

    pub fn rotated(mut self, degrees: f64, cx: f64, cy: f64) -> Self {
        self.rotate = Some((degrees, cx, cy));
        self
    }

    pub fn reveal(mut self, reveal: Reveal) -> Self {
        self.reveal = Some(reveal);
        self
    }

    pub fn hover(mut self, hover: HoverSpec) -> Self {
        self.hover = Some(hover);
        self
    }
}

/// Two-stop vertical linear gradient definition for the scene's `<defs>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub id: String,
    pub top: String,
    pub bottom: String,
}

/// Complete renderer output for one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Render cycle this scene was built for; namespaces gradient ids so a
    /// replacement scene never aliases defs from the one it displaced.
    pub cycle: u64,
    pub gradients: Vec<Gradient>,
    pub nodes: Vec<Node>,
}

impl Scene {
    /// Instant when the last reveal settles; 0 for a static scene.
    pub fn settle_ms(&self) -> u32 {
        self.nodes
            .iter()
            .filter_map(|n| n.reveal.map(|r| r.settles_at()))
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Accumulates nodes and gradients for one render cycle.
pub struct SceneBuilder {
    width: f64,
    height: f64,
    cycle: u64,
    gradients: Vec<Gradient>,
    nodes: Vec<Node>,
}

impl SceneBuilder {
    pub fn new(width: f64, height: f64, cycle: u64) -> Self {
        Self {
            width,
            height,
            cycle,
            gradients: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Register a gradient and get back the `url(#...)` fill reference.
    /// Ids are `grad-{cycle}-{ordinal}`, deterministic for a given scene.
    pub fn gradient(&mut self, top: impl Into<String>, bottom: impl Into<String>) -> String {
        let id = format!("grad-{}-{}", self.cycle, self.gradients.len());
        let fill = format!("url(#{id})");
        self.gradients.push(Gradient {
            id,
            top: top.into(),
            bottom: bottom.into(),
        });
        fill
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn finish(self) -> Scene {
        Scene {
            width: self.width,
            height: self.height,
            cycle: self.cycle,
            gradients: self.gradients,
            nodes: self.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_ids_namespaced_by_cycle() {
        let mut a = SceneBuilder::new(100.0, 100.0, 3);
        let mut b = SceneBuilder::new(100.0, 100.0, 4);

        assert_eq!(a.gradient("#fff", "#000"), "url(#grad-3-0)");
        assert_eq!(a.gradient("#abc", "#def"), "url(#grad-3-1)");
        assert_eq!(b.gradient("#fff", "#000"), "url(#grad-4-0)");
    }

    #[test]
    fn test_settle_time_is_last_reveal() {
        let mut builder = SceneBuilder::new(100.0, 100.0, 0);
        builder.push(
            Node::new(
                Shape::Circle { cx: 0.0, cy: 0.0, r: 1.0 },
                Style::filled("#fff"),
            )
            .reveal(Reveal::fade_in(500, 300)),
        );
        builder.push(
            Node::new(
                Shape::Circle { cx: 5.0, cy: 0.0, r: 1.0 },
                Style::filled("#fff"),
            )
            .reveal(Reveal::fade_in(2000, 100)),
        );
        builder.push(Node::new(
            Shape::Line { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 },
            Style::stroked("#fff", 1.0),
        ));

        let scene = builder.finish();
        assert_eq!(scene.settle_ms(), 2100);
    }

    #[test]
    fn test_static_scene_settles_immediately() {
        let scene = SceneBuilder::new(10.0, 10.0, 0).finish();
        assert_eq!(scene.settle_ms(), 0);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_tooltip_builder() {
        let tip = TooltipContent::new("Jan 5, 26")
            .row("Open", "$100.00")
            .colored_row("Change", "+$5.00", "#4caf50")
            .footer("and 3 more days");

        assert_eq!(tip.rows.len(), 2);
        assert_eq!(tip.rows[1].value_color.as_deref(), Some("#4caf50"));
        assert_eq!(tip.footer.as_deref(), Some("and 3 more days"));
    }
}
