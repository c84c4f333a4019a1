//! Scene-to-SVG projection.
//!
//! Takes the immutable scene a renderer built and emits the matching SVG
//! subtree. Staged reveals become SMIL animations; hover restyling stays
//! fine-grained so the entry animations never restart mid-interaction.

use leptos::prelude::*;
use viz_charts::{Node, RevealKind, Scene, Shape, Style};

/// One chart surface. Re-created wholesale whenever the scene signal
/// changes; hover only touches reactive attributes on existing elements.
#[component]
pub fn SceneSvg(
    #[prop(into)] scene: Signal<Option<Scene>>,
    #[prop(into)] hovered: Signal<Option<usize>>,
    #[prop(into)] on_hover: Callback<Option<usize>>,
) -> impl IntoView {
    view! {
        {move || {
            scene.get().map(|s| {
                let viewbox = format!("0 0 {} {}", s.width, s.height);
                view! {
                    <svg
                        class="chart-surface"
                        viewBox=viewbox
                        preserveAspectRatio="xMidYMid meet"
                        style="width: 100%; height: auto;"
                        on:mouseleave=move |_| on_hover.run(None)
                    >
                        <defs>
                            {s.gradients
                                .iter()
                                .map(|g| {
                                    view! {
                                        <linearGradient
                                            id=g.id.clone()
                                            x1="0%"
                                            y1="0%"
                                            x2="0%"
                                            y2="100%"
                                        >
                                            <stop offset="0%" stop-color=g.top.clone() />
                                            <stop offset="100%" stop-color=g.bottom.clone() />
                                        </linearGradient>
                                    }
                                })
                                .collect_view()}
                        </defs>
                        {s.nodes
                            .iter()
                            .enumerate()
                            .map(|(i, node)| node_view(node, i, hovered, on_hover))
                            .collect_view()}
                    </svg>
                }
            })
        }}
    }
}

/// Compose `translate` and `rotate` into one transform attribute.
fn transform_attr(node: &Node) -> Option<String> {
    let mut parts = Vec::new();
    if let Some((x, y)) = node.offset {
        parts.push(format!("translate({}, {})", x, y));
    }
    if let Some((deg, cx, cy)) = node.rotate {
        parts.push(format!("rotate({}, {}, {})", deg, cx, cy));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn base_fill(style: &Style) -> String {
    style.fill.clone().unwrap_or_else(|| "none".to_string())
}

fn base_stroke(style: &Style) -> String {
    style.stroke.clone().unwrap_or_else(|| "none".to_string())
}

/// Geometry reveals as SMIL children of the shape element. The static
/// attributes of the host element hold the from-state, so nothing flashes
/// before the delay. Fades live on a wrapper group instead; see `node_view`.
fn reveal_animations(node: &Node) -> Option<AnyView> {
    node.reveal.and_then(|reveal| {
        let begin = format!("{}ms", reveal.delay_ms);
        let dur = format!("{}ms", reveal.duration_ms.max(1));
        match reveal.kind {
            RevealKind::FadeIn => None,
            RevealKind::Rise { baseline } => {
                let (y, height) = match node.shape {
                    Shape::Rect { y, height, .. } => (y, height),
                    _ => (baseline, 0.0),
                };
                Some(
                    view! {
                        <animate
                            attributeName="y"
                            from=baseline.to_string()
                            to=y.to_string()
                            begin=begin.clone()
                            dur=dur.clone()
                            fill="freeze"
                        />
                        <animate
                            attributeName="height"
                            from="0"
                            to=height.to_string()
                            begin=begin
                            dur=dur
                            fill="freeze"
                        />
                    }
                    .into_any(),
                )
            }
            RevealKind::Trace { length } => Some(
                view! {
                    <animate
                        attributeName="stroke-dashoffset"
                        from=length.to_string()
                        to="0"
                        begin=begin
                        dur=dur
                        fill="freeze"
                    />
                }
                .into_any(),
            ),
        }
    })
}

fn node_view(
    node: &Node,
    index: usize,
    hovered: Signal<Option<usize>>,
    on_hover: Callback<Option<usize>>,
) -> AnyView {
    let style = node.style.clone();
    let transform = transform_attr(node);
    let interactive = node.hover.is_some();

    // Hover restyling closes over the precomputed base and highlight values.
    let highlight_fill = node
        .hover
        .as_ref()
        .and_then(|h| h.highlight_fill.clone());
    let highlight_opacity = node.hover.as_ref().and_then(|h| h.highlight_opacity);
    let highlight_radius = node.hover.as_ref().and_then(|h| h.highlight_radius);

    let fill_base = base_fill(&style);
    let fill = move || {
        if hovered.get() == Some(index) {
            highlight_fill.clone().unwrap_or_else(|| fill_base.clone())
        } else {
            fill_base.clone()
        }
    };

    let opacity_base = style.opacity;
    let opacity = move || {
        if hovered.get() == Some(index) {
            highlight_opacity.unwrap_or(opacity_base)
        } else {
            opacity_base
        }
    };

    let enter = move |_| {
        if interactive {
            on_hover.run(Some(index));
        }
    };

    // Guide line shown only while this node is hovered.
    let guide = node.hover.as_ref().and_then(|h| h.guide);
    let guide_stroke = base_stroke(&style);
    let guide_view = guide.map(|g| {
        view! {
            {move || {
                (hovered.get() == Some(index))
                    .then(|| {
                        view! {
                            <line
                                class="hover-guide"
                                x1=g.x
                                y1=g.y1
                                x2=g.x
                                y2=g.y2
                                stroke=guide_stroke.clone()
                                stroke-width="1"
                                stroke-dasharray="3,3"
                                opacity="0.6"
                            />
                        }
                    })
            }}
        }
    });

    // Fade reveals go on a wrapper group so a frozen opacity animation
    // never fights the hover opacity on the shape itself.
    let fading = matches!(
        node.reveal.map(|r| r.kind),
        Some(RevealKind::FadeIn)
    );

    let shape_el: AnyView = match &node.shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            rx,
        } => {
            // A rising rect starts collapsed on its baseline.
            let (y_attr, h_attr) = match node.reveal.map(|r| r.kind) {
                Some(RevealKind::Rise { baseline }) => (baseline, 0.0),
                _ => (*y, *height),
            };
            view! {
                <rect
                    x=*x
                    y=y_attr
                    width=*width
                    height=h_attr
                    rx=*rx
                    fill=fill
                    stroke=style.stroke.clone()
                    stroke-width=style.stroke_width
                    opacity=opacity
                    on:mouseenter=enter
                >
                    {reveal_animations(node)}
                </rect>
            }
            .into_any()
        }
        Shape::Circle { cx, cy, r } => {
            let r_base = *r;
            let radius = move || {
                if hovered.get() == Some(index) {
                    highlight_radius.unwrap_or(r_base)
                } else {
                    r_base
                }
            };
            view! {
                <circle
                    cx=*cx
                    cy=*cy
                    r=radius
                    fill=fill
                    stroke=style.stroke.clone()
                    stroke-width=style.stroke_width
                    opacity=opacity
                    on:mouseenter=enter
                >
                    {reveal_animations(node)}
                </circle>
            }
            .into_any()
        }
        Shape::Line { x1, y1, x2, y2 } => view! {
            <line
                x1=*x1
                y1=*y1
                x2=*x2
                y2=*y2
                stroke=style.stroke.clone()
                stroke-width=style.stroke_width
                stroke-dasharray=style.stroke_dash.clone()
                opacity=opacity
            >
                {reveal_animations(node)}
            </line>
        }
        .into_any(),
        Shape::Path { d } => {
            // Traced paths carry their full length as a dash so the
            // dashoffset animation can draw them end to end.
            let trace_dash = match node.reveal.map(|r| r.kind) {
                Some(RevealKind::Trace { length }) => {
                    Some(length.to_string())
                }
                _ => style.stroke_dash.clone(),
            };
            let trace_offset = match node.reveal.map(|r| r.kind) {
                Some(RevealKind::Trace { length }) => Some(length),
                _ => None,
            };
            view! {
                <path
                    d=d.clone()
                    fill=fill
                    stroke=style.stroke.clone()
                    stroke-width=style.stroke_width
                    stroke-dasharray=trace_dash
                    stroke-dashoffset=trace_offset
                    opacity=opacity
                    on:mouseenter=enter
                >
                    {reveal_animations(node)}
                </path>
            }
            .into_any()
        }
        Shape::Polyline { points } => {
            let pts = points
                .iter()
                .map(|(x, y)| format!("{},{}", x, y))
                .collect::<Vec<_>>()
                .join(" ");
            view! {
                <polyline
                    points=pts
                    fill="none"
                    stroke=style.stroke.clone()
                    stroke-width=style.stroke_width
                    opacity=opacity
                >
                    {reveal_animations(node)}
                </polyline>
            }
            .into_any()
        }
        Shape::Text {
            x,
            y,
            content,
            size,
            anchor,
            weight,
        } => view! {
            <text
                x=*x
                y=*y
                font-size=*size
                font-weight=weight.as_svg()
                text-anchor=anchor.as_svg()
                fill=fill
                opacity=opacity
            >
                {reveal_animations(node)}
                {content.clone()}
            </text>
        }
        .into_any(),
    };

    let wrapped: AnyView = if fading {
        let (begin, dur) = node
            .reveal
            .map(|r| (r.delay_ms, r.duration_ms.max(1)))
            .unwrap_or((0, 1));
        view! {
            <g opacity="0" transform=transform.clone()>
                <animate
                    attributeName="opacity"
                    from="0"
                    to="1"
                    begin=format!("{}ms", begin)
                    dur=format!("{}ms", dur)
                    fill="freeze"
                />
                {shape_el}
            </g>
        }
        .into_any()
    } else if let Some(t) = transform {
        view! { <g transform=t>{shape_el}</g> }.into_any()
    } else {
        shape_el
    };

    view! {
        {wrapped}
        {guide_view}
    }
    .into_any()
}
