//! Floating tooltip panel, positioned over the chart surface.

use leptos::prelude::*;
use viz_charts::ActiveTooltip;
use viz_core::{Palette, ThemeMode};

/// Renders the active tooltip next to its scene-space anchor. The parent
/// container is position:relative and shares the scene's aspect ratio, so
/// percentage offsets line up with the SVG viewBox.
#[component]
pub fn TooltipOverlay(
    #[prop(into)] tooltip: Signal<Option<ActiveTooltip>>,
    #[prop(into)] scene_size: Signal<Option<(f64, f64)>>,
    #[prop(into)] theme: Signal<ThemeMode>,
) -> impl IntoView {
    view! {
        {move || {
            let t = tooltip.get()?;
            let (width, height) = scene_size.get()?;
            let palette = Palette::new(theme.get());

            let (ax, ay) = t.anchor;
            // Flip to the left half when the anchor is past mid-chart so
            // the panel never runs off the right edge.
            let left_pct = (ax / width * 100.0).clamp(0.0, 100.0);
            let top_pct = (ay / height * 100.0).clamp(0.0, 100.0);
            let translate = if ax > width / 2.0 {
                "translate(-105%, -50%)"
            } else {
                "translate(12px, -50%)"
            };

            let style = format!(
                "position: absolute; left: {:.2}%; top: {:.2}%; transform: {}; \
                 background: {}; color: {}; border: 1px solid {}; \
                 border-radius: 6px; padding: 8px 12px; pointer-events: none; \
                 font-size: 12px; white-space: nowrap; z-index: 10;",
                left_pct,
                top_pct,
                translate,
                palette.tooltip_bg(),
                palette.tooltip_fg(),
                palette.tooltip_border(),
            );

            let title_style = t
                .content
                .title_color
                .as_ref()
                .map(|c| format!("color: {};", c))
                .unwrap_or_default();

            Some(view! {
                <div class="chart-tooltip" style=style>
                    <div class="tooltip-title" style=format!("font-weight: bold; margin-bottom: 4px; {}", title_style)>
                        {t.content.title.clone()}
                    </div>
                    {t.content
                        .rows
                        .iter()
                        .map(|row| {
                            let value_style = row
                                .value_color
                                .as_ref()
                                .map(|c| format!("color: {};", c))
                                .unwrap_or_default();
                            view! {
                                <div class="tooltip-row" style="display: flex; justify-content: space-between; gap: 12px;">
                                    <span class="tooltip-label">{row.label.clone()}</span>
                                    <span class="tooltip-value" style=value_style>
                                        {row.value.clone()}
                                    </span>
                                </div>
                            }
                        })
                        .collect_view()}
                    {t.content.footer.clone().map(|footer| {
                        let divider_style = format!(
                            "margin-top: 4px; padding-top: 4px; border-top: 1px solid {}; opacity: 0.8;",
                            palette.tooltip_divider(),
                        );
                        view! { <div class="tooltip-footer" style=divider_style>{footer}</div> }
                    })}
                </div>
            })
        }}
    }
}
