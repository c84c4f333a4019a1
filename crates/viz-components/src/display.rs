//! Chart display panel.
//!
//! Owns the render host, re-renders whenever a selection or the dataset
//! changes, and shows guidance text while the selection is incomplete.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use viz_charts::{ActiveTooltip, RenderHost, RenderOutcome, Scene};
use viz_state::use_app_state;

use crate::{SceneSvg, TooltipOverlay};

const SURFACE_WIDTH: f64 = 800.0;

#[component]
pub fn ChartDisplay() -> impl IntoView {
    let state = use_app_state();

    let host = StoredValue::new(RenderHost::new());
    let scene = RwSignal::new(None::<Scene>);
    let tooltip = RwSignal::new(None::<ActiveTooltip>);

    // Re-render on any selection or dataset change. A complete selection
    // with an empty dataset keeps the previous scene on screen, matching
    // the host's skip semantics.
    Effect::new(move |_| {
        match state.render_context() {
            Some(ctx) => {
                let outcome = host.try_update_value(|h| h.render(&ctx, SURFACE_WIDTH));
                if outcome == Some(RenderOutcome::Replaced) {
                    tooltip.set(None);
                    let installed = host.with_value(|h| h.scene().cloned());
                    let settle = installed.as_ref().map(|s| s.settle_ms()).unwrap_or(0);
                    let cycle = host.with_value(|h| h.cycle());
                    scene.set(installed);
                    if settle > 0 {
                        Timeout::new(settle, move || {
                            host.try_update_value(|h| {
                                // A later render may have replaced the scene already.
                                if h.cycle() == cycle {
                                    h.mark_settled();
                                }
                            });
                        })
                        .forget();
                    }
                }
            }
            None => {
                host.try_update_value(|h| h.clear());
                scene.set(None);
                tooltip.set(None);
            }
        }
    });

    let on_hover = Callback::new(move |index: Option<usize>| {
        host.try_update_value(|h| {
            match index {
                Some(i) => h.hover(i),
                None => h.clear_hover(),
            }
            tooltip.set(h.tooltip().cloned());
        });
    });

    let hovered = Signal::derive(move || tooltip.get().map(|t| t.node_index));
    let scene_size = Signal::derive(move || scene.get().map(|s| (s.width, s.height)));

    let series = state.series;
    let loading = state.loading;
    let error = state.error;

    let status = move || -> Option<AnyView> {
        if let Some(msg) = error.get() {
            return Some(
                view! { <p class="display-message display-error">{msg}</p> }.into_any(),
            );
        }
        if !state.selection_complete() {
            return Some(
                view! {
                    <p class="display-message">
                        "Please select an asset and date range to view data"
                    </p>
                }
                .into_any(),
            );
        }
        if loading.get() {
            return Some(
                view! {
                    <p class="display-message">
                        "Loading data or no data available for the selected period..."
                    </p>
                }
                .into_any(),
            );
        }
        if series.get().is_empty() {
            return Some(
                view! { <p class="display-message">"No data available"</p> }.into_any(),
            );
        }
        None
    };

    view! {
        <div class="chart-display" style="position: relative;">
            {move || {
                series
                    .get()
                    .is_capped()
                    .then(|| {
                        view! {
                            <p class="display-cap-notice">
                                "Showing the first 5000 samples for performance"
                            </p>
                        }
                    })
            }}
            {status}
            <SceneSvg scene=scene hovered=hovered on_hover=on_hover />
            <TooltipOverlay scene_size=scene_size tooltip=tooltip theme=state.theme />
        </div>
    }
}
