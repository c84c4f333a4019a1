//! Asset Chart Visualizer - WASM frontend application

mod feed;

use leptos::prelude::*;
use viz_components::{ChartDisplay, SelectorPanel};
use viz_state::{provide_app_state, Asset};

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("starting asset chart visualizer");
    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    let state = provide_app_state();

    // Regenerate the dataset whenever the selection changes. The chart
    // kind does not affect the data, only how it is drawn, so it is
    // deliberately not read here.
    Effect::new(move |_| {
        let asset = state.asset.get();
        let granularity = state.granularity.get();
        let range = state.date_range();

        match (asset, range) {
            (Asset::None, _) | (_, None) => {
                state.series.set(Default::default());
            }
            (asset, Some((start, end))) => {
                state.set_loading();
                let series = feed::demo_series(asset, granularity, start, end);
                tracing::debug!(
                    ticker = asset.ticker(),
                    samples = series.len(),
                    "demo feed loaded"
                );
                state.set_series(series);
            }
        }
    });

    let theme_class = move || format!("app-root {}", state.theme.get().css_class());

    view! {
        <div class=theme_class>
            <header class="app-header">
                <h1>"Asset Chart Visualizer"</h1>
            </header>
            <main class="app-main">
                <SelectorPanel />
                <div class="panel chart-panel">
                    <ChartDisplay />
                </div>
            </main>
        </div>
    }
}
