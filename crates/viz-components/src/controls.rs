//! Selection controls: asset, chart kind, granularity, date range, theme.

use leptos::prelude::*;
use viz_core::{ChartKind, Granularity};
use viz_state::{use_app_state, Asset};

#[component]
pub fn SelectorPanel() -> impl IntoView {
    let state = use_app_state();

    view! {
        <div class="selector-panel">
            <div class="selector">
                <label for="asset-select">"Asset"</label>
                <select
                    id="asset-select"
                    on:change=move |ev| state.select_asset(&event_target_value(&ev))
                >
                    <option value="NONE" selected=move || state.asset.get() == Asset::None>
                        "Select"
                    </option>
                    {Asset::all()
                        .iter()
                        .map(|asset| {
                            let a = *asset;
                            view! {
                                <option
                                    value=a.ticker()
                                    selected=move || state.asset.get() == a
                                >
                                    {a.company()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="selector">
                <label for="chart-select">"Chart"</label>
                <select
                    id="chart-select"
                    on:change=move |ev| state.select_chart(&event_target_value(&ev))
                >
                    <option value="none" selected=move || state.chart.get() == ChartKind::None>
                        "Select"
                    </option>
                    {ChartKind::all()
                        .iter()
                        .map(|kind| {
                            let k = *kind;
                            view! {
                                <option
                                    value=k.label().to_lowercase()
                                    selected=move || state.chart.get() == k
                                >
                                    {k.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="selector">
                <label for="granularity-select">"Timespan"</label>
                <select
                    id="granularity-select"
                    on:change=move |ev| state.select_granularity(&event_target_value(&ev))
                >
                    {Granularity::all()
                        .iter()
                        .map(|granularity| {
                            let g = *granularity;
                            view! {
                                <option
                                    value=g.label()
                                    selected=move || state.granularity.get() == g
                                >
                                    {g.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="selector">
                <label for="start-date">"From"</label>
                <input
                    id="start-date"
                    type="date"
                    on:change=move |ev| state.select_start_date(&event_target_value(&ev))
                />
            </div>

            <div class="selector">
                <label for="end-date">"To"</label>
                <input
                    id="end-date"
                    type="date"
                    on:change=move |ev| state.select_end_date(&event_target_value(&ev))
                />
            </div>

            <button
                class="theme-toggle"
                on:click=move |_| state.toggle_theme()
            >
                {move || state.theme.get().label()}
            </button>
        </div>
    }
}
