//! # viz-components
//!
//! Leptos UI components for the Asset Chart Visualizer: the selection
//! controls, the chart display panel, and the scene-to-SVG projection.

mod controls;
mod display;
mod scene_svg;
mod tooltip;

pub use controls::SelectorPanel;
pub use display::ChartDisplay;
pub use scene_svg::SceneSvg;
pub use tooltip::TooltipOverlay;
