mod aggregation;
mod axis_ticks;
mod data_controller;
mod engine;
mod engine_config;
mod interaction_controller;
mod render_coordinator;
mod render_executor;
mod scene_builder;
mod series_payload;
mod tooltip_panel;

pub use aggregation::{
    AggregatedPeriod, BAR_GAP_PX, Bar, GranularityPolicy, MIN_BAR_EXTENT_PX, aggregate_periods,
    build_bars, select_granularity,
};
pub use axis_ticks::{
    AXIS_VALUE_TARGET_TICKS, AxisTick, TimeTickStep, format_thousands, time_ticks, value_ticks,
};
pub use engine::ChartEngine;
pub use engine_config::{ChartConfig, RenderStyle};
pub use hit_test::{
    HIT_TIME_TOLERANCE_SECONDS, HitEntry, HitTarget, HitTestSource, HitTester, TooltipHit,
    TooltipState,
};
pub use render_coordinator::{
    AxisPass, ComputedLayout, LayoutInputs, LayoutKey, LayoutPreparation, MeasuredSurface,
    RenderCoordinator, draw_axes,
};
pub use scene_builder::{ChartScene, SceneStatus, build_scene_frame, clipped_segments, render_scene};
pub use series_payload::{
    HoldingDto, MonthlyDataDto, MonthlyRecordDto, SeriesPayload, SimulationEnvelopeDto,
    ValueBasis, parse_series_payload, parse_series_payload_with,
};
pub use tooltip_panel::{HoldingLine, TickerBoxes, TooltipPanel, highlighted_index};
