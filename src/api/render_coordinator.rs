use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    DomainRepair, PlotRect, SeriesId, TimeScale, TimeSeries, ValueScale, ViewportConfig,
    ZoomTransform, apply_zoom,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{CanvasLayerKind, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::aggregation::{Bar, build_bars};
use super::axis_ticks::{AXIS_VALUE_TARGET_TICKS, AxisTick, time_ticks, value_ticks};
use super::engine_config::{ChartConfig, RenderStyle};

const AXIS_LABEL_GAP_PX: f64 = 2.0;

/// Everything a computed layout depends on. Equal keys mean the cached
/// scales and bars are still valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutKey {
    pub series_id: SeriesId,
    pub transform: ZoomTransform,
    pub viewport: ViewportConfig,
}

impl LayoutKey {
    #[must_use]
    pub fn requires_recompute(&self, previous: Option<&LayoutKey>) -> bool {
        previous != Some(self)
    }
}

/// Scales and bars for one `LayoutKey`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedLayout {
    pub key: LayoutKey,
    /// Time axis with the zoom transform applied.
    pub x_scale: TimeScale,
    /// Value axis with the zoom transform applied.
    pub y_scale: ValueScale,
    pub granularity: usize,
    pub bars: Vec<Bar>,
    pub plot: PlotRect,
    pub repair: DomainRepair,
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutInputs<'a> {
    pub series: &'a TimeSeries,
    pub viewport: ViewportConfig,
    pub transform: ZoomTransform,
    pub config: &'a ChartConfig,
}

impl LayoutInputs<'_> {
    #[must_use]
    pub fn key(&self) -> LayoutKey {
        LayoutKey {
            series_id: self.series.id(),
            transform: self.transform,
            viewport: self.viewport,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutPreparation {
    /// The surface has no usable size yet; retry on the next frame.
    Deferred,
    /// Nothing to draw.
    Empty,
    /// The previous layout is still valid.
    Reused,
    Recomputed(Box<ComputedLayout>),
}

/// Dimensions of the committed surface, known only after phase 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredSurface {
    pub width: f64,
    pub height: f64,
}

impl MeasuredSurface {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.width.is_finite() || !self.height.is_finite() || self.width <= 0.0 || self.height <= 0.0
        {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Output of the second frame phase.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisPass {
    pub frame: RenderFrame,
    pub time_ticks: Vec<AxisTick>,
    pub value_ticks: Vec<AxisTick>,
}

/// Decides when scales and bars must be rebuilt and builds them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderCoordinator;

impl RenderCoordinator {
    /// Compares `inputs` with the previous layout and recomputes only when
    /// the series, transform or viewport changed. Never fails: problems are
    /// reported as `Deferred` or `Empty`.
    #[must_use]
    pub fn prepare(previous: Option<&ComputedLayout>, inputs: LayoutInputs<'_>) -> LayoutPreparation {
        if !inputs.viewport.is_valid() {
            warn!(
                width = inputs.viewport.width,
                height = inputs.viewport.height,
                "viewport not measured yet, deferring layout"
            );
            return LayoutPreparation::Deferred;
        }
        if inputs.series.is_empty() {
            return LayoutPreparation::Empty;
        }

        let key = inputs.key();
        if !key.requires_recompute(previous.map(|layout| &layout.key)) {
            trace!(series = key.series_id.get(), "layout reused");
            return LayoutPreparation::Reused;
        }

        match Self::compute(inputs) {
            Ok(layout) => {
                debug!(
                    series = key.series_id.get(),
                    points = inputs.series.len(),
                    bars = layout.bars.len(),
                    granularity = layout.granularity,
                    k = key.transform.k,
                    "layout recomputed"
                );
                LayoutPreparation::Recomputed(Box::new(layout))
            }
            Err(err) => {
                warn!(error = %err, "layout computation failed, deferring");
                LayoutPreparation::Deferred
            }
        }
    }

    /// Builds base scales, applies the zoom, selects granularity and
    /// projects bars.
    pub fn compute(inputs: LayoutInputs<'_>) -> ChartResult<ComputedLayout> {
        let points = inputs.series.points();
        let viewport = inputs.viewport;
        let plot = viewport.plot_rect();

        let base_x = TimeScale::from_series(points, (plot.left, plot.right))?;
        let base_y = ValueScale::from_series(
            points,
            (plot.bottom, plot.top),
            inputs.config.value_scale,
        )?;
        let x_scale = apply_zoom(&base_x, inputs.transform)?;
        let y_scale = apply_zoom(&base_y, inputs.transform)?;

        let granularity =
            inputs
                .config
                .granularity
                .select(points.len(), viewport.width, inputs.transform.k);
        let bars = build_bars(points, granularity, &x_scale, &y_scale, viewport);

        Ok(ComputedLayout {
            key: inputs.key(),
            x_scale,
            y_scale,
            granularity,
            bars,
            plot,
            repair: base_y.repair(),
        })
    }
}

/// Phase 2: gridlines, axis lines, ticks and labels for a measured surface.
#[must_use]
pub fn draw_axes(layout: &ComputedLayout, surface: MeasuredSurface, style: &RenderStyle) -> AxisPass {
    let plot = ViewportConfig::new(surface.width, surface.height)
        .with_margin(layout.key.viewport.margin)
        .plot_rect();
    let time_ticks = time_ticks(&layout.x_scale, plot);
    let value_ticks = value_ticks(&layout.y_scale, plot, AXIS_VALUE_TARGET_TICKS);

    let mut frame = RenderFrame::new(surface.width, surface.height);
    for tick in &time_ticks {
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(tick.pixel, plot.top, tick.pixel, plot.bottom, 1.0, style.grid_color),
        );
    }
    for tick in &value_ticks {
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(plot.left, tick.pixel, plot.right, tick.pixel, 1.0, style.grid_color),
        );
    }

    frame.push_line(
        CanvasLayerKind::Axis,
        LinePrimitive::new(plot.left, plot.bottom, plot.right, plot.bottom, 1.0, style.axis_color),
    );
    frame.push_line(
        CanvasLayerKind::Axis,
        LinePrimitive::new(plot.left, plot.top, plot.left, plot.bottom, 1.0, style.axis_color),
    );

    let tick = style.tick_length_px;
    for time_tick in &time_ticks {
        if tick > 0.0 {
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(
                    time_tick.pixel,
                    plot.bottom,
                    time_tick.pixel,
                    plot.bottom + tick,
                    1.0,
                    style.axis_color,
                ),
            );
        }
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                time_tick.label.clone(),
                time_tick.pixel,
                plot.bottom + tick + AXIS_LABEL_GAP_PX,
                style.font_size_px,
                style.axis_label_color,
                TextHAlign::Center,
            ),
        );
    }
    for value_tick in &value_ticks {
        if tick > 0.0 {
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(
                    plot.left - tick,
                    value_tick.pixel,
                    plot.left,
                    value_tick.pixel,
                    1.0,
                    style.axis_color,
                ),
            );
        }
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                value_tick.label.clone(),
                plot.left - tick - AXIS_LABEL_GAP_PX,
                value_tick.pixel - style.font_size_px / 2.0,
                style.font_size_px,
                style.axis_label_color,
                TextHAlign::Right,
            ),
        );
    }

    AxisPass {
        frame,
        time_ticks,
        value_ticks,
    }
}
