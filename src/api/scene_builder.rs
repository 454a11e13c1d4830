use serde::{Deserialize, Serialize};

use crate::core::{PlotRect, TimeScale, TimeSeries, ValueScale, ViewportConfig, ZoomTransform};
use crate::render::{
    CanvasLayerKind, Color, LinePrimitive, PolylinePrimitive, RectPrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

use super::engine_config::{ChartConfig, RenderStyle};
use super::hit_test::TooltipState;
use super::render_coordinator::{ComputedLayout, LayoutInputs, LayoutPreparation, RenderCoordinator};
use super::tooltip_panel::{TickerBoxes, TooltipPanel, highlighted_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneStatus {
    /// The surface has no usable size yet; nothing was drawn.
    Deferred,
    /// No data; the frame carries only the placeholder text.
    Empty,
    Ready,
}

/// Result of phase 1: the data layers of one frame plus tooltip content.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub status: SceneStatus,
    pub frame: RenderFrame,
    pub tooltip: TooltipState,
    pub panel: Option<TooltipPanel>,
    pub ticker_boxes: Option<TickerBoxes>,
    pub granularity: Option<usize>,
}

impl ChartScene {
    #[must_use]
    pub fn deferred(viewport: ViewportConfig) -> Self {
        Self {
            status: SceneStatus::Deferred,
            frame: RenderFrame::new(viewport.width, viewport.height),
            tooltip: TooltipState::Hidden,
            panel: None,
            ticker_boxes: None,
            granularity: None,
        }
    }

    #[must_use]
    pub fn empty(viewport: ViewportConfig, config: &ChartConfig) -> Self {
        let mut frame = RenderFrame::new(viewport.width, viewport.height);
        frame.push_text(
            CanvasLayerKind::Overlay,
            TextPrimitive::new(
                config.empty_message.clone(),
                viewport.width / 2.0,
                (viewport.height - config.style.font_size_px) / 2.0,
                config.style.font_size_px,
                config.style.axis_label_color,
                TextHAlign::Center,
            ),
        );
        Self {
            status: SceneStatus::Empty,
            frame,
            tooltip: TooltipState::Hidden,
            panel: None,
            ticker_boxes: None,
            granularity: None,
        }
    }

    /// Full scene for a computed layout, with the crosshair drawn for
    /// `tooltip` when it is visible.
    #[must_use]
    pub fn ready(
        layout: &ComputedLayout,
        series: &TimeSeries,
        tooltip: TooltipState,
        config: &ChartConfig,
    ) -> Self {
        let highlight = tooltip.hit().map(|hit| hit.target);
        let panel = highlight
            .and_then(|target| TooltipPanel::from_target(series, &layout.bars, target));
        let highlighted = highlight.and_then(|target| highlighted_index(&layout.bars, target));
        Self {
            status: SceneStatus::Ready,
            frame: build_scene_frame(layout, series, tooltip, &config.style),
            tooltip,
            panel,
            ticker_boxes: TickerBoxes::for_highlight(series, highlighted),
            granularity: Some(layout.granularity),
        }
    }
}

/// Stateless phase-1 render of `series` under `transform`.
#[must_use]
pub fn render_scene(
    series: &TimeSeries,
    viewport: ViewportConfig,
    transform: ZoomTransform,
    config: &ChartConfig,
) -> ChartScene {
    let inputs = LayoutInputs {
        series,
        viewport,
        transform,
        config,
    };
    match RenderCoordinator::prepare(None, inputs) {
        LayoutPreparation::Recomputed(layout) => {
            ChartScene::ready(&layout, series, TooltipState::Hidden, config)
        }
        LayoutPreparation::Empty => ChartScene::empty(viewport, config),
        LayoutPreparation::Deferred | LayoutPreparation::Reused => ChartScene::deferred(viewport),
    }
}

/// Bars, strategy and benchmark lines, and the crosshair.
#[must_use]
pub fn build_scene_frame(
    layout: &ComputedLayout,
    series: &TimeSeries,
    tooltip: TooltipState,
    style: &RenderStyle,
) -> RenderFrame {
    let viewport = layout.key.viewport;
    let plot = layout.plot;
    let mut frame = RenderFrame::new(viewport.width, viewport.height);

    for bar in &layout.bars {
        let fill = if bar.gained_money {
            style.gain_bar_color
        } else {
            style.loss_bar_color
        };
        let mut rect = RectPrimitive::new(bar.x, bar.y, bar.width, bar.height, fill);
        if style.bar_border_width > 0.0 {
            rect = rect.with_border(style.bar_border_width, opaque(fill));
        }
        frame.push_rect(CanvasLayerKind::Bars, rect);
    }

    let strategy = series
        .points()
        .iter()
        .map(|point| Some((point.end_time(), point.value_end)));
    for segment in clipped_segments(strategy, &layout.x_scale, &layout.y_scale, plot) {
        frame.push_polyline(
            CanvasLayerKind::Series,
            PolylinePrimitive::new(segment, style.series_line_width, style.strategy_line_color),
        );
    }

    let benchmark = series.points().iter().map(|point| {
        point
            .benchmark_value_end
            .map(|value| (point.end_time(), value))
    });
    for segment in clipped_segments(benchmark, &layout.x_scale, &layout.y_scale, plot) {
        frame.push_polyline(
            CanvasLayerKind::Series,
            PolylinePrimitive::new(segment, style.series_line_width, style.benchmark_line_color),
        );
    }

    if let Some(hit) = tooltip.hit() {
        frame.push_line(
            CanvasLayerKind::Crosshair,
            LinePrimitive::new(
                hit.x,
                plot.top,
                hit.x,
                plot.bottom,
                style.crosshair_line_width,
                style.crosshair_color,
            )
            .dashed(style.crosshair_dash_px),
        );
        frame.push_line(
            CanvasLayerKind::Crosshair,
            LinePrimitive::new(
                plot.left,
                hit.y,
                plot.right,
                hit.y,
                style.crosshair_line_width,
                style.crosshair_color,
            )
            .dashed(style.crosshair_dash_px),
        );
    }

    frame
}

/// Projects `(time, value)` samples and splits the path wherever a sample
/// is missing or falls outside the open plot rectangle. Runs shorter than
/// two points are dropped.
#[must_use]
pub fn clipped_segments(
    samples: impl IntoIterator<Item = Option<(f64, f64)>>,
    x_scale: &TimeScale,
    y_scale: &ValueScale,
    plot: PlotRect,
) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for sample in samples {
        let projected = sample
            .map(|(time, value)| (x_scale.time_to_pixel(time), y_scale.value_to_pixel(value)))
            .filter(|&(x, y)| plot.contains_open(x, y));
        match projected {
            Some(point) => current.push(point),
            None => flush_segment(&mut segments, &mut current),
        }
    }
    flush_segment(&mut segments, &mut current);
    segments
}

fn flush_segment(segments: &mut Vec<Vec<(f64, f64)>>, current: &mut Vec<(f64, f64)>) {
    if current.len() >= 2 {
        segments.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

fn opaque(color: Color) -> Color {
    Color::rgba(color.red, color.green, color.blue, 1.0)
}
