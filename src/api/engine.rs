use crate::core::{TimeSeries, ViewportConfig, ZoomTransform};
use crate::error::ChartResult;
use crate::interaction::{GestureRecognizer, ZoomController};
use crate::render::Renderer;

use super::engine_config::ChartConfig;
use super::hit_test::TooltipState;
use super::render_coordinator::{ComputedLayout, MeasuredSurface};

/// Main orchestration facade consumed by host applications.
///
/// One `ChartEngine` owns all mutable state of a chart instance: the series,
/// viewport, zoom transform, cached layout and tooltip. Every entry point
/// takes `&mut self`, so updates are serialized by construction.
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartConfig,
    pub(super) series: TimeSeries,
    pub(super) viewport: ViewportConfig,
    pub(super) zoom: ZoomController,
    pub(super) gestures: GestureRecognizer,
    pub(super) layout: Option<ComputedLayout>,
    pub(super) tooltip: TooltipState,
    pub(super) surface: Option<MeasuredSurface>,
}

impl<R: Renderer> ChartEngine<R> {
    /// Creates an engine without data. A zero-sized `viewport` is accepted;
    /// frames are deferred until a usable size arrives.
    pub fn new(renderer: R, config: ChartConfig, viewport: ViewportConfig) -> ChartResult<Self> {
        config.validate()?;
        let zoom = ZoomController::new(config.zoom, viewport.width, viewport.height)?;
        Ok(Self {
            renderer,
            config,
            series: TimeSeries::empty(),
            viewport,
            zoom,
            gestures: GestureRecognizer::default(),
            layout: None,
            tooltip: TooltipState::Hidden,
            surface: None,
        })
    }

    /// Engine for a `width` × `height` surface using the configured margins.
    pub fn with_size(renderer: R, config: ChartConfig, width: f64, height: f64) -> ChartResult<Self> {
        let viewport = ViewportConfig::new(width, height).with_margin(config.margin);
        Self::new(renderer, config, viewport)
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Replaces the configuration, including the viewport margins. The
    /// cached layout is dropped since every part of it may depend on the new
    /// values.
    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.zoom.set_limits(config.zoom)?;
        self.viewport.margin = config.margin;
        self.config = config;
        self.layout = None;
        self.tooltip = TooltipState::Hidden;
        Ok(())
    }

    #[must_use]
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    #[must_use]
    pub fn viewport(&self) -> ViewportConfig {
        self.viewport
    }

    /// Applies a container resize. The layout is rebuilt on the next frame.
    pub fn set_viewport(&mut self, viewport: ViewportConfig) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.zoom.set_surface_size(viewport.width, viewport.height);
        self.tooltip = TooltipState::Hidden;
    }

    /// Resizes while keeping the current margins.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        let viewport = ViewportConfig::new(width, height).with_margin(self.viewport.margin);
        self.set_viewport(viewport);
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.zoom.transform()
    }

    /// Increments whenever a zoom command was applied.
    #[must_use]
    pub fn zoom_revision(&self) -> u64 {
        self.zoom.revision()
    }

    #[must_use]
    pub fn tooltip(&self) -> TooltipState {
        self.tooltip
    }

    /// The cached layout, if one was computed since the last invalidation.
    #[must_use]
    pub fn layout(&self) -> Option<&ComputedLayout> {
        self.layout.as_ref()
    }

    #[must_use]
    pub fn measured_surface(&self) -> Option<MeasuredSurface> {
        self.surface
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
