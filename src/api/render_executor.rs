use tracing::{trace, warn};

use crate::core::ViewportConfig;
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

use super::ChartEngine;
use super::render_coordinator::{
    AxisPass, LayoutInputs, LayoutPreparation, MeasuredSurface, RenderCoordinator, draw_axes,
};
use super::scene_builder::{ChartScene, SceneStatus};

impl<R: Renderer> ChartEngine<R> {
    /// Phase 1: scales, bars, series lines and crosshair for the current
    /// state. Reuses the cached layout when nothing it depends on changed.
    pub fn build_scene(&mut self) -> ChartScene {
        match self.refresh_layout() {
            SceneStatus::Deferred => ChartScene::deferred(self.viewport),
            SceneStatus::Empty => ChartScene::empty(self.viewport, &self.config),
            SceneStatus::Ready => match &self.layout {
                Some(layout) => ChartScene::ready(layout, &self.series, self.tooltip, &self.config),
                None => ChartScene::deferred(self.viewport),
            },
        }
    }

    /// Phase 2: records the measured surface and draws the axes for it.
    ///
    /// A surface whose size differs from the viewport is treated as a
    /// resize, so the axes always match the layout they annotate.
    pub fn commit_surface(&mut self, surface: MeasuredSurface) -> AxisPass {
        let Ok(surface) = surface.validate() else {
            warn!(
                width = surface.width,
                height = surface.height,
                "ignoring unusable surface measurement"
            );
            return empty_axis_pass(surface.width, surface.height);
        };

        self.adopt_surface(surface);
        match (self.refresh_layout(), self.layout.as_ref()) {
            (SceneStatus::Ready, Some(layout)) => draw_axes(layout, surface, &self.config.style),
            _ => empty_axis_pass(surface.width, surface.height),
        }
    }

    /// Runs both phases for `surface` and hands the merged frame to the
    /// renderer. Deferred frames are not rendered.
    pub fn render(&mut self, surface: MeasuredSurface) -> ChartResult<SceneStatus> {
        if let Ok(surface) = surface.validate() {
            self.adopt_surface(surface);
        }
        let scene = self.build_scene();
        if scene.status == SceneStatus::Deferred {
            trace!("render deferred");
            return Ok(SceneStatus::Deferred);
        }

        let frame = self.compose_frame(scene.frame, surface);
        self.renderer.render(&frame)?;
        Ok(scene.status)
    }

    /// Renders both phases into an external cairo context.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(
        &mut self,
        context: &cairo::Context,
        surface: MeasuredSurface,
    ) -> ChartResult<SceneStatus>
    where
        R: CairoContextRenderer,
    {
        if let Ok(surface) = surface.validate() {
            self.adopt_surface(surface);
        }
        let scene = self.build_scene();
        if scene.status == SceneStatus::Deferred {
            return Ok(SceneStatus::Deferred);
        }

        let frame = self.compose_frame(scene.frame, surface);
        self.renderer.render_on_cairo_context(context, &frame)?;
        Ok(scene.status)
    }

    /// Brings the cached layout up to date and reports what can be drawn.
    pub(super) fn refresh_layout(&mut self) -> SceneStatus {
        let inputs = LayoutInputs {
            series: &self.series,
            viewport: self.viewport,
            transform: self.zoom.transform(),
            config: &self.config,
        };
        match RenderCoordinator::prepare(self.layout.as_ref(), inputs) {
            LayoutPreparation::Recomputed(layout) => {
                self.layout = Some(*layout);
                SceneStatus::Ready
            }
            LayoutPreparation::Reused => SceneStatus::Ready,
            LayoutPreparation::Empty => {
                self.layout = None;
                SceneStatus::Empty
            }
            LayoutPreparation::Deferred => {
                self.layout = None;
                SceneStatus::Deferred
            }
        }
    }

    fn adopt_surface(&mut self, surface: MeasuredSurface) {
        self.surface = Some(surface);
        if surface.width != self.viewport.width || surface.height != self.viewport.height {
            self.gestures.cancel();
            self.set_viewport(
                ViewportConfig::new(surface.width, surface.height).with_margin(self.viewport.margin),
            );
        }
    }

    fn compose_frame(&mut self, mut frame: RenderFrame, surface: MeasuredSurface) -> RenderFrame {
        if self.layout.is_some() {
            let axes = self.commit_surface(surface);
            frame.merge(axes.frame);
        }
        frame
    }
}

fn empty_axis_pass(width: f64, height: f64) -> AxisPass {
    AxisPass {
        frame: RenderFrame::new(width, height),
        time_ticks: Vec::new(),
        value_ticks: Vec::new(),
    }
}
