use tracing::trace;

use crate::core::ZoomTransform;
use crate::interaction::{GestureEvent, InteractionMode, ZoomCommand};
use crate::render::Renderer;

use super::ChartEngine;
use super::hit_test::{HitTestSource, HitTester, TooltipState};
use super::scene_builder::SceneStatus;

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.gestures.mode()
    }

    /// Resolves the pointer against the current scales.
    ///
    /// A stale layout (for example right after a zoom gesture) is rebuilt
    /// first, so the result always reflects the transform in effect.
    pub fn handle_pointer_move(&mut self, pointer_x: f64, pointer_y: f64) -> TooltipState {
        let tooltip = match (self.refresh_layout(), self.layout.as_ref()) {
            (SceneStatus::Ready, Some(layout)) => match self.config.hit_test_source {
                HitTestSource::RawPoints => HitTester::locate(
                    pointer_x,
                    pointer_y,
                    &layout.x_scale,
                    &layout.y_scale,
                    self.series.points(),
                    layout.plot,
                ),
                HitTestSource::Bars => HitTester::locate(
                    pointer_x,
                    pointer_y,
                    &layout.x_scale,
                    &layout.y_scale,
                    &layout.bars,
                    layout.plot,
                ),
            },
            _ => TooltipState::Hidden,
        };
        self.tooltip = tooltip;
        tooltip
    }

    pub fn handle_pointer_leave(&mut self) -> TooltipState {
        self.tooltip = HitTester::leave();
        self.tooltip
    }

    /// Feeds a raw input event through gesture recognition and the zoom
    /// controller. Returns the transform in effect afterwards.
    pub fn handle_zoom_gesture(&mut self, gesture: GestureEvent) -> ZoomTransform {
        match self.gestures.recognize(gesture) {
            Some(command) => self.apply_zoom_command(command),
            None => self.zoom.transform(),
        }
    }

    /// Applies a zoom command directly, bypassing gesture recognition.
    pub fn apply_zoom_command(&mut self, command: ZoomCommand) -> ZoomTransform {
        let before = self.zoom.transform();
        let after = self.zoom.apply(command);
        if after != before {
            // The crosshair anchor belongs to the previous scales.
            self.tooltip = TooltipState::Hidden;
        }
        trace!(?command, k = after.k, "zoom command applied");
        after
    }

    pub fn reset_zoom(&mut self) -> ZoomTransform {
        self.apply_zoom_command(ZoomCommand::Reset)
    }
}
