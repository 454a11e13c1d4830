mod zoom;

pub use zoom::{TranslateConstraint, WheelDeltaMode, ZoomCommand, ZoomController, ZoomLimits};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}

/// Raw pointer/wheel input delivered by the embedding surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    Wheel {
        delta_y: f64,
        #[serde(default)]
        delta_mode: WheelDeltaMode,
        x: f64,
        y: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
    },
    PointerDrag {
        x: f64,
        y: f64,
    },
    PointerUp,
    DoubleClick {
        x: f64,
        y: f64,
    },
    /// Touch pinch; `scale` is relative to the previous pinch event.
    Pinch {
        scale: f64,
        x: f64,
        y: f64,
    },
}

/// Turns raw input into zoom commands.
///
/// Dragging is stateful (the previous pointer position is needed to emit a
/// delta); every other event maps to a command directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureRecognizer {
    mode: InteractionMode,
    last_x: f64,
    last_y: f64,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            last_x: 0.0,
            last_y: 0.0,
        }
    }
}

impl GestureRecognizer {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    /// Drops an in-flight drag, e.g. when the surface is re-attached.
    pub fn cancel(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    pub fn recognize(&mut self, event: GestureEvent) -> Option<ZoomCommand> {
        match event {
            GestureEvent::Wheel {
                delta_y,
                delta_mode,
                x,
                y,
            } => Some(ZoomCommand::Wheel {
                delta_y,
                delta_mode,
                anchor_x: x,
                anchor_y: y,
            }),
            GestureEvent::PointerDown { x, y } => {
                self.mode = InteractionMode::Panning;
                self.last_x = x;
                self.last_y = y;
                None
            }
            GestureEvent::PointerDrag { x, y } => {
                if self.mode != InteractionMode::Panning {
                    return None;
                }
                let (dx, dy) = (x - self.last_x, y - self.last_y);
                self.last_x = x;
                self.last_y = y;
                Some(ZoomCommand::TranslateBy { dx, dy })
            }
            GestureEvent::PointerUp => {
                self.mode = InteractionMode::Idle;
                None
            }
            GestureEvent::DoubleClick { x, y } => Some(ZoomCommand::ScaleBy {
                factor: 2.0,
                anchor_x: x,
                anchor_y: y,
            }),
            GestureEvent::Pinch { scale, x, y } => Some(ZoomCommand::ScaleBy {
                factor: scale,
                anchor_x: x,
                anchor_y: y,
            }),
        }
    }
}
