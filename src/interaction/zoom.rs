use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::ZoomTransform;
use crate::error::{ChartError, ChartResult};

/// How translate is kept inside the overscroll extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TranslateConstraint {
    /// Clamp `x` into `[-overscroll, width + overscroll]` and `y` likewise.
    #[default]
    Components,
    /// Keep the zoomed visible window inside the overscroll extent, so the
    /// admissible translate range grows with `k`.
    VisibleWindow,
}

/// Wheel delta units, mirroring DOM `WheelEvent.deltaMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WheelDeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl WheelDeltaMode {
    fn multiplier(self, pixel_sensitivity: f64) -> f64 {
        match self {
            Self::Pixel => pixel_sensitivity,
            Self::Line => 0.05,
            Self::Page => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub scale_min: f64,
    pub scale_max: f64,
    pub overscroll_px: f64,
    /// Exponent per wheel pixel: `k' = k * 2^(-delta_y * sensitivity)`.
    pub wheel_sensitivity: f64,
    pub constraint: TranslateConstraint,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            scale_min: 1.0,
            scale_max: 8.0,
            overscroll_px: 100.0,
            wheel_sensitivity: 0.002,
            constraint: TranslateConstraint::Components,
        }
    }
}

impl ZoomLimits {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.scale_min.is_finite()
            || !self.scale_max.is_finite()
            || self.scale_min <= 0.0
            || self.scale_min > self.scale_max
        {
            return Err(ChartError::InvalidConfig(
                "zoom scale extent must be finite, > 0 and ordered".to_owned(),
            ));
        }
        if !self.overscroll_px.is_finite() || self.overscroll_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "zoom overscroll must be finite and >= 0".to_owned(),
            ));
        }
        if !self.wheel_sensitivity.is_finite() || self.wheel_sensitivity <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "wheel sensitivity must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Transform-delta commands produced by gesture recognition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoomCommand {
    Wheel {
        delta_y: f64,
        delta_mode: WheelDeltaMode,
        anchor_x: f64,
        anchor_y: f64,
    },
    ScaleBy {
        factor: f64,
        anchor_x: f64,
        anchor_y: f64,
    },
    TranslateBy {
        dx: f64,
        dy: f64,
    },
    Set(ZoomTransform),
    Reset,
}

/// Owner of the single pan/zoom transform of one chart instance.
///
/// Proposals outside the limits are clamped, never rejected. Each applied
/// command bumps `revision`, which consumers treat as "transform changed".
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomController {
    transform: ZoomTransform,
    limits: ZoomLimits,
    surface_width: f64,
    surface_height: f64,
    revision: u64,
}

impl ZoomController {
    pub fn new(limits: ZoomLimits, surface_width: f64, surface_height: f64) -> ChartResult<Self> {
        Ok(Self {
            transform: ZoomTransform::IDENTITY,
            limits: limits.validate()?,
            surface_width: sanitize_dimension(surface_width),
            surface_height: sanitize_dimension(surface_height),
            revision: 0,
        })
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    #[must_use]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn surface_size(&self) -> (f64, f64) {
        (self.surface_width, self.surface_height)
    }

    /// Swaps the limits and re-constrains the current transform.
    pub fn set_limits(&mut self, limits: ZoomLimits) -> ChartResult<()> {
        self.limits = limits.validate()?;
        let constrained = self.constrain(self.transform);
        if constrained != self.transform {
            self.transform = constrained;
            self.revision += 1;
        }
        Ok(())
    }

    /// Updates the extent after the surface was measured and re-constrains
    /// the current transform against it.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.surface_width = sanitize_dimension(width);
        self.surface_height = sanitize_dimension(height);
        let constrained = self.constrain(self.transform);
        if constrained != self.transform {
            self.transform = constrained;
            self.revision += 1;
        }
    }

    /// Applies one command and returns the resulting (clamped) transform.
    pub fn apply(&mut self, command: ZoomCommand) -> ZoomTransform {
        let proposed = self.propose(command);
        if proposed.is_finite() {
            self.transform = self.constrain(proposed);
        }
        self.revision += 1;
        trace!(
            k = self.transform.k,
            x = self.transform.x,
            y = self.transform.y,
            revision = self.revision,
            "zoom transform updated"
        );
        self.transform
    }

    /// Returns to the identity transform, used when a chart is remounted.
    pub fn reset(&mut self) -> ZoomTransform {
        self.apply(ZoomCommand::Reset)
    }

    fn propose(&self, command: ZoomCommand) -> ZoomTransform {
        let current = self.transform;
        match command {
            ZoomCommand::Wheel {
                delta_y,
                delta_mode,
                anchor_x,
                anchor_y,
            } => {
                let exponent = -delta_y * delta_mode.multiplier(self.limits.wheel_sensitivity);
                scale_around(current, 2f64.powf(exponent), anchor_x, anchor_y, self.limits)
            }
            ZoomCommand::ScaleBy {
                factor,
                anchor_x,
                anchor_y,
            } => scale_around(current, factor, anchor_x, anchor_y, self.limits),
            ZoomCommand::TranslateBy { dx, dy } => {
                ZoomTransform::new(current.k, current.x + dx, current.y + dy)
            }
            ZoomCommand::Set(transform) => transform,
            ZoomCommand::Reset => ZoomTransform::IDENTITY,
        }
    }

    fn constrain(&self, transform: ZoomTransform) -> ZoomTransform {
        let k = clamp_scale(transform.k, self.limits);
        let o = self.limits.overscroll_px;
        let (w, h) = (self.surface_width, self.surface_height);
        match self.limits.constraint {
            TranslateConstraint::Components => {
                ZoomTransform::new(k, transform.x.clamp(-o, w + o), transform.y.clamp(-o, h + o))
            }
            TranslateConstraint::VisibleWindow => ZoomTransform::new(
                k,
                constrain_window_axis(transform.x, k, -o, w + o),
                constrain_window_axis(transform.y, k, -o, h + o),
            ),
        }
    }
}

fn scale_around(
    current: ZoomTransform,
    factor: f64,
    anchor_x: f64,
    anchor_y: f64,
    limits: ZoomLimits,
) -> ZoomTransform {
    if !factor.is_finite() || factor <= 0.0 || !anchor_x.is_finite() || !anchor_y.is_finite() {
        return current;
    }
    let k = clamp_scale(current.k * factor, limits);
    // Keep the base coordinate under the anchor fixed on screen.
    let base_x = current.invert_x(anchor_x);
    let base_y = current.invert_y(anchor_y);
    ZoomTransform::new(k, anchor_x - base_x * k, anchor_y - base_y * k)
}

fn clamp_scale(k: f64, limits: ZoomLimits) -> f64 {
    k.clamp(limits.scale_min, limits.scale_max)
}

/// `[lo, hi]` is both the viewport extent and the translate extent; the
/// visible base interval `[(lo - t) / k, (hi - t) / k]` must stay inside it.
fn constrain_window_axis(translate: f64, k: f64, lo: f64, hi: f64) -> f64 {
    let d0 = (lo - translate) / k - lo;
    let d1 = (hi - translate) / k - hi;
    let shift = if d1 > d0 {
        (d0 + d1) / 2.0
    } else if d0 < 0.0 {
        d0
    } else {
        d1.max(0.0)
    };
    translate + k * shift
}

fn sanitize_dimension(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{TranslateConstraint, ZoomCommand, ZoomController, ZoomLimits};

    #[test]
    fn visible_window_constraint_admits_right_side_zoom() {
        let limits = ZoomLimits {
            constraint: TranslateConstraint::VisibleWindow,
            ..ZoomLimits::default()
        };
        let mut zoom = ZoomController::new(limits, 800.0, 400.0).expect("zoom");
        let transform = zoom.apply(ZoomCommand::ScaleBy {
            factor: 4.0,
            anchor_x: 700.0,
            anchor_y: 200.0,
        });

        assert_eq!(transform.k, 4.0);
        // The visible base window [500, 750] lies inside [-100, 900].
        assert!((transform.x - -2100.0).abs() <= 1e-9);
    }

    #[test]
    fn visible_window_constraint_pins_identity_scale() {
        let limits = ZoomLimits {
            constraint: TranslateConstraint::VisibleWindow,
            ..ZoomLimits::default()
        };
        let mut zoom = ZoomController::new(limits, 800.0, 400.0).expect("zoom");
        let transform = zoom.apply(ZoomCommand::TranslateBy { dx: 50.0, dy: -30.0 });

        assert_eq!(transform.x, 0.0);
        assert_eq!(transform.y, 0.0);
    }

    #[test]
    fn tighter_limits_clamp_the_current_scale() {
        let mut zoom = ZoomController::new(ZoomLimits::default(), 800.0, 400.0).expect("zoom");
        zoom.apply(ZoomCommand::Set(super::ZoomTransform::new(6.0, 0.0, 0.0)));
        assert_eq!(zoom.revision(), 1);

        let limits = ZoomLimits {
            scale_max: 4.0,
            ..ZoomLimits::default()
        };
        zoom.set_limits(limits).expect("valid limits");
        assert_eq!(zoom.transform().k, 4.0);
        assert_eq!(zoom.revision(), 2);

        zoom.set_limits(limits).expect("valid limits");
        assert_eq!(zoom.revision(), 2);
        assert!(zoom.set_limits(ZoomLimits { scale_min: 0.0, ..limits }).is_err());
    }
}
