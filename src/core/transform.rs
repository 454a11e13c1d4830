use serde::{Deserialize, Serialize};

use crate::core::scale::ContinuousScale;
use crate::error::ChartResult;

/// Accumulated pan/zoom applied on top of the base data-to-pixel scales.
///
/// Maps a base pixel coordinate `p` to `p * k + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    #[must_use]
    pub const fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.k.is_finite() && self.k > 0.0 && self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn apply_x(self, x: f64) -> f64 {
        x * self.k + self.x
    }

    #[must_use]
    pub fn apply_y(self, y: f64) -> f64 {
        y * self.k + self.y
    }

    #[must_use]
    pub fn invert_x(self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    #[must_use]
    pub fn invert_y(self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// Returns `scale` with its domain narrowed to what is visible through
    /// this transform horizontally. The pixel range is unchanged.
    pub fn rescale_x<S: ContinuousScale + Clone>(self, scale: &S) -> ChartResult<S> {
        if self.is_identity() {
            return Ok(scale.clone());
        }
        let (r0, r1) = scale.range();
        scale.with_domain(
            scale.invert(self.invert_x(r0)),
            scale.invert(self.invert_x(r1)),
        )
    }

    /// Vertical counterpart of [`ZoomTransform::rescale_x`].
    pub fn rescale_y<S: ContinuousScale + Clone>(self, scale: &S) -> ChartResult<S> {
        if self.is_identity() {
            return Ok(scale.clone());
        }
        let (r0, r1) = scale.range();
        scale.with_domain(
            scale.invert(self.invert_y(r0)),
            scale.invert(self.invert_y(r1)),
        )
    }
}

/// Axis-aware zoom: time scales rescale horizontally, value scales vertically.
pub trait ZoomableScale: Sized {
    fn apply_zoom(&self, transform: ZoomTransform) -> ChartResult<Self>;
}

/// Rescales the domain of `scale` through `transform`, keeping its pixel range.
pub fn apply_zoom<S: ZoomableScale>(scale: &S, transform: ZoomTransform) -> ChartResult<S> {
    scale.apply_zoom(transform)
}
