use serde::{Deserialize, Serialize};

/// Pixels reserved around the plot for axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|side| side.is_finite() && *side >= 0.0)
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(30.0, 30.0, 30.0, 35.0)
    }
}

/// Size of the chart surface supplied by the embedding layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
}

impl ViewportConfig {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// `false` until the container has been laid out with a usable plot area.
    #[must_use]
    pub fn is_valid(self) -> bool {
        if !self.width.is_finite() || !self.height.is_finite() {
            return false;
        }
        if self.width <= 0.0 || self.height <= 0.0 || !self.margin.is_valid() {
            return false;
        }
        let plot = self.plot_rect();
        plot.width() > 0.0 && plot.height() > 0.0
    }

    #[must_use]
    pub fn plot_rect(self) -> PlotRect {
        PlotRect {
            left: self.margin.left,
            top: self.margin.top,
            right: self.width - self.margin.right,
            bottom: self.height - self.margin.bottom,
        }
    }
}

/// Plot rectangle in pixel space. `top < bottom` since pixel y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotRect {
    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn clamp_x(self, x: f64) -> f64 {
        x.max(self.left).min(self.right)
    }

    #[must_use]
    pub fn clamp_y(self, y: f64) -> f64 {
        y.max(self.top).min(self.bottom)
    }

    /// Strict containment, matching the path clipping rule of the series lines.
    #[must_use]
    pub fn contains_open(self, x: f64, y: f64) -> bool {
        x > self.left && x < self.right && y > self.top && y < self.bottom
    }
}
