use serde::{Deserialize, Serialize};

use crate::core::{Margin, ValueScaleTuning};
use crate::error::{ChartError, ChartResult};
use crate::interaction::ZoomLimits;
use crate::render::Color;

use super::aggregation::GranularityPolicy;
use super::hit_test::HitTestSource;

/// Colors, strokes and fonts used when building frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    #[serde(default = "default_gain_bar_color")]
    pub gain_bar_color: Color,
    #[serde(default = "default_loss_bar_color")]
    pub loss_bar_color: Color,
    #[serde(default = "default_bar_border_width")]
    pub bar_border_width: f64,
    #[serde(default = "default_strategy_line_color")]
    pub strategy_line_color: Color,
    #[serde(default = "default_benchmark_line_color")]
    pub benchmark_line_color: Color,
    #[serde(default = "default_series_line_width")]
    pub series_line_width: f64,
    #[serde(default = "default_crosshair_color")]
    pub crosshair_color: Color,
    #[serde(default = "default_crosshair_line_width")]
    pub crosshair_line_width: f64,
    #[serde(default = "default_crosshair_dash_px")]
    pub crosshair_dash_px: f64,
    #[serde(default = "default_grid_color")]
    pub grid_color: Color,
    #[serde(default = "default_axis_color")]
    pub axis_color: Color,
    #[serde(default = "default_axis_label_color")]
    pub axis_label_color: Color,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    #[serde(default = "default_tick_length_px")]
    pub tick_length_px: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            gain_bar_color: default_gain_bar_color(),
            loss_bar_color: default_loss_bar_color(),
            bar_border_width: default_bar_border_width(),
            strategy_line_color: default_strategy_line_color(),
            benchmark_line_color: default_benchmark_line_color(),
            series_line_width: default_series_line_width(),
            crosshair_color: default_crosshair_color(),
            crosshair_line_width: default_crosshair_line_width(),
            crosshair_dash_px: default_crosshair_dash_px(),
            grid_color: default_grid_color(),
            axis_color: default_axis_color(),
            axis_label_color: default_axis_label_color(),
            font_size_px: default_font_size_px(),
            tick_length_px: default_tick_length_px(),
        }
    }
}

impl RenderStyle {
    pub fn validate(self) -> ChartResult<()> {
        for color in [
            self.gain_bar_color,
            self.loss_bar_color,
            self.strategy_line_color,
            self.benchmark_line_color,
            self.crosshair_color,
            self.grid_color,
            self.axis_color,
            self.axis_label_color,
        ] {
            color
                .validate()
                .map_err(|e| ChartError::InvalidConfig(format!("render style: {e}")))?;
        }

        for (name, value) in [
            ("series_line_width", self.series_line_width),
            ("crosshair_line_width", self.crosshair_line_width),
            ("crosshair_dash_px", self.crosshair_dash_px),
            ("font_size_px", self.font_size_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "render style `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("bar_border_width", self.bar_border_width),
            ("tick_length_px", self.tick_length_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "render style `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Serializable setup of one chart instance.
///
/// Every field has a default, so a host can persist only what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub margin: Margin,
    #[serde(default)]
    pub granularity: GranularityPolicy,
    #[serde(default)]
    pub value_scale: ValueScaleTuning,
    #[serde(default)]
    pub zoom: ZoomLimits,
    #[serde(default)]
    pub hit_test_source: HitTestSource,
    #[serde(default)]
    pub style: RenderStyle,
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            granularity: GranularityPolicy::default(),
            value_scale: ValueScaleTuning::default(),
            zoom: ZoomLimits::default(),
            hit_test_source: HitTestSource::default(),
            style: RenderStyle::default(),
            empty_message: default_empty_message(),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_granularity(mut self, policy: GranularityPolicy) -> Self {
        self.granularity = policy;
        self
    }

    #[must_use]
    pub fn with_value_scale(mut self, tuning: ValueScaleTuning) -> Self {
        self.value_scale = tuning;
        self
    }

    #[must_use]
    pub fn with_zoom_limits(mut self, limits: ZoomLimits) -> Self {
        self.zoom = limits;
        self
    }

    #[must_use]
    pub fn with_hit_test_source(mut self, source: HitTestSource) -> Self {
        self.hit_test_source = source;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.margin.is_valid() {
            return Err(ChartError::InvalidConfig(
                "margins must be finite and >= 0".to_owned(),
            ));
        }
        self.granularity.validate()?;
        self.value_scale.validate()?;
        self.zoom.validate()?;
        self.style.validate()?;
        if self.empty_message.is_empty() {
            return Err(ChartError::InvalidConfig(
                "empty-data message must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_gain_bar_color() -> Color {
    Color::rgba(0.0, 0.5, 0.0, 0.35)
}

fn default_loss_bar_color() -> Color {
    Color::rgba(0.8, 0.0, 0.0, 0.35)
}

fn default_bar_border_width() -> f64 {
    1.0
}

fn default_strategy_line_color() -> Color {
    Color::from_rgb8(0x1f, 0x77, 0xb4)
}

fn default_benchmark_line_color() -> Color {
    Color::from_rgb8(0xff, 0x7f, 0x0e)
}

fn default_series_line_width() -> f64 {
    1.5
}

fn default_crosshair_color() -> Color {
    Color::rgb(0.0, 0.0, 0.0)
}

fn default_crosshair_line_width() -> f64 {
    1.0
}

fn default_crosshair_dash_px() -> f64 {
    4.0
}

fn default_grid_color() -> Color {
    Color::rgb(0.9, 0.9, 0.9)
}

fn default_axis_color() -> Color {
    Color::rgb(0.0, 0.0, 0.0)
}

fn default_axis_label_color() -> Color {
    Color::rgb(0.2, 0.2, 0.2)
}

fn default_font_size_px() -> f64 {
    11.0
}

fn default_tick_length_px() -> f64 {
    6.0
}

fn default_empty_message() -> String {
    "No data to display".to_owned()
}
