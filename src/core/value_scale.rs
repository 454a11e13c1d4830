use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::scale::{ContinuousScale, LogScale};
use crate::core::series::TimeSeriesPoint;
use crate::core::transform::{ZoomTransform, ZoomableScale};
use crate::error::{ChartError, ChartResult};

/// Multipliers applied to the value extent so extremes stay off the plot edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomainPadding {
    pub lower: f64,
    pub upper: f64,
}

impl Default for ValueDomainPadding {
    fn default() -> Self {
        Self {
            lower: 0.5,
            upper: 1.5,
        }
    }
}

/// Tuning for value-domain construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueScaleTuning {
    pub padding: ValueDomainPadding,
    /// Substitute for values the logarithm cannot take.
    pub positive_floor: f64,
}

impl Default for ValueScaleTuning {
    fn default() -> Self {
        Self {
            padding: ValueDomainPadding::default(),
            positive_floor: 1e-6,
        }
    }
}

impl ValueScaleTuning {
    pub(crate) fn validate(self) -> ChartResult<Self> {
        let ValueDomainPadding { lower, upper } = self.padding;
        if !lower.is_finite() || !upper.is_finite() || lower <= 0.0 || upper <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "value padding multipliers must be finite and > 0".to_owned(),
            ));
        }
        if !self.positive_floor.is_finite() || self.positive_floor <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "value floor must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Record of values replaced while building the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainRepair {
    pub substituted_values: usize,
}

impl DomainRepair {
    #[must_use]
    pub fn is_clean(self) -> bool {
        self.substituted_values == 0
    }
}

/// Logarithmic strategy-value axis. Larger values map to smaller pixel y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    log: LogScale,
    repair: DomainRepair,
}

fn sanitize(value: f64, tuning: ValueScaleTuning, repair: &mut DomainRepair) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        repair.substituted_values += 1;
        tuning.positive_floor
    }
}

impl ValueScale {
    /// Domain `[lower * min(lows), upper * max(highs)]`.
    pub fn from_extent(
        lows: impl IntoIterator<Item = f64>,
        highs: impl IntoIterator<Item = f64>,
        pixel_range: (f64, f64),
        tuning: ValueScaleTuning,
    ) -> ChartResult<Self> {
        let tuning = tuning.validate()?;
        let mut repair = DomainRepair::default();
        let min = lows
            .into_iter()
            .map(|value| sanitize(value, tuning, &mut repair))
            .reduce(f64::min);
        let max = highs
            .into_iter()
            .map(|value| sanitize(value, tuning, &mut repair))
            .reduce(f64::max);
        Self::from_bounds(min.zip(max), repair, pixel_range, tuning)
    }

    /// Domain `[lower * min(values), upper * max(values)]`, each value sanitized once.
    pub fn from_values(
        values: impl IntoIterator<Item = f64>,
        pixel_range: (f64, f64),
        tuning: ValueScaleTuning,
    ) -> ChartResult<Self> {
        let tuning = tuning.validate()?;
        let mut repair = DomainRepair::default();
        let extent = values
            .into_iter()
            .map(|value| sanitize(value, tuning, &mut repair))
            .fold(None, |extent: Option<(f64, f64)>, value| match extent {
                Some((min, max)) => Some((min.min(value), max.max(value))),
                None => Some((value, value)),
            });
        Self::from_bounds(extent, repair, pixel_range, tuning)
    }

    fn from_bounds(
        extent: Option<(f64, f64)>,
        repair: DomainRepair,
        pixel_range: (f64, f64),
        tuning: ValueScaleTuning,
    ) -> ChartResult<Self> {
        let Some((min, max)) = extent else {
            return Err(ChartError::InvalidData(
                "value scale cannot be built from empty data".to_owned(),
            ));
        };

        if !repair.is_clean() {
            warn!(
                substituted = repair.substituted_values,
                floor = tuning.positive_floor,
                "non-positive values replaced in log value domain"
            );
        }

        let mut start = tuning.padding.lower * min;
        let mut end = tuning.padding.upper * max;
        if start >= end {
            // Flat or inverted extents still need a non-empty log span.
            let center = start.max(end);
            start = center / 10f64.sqrt();
            end = center * 10f64.sqrt();
        }

        Ok(Self {
            log: LogScale::new((start, end), pixel_range, tuning.positive_floor)?,
            repair,
        })
    }

    /// Uses `value_start` for the lower bound and `value_end` for the upper.
    pub fn from_series(
        points: &[TimeSeriesPoint],
        pixel_range: (f64, f64),
        tuning: ValueScaleTuning,
    ) -> ChartResult<Self> {
        Self::from_extent(
            points.iter().map(|point| point.value_start),
            points.iter().map(|point| point.value_end),
            pixel_range,
            tuning,
        )
    }

    #[must_use]
    pub fn repair(&self) -> DomainRepair {
        self.repair
    }

    #[must_use]
    pub fn value_to_pixel(&self, value: f64) -> f64 {
        self.log.forward(value)
    }

    #[must_use]
    pub fn pixel_to_value(&self, pixel: f64) -> f64 {
        self.log.invert(pixel)
    }
}

impl ContinuousScale for ValueScale {
    fn forward(&self, value: f64) -> f64 {
        self.log.forward(value)
    }

    fn invert(&self, pixel: f64) -> f64 {
        self.log.invert(pixel)
    }

    fn domain(&self) -> (f64, f64) {
        self.log.domain()
    }

    fn range(&self) -> (f64, f64) {
        self.log.range()
    }

    fn with_domain(&self, start: f64, end: f64) -> ChartResult<Self> {
        Ok(Self {
            log: self.log.with_domain(start, end)?,
            repair: self.repair,
        })
    }
}

impl ZoomableScale for ValueScale {
    fn apply_zoom(&self, transform: ZoomTransform) -> ChartResult<Self> {
        transform.rescale_y(self)
    }
}

/// Builds the log value axis over a flat value list with default tuning.
pub fn build_y_scale(values: &[f64], pixel_range: (f64, f64)) -> ChartResult<ValueScale> {
    ValueScale::from_values(values.iter().copied(), pixel_range, ValueScaleTuning::default())
}
