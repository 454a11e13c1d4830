use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{date_to_unix_seconds, unix_seconds_to_datetime};
use crate::core::scale::{ContinuousScale, LinearScale};
use crate::core::series::TimeSeriesPoint;
use crate::core::transform::{ZoomTransform, ZoomableScale};
use crate::error::{ChartError, ChartResult};

/// Half-width used when every date in the series is the same instant.
pub const DEGENERATE_HALF_SPAN_SECONDS: f64 = 15.0 * 86_400.0;

/// Linear time axis over unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    /// Creates a scale from an explicit time span (unix seconds).
    pub fn new(time_start: f64, time_end: f64, pixel_range: (f64, f64)) -> ChartResult<Self> {
        let (start, end) = normalize_range(time_start, time_end)?;
        Ok(Self {
            linear: LinearScale::new((start, end), pixel_range)?,
        })
    }

    /// Maps the earliest to the latest date onto `pixel_range`.
    pub fn from_dates(dates: &[NaiveDate], pixel_range: (f64, f64)) -> ChartResult<Self> {
        let min = dates.iter().min();
        let max = dates.iter().max();
        match (min, max) {
            (Some(min), Some(max)) => Self::new(
                date_to_unix_seconds(*min),
                date_to_unix_seconds(*max),
                pixel_range,
            ),
            _ => Err(ChartError::InvalidData(
                "time scale cannot be built from empty data".to_owned(),
            )),
        }
    }

    /// Fits the extent of the series' `date_start` values.
    pub fn from_series(points: &[TimeSeriesPoint], pixel_range: (f64, f64)) -> ChartResult<Self> {
        let min = points.iter().map(|p| OrderedFloat(p.start_time())).min();
        let max = points.iter().map(|p| OrderedFloat(p.start_time())).max();
        match (min, max) {
            (Some(min), Some(max)) => Self::new(min.0, max.0, pixel_range),
            _ => Err(ChartError::InvalidData(
                "time scale cannot be built from empty data".to_owned(),
            )),
        }
    }

    #[must_use]
    pub fn date_to_pixel(&self, date: NaiveDate) -> f64 {
        self.linear.forward(date_to_unix_seconds(date))
    }

    #[must_use]
    pub fn time_to_pixel(&self, time: f64) -> f64 {
        self.linear.forward(time)
    }

    #[must_use]
    pub fn pixel_to_time(&self, pixel: f64) -> f64 {
        self.linear.invert(pixel)
    }

    #[must_use]
    pub fn pixel_to_datetime(&self, pixel: f64) -> Option<NaiveDateTime> {
        unix_seconds_to_datetime(self.pixel_to_time(pixel))
    }

    /// Seconds covered by one pixel.
    #[must_use]
    pub fn seconds_per_pixel(&self) -> f64 {
        let (d0, d1) = self.linear.domain();
        let (r0, r1) = self.linear.range();
        ((d1 - d0) / (r1 - r0)).abs()
    }
}

impl ContinuousScale for TimeScale {
    fn forward(&self, value: f64) -> f64 {
        self.linear.forward(value)
    }

    fn invert(&self, pixel: f64) -> f64 {
        self.linear.invert(pixel)
    }

    fn domain(&self) -> (f64, f64) {
        self.linear.domain()
    }

    fn range(&self) -> (f64, f64) {
        self.linear.range()
    }

    fn with_domain(&self, start: f64, end: f64) -> ChartResult<Self> {
        Ok(Self {
            linear: self.linear.with_domain(start, end)?,
        })
    }
}

impl ZoomableScale for TimeScale {
    fn apply_zoom(&self, transform: ZoomTransform) -> ChartResult<Self> {
        transform.rescale_x(self)
    }
}

/// Builds the horizontal scale for a set of month boundaries.
pub fn build_x_scale(dates: &[NaiveDate], pixel_range: (f64, f64)) -> ChartResult<TimeScale> {
    TimeScale::from_dates(dates, pixel_range)
}

fn normalize_range(start: f64, end: f64) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "time range must be finite".to_owned(),
        ));
    }

    if start == end {
        return Ok((
            start - DEGENERATE_HALF_SPAN_SECONDS,
            end + DEGENERATE_HALF_SPAN_SECONDS,
        ));
    }

    Ok((start.min(end), start.max(end)))
}
