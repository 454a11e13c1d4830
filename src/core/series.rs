use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{date_to_unix_seconds, decimal_to_f64};
use crate::error::{ChartError, ChartResult};

/// One holding's share of a month's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Strategy component the holding belongs to, when known.
    #[serde(default)]
    pub component: Option<String>,
    pub label: String,
    /// Period return as a fraction (`0.012` is +1.2%).
    pub contribution: f64,
}

impl Holding {
    #[must_use]
    pub fn new(label: impl Into<String>, contribution: f64) -> Self {
        Self {
            component: None,
            label: label.into(),
            contribution,
        }
    }

    #[must_use]
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }
}

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub value_start: f64,
    pub value_end: f64,
    #[serde(default)]
    pub benchmark_value_end: Option<f64>,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl TimeSeriesPoint {
    #[must_use]
    pub fn new(date_start: NaiveDate, date_end: NaiveDate, value_start: f64, value_end: f64) -> Self {
        Self {
            date_start,
            date_end,
            value_start,
            value_end,
            benchmark_value_end: None,
            holdings: Vec::new(),
        }
    }

    /// Converts decimal-valued input, as produced by accounting backends.
    pub fn from_decimal(
        date_start: NaiveDate,
        date_end: NaiveDate,
        value_start: Decimal,
        value_end: Decimal,
    ) -> ChartResult<Self> {
        Ok(Self::new(
            date_start,
            date_end,
            decimal_to_f64(value_start, "value_start")?,
            decimal_to_f64(value_end, "value_end")?,
        ))
    }

    #[must_use]
    pub fn with_benchmark(mut self, benchmark_value_end: f64) -> Self {
        self.benchmark_value_end = Some(benchmark_value_end);
        self
    }

    #[must_use]
    pub fn with_holdings(mut self, holdings: Vec<Holding>) -> Self {
        self.holdings = holdings;
        self
    }

    #[must_use]
    pub fn start_time(&self) -> f64 {
        date_to_unix_seconds(self.date_start)
    }

    #[must_use]
    pub fn end_time(&self) -> f64 {
        date_to_unix_seconds(self.date_end)
    }

    /// Period return as a fraction; `None` when `value_start` is not positive.
    #[must_use]
    pub fn period_return(&self) -> Option<f64> {
        (self.value_start > 0.0).then(|| self.value_end / self.value_start - 1.0)
    }

    fn validate(&self) -> ChartResult<()> {
        if !self.value_start.is_finite() || !self.value_end.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "values for {} must be finite",
                self.date_start
            )));
        }
        if self
            .benchmark_value_end
            .is_some_and(|value| !value.is_finite())
        {
            return Err(ChartError::InvalidData(format!(
                "benchmark value for {} must be finite",
                self.date_start
            )));
        }
        if self.date_end < self.date_start {
            return Err(ChartError::InvalidData(format!(
                "date_end {} precedes date_start {}",
                self.date_end, self.date_start
            )));
        }
        Ok(())
    }
}

/// Identity of one data load; a replaced series never reuses an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(u64);

impl SeriesId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Ordered, immutable monthly series shared between the engine and its caches.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    id: SeriesId,
    points: Arc<[TimeSeriesPoint]>,
}

impl TimeSeries {
    /// Validates and orders `points` by `date_start`.
    ///
    /// Non-positive values are accepted here; the value scale repairs them.
    pub fn new(mut points: Vec<TimeSeriesPoint>) -> ChartResult<Self> {
        for point in &points {
            point.validate()?;
        }
        points.sort_by_key(|point| point.date_start);
        Ok(Self {
            id: SeriesId::next(),
            points: points.into(),
        })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: SeriesId::next(),
            points: Arc::from(Vec::new()),
        }
    }

    #[must_use]
    pub fn id(&self) -> SeriesId {
        self.id
    }

    #[must_use]
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeSeries, TimeSeriesPoint};
    use chrono::NaiveDate;

    fn month(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).expect("valid date")
    }

    #[test]
    fn new_orders_points_by_start_date() {
        let series = TimeSeries::new(vec![
            TimeSeriesPoint::new(month(2020, 2), month(2020, 3), 1.1, 1.2),
            TimeSeriesPoint::new(month(2020, 1), month(2020, 2), 1.0, 1.1),
        ])
        .expect("valid series");

        assert_eq!(series.points()[0].date_start, month(2020, 1));
        assert_eq!(series.points()[1].date_start, month(2020, 2));
    }

    #[test]
    fn every_load_gets_a_fresh_id() {
        let first = TimeSeries::empty();
        let second = TimeSeries::empty();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.clone().id(), first.id());
    }

    #[test]
    fn inverted_month_is_rejected() {
        let result = TimeSeries::new(vec![TimeSeriesPoint::new(
            month(2020, 3),
            month(2020, 2),
            1.0,
            1.1,
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_start_value_is_accepted() {
        let series = TimeSeries::new(vec![TimeSeriesPoint::new(
            month(2020, 1),
            month(2020, 2),
            0.0,
            1.0,
        )])
        .expect("zero value is repaired later");
        assert_eq!(series.points()[0].period_return(), None);
    }
}
