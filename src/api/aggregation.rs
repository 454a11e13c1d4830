use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{TimeScale, TimeSeriesPoint, ValueScale, ViewportConfig};
use crate::error::{ChartError, ChartResult};

/// Horizontal gap left between neighbouring bars.
pub const BAR_GAP_PX: f64 = 2.0;
/// Smallest rendered bar extent in either axis.
pub const MIN_BAR_EXTENT_PX: f64 = 1.0;

/// Level-of-detail policy deciding how many months one bar merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GranularityPolicy {
    /// Months per bar, strictly increasing; the last entry is the floor.
    pub candidates: Vec<usize>,
    /// A candidate qualifies once its bar is wider than this.
    pub min_bar_width_px: f64,
}

impl Default for GranularityPolicy {
    fn default() -> Self {
        Self {
            candidates: vec![1, 2, 4, 6, 12, 24],
            min_bar_width_px: 5.0,
        }
    }
}

impl GranularityPolicy {
    pub fn validate(&self) -> ChartResult<()> {
        if self.candidates.is_empty() {
            return Err(ChartError::InvalidConfig(
                "granularity candidates must not be empty".to_owned(),
            ));
        }
        if self.candidates[0] == 0 || self.candidates.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ChartError::InvalidConfig(
                "granularity candidates must be positive and strictly increasing".to_owned(),
            ));
        }
        if !self.min_bar_width_px.is_finite() || self.min_bar_width_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "minimum bar width must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the finest candidate whose bars are wider than the threshold,
    /// or the coarsest candidate when none is.
    #[must_use]
    pub fn select(&self, data_len: usize, chart_width_px: f64, zoom_k: f64) -> usize {
        let Some(&coarsest) = self.candidates.last() else {
            return 1;
        };
        if data_len == 0 || !chart_width_px.is_finite() || !zoom_k.is_finite() {
            return self.candidates[0];
        }

        let month_width = chart_width_px / data_len as f64 * zoom_k;
        self.candidates
            .iter()
            .copied()
            .find(|&months| month_width * months as f64 > self.min_bar_width_px)
            .unwrap_or(coarsest)
    }
}

/// Granularity under the default `[1, 2, 4, 6, 12, 24]` / 5 px policy.
#[must_use]
pub fn select_granularity(data_len: usize, chart_width_px: f64, zoom_k: f64) -> usize {
    GranularityPolicy::default().select(data_len, chart_width_px, zoom_k)
}

/// Consecutive months merged into one bar, before projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPeriod {
    pub first_index: usize,
    pub last_index: usize,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub value_start: f64,
    pub value_end: f64,
}

impl AggregatedPeriod {
    #[must_use]
    pub fn high(self) -> f64 {
        self.value_start.max(self.value_end)
    }

    #[must_use]
    pub fn low(self) -> f64 {
        self.value_start.min(self.value_end)
    }

    #[must_use]
    pub fn gained_money(self) -> bool {
        self.value_end > self.value_start
    }

    #[must_use]
    pub fn month_count(self) -> usize {
        self.last_index - self.first_index + 1
    }
}

/// Splits `data` into `⌈len / granularity⌉` consecutive groups; the final
/// group may be shorter.
#[must_use]
pub fn aggregate_periods(data: &[TimeSeriesPoint], granularity: usize) -> Vec<AggregatedPeriod> {
    let granularity = granularity.max(1);
    let last = data.len().saturating_sub(1);
    (0..data.len())
        .step_by(granularity)
        .map(|first_index| {
            let last_index = (first_index + granularity - 1).min(last);
            let start = &data[first_index];
            let end = &data[last_index];
            AggregatedPeriod {
                first_index,
                last_index,
                date_start: start.date_start,
                date_end: end.date_end,
                value_start: start.value_start,
                value_end: end.value_end,
            }
        })
        .collect()
}

/// One renderable rectangle covering an aggregated period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub gained_money: bool,
    pub first_index: usize,
    pub last_index: usize,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub value_start: f64,
    pub value_end: f64,
}

/// Projects aggregated periods into pixel space.
///
/// Bars entirely outside the horizontal plot range are culled; vertical
/// extents are clamped into the plot so borders stay inside the axes.
#[must_use]
pub fn build_bars(
    data: &[TimeSeriesPoint],
    granularity: usize,
    x_scale: &TimeScale,
    y_scale: &ValueScale,
    viewport: ViewportConfig,
) -> Vec<Bar> {
    let plot = viewport.plot_rect();
    aggregate_periods(data, granularity)
        .into_iter()
        .filter_map(|period| {
            let x = x_scale.date_to_pixel(period.date_start);
            let bar_pixel_width = x_scale.date_to_pixel(period.date_end) - x;
            let width = (bar_pixel_width - BAR_GAP_PX).max(MIN_BAR_EXTENT_PX);
            if x + width < plot.left || x > plot.right {
                return None;
            }

            let y_high = plot.clamp_y(y_scale.value_to_pixel(period.high()));
            let y_low = plot.clamp_y(y_scale.value_to_pixel(period.low()));
            Some(Bar {
                x,
                y: y_high,
                width,
                height: (y_low - y_high).max(MIN_BAR_EXTENT_PX),
                gained_money: period.gained_money(),
                first_index: period.first_index,
                last_index: period.last_index,
                date_start: period.date_start,
                date_end: period.date_end,
                value_start: period.value_start,
                value_end: period.value_end,
            })
        })
        .collect()
}
