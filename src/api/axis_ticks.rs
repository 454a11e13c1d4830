use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::primitives::{date_to_unix_seconds, unix_seconds_to_datetime};
use crate::core::{ContinuousScale, PlotRect, TimeScale, ValueScale};

pub(super) const AXIS_TIME_TARGET_SPACING_PX: f64 = 72.0;
pub(super) const AXIS_TIME_MIN_SPACING_PX: f64 = 56.0;
pub(super) const AXIS_VALUE_MIN_SPACING_PX: f64 = 22.0;
/// Requested number of value ticks; the log axis stays sparse.
pub const AXIS_VALUE_TARGET_TICKS: usize = 2;

const YEAR_STEPS: [i32; 7] = [1, 2, 5, 10, 20, 50, 100];
const LOG_MANTISSAS: [f64; 3] = [1.0, 2.0, 5.0];

/// One labeled axis position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Unix seconds on the time axis, strategy value on the value axis.
    pub value: f64,
    pub pixel: f64,
    pub label: String,
}

/// Calendar spacing of time ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeTickStep {
    Years(i32),
    Quarter,
    Month,
}

impl TimeTickStep {
    fn label_format(self) -> &'static str {
        match self {
            Self::Years(_) => "%Y",
            Self::Quarter | Self::Month => "%b %Y",
        }
    }
}

pub(super) fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Drops ticks closer than `min_spacing_px` to the previously kept one.
///
/// Ticks are `(value, pixel)` pairs; the last tick replaces the final kept
/// one when that keeps the spacing, so the axis end stays labeled.
pub(super) fn select_ticks_with_min_spacing(
    mut ticks: SmallVec<[(f64, f64); 16]>,
    min_spacing_px: f64,
) -> SmallVec<[(f64, f64); 16]> {
    ticks.sort_by(|left, right| left.1.total_cmp(&right.1));
    let (Some(&first), Some(&last)) = (ticks.first(), ticks.last()) else {
        return ticks;
    };
    if ticks.len() == 1 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        return ticks;
    }

    let mut selected: SmallVec<[(f64, f64); 16]> = SmallVec::new();
    selected.push(first);
    let mut last_kept = first;
    for tick in ticks.iter().copied().skip(1) {
        if tick.1 - last_kept.1 >= min_spacing_px {
            selected.push(tick);
            last_kept = tick;
        }
    }

    if last_kept != last {
        let kept = selected.len();
        if kept == 1 {
            selected[0] = last;
        } else if last.1 - selected[kept - 2].1 >= min_spacing_px {
            selected[kept - 1] = last;
        }
    }

    selected
}

/// Calendar ticks over the visible part of `x_scale`.
///
/// Yearly ticks are preferred; the step widens with the number of years so
/// labels keep their spacing. When fewer than two year starts are visible the
/// axis falls back to quarters, then months.
#[must_use]
pub fn time_ticks(x_scale: &TimeScale, plot: PlotRect) -> Vec<AxisTick> {
    let (t0, t1) = visible_span(x_scale.invert(plot.left), x_scale.invert(plot.right));
    let (Some(start), Some(end)) = (unix_seconds_to_datetime(t0), unix_seconds_to_datetime(t1))
    else {
        return Vec::new();
    };
    let (start, end) = (start.date(), end.date());

    let max_ticks = axis_tick_target_count(plot.width(), AXIS_TIME_TARGET_SPACING_PX, 2, 16);
    let year_count = (end.year() - start.year() + 1).max(1);
    let year_step = YEAR_STEPS
        .iter()
        .copied()
        .find(|step| (year_count / step) as usize <= max_ticks)
        .unwrap_or(YEAR_STEPS[YEAR_STEPS.len() - 1]);

    let mut step = TimeTickStep::Years(year_step);
    let mut dates = calendar_ticks(start, end, step);
    if dates.len() < 2 {
        step = TimeTickStep::Quarter;
        dates = calendar_ticks(start, end, step);
    }
    if dates.len() < 2 {
        step = TimeTickStep::Month;
        dates = calendar_ticks(start, end, step);
    }

    let positioned: SmallVec<[(f64, f64); 16]> = dates
        .iter()
        .map(|date| {
            let time = date_to_unix_seconds(*date);
            (time, x_scale.time_to_pixel(time))
        })
        .filter(|(_, pixel)| *pixel >= plot.left && *pixel <= plot.right)
        .collect();

    select_ticks_with_min_spacing(positioned, AXIS_TIME_MIN_SPACING_PX)
        .into_iter()
        .filter_map(|(time, pixel)| {
            let label = unix_seconds_to_datetime(time)?
                .format(step.label_format())
                .to_string();
            Some(AxisTick {
                value: time,
                pixel,
                label,
            })
        })
        .collect()
}

/// Sparse ticks on the logarithmic value axis.
///
/// Decades are used when at least `target` of them are visible, otherwise
/// the 1·2·5 sequence of each decade; a narrow zoom inside one 1·2·5 step
/// falls back to evenly stepped ticks.
#[must_use]
pub fn value_ticks(y_scale: &ValueScale, plot: PlotRect, target: usize) -> Vec<AxisTick> {
    let (lo, hi) = visible_span(y_scale.invert(plot.bottom), y_scale.invert(plot.top));
    if !(lo > 0.0) || !hi.is_finite() {
        return Vec::new();
    }

    let target = target.max(1);
    let mut values = log_candidates(lo, hi, &LOG_MANTISSAS[..1]);
    if values.len() < target {
        values = log_candidates(lo, hi, &LOG_MANTISSAS);
    }
    if values.len() < target {
        values = linear_candidates(lo, hi, target);
    }

    let positioned: SmallVec<[(f64, f64); 16]> = values
        .into_iter()
        .map(|value| (value, y_scale.value_to_pixel(value)))
        .filter(|(_, pixel)| *pixel >= plot.top && *pixel <= plot.bottom)
        .collect();

    select_ticks_with_min_spacing(positioned, AXIS_VALUE_MIN_SPACING_PX)
        .into_iter()
        .map(|(value, pixel)| AxisTick {
            value,
            pixel,
            label: format_thousands(value),
        })
        .collect()
}

/// Formats `value` rounded to an integer with `,` thousands separators.
#[must_use]
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn visible_span(a: f64, b: f64) -> (f64, f64) {
    (a.min(b), a.max(b))
}

fn calendar_ticks(start: NaiveDate, end: NaiveDate, step: TimeTickStep) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    match step {
        TimeTickStep::Years(every) => {
            let first = start.year() + i32::from(start.ordinal() > 1);
            let first = first + (every - first.rem_euclid(every)) % every;
            let mut year = first;
            while let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
                if date > end {
                    break;
                }
                out.push(date);
                year += every;
            }
        }
        TimeTickStep::Quarter | TimeTickStep::Month => {
            let months = if step == TimeTickStep::Quarter { 3 } else { 1 };
            let mut year = start.year();
            let mut month = start.month();
            loop {
                let date = NaiveDate::from_ymd_opt(year, month, 1);
                let Some(date) = date else { break };
                if date > end {
                    break;
                }
                if date >= start && (month - 1) % months == 0 {
                    out.push(date);
                }
                month += 1;
                if month > 12 {
                    month = 1;
                    year += 1;
                }
            }
        }
    }
    out
}

fn log_candidates(lo: f64, hi: f64, mantissas: &[f64]) -> Vec<f64> {
    let first = lo.log10().floor() as i32;
    let last = hi.log10().ceil() as i32;
    (first..=last)
        .flat_map(|exponent| {
            let decade = 10f64.powi(exponent);
            mantissas.iter().map(move |m| m * decade)
        })
        .filter(|value| *value >= lo && *value <= hi)
        .collect()
}

fn linear_candidates(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let step = nice_step((hi - lo) / target as f64);
    if !(step > 0.0) || !step.is_finite() {
        return Vec::new();
    }
    let mut value = (lo / step).ceil() * step;
    let mut out = Vec::new();
    while value <= hi && out.len() < 64 {
        out.push(value);
        value += step;
    }
    out
}

fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::{format_thousands, nice_step};

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0.4), "0");
        assert_eq!(format_thousands(12.0), "12");
        assert_eq!(format_thousands(1_000.0), "1,000");
        assert_eq!(format_thousands(1_234_567.4), "1,234,567");
        assert_eq!(format_thousands(-20_000.0), "-20,000");
    }

    #[test]
    fn nice_steps_follow_one_two_five() {
        assert_eq!(nice_step(0.7), 1.0);
        assert_eq!(nice_step(1.3), 2.0);
        assert_eq!(nice_step(3.0), 5.0);
        assert_eq!(nice_step(7.0), 10.0);
    }
}
