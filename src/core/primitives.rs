use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Midnight UTC of `date`, in unix seconds.
#[must_use]
pub fn date_to_unix_seconds(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64
}

#[must_use]
pub fn unix_seconds_to_datetime(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

/// Start and exclusive end of a calendar month (`month` in 1..=12).
pub fn month_bounds(year: i32, month: u32) -> ChartResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ChartError::InvalidData(format!("invalid calendar month: {year}-{month}"))
    })?;
    let end = start.checked_add_months(Months::new(1)).ok_or_else(|| {
        ChartError::InvalidData(format!("month after {year}-{month} is out of range"))
    })?;
    Ok((start, end))
}
