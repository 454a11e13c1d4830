use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::primitives::month_bounds;
use crate::core::{Holding, TimeSeries, TimeSeriesPoint};
use crate::error::{ChartError, ChartResult};

/// Which of the simulated value columns is charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueBasis {
    #[default]
    Pretax,
    Posttax,
}

/// One holding of a strategy component in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub holdings: Vec<String>,
    /// Gross monthly multiplier (`1.012` is +1.2%).
    pub pretax: f64,
    #[serde(default)]
    pub posttax: Option<f64>,
}

/// One month as emitted by the simulation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecordDto {
    /// `[year, month]` of the closing price the record starts from, month in `1..=12`.
    /// The record's return is earned over the following calendar month.
    pub date: (i32, u32),
    #[serde(alias = "value_start_pretax")]
    pub value_start: f64,
    #[serde(default)]
    pub value_start_posttax: Option<f64>,
    #[serde(alias = "value_end_pretax")]
    pub value_end: f64,
    #[serde(default)]
    pub value_end_posttax: Option<f64>,
    #[serde(default, alias = "value_end_spy_pretax")]
    pub benchmark_value_end: Option<f64>,
    #[serde(default, alias = "value_end_spy_posttax")]
    pub benchmark_value_end_posttax: Option<f64>,
    #[serde(default)]
    pub holdings: Vec<HoldingDto>,
}

/// The calendar month following the close month `[year, month]`.
fn performance_period(year: i32, month: u32) -> ChartResult<(NaiveDate, NaiveDate)> {
    let (close_start, close_end) = month_bounds(year, month)?;
    let start = close_end;
    let end = close_start
        .checked_add_months(Months::new(2))
        .ok_or_else(|| {
            ChartError::InvalidData(format!("month after {year}-{month} is out of range"))
        })?;
    Ok((start, end))
}

impl MonthlyRecordDto {
    pub fn into_point(self, basis: ValueBasis) -> ChartResult<TimeSeriesPoint> {
        let (year, month) = self.date;
        let (date_start, date_end) = performance_period(year, month)?;

        let (value_start, value_end, benchmark) = match basis {
            ValueBasis::Pretax => (self.value_start, self.value_end, self.benchmark_value_end),
            ValueBasis::Posttax => (
                require_posttax(self.value_start_posttax, "value_start_posttax", year, month)?,
                require_posttax(self.value_end_posttax, "value_end_posttax", year, month)?,
                self.benchmark_value_end_posttax,
            ),
        };

        let holdings = self
            .holdings
            .into_iter()
            .map(|holding| holding_from_dto(holding, basis, year, month))
            .collect::<ChartResult<Vec<_>>>()?;

        let mut point =
            TimeSeriesPoint::new(date_start, date_end, value_start, value_end).with_holdings(holdings);
        point.benchmark_value_end = benchmark;
        Ok(point)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDataDto {
    pub monthly_data: Vec<MonthlyRecordDto>,
}

/// Response envelope of the simulation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEnvelopeDto {
    #[serde(default)]
    pub data: Option<MonthlyDataDto>,
    #[serde(default)]
    pub config_hash: Option<String>,
    #[serde(default)]
    pub data_load_error: Option<Value>,
}

enum DocumentShape {
    Records,
    MonthlyData,
    Envelope,
}

/// A parsed series plus the envelope metadata that came with it.
#[derive(Debug, Clone)]
pub struct SeriesPayload {
    pub series: TimeSeries,
    pub config_hash: Option<String>,
}

/// Parses pretax values from any accepted document shape.
pub fn parse_series_payload(input: &str) -> ChartResult<SeriesPayload> {
    parse_series_payload_with(input, ValueBasis::Pretax)
}

/// Accepts a bare record array, `{ "monthly_data": [...] }`, or the full
/// `{ "data": { "monthly_data": [...] }, ... }` envelope.
pub fn parse_series_payload_with(input: &str, basis: ValueBasis) -> ChartResult<SeriesPayload> {
    let document: Value = serde_json::from_str(input)?;
    let shape = match &document {
        Value::Array(_) => DocumentShape::Records,
        Value::Object(object) if object.contains_key("monthly_data") => DocumentShape::MonthlyData,
        Value::Object(_) => DocumentShape::Envelope,
        _ => {
            return Err(ChartError::InvalidData(
                "payload must be an array or an object".to_owned(),
            ));
        }
    };

    let (records, config_hash) = match shape {
        DocumentShape::Records => (serde_json::from_value::<Vec<MonthlyRecordDto>>(document)?, None),
        DocumentShape::MonthlyData => {
            let monthly: MonthlyDataDto = serde_json::from_value(document)?;
            (monthly.monthly_data, None)
        }
        DocumentShape::Envelope => {
            let envelope: SimulationEnvelopeDto = serde_json::from_value(document)?;
            if let Some(message) = load_error_message(envelope.data_load_error.as_ref()) {
                return Err(ChartError::InvalidData(format!(
                    "simulation reported a data load error: {message}"
                )));
            }
            let data = envelope.data.ok_or_else(|| {
                ChartError::InvalidData("payload envelope has no `data` section".to_owned())
            })?;
            (data.monthly_data, envelope.config_hash)
        }
    };

    let points = records
        .into_iter()
        .map(|record| record.into_point(basis))
        .collect::<ChartResult<Vec<_>>>()?;
    let series = TimeSeries::new(points)?;
    debug!(
        series = series.id().get(),
        months = series.len(),
        ?basis,
        "series payload parsed"
    );
    Ok(SeriesPayload {
        series,
        config_hash,
    })
}

fn holding_from_dto(
    holding: HoldingDto,
    basis: ValueBasis,
    year: i32,
    month: u32,
) -> ChartResult<Holding> {
    let multiplier = match basis {
        ValueBasis::Pretax => holding.pretax,
        ValueBasis::Posttax => require_posttax(holding.posttax, "holding posttax", year, month)?,
    };
    if !multiplier.is_finite() {
        return Err(ChartError::InvalidData(format!(
            "holding return for {year}-{month} must be finite"
        )));
    }

    let label = if holding.holdings.is_empty() {
        holding.name.clone().unwrap_or_default()
    } else {
        holding.holdings.join(", ")
    };
    let out = Holding::new(label, multiplier - 1.0);
    Ok(match holding.name {
        Some(name) => out.with_component(name),
        None => out,
    })
}

fn require_posttax(value: Option<f64>, field: &str, year: i32, month: u32) -> ChartResult<f64> {
    value.ok_or_else(|| ChartError::InvalidData(format!("{field} missing for {year}-{month}")))
}

fn load_error_message(error: Option<&Value>) -> Option<String> {
    match error? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
