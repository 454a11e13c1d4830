use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{TimeSeries, TimeSeriesPoint};

use super::aggregation::Bar;
use super::hit_test::HitTarget;

const PERIOD_LABEL_FORMAT: &str = "%b %Y";
const MISSING_RETURN_TEXT: &str = "n/a";

/// One row of the holdings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingLine {
    pub label: String,
    pub contribution: f64,
    pub return_text: String,
}

/// Text shown next to the crosshair for the highlighted period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipPanel {
    pub period_label: String,
    pub period_return: Option<f64>,
    pub return_text: String,
    pub holdings: Vec<HoldingLine>,
}

impl TooltipPanel {
    #[must_use]
    pub fn for_point(point: &TimeSeriesPoint) -> Self {
        let period_return = point.period_return();
        Self {
            period_label: period_label(point.date_start),
            period_return,
            return_text: percent_text(period_return),
            holdings: point
                .holdings
                .iter()
                .map(|holding| holding_line(holding.label.clone(), holding.contribution))
                .collect(),
        }
    }

    /// Panel for a merged bar: the return spans the whole bar, and holdings
    /// appearing in several months are compounded under their first position.
    #[must_use]
    pub fn for_bar(points: &[TimeSeriesPoint], bar: &Bar) -> Option<Self> {
        let months = points.get(bar.first_index..=bar.last_index)?;
        let (first, last) = (months.first()?, months.last()?);

        let period_label = if first.date_start == last.date_start {
            period_label(first.date_start)
        } else {
            format!(
                "{} - {}",
                period_label(first.date_start),
                period_label(last.date_start)
            )
        };
        let period_return =
            (bar.value_start > 0.0).then(|| bar.value_end / bar.value_start - 1.0);

        let mut merged: IndexMap<&str, f64> = IndexMap::new();
        for holding in months.iter().flat_map(|point| &point.holdings) {
            let growth = merged.entry(holding.label.as_str()).or_insert(1.0);
            *growth *= 1.0 + holding.contribution;
        }

        Some(Self {
            period_label,
            period_return,
            return_text: percent_text(period_return),
            holdings: merged
                .into_iter()
                .map(|(label, growth)| holding_line(label.to_owned(), growth - 1.0))
                .collect(),
        })
    }

    /// Resolves a hit target against the series or the bars it came from.
    #[must_use]
    pub fn from_target(series: &TimeSeries, bars: &[Bar], target: HitTarget) -> Option<Self> {
        match target {
            HitTarget::Point(index) => series.points().get(index).map(Self::for_point),
            HitTarget::Bar(index) => Self::for_bar(series.points(), bars.get(index)?),
        }
    }
}

/// Strategy and benchmark end values, as growth of one unit in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerBoxes {
    pub strategy: String,
    pub benchmark: Option<String>,
}

impl TickerBoxes {
    /// Uses the highlighted month, or the last month when nothing is
    /// highlighted or the index is out of range.
    #[must_use]
    pub fn for_highlight(series: &TimeSeries, highlighted: Option<usize>) -> Option<Self> {
        let point = highlighted
            .and_then(|index| series.points().get(index))
            .or_else(|| series.last())?;
        Some(Self {
            strategy: growth_text(point.value_end),
            benchmark: point.benchmark_value_end.map(growth_text),
        })
    }
}

/// Index of the month whose values the ticker boxes should show.
#[must_use]
pub fn highlighted_index(bars: &[Bar], target: HitTarget) -> Option<usize> {
    match target {
        HitTarget::Point(index) => Some(index),
        HitTarget::Bar(index) => bars.get(index).map(|bar| bar.last_index),
    }
}

fn period_label(date: NaiveDate) -> String {
    date.format(PERIOD_LABEL_FORMAT).to_string()
}

fn percent_text(fraction: Option<f64>) -> String {
    match fraction {
        Some(value) if value.is_finite() => format!("{:.3}%", value * 100.0),
        _ => MISSING_RETURN_TEXT.to_owned(),
    }
}

fn growth_text(value_end: f64) -> String {
    format!("{:.0}%", value_end * 100.0)
}

fn holding_line(label: String, contribution: f64) -> HoldingLine {
    HoldingLine {
        label,
        contribution,
        return_text: percent_text(Some(contribution)),
    }
}
