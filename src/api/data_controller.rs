use tracing::debug;

use crate::core::TimeSeries;
use crate::error::ChartResult;
use crate::render::Renderer;

use super::ChartEngine;
use super::hit_test::TooltipState;
use super::series_payload::{ValueBasis, parse_series_payload_with};

impl<R: Renderer> ChartEngine<R> {
    /// Replaces the whole series in place. The zoom transform is kept; the
    /// new series id forces a layout rebuild on the next frame.
    pub fn set_series(&mut self, series: TimeSeries) {
        debug!(
            previous = self.series.id().get(),
            series = series.id().get(),
            months = series.len(),
            "set series"
        );
        self.series = series;
        self.tooltip = TooltipState::Hidden;
    }

    /// Replaces the series as if the chart was constructed anew: transform,
    /// in-flight gestures and cached layout are all reset.
    pub fn remount(&mut self, series: TimeSeries) {
        debug!(
            series = series.id().get(),
            months = series.len(),
            "remount chart"
        );
        self.zoom.reset();
        self.gestures.cancel();
        self.layout = None;
        self.surface = None;
        self.series = series;
        self.tooltip = TooltipState::Hidden;
    }

    /// Parses a simulation payload and installs it with [`Self::set_series`].
    ///
    /// Returns the payload's configuration hash, when it carried one.
    pub fn load_payload(&mut self, input: &str, basis: ValueBasis) -> ChartResult<Option<String>> {
        let payload = parse_series_payload_with(input, basis)?;
        self.set_series(payload.series);
        Ok(payload.config_hash)
    }

    /// Drops the series, leaving the chart in its empty state.
    pub fn clear_series(&mut self) {
        self.set_series(TimeSeries::empty());
    }
}
