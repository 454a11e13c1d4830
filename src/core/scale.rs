use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Shared contract of the continuous domain↔pixel mappings.
///
/// Zoom rescaling only needs `invert` and the pixel range, so it is written
/// once against this trait and reused by the time and value axes.
pub trait ContinuousScale: Sized {
    fn forward(&self, value: f64) -> f64;
    fn invert(&self, pixel: f64) -> f64;
    fn domain(&self) -> (f64, f64);
    fn range(&self) -> (f64, f64);
    fn with_domain(&self, start: f64, end: f64) -> ChartResult<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        let (domain_start, domain_end) = domain;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        let (range_start, range_end) = range;
        if !range_start.is_finite() || !range_end.is_finite() || range_start == range_end {
            return Err(ChartError::InvalidData(
                "scale range must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }
}

impl ContinuousScale for LinearScale {
    fn forward(&self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    fn invert(&self, pixel: f64) -> f64 {
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    fn with_domain(&self, start: f64, end: f64) -> ChartResult<Self> {
        Self::new((start, end), self.range())
    }
}

/// Base-10 logarithmic mapping over a strictly positive domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    log_linear: LinearScale,
    domain_start: f64,
    domain_end: f64,
    /// Inputs at or below zero are mapped as this value instead.
    floor: f64,
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64), floor: f64) -> ChartResult<Self> {
        if !floor.is_finite() || floor <= 0.0 {
            return Err(ChartError::InvalidData(
                "log scale floor must be finite and > 0".to_owned(),
            ));
        }
        let (domain_start, domain_end) = domain;
        if !(domain_start > 0.0 && domain_end > 0.0) {
            return Err(ChartError::InvalidData(
                "log scale domain must be strictly positive".to_owned(),
            ));
        }
        let log_linear = LinearScale::new((domain_start.log10(), domain_end.log10()), range)?;
        Ok(Self {
            log_linear,
            domain_start,
            domain_end,
            floor,
        })
    }

    #[must_use]
    pub fn floor(&self) -> f64 {
        self.floor
    }
}

impl ContinuousScale for LogScale {
    fn forward(&self, value: f64) -> f64 {
        let value = if value > 0.0 { value } else { self.floor };
        self.log_linear.forward(value.log10())
    }

    fn invert(&self, pixel: f64) -> f64 {
        10f64.powf(self.log_linear.invert(pixel))
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    fn range(&self) -> (f64, f64) {
        self.log_linear.range()
    }

    fn with_domain(&self, start: f64, end: f64) -> ChartResult<Self> {
        Self::new((start, end), self.range(), self.floor)
    }
}
