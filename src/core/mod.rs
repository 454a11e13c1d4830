pub mod primitives;
pub mod scale;
pub mod series;
pub mod time_scale;
pub mod transform;
pub mod types;
pub mod value_scale;

pub use scale::{ContinuousScale, LinearScale, LogScale};
pub use series::{Holding, SeriesId, TimeSeries, TimeSeriesPoint};
pub use time_scale::{TimeScale, build_x_scale};
pub use transform::{ZoomTransform, ZoomableScale, apply_zoom};
pub use types::{Margin, PlotRect, ViewportConfig};
pub use value_scale::{
    DomainRepair, ValueDomainPadding, ValueScale, ValueScaleTuning, build_y_scale,
};
