//! returns-chart: interactive monthly returns chart engine.
//!
//! Maps a monthly strategy series onto pixel space, merges months into
//! zoom-dependent bars, caches layouts across frames and resolves pointer
//! positions back to records. Drawing goes through the backend-agnostic
//! [`render::Renderer`] trait.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartEngine, ChartScene, SceneStatus, render_scene};
pub use error::{ChartError, ChartResult};
