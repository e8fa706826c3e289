//! xyplot: axes, series and a plot model for 2D charts.
//!
//! Axes turn data values into screen coordinates and generate ticks; series
//! compute extents, draw through an abstract [`render::RenderContext`] and
//! answer nearest-point queries with the same transforms they render with.
//! [`model::PlotModel`] wires series to axes by key and runs the update,
//! layout and render passes; [`api::PlotEngine`] adds pointer interaction on
//! top of a [`render::Renderer`] backend.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod model;
pub mod render;
pub mod series;
pub mod telemetry;

pub use api::{PlotEngine, PlotEngineConfig};
pub use error::{PlotError, PlotResult};
pub use model::PlotModel;
