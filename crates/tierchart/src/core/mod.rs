//! Core building blocks shared by the chart pipeline
//!
//! Geometry types, configuration, errors, the measurement service seam,
//! logging, and the canvas primitives the ASCII preview draws with.

mod box_drawing;
mod canvas;
mod config;
mod edge_routing;
mod error;
pub mod logging;
mod measure;
mod text;
mod types;

pub use box_drawing::*;
pub use canvas::*;
pub use config::*;
pub use edge_routing::*;
pub use error::*;
pub use logging::*;
pub use measure::*;
pub use text::*;
pub use types::*;
