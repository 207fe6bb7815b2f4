#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod animator;
pub mod bezier;
pub mod bounding_box;
pub mod config;
pub mod draw;
pub mod error;
pub mod marker;
pub mod path;
pub mod path_data;
pub mod presets;
pub mod proximity;
pub mod selection;
pub mod surface;
pub mod telemetry;

pub use crate::bezier::BezierCurve;
pub use crate::error::{Error, ParseError};
pub use crate::path::{Path, Sample};
pub use crate::telemetry::compute_telemetry;
