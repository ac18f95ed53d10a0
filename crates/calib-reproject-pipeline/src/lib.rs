//! Orchestration around the projection core.
//!
//! - [`CornerDetector`] / [`CalibrationEstimator`]: capability traits for the
//!   external vision backend, with file-backed implementations
//!   ([`RecordedCorners`], [`StoredCalibration`]).
//! - [`OverlaySurface`]: drawing sink taking immutable per-call styles;
//!   [`OverlayRecorder`] records the calls.
//! - [`ReprojectionDemo`]: detect, estimate, project the axis tripod and draw.
//! - [`DemoConfig`] / [`DemoReport`]: JSON config and report.

mod demo;
mod image;
mod io;
mod overlay;
mod recorded;
mod services;

pub use demo::{DemoError, ReprojectionDemo, ReprojectionOutcome};
pub use image::{GrayImage, GrayImageView};
pub use io::{DemoConfig, DemoIoError, DemoReport};
pub use overlay::{
    draw_axes, AxisStyle, DrawCommand, LineStyle, OverlayRecorder, OverlaySurface, PointShape,
    PointStyle, Rgb, TextStyle,
};
pub use recorded::{RecordedCorners, StoredCalibration};
pub use services::{
    CalibrationEstimate, CalibrationEstimator, CornerDetection, CornerDetector, ServiceError,
};
