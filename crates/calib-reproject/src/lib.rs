//! High-level facade for the `calib-reproject-*` workspace.
//!
//! This crate provides:
//! - re-exports of the projection core and the pipeline seams
//! - (feature `image`) helpers that load an image from disk and run a
//!   config-driven reprojection end-to-end
//! - (feature `cli`) the `calib-reproject` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use calib_reproject::load;
//! use calib_reproject::pipeline::DemoConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let path = Path::new("run/config.json");
//! let mut cfg = DemoConfig::load_json(path)?;
//! cfg.resolve_paths(path.parent().unwrap_or(Path::new(".")));
//! let (report, _outcome) = load::run_config(&cfg, path)?;
//! println!("axis pixels: {:?}", report.axis_pixels);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `calib_reproject::core`: camera parameters, `CameraProjectionModel`,
//!   planar target geometry, reprojection statistics.
//! - `calib_reproject::pipeline`: detector / estimator traits, overlay
//!   styles, JSON config and report, `ReprojectionDemo`.
//! - `calib_reproject::load` (feature `image`): `image`-crate adapters.

pub use calib_reproject_core as core;
pub use calib_reproject_pipeline as pipeline;
pub use nalgebra;

pub use calib_reproject_core::{
    BrownConrady, CameraExtrinsics, CameraIntrinsics, CameraProjectionModel, CoordinateFrame,
    PlanarTarget, ProjectionError,
};

#[cfg(feature = "image")]
pub mod load;
