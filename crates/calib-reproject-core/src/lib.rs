//! Core camera model for world-to-pixel reprojection.
//!
//! This crate is purely geometric: pinhole intrinsics with optional
//! Brown-Conrady distortion, a validated world-to-camera pose, and the
//! [`CameraProjectionModel`] that maps world points to pixels. It does not
//! detect corners or estimate calibrations.
//!
//! ## Quickstart
//!
//! ```
//! use calib_reproject_core::{
//!     CameraExtrinsics, CameraIntrinsics, CameraProjectionModel, CoordinateFrame,
//! };
//! use nalgebra::{Point2, Point3};
//!
//! let model = CameraProjectionModel::new(
//!     CameraIntrinsics::pinhole(1000.0, 1000.0, 500.0, 500.0),
//!     CameraExtrinsics::identity(),
//! )?;
//! let px = model.map_points(
//!     &[Point3::new(1.0, 0.0, 10.0)],
//!     CoordinateFrame::World,
//!     CoordinateFrame::Pixel,
//! )?;
//! assert_eq!(px, vec![Point2::new(600.0, 500.0)]);
//! # Ok::<(), calib_reproject_core::ProjectionError>(())
//! ```

mod distortion;
mod error;
mod extrinsics;
mod frame;
mod intrinsics;
mod logger;
mod model;
mod reprojection;
mod target;

pub use distortion::BrownConrady;
pub use error::ProjectionError;
pub use extrinsics::{CameraExtrinsics, ORTHONORMAL_TOLERANCE};
pub use frame::{CoordinateFrame, FrameParseError};
pub use intrinsics::CameraIntrinsics;
pub use model::CameraProjectionModel;
pub use reprojection::ReprojectionStats;
pub use target::{axis_points, GridIndex, PlanarTarget};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
