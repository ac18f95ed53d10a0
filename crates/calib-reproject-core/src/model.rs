//! World-to-pixel projection under a calibrated pinhole camera.
//!
//! The model is immutable after construction and `map_points` has no hidden
//! state, so one instance can be shared across threads by reference.
//!
//! Points that land on or behind the camera plane abort the whole call with
//! [`ProjectionError::DegenerateProjection`] carrying the index of the first
//! offending point. Partial output is never returned.

use crate::{CameraExtrinsics, CameraIntrinsics, CoordinateFrame, ProjectionError};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Calibrated camera: intrinsics (with optional distortion) plus world-to-camera pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "ModelRepr", try_from = "ModelRepr")]
pub struct CameraProjectionModel {
    intrinsics: CameraIntrinsics,
    extrinsics: CameraExtrinsics,
}

impl CameraProjectionModel {
    /// Validate both parameter sets and build the model.
    pub fn new(
        intrinsics: CameraIntrinsics,
        extrinsics: CameraExtrinsics,
    ) -> Result<Self, ProjectionError> {
        intrinsics.validate()?;
        extrinsics.validate()?;
        log::debug!(
            "camera model: fx={:.3} fy={:.3} cx={:.3} cy={:.3} distortion={}",
            intrinsics.fx,
            intrinsics.fy,
            intrinsics.cx,
            intrinsics.cy,
            intrinsics.active_distortion().is_some()
        );
        Ok(Self {
            intrinsics,
            extrinsics,
        })
    }

    #[inline]
    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    #[inline]
    pub fn extrinsics(&self) -> &CameraExtrinsics {
        &self.extrinsics
    }

    /// Map `points` from `from` into `to`, preserving length and order.
    ///
    /// Only `World -> Pixel` is supported.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, points), fields(n = points.len()))
    )]
    pub fn map_points(
        &self,
        points: &[Point3<f64>],
        from: CoordinateFrame,
        to: CoordinateFrame,
    ) -> Result<Vec<Point2<f64>>, ProjectionError> {
        match (from, to) {
            (CoordinateFrame::World, CoordinateFrame::Pixel) => self.project_world_points(points),
            _ => Err(ProjectionError::UnsupportedFrame { from, to }),
        }
    }

    /// Project a batch of world points to pixels.
    pub fn project_world_points(
        &self,
        points: &[Point3<f64>],
    ) -> Result<Vec<Point2<f64>>, ProjectionError> {
        points
            .iter()
            .enumerate()
            .map(|(index, p)| self.project_indexed(index, p))
            .collect()
    }

    /// Project a single world point to pixels.
    pub fn project_world_point(&self, p_world: &Point3<f64>) -> Result<Point2<f64>, ProjectionError> {
        self.project_indexed(0, p_world)
    }

    fn project_indexed(
        &self,
        index: usize,
        p_world: &Point3<f64>,
    ) -> Result<Point2<f64>, ProjectionError> {
        let p_cam = self.extrinsics.world_to_camera(p_world);
        // NaN depth fails this comparison as well.
        if !(p_cam.z > 0.0 && p_cam.z.is_finite()) {
            return Err(ProjectionError::DegenerateProjection {
                index,
                depth: p_cam.z,
            });
        }

        let x = p_cam.x / p_cam.z;
        let y = p_cam.y / p_cam.z;
        let (xd, yd) = match self.intrinsics.active_distortion() {
            Some(d) => d.distort(x, y),
            None => (x, y),
        };
        Ok(self.intrinsics.normalized_to_pixel(xd, yd))
    }
}

#[derive(Serialize, Deserialize)]
struct ModelRepr {
    intrinsics: CameraIntrinsics,
    extrinsics: CameraExtrinsics,
}

impl From<CameraProjectionModel> for ModelRepr {
    fn from(m: CameraProjectionModel) -> Self {
        Self {
            intrinsics: m.intrinsics,
            extrinsics: m.extrinsics,
        }
    }
}

impl TryFrom<ModelRepr> for CameraProjectionModel {
    type Error = ProjectionError;

    fn try_from(repr: ModelRepr) -> Result<Self, Self::Error> {
        CameraProjectionModel::new(repr.intrinsics, repr.extrinsics)
    }
}
