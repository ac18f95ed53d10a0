//! Seams for the external corner detector and calibration estimator.
//!
//! Any computer-vision backend can sit behind these traits; the projection
//! core only ever sees the resulting [`CalibrationEstimate`].

use crate::GrayImageView;
use calib_reproject_core::{
    CameraExtrinsics, CameraIntrinsics, CameraProjectionModel, GridIndex, PlanarTarget,
    ProjectionError,
};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Errors raised by detector / estimator implementations.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("corner and index sequences differ in length ({corners} corners, {indices} indices)")]
    IndexMismatch { corners: usize, indices: usize },
    #[error("no corners detected")]
    NoCorners,
    #[error("corner {index} at ({x:.2}, {y:.2}) lies outside the {width}x{height} image")]
    CornerOutsideImage {
        index: usize,
        x: f64,
        y: f64,
        width: usize,
        height: usize,
    },
    #[error("grid index ({row}, {col}) is outside the target")]
    IndexOutsideTarget { row: i32, col: i32 },
    #[error("reprojection error must be finite and non-negative (got {0})")]
    InvalidReprojectionError(f64),
}

/// Detected checkerboard corners with their parallel `(row, col)` indices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "DetectionRepr", try_from = "DetectionRepr")]
pub struct CornerDetection {
    corners: Vec<Point2<f64>>,
    indices: Vec<GridIndex>,
}

impl CornerDetection {
    pub fn new(corners: Vec<Point2<f64>>, indices: Vec<GridIndex>) -> Result<Self, ServiceError> {
        if corners.len() != indices.len() {
            return Err(ServiceError::IndexMismatch {
                corners: corners.len(),
                indices: indices.len(),
            });
        }
        Ok(Self { corners, indices })
    }

    #[inline]
    pub fn corners(&self) -> &[Point2<f64>] {
        &self.corners
    }

    #[inline]
    pub fn indices(&self) -> &[GridIndex] {
        &self.indices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// World positions of the detected corners on `target`.
    pub fn world_points(&self, target: &PlanarTarget) -> Result<Vec<Point3<f64>>, ServiceError> {
        self.indices
            .iter()
            .map(|&idx| {
                if target.contains(idx) {
                    Ok(target.world_point(idx))
                } else {
                    Err(ServiceError::IndexOutsideTarget {
                        row: idx.row,
                        col: idx.col,
                    })
                }
            })
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
struct DetectionRepr {
    corners: Vec<Point2<f64>>,
    indices: Vec<GridIndex>,
}

impl From<CornerDetection> for DetectionRepr {
    fn from(d: CornerDetection) -> Self {
        Self {
            corners: d.corners,
            indices: d.indices,
        }
    }
}

impl TryFrom<DetectionRepr> for CornerDetection {
    type Error = ServiceError;

    fn try_from(repr: DetectionRepr) -> Result<Self, Self::Error> {
        CornerDetection::new(repr.corners, repr.indices)
    }
}

/// Capability: find checkerboard corners in an image.
pub trait CornerDetector {
    fn detect(&self, image: &GrayImageView<'_>) -> Result<CornerDetection, ServiceError>;
}

/// Intrinsics + extrinsics with the reprojection RMS (pixels) they achieve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEstimate {
    pub intrinsics: CameraIntrinsics,
    pub extrinsics: CameraExtrinsics,
    pub reprojection_error: f64,
}

impl CalibrationEstimate {
    pub fn new(
        intrinsics: CameraIntrinsics,
        extrinsics: CameraExtrinsics,
        reprojection_error: f64,
    ) -> Result<Self, ServiceError> {
        if !reprojection_error.is_finite() || reprojection_error < 0.0 {
            return Err(ServiceError::InvalidReprojectionError(reprojection_error));
        }
        Ok(Self {
            intrinsics,
            extrinsics,
            reprojection_error,
        })
    }

    pub fn model(&self) -> Result<CameraProjectionModel, ProjectionError> {
        CameraProjectionModel::new(self.intrinsics, self.extrinsics)
    }
}

/// Capability: estimate a camera calibration from detected corners.
pub trait CalibrationEstimator {
    fn estimate(
        &self,
        detection: &CornerDetection,
        target: &PlanarTarget,
    ) -> Result<CalibrationEstimate, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_rejects_unequal_lengths() {
        let err = CornerDetection::new(vec![Point2::new(1.0, 2.0)], vec![]).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::IndexMismatch {
                corners: 1,
                indices: 0
            }
        ));
    }

    #[test]
    fn detection_json_is_validated() {
        let raw = r#"{"corners":[[1.0,2.0],[3.0,4.0]],"indices":[{"row":0,"col":0}]}"#;
        assert!(serde_json::from_str::<CornerDetection>(raw).is_err());

        let raw = r#"{"corners":[[1.0,2.0]],"indices":[{"row":0,"col":1}]}"#;
        let det: CornerDetection = serde_json::from_str(raw).expect("parse");
        assert_eq!(det.corners(), &[Point2::new(1.0, 2.0)]);
        assert_eq!(det.indices(), &[GridIndex::new(0, 1)]);
    }

    #[test]
    fn world_points_reject_foreign_indices() {
        let target = PlanarTarget::new(3, 3, 0.1).expect("target");
        let det = CornerDetection::new(
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
            vec![GridIndex::new(1, 2), GridIndex::new(3, 0)],
        )
        .expect("detection");
        assert!(matches!(
            det.world_points(&target),
            Err(ServiceError::IndexOutsideTarget { row: 3, col: 0 })
        ));
    }

    #[test]
    fn estimate_rejects_negative_error() {
        let res = CalibrationEstimate::new(
            CameraIntrinsics::pinhole(1.0, 1.0, 0.0, 0.0),
            CameraExtrinsics::identity(),
            -0.5,
        );
        assert!(matches!(res, Err(ServiceError::InvalidReprojectionError(_))));
    }
}
