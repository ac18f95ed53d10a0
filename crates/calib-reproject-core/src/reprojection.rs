//! Reprojection residual statistics.

use crate::{CameraProjectionModel, ProjectionError};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Pixel-distance statistics between observed and predicted points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReprojectionStats {
    pub count: usize,
    /// Root-mean-square of the per-point Euclidean distance.
    pub rms: f64,
    pub mean: f64,
    pub max: f64,
}

impl ReprojectionStats {
    /// Compare paired sequences. Empty input gives all-zero stats.
    pub fn from_pairs(
        observed: &[Point2<f64>],
        predicted: &[Point2<f64>],
    ) -> Result<Self, ProjectionError> {
        if observed.len() != predicted.len() {
            return Err(ProjectionError::LengthMismatch {
                expected: observed.len(),
                got: predicted.len(),
            });
        }
        if observed.is_empty() {
            return Ok(Self::default());
        }

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut max = 0.0_f64;
        for (o, p) in observed.iter().zip(predicted) {
            let d = (o - p).norm();
            sum += d;
            sum_sq += d * d;
            max = max.max(d);
        }
        let n = observed.len() as f64;
        Ok(Self {
            count: observed.len(),
            rms: (sum_sq / n).sqrt(),
            mean: sum / n,
            max,
        })
    }
}

impl CameraProjectionModel {
    /// Project `world` and compare against `observed` pixel positions.
    pub fn reprojection_stats(
        &self,
        world: &[Point3<f64>],
        observed: &[Point2<f64>],
    ) -> Result<ReprojectionStats, ProjectionError> {
        if world.len() != observed.len() {
            return Err(ProjectionError::LengthMismatch {
                expected: observed.len(),
                got: world.len(),
            });
        }
        let predicted = self.project_world_points(world)?;
        ReprojectionStats::from_pairs(observed, &predicted)
    }
}
