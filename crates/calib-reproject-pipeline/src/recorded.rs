//! File-backed detector and estimator.
//!
//! `RecordedCorners` replays a corner detection saved by an external tool;
//! `StoredCalibration` loads a previously solved calibration and scores it
//! against the current detection.

use crate::{
    CalibrationEstimate, CalibrationEstimator, CornerDetection, CornerDetector, GrayImageView,
    ServiceError,
};
use calib_reproject_core::{
    CameraExtrinsics, CameraIntrinsics, CameraProjectionModel, PlanarTarget,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Corner detector that returns a fixed, pre-recorded detection.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCorners {
    detection: CornerDetection,
}

impl RecordedCorners {
    pub fn new(detection: CornerDetection) -> Self {
        Self { detection }
    }

    /// Load a `CornerDetection` from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&raw)?))
    }

    /// Write the recorded detection to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ServiceError> {
        let json = serde_json::to_string_pretty(&self.detection)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn detection(&self) -> &CornerDetection {
        &self.detection
    }
}

impl CornerDetector for RecordedCorners {
    /// Replays the recorded corners after checking they fit inside `image`.
    fn detect(&self, image: &GrayImageView<'_>) -> Result<CornerDetection, ServiceError> {
        if let Some((index, p)) = self
            .detection
            .corners()
            .iter()
            .enumerate()
            .find(|(_, p)| !image.contains(p.x, p.y))
        {
            return Err(ServiceError::CornerOutsideImage {
                index,
                x: p.x,
                y: p.y,
                width: image.width,
                height: image.height,
            });
        }
        log::debug!(
            "replaying {} recorded corners on {}x{} image",
            self.detection.len(),
            image.width,
            image.height
        );
        Ok(self.detection.clone())
    }
}

/// Calibration estimator that serves a stored intrinsics/extrinsics pair.
///
/// The reported reprojection error is the RMS pixel residual of the stored
/// model against the detection it is asked to explain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredCalibration {
    pub intrinsics: CameraIntrinsics,
    pub extrinsics: CameraExtrinsics,
}

impl StoredCalibration {
    pub fn new(intrinsics: CameraIntrinsics, extrinsics: CameraExtrinsics) -> Self {
        Self {
            intrinsics,
            extrinsics,
        }
    }

    /// Load from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ServiceError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl CalibrationEstimator for StoredCalibration {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, detection, target), fields(n = detection.len()))
    )]
    fn estimate(
        &self,
        detection: &CornerDetection,
        target: &PlanarTarget,
    ) -> Result<CalibrationEstimate, ServiceError> {
        if detection.is_empty() {
            return Err(ServiceError::NoCorners);
        }
        target.validate()?;
        let world = detection.world_points(target)?;

        let model = CameraProjectionModel::new(self.intrinsics, self.extrinsics)?;
        let stats = model.reprojection_stats(&world, detection.corners())?;
        log::info!(
            "stored calibration: rms={:.4}px max={:.4}px over {} corners",
            stats.rms,
            stats.max,
            stats.count
        );
        CalibrationEstimate::new(self.intrinsics, self.extrinsics, stats.rms)
    }
}
