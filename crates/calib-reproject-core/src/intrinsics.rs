use crate::{BrownConrady, ProjectionError};
use nalgebra::{Matrix3, Point2};
use serde::{Deserialize, Serialize};

/// Pinhole intrinsics with optional lens distortion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length in x (pixels).
    pub fx: f64,
    /// Focal length in y (pixels).
    pub fy: f64,
    /// Principal point x (pixels).
    pub cx: f64,
    /// Principal point y (pixels).
    pub cy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distortion: Option<BrownConrady>,
}

impl CameraIntrinsics {
    /// Distortion-free intrinsics.
    pub fn pinhole(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            distortion: None,
        }
    }

    pub fn with_distortion(mut self, distortion: BrownConrady) -> Self {
        self.distortion = Some(distortion);
        self
    }

    /// Check `fx > 0`, `fy > 0` and that every value is finite.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if ![self.fx, self.fy, self.cx, self.cy]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ProjectionError::invalid("intrinsics must be finite"));
        }
        if self.fx <= 0.0 || self.fy <= 0.0 {
            return Err(ProjectionError::invalid(format!(
                "focal lengths must be positive (fx={}, fy={})",
                self.fx, self.fy
            )));
        }
        if let Some(d) = &self.distortion {
            d.validate()?;
        }
        Ok(())
    }

    /// Distortion to apply, or `None` when absent or all-zero.
    #[inline]
    pub fn active_distortion(&self) -> Option<&BrownConrady> {
        self.distortion.as_ref().filter(|d| !d.is_identity())
    }

    /// The 3x3 camera matrix `K`.
    pub fn k_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    #[inline]
    pub fn normalized_to_pixel(&self, x: f64, y: f64) -> Point2<f64> {
        Point2::new(self.fx * x + self.cx, self.fy * y + self.cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_negative_focal_is_rejected() {
        for (fx, fy) in [(0.0, 500.0), (500.0, 0.0), (-1.0, 500.0), (500.0, -3.0)] {
            let k = CameraIntrinsics::pinhole(fx, fy, 320.0, 240.0);
            assert!(matches!(
                k.validate(),
                Err(ProjectionError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn non_finite_principal_point_is_rejected() {
        let k = CameraIntrinsics::pinhole(500.0, 500.0, f64::INFINITY, 240.0);
        assert!(k.validate().is_err());
    }

    #[test]
    fn zero_distortion_is_inactive() {
        let k = CameraIntrinsics::pinhole(500.0, 500.0, 320.0, 240.0)
            .with_distortion(BrownConrady::default());
        assert!(k.validate().is_ok());
        assert!(k.active_distortion().is_none());
    }

    #[test]
    fn k_matrix_layout() {
        let k = CameraIntrinsics::pinhole(800.0, 820.0, 640.0, 360.0).k_matrix();
        assert_eq!(k[(0, 0)], 800.0);
        assert_eq!(k[(1, 1)], 820.0);
        assert_eq!(k[(0, 2)], 640.0);
        assert_eq!(k[(1, 2)], 360.0);
        assert_eq!(k[(2, 2)], 1.0);
        assert_eq!(k[(0, 1)], 0.0);
    }

    #[test]
    fn distortion_field_is_optional_in_json() {
        let k: CameraIntrinsics =
            serde_json::from_str(r#"{"fx":1000.0,"fy":1000.0,"cx":500.0,"cy":500.0}"#)
                .expect("parse");
        assert_eq!(k, CameraIntrinsics::pinhole(1000.0, 1000.0, 500.0, 500.0));
    }
}
