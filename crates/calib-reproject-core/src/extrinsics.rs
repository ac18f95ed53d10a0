use crate::ProjectionError;
use nalgebra::{Matrix3, Point3, Quaternion, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Tolerance for the orthonormality checks on a rotation matrix.
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

/// World-to-camera rigid transform: `p_cam = R * p_world + t`.
///
/// Serialized as a row-major `rotation: [[f64; 3]; 3]` plus `translation: [f64; 3]`;
/// deserialization runs the same validation as [`CameraExtrinsics::new`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "ExtrinsicsRepr", try_from = "ExtrinsicsRepr")]
pub struct CameraExtrinsics {
    rotation: Matrix3<f64>,
    translation: Vector3<f64>,
}

impl CameraExtrinsics {
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Result<Self, ProjectionError> {
        let ext = Self {
            rotation,
            translation,
        };
        ext.validate()?;
        Ok(ext)
    }

    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// From a Rodrigues rotation vector (axis scaled by angle in radians).
    pub fn from_axis_angle(
        rvec: Vector3<f64>,
        translation: Vector3<f64>,
    ) -> Result<Self, ProjectionError> {
        if !rvec.iter().all(|v| v.is_finite()) {
            return Err(ProjectionError::invalid("rotation vector must be finite"));
        }
        Self::new(
            Rotation3::from_scaled_axis(rvec).into_inner(),
            translation,
        )
    }

    /// From a quaternion `(w, x, y, z)`.
    ///
    /// `|q|` must be within [`ORTHONORMAL_TOLERANCE`] of 1; the residual is
    /// normalized away before building `R`.
    pub fn from_quaternion(
        w: f64,
        x: f64,
        y: f64,
        z: f64,
        translation: Vector3<f64>,
    ) -> Result<Self, ProjectionError> {
        let q = Quaternion::new(w, x, y, z);
        let norm = q.norm();
        if !norm.is_finite() || (norm - 1.0).abs() > ORTHONORMAL_TOLERANCE {
            return Err(ProjectionError::invalid(format!(
                "quaternion must be unit-norm (|q| = {norm})"
            )));
        }
        let rotation = UnitQuaternion::from_quaternion(q)
            .to_rotation_matrix()
            .into_inner();
        Self::new(rotation, translation)
    }

    pub fn from_rows(rows: [[f64; 3]; 3], translation: [f64; 3]) -> Result<Self, ProjectionError> {
        let rotation = Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]);
        Self::new(rotation, Vector3::from(translation))
    }

    pub fn rotation_rows(&self) -> [[f64; 3]; 3] {
        let r = &self.rotation;
        [
            [r[(0, 0)], r[(0, 1)], r[(0, 2)]],
            [r[(1, 0)], r[(1, 1)], r[(1, 2)]],
            [r[(2, 0)], r[(2, 1)], r[(2, 2)]],
        ]
    }

    #[inline]
    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    #[inline]
    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }

    /// Check finiteness, `det(R) = 1` and `R * R^T = I` within [`ORTHONORMAL_TOLERANCE`].
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if !self
            .rotation
            .iter()
            .chain(self.translation.iter())
            .all(|v| v.is_finite())
        {
            return Err(ProjectionError::invalid("extrinsics must be finite"));
        }

        let det = self.rotation.determinant();
        if (det - 1.0).abs() > ORTHONORMAL_TOLERANCE {
            return Err(ProjectionError::invalid(format!(
                "rotation determinant must be 1 (got {det})"
            )));
        }

        let deviation = (self.rotation * self.rotation.transpose() - Matrix3::identity()).amax();
        if deviation > ORTHONORMAL_TOLERANCE {
            return Err(ProjectionError::invalid(format!(
                "rotation is not orthonormal (max |R*R^T - I| = {deviation:e})"
            )));
        }
        Ok(())
    }

    /// Map a world-frame point into the camera frame.
    #[inline]
    pub fn world_to_camera(&self, p_world: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * p_world.coords + self.translation)
    }

    /// Camera centre expressed in world coordinates: `-R^T t`.
    pub fn camera_center(&self) -> Point3<f64> {
        Point3::from(-(self.rotation.transpose() * self.translation))
    }
}

#[derive(Serialize, Deserialize)]
struct ExtrinsicsRepr {
    rotation: [[f64; 3]; 3],
    translation: [f64; 3],
}

impl From<CameraExtrinsics> for ExtrinsicsRepr {
    fn from(ext: CameraExtrinsics) -> Self {
        Self {
            rotation: ext.rotation_rows(),
            translation: [ext.translation.x, ext.translation.y, ext.translation.z],
        }
    }
}

impl TryFrom<ExtrinsicsRepr> for CameraExtrinsics {
    type Error = ProjectionError;

    fn try_from(repr: ExtrinsicsRepr) -> Result<Self, Self::Error> {
        CameraExtrinsics::from_rows(repr.rotation, repr.translation)
    }
}
