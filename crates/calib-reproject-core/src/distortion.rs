//! Brown-Conrady radial-tangential lens distortion.

use crate::ProjectionError;
use serde::{Deserialize, Serialize};

/// Radial-tangential distortion coefficients in OpenCV order `(k1, k2, p1, p2, k3)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrownConrady {
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    #[serde(default)]
    pub k3: f64,
}

impl BrownConrady {
    /// Build from an OpenCV-style coefficient vector of length 4 or 5.
    pub fn from_coeffs(coeffs: &[f64]) -> Result<Self, ProjectionError> {
        let k3 = match coeffs.len() {
            4 => 0.0,
            5 => coeffs[4],
            n => {
                return Err(ProjectionError::invalid(format!(
                    "expected 4 or 5 distortion coefficients, got {n}"
                )))
            }
        };
        let d = Self {
            k1: coeffs[0],
            k2: coeffs[1],
            p1: coeffs[2],
            p2: coeffs[3],
            k3,
        };
        d.validate()?;
        Ok(d)
    }

    pub fn to_coeffs(&self) -> [f64; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }

    /// `true` when every coefficient is exactly zero.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.to_coeffs().iter().all(|&c| c == 0.0)
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.to_coeffs().iter().all(|c| c.is_finite()) {
            Ok(())
        } else {
            Err(ProjectionError::invalid(
                "distortion coefficients must be finite",
            ))
        }
    }

    /// Distort normalized (perspective-divided) coordinates.
    #[inline]
    pub fn distort(&self, x: f64, y: f64) -> (f64, f64) {
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;
        (x * radial + x_tan, y * radial + y_tan)
    }
}
