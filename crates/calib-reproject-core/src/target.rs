//! Planar checkerboard target geometry in world coordinates.

use crate::ProjectionError;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Integer `(row, col)` index of an inner checkerboard corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: i32,
    pub col: i32,
}

impl GridIndex {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Checkerboard lying in the world plane `z = 0`.
///
/// `inner_rows`/`inner_cols` are **inner corner counts**, not square counts.
/// Corner `(row, col)` sits at `(col * square_size, row * square_size, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanarTarget {
    pub inner_rows: u32,
    pub inner_cols: u32,
    /// Side of one square in world units.
    pub square_size: f64,
}

impl PlanarTarget {
    pub fn new(inner_rows: u32, inner_cols: u32, square_size: f64) -> Result<Self, ProjectionError> {
        let target = Self {
            inner_rows,
            inner_cols,
            square_size,
        };
        target.validate()?;
        Ok(target)
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.inner_rows < 2 || self.inner_cols < 2 {
            return Err(ProjectionError::invalid(
                "target needs at least 2x2 inner corners",
            ));
        }
        if !self.square_size.is_finite() || self.square_size <= 0.0 {
            return Err(ProjectionError::invalid("square_size must be > 0"));
        }
        Ok(())
    }

    #[inline]
    pub fn corner_count(&self) -> usize {
        self.inner_rows as usize * self.inner_cols as usize
    }

    #[inline]
    pub fn contains(&self, idx: GridIndex) -> bool {
        idx.row >= 0
            && idx.col >= 0
            && (idx.row as u32) < self.inner_rows
            && (idx.col as u32) < self.inner_cols
    }

    #[inline]
    pub fn world_point(&self, idx: GridIndex) -> Point3<f64> {
        Point3::new(
            idx.col as f64 * self.square_size,
            idx.row as f64 * self.square_size,
            0.0,
        )
    }

    /// All inner corners in row-major order.
    pub fn world_points(&self) -> Vec<Point3<f64>> {
        (0..self.inner_rows as i32)
            .flat_map(|row| (0..self.inner_cols as i32).map(move |col| GridIndex::new(row, col)))
            .map(|idx| self.world_point(idx))
            .collect()
    }

    /// Default axis length used by the overlay: three squares.
    #[inline]
    pub fn default_axis_length(&self) -> f64 {
        3.0 * self.square_size
    }
}

/// Board-frame axis tripod `[origin, +X, +Y, -Z]` scaled by `length`.
///
/// `-Z` points off the board toward a camera looking at its front face.
pub fn axis_points(length: f64) -> [Point3<f64>; 4] {
    [
        Point3::origin(),
        Point3::new(length, 0.0, 0.0),
        Point3::new(0.0, length, 0.0),
        Point3::new(0.0, 0.0, -length),
    ]
}
