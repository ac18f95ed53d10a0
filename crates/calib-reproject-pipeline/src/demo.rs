//! Sequential reprojection run: detect -> estimate -> project -> draw.

use crate::{
    draw_axes, AxisStyle, CalibrationEstimate, CalibrationEstimator, CornerDetection,
    CornerDetector, DemoConfig, GrayImageView, OverlaySurface, ServiceError,
};
use calib_reproject_core::{
    axis_points, CameraProjectionModel, CoordinateFrame, PlanarTarget, ProjectionError,
    ReprojectionStats,
};
use nalgebra::{Point2, Point3};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("axis length must be finite and > 0 (got {0})")]
    InvalidAxisLength(f64),
}

/// Everything computed by one [`ReprojectionDemo::run`].
#[derive(Clone, Debug)]
pub struct ReprojectionOutcome {
    pub detection: CornerDetection,
    pub estimate: CalibrationEstimate,
    pub model: CameraProjectionModel,
    /// Model prediction for each detected corner, index-aligned with `detection`.
    pub corner_pixels: Vec<Point2<f64>>,
    pub corner_stats: ReprojectionStats,
    pub axis_world: [Point3<f64>; 4],
    pub axis_pixels: [Point2<f64>; 4],
}

/// Reprojection run settings.
#[derive(Clone, Debug)]
pub struct ReprojectionDemo {
    target: PlanarTarget,
    axis_length: f64,
    from: CoordinateFrame,
    to: CoordinateFrame,
    style: AxisStyle,
}

impl ReprojectionDemo {
    pub fn new(target: PlanarTarget) -> Result<Self, DemoError> {
        target.validate()?;
        Ok(Self {
            axis_length: target.default_axis_length(),
            target,
            from: CoordinateFrame::World,
            to: CoordinateFrame::Pixel,
            style: AxisStyle::default(),
        })
    }

    pub fn from_config(cfg: &DemoConfig) -> Result<Self, DemoError> {
        Ok(Self::new(cfg.target)?
            .with_axis_length(cfg.axis_length())?
            .with_frames(cfg.from_frame, cfg.to_frame)
            .with_style(cfg.style))
    }

    pub fn with_axis_length(mut self, length: f64) -> Result<Self, DemoError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(DemoError::InvalidAxisLength(length));
        }
        self.axis_length = length;
        Ok(self)
    }

    pub fn with_frames(mut self, from: CoordinateFrame, to: CoordinateFrame) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    pub fn target(&self) -> &PlanarTarget {
        &self.target
    }

    /// Run the pipeline on `image`, drawing overlays onto `surface`.
    ///
    /// Nothing is drawn unless every step succeeds.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image, detector, estimator, surface),
            fields(width = image.width, height = image.height)
        )
    )]
    pub fn run<D, E, S>(
        &self,
        image: &GrayImageView<'_>,
        detector: &D,
        estimator: &E,
        surface: &mut S,
    ) -> Result<ReprojectionOutcome, DemoError>
    where
        D: CornerDetector + ?Sized,
        E: CalibrationEstimator + ?Sized,
        S: OverlaySurface + ?Sized,
    {
        let detection = detector.detect(image)?;
        log::info!("detected {} corners", detection.len());

        let estimate = estimator.estimate(&detection, &self.target)?;
        log::info!(
            "calibration reprojection error: {:.4}px",
            estimate.reprojection_error
        );
        let model = estimate.model()?;

        let world = detection.world_points(&self.target)?;
        let corner_pixels = model.map_points(&world, self.from, self.to)?;
        let corner_stats = ReprojectionStats::from_pairs(detection.corners(), &corner_pixels)?;

        let axis_world = axis_points(self.axis_length);
        let projected = model.map_points(&axis_world, self.from, self.to)?;
        let axis_pixels = <[Point2<f64>; 4]>::try_from(projected).map_err(|v| {
            ProjectionError::LengthMismatch {
                expected: 4,
                got: v.len(),
            }
        })?;
        for (name, px) in ["origin", "x", "y", "z"].iter().zip(&axis_pixels) {
            log::info!("axis {name}: ({:.2}, {:.2})", px.x, px.y);
        }

        surface.draw_points(detection.corners(), &self.style.detected);
        surface.draw_points(&corner_pixels, &self.style.reprojected);
        draw_axes(surface, &axis_pixels, &self.style);

        Ok(ReprojectionOutcome {
            detection,
            estimate,
            model,
            corner_pixels,
            corner_stats,
            axis_world,
            axis_pixels,
        })
    }
}
