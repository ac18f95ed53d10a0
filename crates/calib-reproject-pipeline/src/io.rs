//! JSON configuration and report helpers for the reprojection demo.

use crate::{AxisStyle, CalibrationEstimate, DrawCommand, ReprojectionOutcome};
use calib_reproject_core::{CoordinateFrame, PlanarTarget, ReprojectionStats};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum DemoIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

const DEFAULT_REPORT_NAME: &str = "reproject_report.json";

fn default_from_frame() -> CoordinateFrame {
    CoordinateFrame::World
}

fn default_to_frame() -> CoordinateFrame {
    CoordinateFrame::Pixel
}

/// Configuration for one reprojection run.
///
/// Relative paths are resolved against the directory of the config file by
/// [`DemoConfig::resolve_paths`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub image_path: String,
    /// Recorded `CornerDetection` JSON.
    pub corners_path: String,
    /// Stored `StoredCalibration` JSON.
    pub calibration_path: String,
    pub target: PlanarTarget,
    /// Axis length in world units; defaults to three squares.
    #[serde(default)]
    pub axis_length: Option<f64>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default = "default_from_frame")]
    pub from_frame: CoordinateFrame,
    #[serde(default = "default_to_frame")]
    pub to_frame: CoordinateFrame,
    #[serde(default)]
    pub style: AxisStyle,
}

impl DemoConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DemoIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DemoIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    ///
    /// Without an explicit `output_path` this is `reproject_report.json`,
    /// placed in `base_dir` once [`DemoConfig::resolve_paths`] has run.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_NAME))
    }

    pub fn axis_length(&self) -> f64 {
        self.axis_length
            .unwrap_or_else(|| self.target.default_axis_length())
    }

    /// Rewrite relative file paths as `base_dir.join(path)`.
    ///
    /// A missing `output_path` becomes `base_dir/reproject_report.json`.
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        let resolve = |p: &mut String| {
            let path = Path::new(p.as_str());
            if path.is_relative() {
                *p = base_dir.join(path).to_string_lossy().into_owned();
            }
        };
        resolve(&mut self.image_path);
        resolve(&mut self.corners_path);
        resolve(&mut self.calibration_path);
        let out = self
            .output_path
            .get_or_insert_with(|| DEFAULT_REPORT_NAME.to_string());
        resolve(out);
    }
}

/// Result of a reprojection run, written as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoReport {
    pub image_path: String,
    pub config_path: String,
    pub target: PlanarTarget,
    #[serde(default)]
    pub image_size: Option<[usize; 2]>,
    #[serde(default)]
    pub num_corners: usize,
    #[serde(default)]
    pub calibration: Option<CalibrationEstimate>,
    /// Row-major camera matrix `K` of the scored calibration.
    #[serde(default)]
    pub camera_matrix: Option<[[f64; 3]; 3]>,
    /// Camera centre in world (board) coordinates.
    #[serde(default)]
    pub camera_center: Option<Point3<f64>>,
    #[serde(default)]
    pub corner_stats: Option<ReprojectionStats>,
    pub axis_world: Vec<Point3<f64>>,
    #[serde(default)]
    pub axis_pixels: Option<Vec<Point2<f64>>>,
    #[serde(default)]
    pub overlay: Vec<DrawCommand>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DemoReport {
    /// Build a base report from the input config.
    pub fn new(cfg: &DemoConfig, config_path: &Path) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            target: cfg.target,
            image_size: None,
            num_corners: 0,
            calibration: None,
            camera_matrix: None,
            camera_center: None,
            corner_stats: None,
            axis_world: calib_reproject_core::axis_points(cfg.axis_length()).to_vec(),
            axis_pixels: None,
            overlay: Vec::new(),
            error: None,
        }
    }

    /// Populate report fields from a successful run.
    pub fn set_outcome(&mut self, outcome: &ReprojectionOutcome, overlay: Vec<DrawCommand>) {
        self.num_corners = outcome.detection.len();
        self.calibration = Some(outcome.estimate);
        let k = outcome.model.intrinsics().k_matrix();
        self.camera_matrix = Some([
            [k[(0, 0)], k[(0, 1)], k[(0, 2)]],
            [k[(1, 0)], k[(1, 1)], k[(1, 2)]],
            [k[(2, 0)], k[(2, 1)], k[(2, 2)]],
        ]);
        self.camera_center = Some(outcome.model.extrinsics().camera_center());
        self.corner_stats = Some(outcome.corner_stats);
        self.axis_world = outcome.axis_world.to_vec();
        self.axis_pixels = Some(outcome.axis_pixels.to_vec());
        self.overlay = overlay;
        self.error = None;
    }

    /// Record a failure.
    pub fn set_error(&mut self, err: &dyn std::error::Error) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DemoIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DemoIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "image_path": "board.png",
        "corners_path": "corners.json",
        "calibration_path": "/abs/calibration.json",
        "target": { "inner_rows": 6, "inner_cols": 9, "square_size": 0.025 }
    }"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: DemoConfig = serde_json::from_str(MINIMAL).expect("parse");
        assert_eq!(cfg.from_frame, CoordinateFrame::World);
        assert_eq!(cfg.to_frame, CoordinateFrame::Pixel);
        assert_eq!(cfg.style, AxisStyle::default());
        assert_eq!(cfg.output_path(), PathBuf::from("reproject_report.json"));
        assert!((cfg.axis_length() - 0.075).abs() < 1e-12);
    }

    #[test]
    fn relative_paths_resolve_against_base_dir() {
        let mut cfg: DemoConfig = serde_json::from_str(MINIMAL).expect("parse");
        cfg.resolve_paths(Path::new("/data/run1"));
        assert_eq!(Path::new(&cfg.image_path), Path::new("/data/run1/board.png"));
        assert_eq!(
            Path::new(&cfg.corners_path),
            Path::new("/data/run1/corners.json")
        );
        assert_eq!(cfg.calibration_path, "/abs/calibration.json");
    }

    #[test]
    fn default_report_lands_next_to_config() {
        let mut cfg: DemoConfig = serde_json::from_str(MINIMAL).expect("parse");
        cfg.resolve_paths(Path::new("/data/run1"));
        assert_eq!(
            cfg.output_path(),
            Path::new("/data/run1/reproject_report.json")
        );
    }

    #[test]
    fn explicit_report_path_is_resolved_too() {
        let mut cfg: DemoConfig = serde_json::from_str(MINIMAL).expect("parse");
        cfg.output_path = Some("out/report.json".into());
        cfg.resolve_paths(Path::new("/data/run1"));
        assert_eq!(cfg.output_path(), Path::new("/data/run1/out/report.json"));
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cfg.json");
        let cfg: DemoConfig = serde_json::from_str(MINIMAL).expect("parse");
        cfg.write_json(&path).expect("write");
        let back = DemoConfig::load_json(&path).expect("load");
        assert_eq!(back.target, cfg.target);
        assert_eq!(back.image_path, cfg.image_path);
    }
}
