use calib_reproject_core::{
    CameraExtrinsics, CameraIntrinsics, CameraProjectionModel, GridIndex, PlanarTarget,
};
use calib_reproject_pipeline::{
    CornerDetection, DemoConfig, DemoReport, GrayImage, OverlayRecorder, RecordedCorners,
    ReprojectionDemo, StoredCalibration,
};
use approx::assert_relative_eq;
use nalgebra::{Point2, Vector3};
use std::fs;
use std::path::Path;

fn write_inputs(dir: &Path, target: &PlanarTarget) -> StoredCalibration {
    let cal = StoredCalibration::new(
        CameraIntrinsics::pinhole(900.0, 900.0, 320.0, 240.0),
        CameraExtrinsics::from_axis_angle(
            Vector3::new(0.1, -0.05, 0.0),
            Vector3::new(-0.06, -0.04, 0.5),
        )
        .expect("extrinsics"),
    );
    cal.write_json(dir.join("calibration.json")).expect("write calibration");

    let model = CameraProjectionModel::new(cal.intrinsics, cal.extrinsics).expect("model");
    let indices: Vec<GridIndex> = (0..target.inner_rows as i32)
        .flat_map(|r| (0..target.inner_cols as i32).map(move |c| GridIndex::new(r, c)))
        .collect();
    let world: Vec<_> = indices.iter().map(|&i| target.world_point(i)).collect();
    // Half-pixel detector noise along x.
    let corners: Vec<Point2<f64>> = model
        .project_world_points(&world)
        .expect("project")
        .into_iter()
        .map(|p| Point2::new(p.x + 0.5, p.y))
        .collect();
    RecordedCorners::new(CornerDetection::new(corners, indices).expect("detection"))
        .write_json(dir.join("corners.json"))
        .expect("write corners");

    let cfg = format!(
        r#"{{
            "image_path": "board.png",
            "corners_path": "corners.json",
            "calibration_path": "calibration.json",
            "target": {{ "inner_rows": {}, "inner_cols": {}, "square_size": {} }},
            "output_path": "report.json"
        }}"#,
        target.inner_rows, target.inner_cols, target.square_size
    );
    fs::write(dir.join("config.json"), cfg).expect("write config");
    cal
}

#[test]
fn config_driven_run_writes_a_complete_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = PlanarTarget::new(4, 5, 0.02).expect("target");
    let cal = write_inputs(dir.path(), &target);

    let cfg_path = dir.path().join("config.json");
    let mut cfg = DemoConfig::load_json(&cfg_path).expect("config");
    cfg.resolve_paths(dir.path());

    let detector = RecordedCorners::load_json(&cfg.corners_path).expect("corners");
    let estimator = StoredCalibration::load_json(&cfg.calibration_path).expect("calibration");
    let demo = ReprojectionDemo::from_config(&cfg).expect("demo");
    let image = GrayImage::filled(640, 480, 200);
    let mut surface = OverlayRecorder::new();

    let outcome = demo
        .run(&image.view(), &detector, &estimator, &mut surface)
        .expect("run");
    assert_eq!(outcome.detection.len(), target.corner_count());
    assert!((outcome.estimate.reprojection_error - 0.5).abs() < 1e-9);
    assert!((outcome.corner_stats.max - 0.5).abs() < 1e-9);

    let mut report = DemoReport::new(&cfg, &cfg_path);
    report.set_outcome(&outcome, surface.into_commands());
    report.write_json(cfg.output_path()).expect("write report");

    let back = DemoReport::load_json(dir.path().join("report.json")).expect("load report");
    assert_eq!(back.num_corners, 20);
    assert_eq!(back.axis_pixels.as_ref().map(Vec::len), Some(4));
    assert_eq!(back.overlay.len(), 9);
    assert!(back.error.is_none());
    assert_eq!(
        back.camera_matrix,
        Some([[900.0, 0.0, 320.0], [0.0, 900.0, 240.0], [0.0, 0.0, 1.0]])
    );
    let center = back.camera_center.expect("camera center");
    assert_relative_eq!(center, cal.extrinsics.camera_center(), epsilon = 1e-12);
    // The board faces a camera sitting half a unit in front of it.
    assert!(center.z < 0.0);
}
