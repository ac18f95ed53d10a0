use calib_reproject_core::{
    axis_points, BrownConrady, CameraExtrinsics, CameraIntrinsics, CameraProjectionModel,
    CoordinateFrame, PlanarTarget, ProjectionError,
};
use nalgebra::{Point2, Point3, Vector3};
use std::sync::Arc;
use std::thread;

fn tilted_model() -> CameraProjectionModel {
    let intrinsics = CameraIntrinsics::pinhole(920.0, 915.0, 640.0, 360.0).with_distortion(
        BrownConrady::from_coeffs(&[-0.21, 0.05, 0.0007, -0.0004, -0.003]).expect("coeffs"),
    );
    let extrinsics = CameraExtrinsics::from_axis_angle(
        Vector3::new(0.2, -0.15, 0.05),
        Vector3::new(-0.08, -0.06, 0.6),
    )
    .expect("extrinsics");
    CameraProjectionModel::new(intrinsics, extrinsics).expect("model")
}

fn board_points() -> Vec<Point3<f64>> {
    PlanarTarget::new(6, 9, 0.025)
        .expect("target")
        .world_points()
}

#[test]
fn output_matches_input_length_and_order() {
    let model = tilted_model();
    let pts = board_points();
    let px = model
        .map_points(&pts, CoordinateFrame::World, CoordinateFrame::Pixel)
        .expect("project");
    assert_eq!(px.len(), pts.len());
    for (i, p) in pts.iter().enumerate() {
        assert_eq!(px[i], model.project_world_point(p).expect("single"));
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    let model = tilted_model();
    let pts = board_points();
    let a = model
        .map_points(&pts, CoordinateFrame::World, CoordinateFrame::Pixel)
        .expect("first");
    let b = model
        .map_points(&pts, CoordinateFrame::World, CoordinateFrame::Pixel)
        .expect("second");
    let bits = |v: &[Point2<f64>]| -> Vec<(u64, u64)> {
        v.iter().map(|p| (p.x.to_bits(), p.y.to_bits())).collect()
    };
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn shared_model_projects_identically_across_threads() {
    let model = Arc::new(tilted_model());
    let pts = Arc::new(board_points());
    let expected = model
        .map_points(&pts, CoordinateFrame::World, CoordinateFrame::Pixel)
        .expect("project");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = Arc::clone(&model);
            let pts = Arc::clone(&pts);
            thread::spawn(move || {
                model
                    .map_points(&pts, CoordinateFrame::World, CoordinateFrame::Pixel)
                    .expect("project")
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().expect("thread"), expected);
    }
}

#[test]
fn empty_input_yields_empty_output() {
    let px = tilted_model()
        .map_points(&[], CoordinateFrame::World, CoordinateFrame::Pixel)
        .expect("project");
    assert!(px.is_empty());
}

#[test]
fn axis_behind_camera_fails_without_partial_output() {
    // Camera 0.5 units in front of the board, looking along +Z; the -Z axis tip
    // of length 1.0 ends up behind it.
    let model = CameraProjectionModel::new(
        CameraIntrinsics::pinhole(800.0, 800.0, 320.0, 240.0),
        CameraExtrinsics::new(nalgebra::Matrix3::identity(), Vector3::new(0.0, 0.0, 0.5))
            .expect("extrinsics"),
    )
    .expect("model");
    let res = model.map_points(&axis_points(1.0), CoordinateFrame::World, CoordinateFrame::Pixel);
    match res {
        Err(ProjectionError::DegenerateProjection { index, depth }) => {
            assert_eq!(index, 3);
            assert_eq!(depth, -0.5);
        }
        other => panic!("expected degenerate projection, got {other:?}"),
    }
}

#[test]
fn model_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CameraProjectionModel>();
}
