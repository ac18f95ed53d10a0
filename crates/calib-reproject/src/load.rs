use crate::pipeline::{
    DemoConfig, DemoError, DemoIoError, DemoReport, GrayImageView, OverlayRecorder,
    RecordedCorners, ReprojectionDemo, ReprojectionOutcome, ServiceError, StoredCalibration,
};
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the image-backed helpers.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },

    #[error("failed to open image: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] ::image::ImageError),
}

/// Errors from a config-driven run.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] DemoIoError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Demo(#[from] DemoError),
}

/// Convert an `image::GrayImage` into the pipeline view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Open and decode an image file as 8-bit grayscale.
pub fn load_gray(path: impl AsRef<Path>) -> Result<::image::GrayImage, LoadError> {
    Ok(::image::ImageReader::open(path)?.decode()?.to_luma8())
}

/// Build an `image::GrayImage` from a raw grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::GrayImage, LoadError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(LoadError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h) else {
        return Err(LoadError::InvalidGrayDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(LoadError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    ::image::GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(LoadError::InvalidGrayDimensions { width, height })
}

/// Run the reprojection described by `cfg`: load the image, replay the
/// recorded corners, score the stored calibration and project the axes.
///
/// Paths in `cfg` are used as-is; call [`DemoConfig::resolve_paths`] first
/// for config-relative paths.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(cfg), fields(image = %cfg.image_path))
)]
pub fn run_config(
    cfg: &DemoConfig,
    config_path: &Path,
) -> Result<(DemoReport, ReprojectionOutcome), RunError> {
    let img = load_gray(&cfg.image_path)?;
    log::info!(
        "loaded {} ({}x{})",
        cfg.image_path,
        img.width(),
        img.height()
    );
    let detector = RecordedCorners::load_json(&cfg.corners_path)?;
    let estimator = StoredCalibration::load_json(&cfg.calibration_path)?;
    let demo = ReprojectionDemo::from_config(cfg)?;

    let mut surface = OverlayRecorder::new();
    let outcome = demo.run(&gray_view(&img), &detector, &estimator, &mut surface)?;

    let mut report = DemoReport::new(cfg, config_path);
    report.image_size = Some([img.width() as usize, img.height() as usize]);
    report.set_outcome(&outcome, surface.into_commands());
    Ok((report, outcome))
}
