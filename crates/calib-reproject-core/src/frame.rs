use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named coordinate frame a point sequence is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFrame {
    /// Board / scene coordinates.
    World,
    /// Camera-centred coordinates, z along the optical axis.
    Camera,
    /// Perspective-divided coordinates on the `z = 1` plane.
    Normalized,
    /// Image pixel coordinates.
    Pixel,
}

impl CoordinateFrame {
    pub const ALL: [CoordinateFrame; 4] = [
        CoordinateFrame::World,
        CoordinateFrame::Camera,
        CoordinateFrame::Normalized,
        CoordinateFrame::Pixel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoordinateFrame::World => "world",
            CoordinateFrame::Camera => "camera",
            CoordinateFrame::Normalized => "normalized",
            CoordinateFrame::Pixel => "pixel",
        }
    }
}

impl fmt::Display for CoordinateFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown coordinate frame '{0}'")]
pub struct FrameParseError(pub String);

impl FromStr for CoordinateFrame {
    type Err = FrameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        CoordinateFrame::ALL
            .into_iter()
            .find(|frame| frame.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FrameParseError(s.to_string()))
    }
}
