//! Overlay drawing with explicit, immutable style values.
//!
//! Every draw call receives its style by reference; surfaces keep no
//! "current style" state between calls.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PointShape {
    #[default]
    Circle,
    Cross,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub color: Rgb,
    /// Marker diameter in pixels.
    pub size: f32,
    #[serde(default)]
    pub shape: PointShape,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Rgb,
    pub font_size: f32,
}

/// Styles used to draw detected corners, reprojected corners and the axis tripod.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    pub detected: PointStyle,
    pub reprojected: PointStyle,
    pub origin: PointStyle,
    pub x_axis: LineStyle,
    pub y_axis: LineStyle,
    pub z_axis: LineStyle,
    pub label: TextStyle,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            detected: PointStyle {
                color: Rgb::CYAN,
                size: 6.0,
                shape: PointShape::Circle,
            },
            reprojected: PointStyle {
                color: Rgb::YELLOW,
                size: 6.0,
                shape: PointShape::Cross,
            },
            origin: PointStyle {
                color: Rgb::WHITE,
                size: 10.0,
                shape: PointShape::Square,
            },
            x_axis: LineStyle {
                color: Rgb::RED,
                width: 3.0,
            },
            y_axis: LineStyle {
                color: Rgb::GREEN,
                width: 3.0,
            },
            z_axis: LineStyle {
                color: Rgb::BLUE,
                width: 3.0,
            },
            label: TextStyle {
                color: Rgb::WHITE,
                font_size: 18.0,
            },
        }
    }
}

/// A rendering target for overlays in pixel coordinates.
pub trait OverlaySurface {
    fn draw_points(&mut self, points: &[Point2<f64>], style: &PointStyle);
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, style: &LineStyle);
    fn draw_text(&mut self, at: Point2<f64>, text: &str, style: &TextStyle);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Points {
        points: Vec<Point2<f64>>,
        style: PointStyle,
    },
    Line {
        from: Point2<f64>,
        to: Point2<f64>,
        style: LineStyle,
    },
    Text {
        at: Point2<f64>,
        text: String,
        style: TextStyle,
    },
}

/// Surface that records draw calls in order, for reports and tests.
#[derive(Clone, Debug, Default)]
pub struct OverlayRecorder {
    commands: Vec<DrawCommand>,
}

impl OverlayRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl OverlaySurface for OverlayRecorder {
    fn draw_points(&mut self, points: &[Point2<f64>], style: &PointStyle) {
        self.commands.push(DrawCommand::Points {
            points: points.to_vec(),
            style: *style,
        });
    }

    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, style: &LineStyle) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            style: *style,
        });
    }

    fn draw_text(&mut self, at: Point2<f64>, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            style: *style,
        });
    }
}

/// Draw the projected tripod `[origin, x, y, z]`: three segments, their tip
/// labels and the origin marker.
pub fn draw_axes<S: OverlaySurface + ?Sized>(
    surface: &mut S,
    axes: &[Point2<f64>; 4],
    style: &AxisStyle,
) {
    let [origin, x, y, z] = *axes;
    for (tip, line, label) in [
        (x, &style.x_axis, "X"),
        (y, &style.y_axis, "Y"),
        (z, &style.z_axis, "Z"),
    ] {
        surface.draw_line(origin, tip, line);
        surface.draw_text(tip, label, &style.label);
    }
    surface.draw_points(&[origin], &style.origin);
}
