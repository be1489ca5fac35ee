// Toolbar tools for the canvas editor.

use crate::editor::Canvas;
use easel_core::{Font, ObjectId, Shape, Style};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Where the toolbar drops new objects.
pub const DEFAULT_INSERT_POSITION: (f64, f64) = (100.0, 100.0);

pub trait Tool {
    /// Place this tool's object at `(x, y)`. Returns the new object, if any.
    fn apply(&self, canvas: &mut Canvas, x: f64, y: f64) -> Option<ObjectId>;

    fn name(&self) -> &str;

    fn cursor_size(&self) -> u32 {
        1
    }
}

/// The tool currently active in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Text,
    Pen,
}

impl ToolKind {
    pub fn is_drawing(&self) -> bool {
        matches!(self, ToolKind::Pen)
    }
}

#[derive(Debug, Clone)]
pub struct RectangleTool {
    pub width: f64,
    pub height: f64,
    pub style: Style,
}

impl Default for RectangleTool {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 80.0,
            style: Style::filled("#3498db").stroked("#2980b9", 2.0),
        }
    }
}

impl Tool for RectangleTool {
    fn apply(&self, canvas: &mut Canvas, x: f64, y: f64) -> Option<ObjectId> {
        trace!("Placing {}x{} rectangle at ({}, {})", self.width, self.height, x, y);
        Some(canvas.add(Shape::rect(x, y, self.width, self.height, self.style.clone())))
    }

    fn name(&self) -> &str {
        "Rectangle"
    }
}

#[derive(Debug, Clone)]
pub struct CircleTool {
    pub radius: f64,
    pub style: Style,
}

impl Default for CircleTool {
    fn default() -> Self {
        Self {
            radius: 50.0,
            style: Style::filled("#e74c3c").stroked("#c0392b", 2.0),
        }
    }
}

impl Tool for CircleTool {
    fn apply(&self, canvas: &mut Canvas, x: f64, y: f64) -> Option<ObjectId> {
        trace!("Placing circle r={} at ({}, {})", self.radius, x, y);
        Some(canvas.add(Shape::circle(x, y, self.radius, self.style.clone())))
    }

    fn name(&self) -> &str {
        "Circle"
    }
}

#[derive(Debug, Clone)]
pub struct TextTool {
    pub text: String,
    pub font: Font,
    pub fill: String,
}

impl Default for TextTool {
    fn default() -> Self {
        Self {
            text: "Click to edit".into(),
            font: Font::sized(24.0).family("Arial"),
            fill: "#333".into(),
        }
    }
}

impl Tool for TextTool {
    fn apply(&self, canvas: &mut Canvas, x: f64, y: f64) -> Option<ObjectId> {
        trace!("Placing text at ({}, {})", x, y);
        Some(canvas.add(Shape::itext(
            self.text.clone(),
            x,
            y,
            self.font.clone(),
            self.fill.clone(),
        )))
    }

    fn name(&self) -> &str {
        "Text"
    }
}

/// Free-drawing pen. Strokes are committed whole, as one path object.
#[derive(Debug, Clone)]
pub struct Brush {
    pub width: f64,
    pub color: String,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(3.0, "#2c3e50")
    }
}

impl Brush {
    pub fn new(width: f64, color: impl Into<String>) -> Self {
        Self {
            width,
            color: color.into(),
        }
    }

    /// Commit a finished stroke. Strokes with fewer than two points are dropped.
    pub fn stroke(&self, canvas: &mut Canvas, points: Vec<[f64; 2]>) -> Option<ObjectId> {
        if points.len() < 2 {
            debug!("Ignoring stroke with {} points", points.len());
            return None;
        }
        debug!("Brush stroke with {} points", points.len());
        Some(canvas.add(Shape::path(points, self.color.clone(), self.width)))
    }
}

impl Tool for Brush {
    // A single click leaves a dot
    fn apply(&self, canvas: &mut Canvas, x: f64, y: f64) -> Option<ObjectId> {
        self.stroke(canvas, vec![[x, y], [x, y]])
    }

    fn name(&self) -> &str {
        "Pen"
    }

    fn cursor_size(&self) -> u32 {
        self.width.round().max(1.0) as u32
    }
}

/// Round a shape's position to the nearest grid line. Returns true if it moved.
pub fn snap_to_grid(shape: &mut Shape, grid: f64) -> bool {
    if !(grid.is_finite() && grid > 0.0) {
        return false;
    }
    let left = (shape.left / grid).round() * grid;
    let top = (shape.top / grid).round() * grid;
    let moved = left != shape.left || top != shape.top;
    shape.left = left;
    shape.top = top;
    moved
}
