//! Scene objects: the shapes and text a user places on a canvas.
//!
//! Objects serialize to self-describing JSON (`"type": "rect"` etc.) so a
//! persisted record can carry them as opaque descriptors.

use serde::{Deserialize, Serialize};

use crate::ObjectId;

/// Horizontal alignment of text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Typography for text objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default = "default_font_family")]
    pub family: String,
    #[serde(default)]
    pub align: TextAlign,
}

fn default_font_family() -> String {
    "Times New Roman".into()
}

impl Font {
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            weight: FontWeight::Normal,
            family: default_font_family(),
            align: TextAlign::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }
}

/// What kind of object this is, with its kind-specific geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Rect {
        width: f64,
        height: f64,
        // corner radii
        #[serde(default)]
        rx: f64,
        #[serde(default)]
        ry: f64,
    },
    Circle {
        radius: f64,
    },
    /// Wrapping text with a fixed box width.
    Textbox {
        text: String,
        width: f64,
        font: Font,
    },
    /// Single-line text edited in place.
    IText {
        text: String,
        font: Font,
    },
    /// Free-drawn stroke, points relative to the canvas origin.
    Path {
        points: Vec<[f64; 2]>,
    },
}

impl ShapeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeKind::Rect { .. } => "rect",
            ShapeKind::Circle { .. } => "circle",
            ShapeKind::Textbox { .. } => "textbox",
            ShapeKind::IText { .. } => "i_text",
            ShapeKind::Path { .. } => "path",
        }
    }
}

/// Paint properties shared by every kind of object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }
}

impl Style {
    pub fn filled(fill: impl Into<String>) -> Self {
        Self {
            fill: Some(fill.into()),
            ..Self::default()
        }
    }

    pub fn stroked(mut self, stroke: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(stroke.into());
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// A single object placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default)]
    pub id: ObjectId,
    #[serde(flatten)]
    pub kind: ShapeKind,
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub style: Style,
    /// Locked objects cannot be moved, rotated, scaled or selected.
    #[serde(default)]
    pub locked: bool,
}

impl Shape {
    pub fn new(kind: ShapeKind, left: f64, top: f64, style: Style) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
            left,
            top,
            style,
            locked: false,
        }
    }

    pub fn rect(left: f64, top: f64, width: f64, height: f64, style: Style) -> Self {
        Self::new(
            ShapeKind::Rect {
                width,
                height,
                rx: 0.0,
                ry: 0.0,
            },
            left,
            top,
            style,
        )
    }

    pub fn rounded_rect(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        radius: f64,
        style: Style,
    ) -> Self {
        Self::new(
            ShapeKind::Rect {
                width,
                height,
                rx: radius,
                ry: radius,
            },
            left,
            top,
            style,
        )
    }

    pub fn circle(left: f64, top: f64, radius: f64, style: Style) -> Self {
        Self::new(ShapeKind::Circle { radius }, left, top, style)
    }

    pub fn textbox(
        text: impl Into<String>,
        left: f64,
        top: f64,
        width: f64,
        font: Font,
        fill: impl Into<String>,
    ) -> Self {
        Self::new(
            ShapeKind::Textbox {
                text: text.into(),
                width,
                font,
            },
            left,
            top,
            Style::filled(fill),
        )
    }

    pub fn itext(
        text: impl Into<String>,
        left: f64,
        top: f64,
        font: Font,
        fill: impl Into<String>,
    ) -> Self {
        Self::new(
            ShapeKind::IText {
                text: text.into(),
                font,
            },
            left,
            top,
            Style::filled(fill),
        )
    }

    pub fn path(points: Vec<[f64; 2]>, stroke: impl Into<String>, width: f64) -> Self {
        let (left, top) = points.iter().fold((f64::MAX, f64::MAX), |(l, t), p| {
            (l.min(p[0]), t.min(p[1]))
        });
        let (left, top) = if points.is_empty() {
            (0.0, 0.0)
        } else {
            (left, top)
        };
        Self::new(
            ShapeKind::Path { points },
            left,
            top,
            Style::default().stroked(stroke, width),
        )
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Axis-aligned bounds as `(left, top, width, height)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match &self.kind {
            ShapeKind::Rect { width, height, .. } => (self.left, self.top, *width, *height),
            ShapeKind::Circle { radius } => (self.left, self.top, radius * 2.0, radius * 2.0),
            ShapeKind::Textbox { width, font, .. } => (self.left, self.top, *width, font.size),
            ShapeKind::IText { text, font } => {
                // rough advance of half an em per glyph
                let width = text.chars().count() as f64 * font.size * 0.5;
                (self.left, self.top, width, font.size)
            }
            ShapeKind::Path { points } => {
                let max_x = points.iter().map(|p| p[0]).fold(self.left, f64::max);
                let max_y = points.iter().map(|p| p[1]).fold(self.top, f64::max);
                (self.left, self.top, max_x - self.left, max_y - self.top)
            }
        }
    }
}
