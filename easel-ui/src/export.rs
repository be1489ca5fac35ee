//! SVG export of a canvas.
//!
//! The document uses the canvas size as its viewBox and paints a background
//! rect first, then each object in paint order.

use std::fmt::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use easel_core::{CanvasId, FontWeight, Shape, ShapeKind, Style, TextAlign};
use tracing::debug;

use crate::editor::Canvas;

/// Download name offered for an exported canvas.
pub fn export_file_name(canvas_id: &CanvasId) -> String {
    format!("canvas-{canvas_id}.svg")
}

/// Export the canvas to an SVG string
pub fn export_svg(canvas: &Canvas) -> String {
    let mut output = String::new();
    // writing into a String cannot fail
    let _ = write_document(&mut output, canvas);
    debug!("Exported {} objects to SVG ({} bytes)", canvas.len(), output.len());
    output
}

/// Save SVG to a file
pub fn save_svg(canvas: &Canvas, path: &Path) -> Result<()> {
    std::fs::write(path, export_svg(canvas))
        .with_context(|| format!("Failed to write SVG to {}", path.display()))
}

fn write_document(output: &mut String, canvas: &Canvas) -> fmt::Result {
    let (width, height) = (canvas.width(), canvas.height());

    writeln!(
        output,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;
    writeln!(
        output,
        r#"  <rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
        escape_xml(canvas.background())
    )?;

    for shape in canvas.shapes() {
        render_shape(output, shape)?;
    }

    writeln!(output, "</svg>")
}

fn render_shape(output: &mut String, shape: &Shape) -> fmt::Result {
    let style = style_attrs(&shape.style);
    match &shape.kind {
        ShapeKind::Rect {
            width,
            height,
            rx,
            ry,
        } => writeln!(
            output,
            r#"  <rect x="{}" y="{}" width="{width}" height="{height}" rx="{rx}" ry="{ry}"{style}/>"#,
            shape.left, shape.top
        ),
        ShapeKind::Circle { radius } => writeln!(
            output,
            r#"  <circle cx="{}" cy="{}" r="{radius}"{style}/>"#,
            shape.left + radius,
            shape.top + radius
        ),
        ShapeKind::Textbox { text, width, font } => {
            // anchor follows alignment inside the box
            let (x, anchor) = match font.align {
                TextAlign::Left => (shape.left, "start"),
                TextAlign::Center => (shape.left + width / 2.0, "middle"),
                TextAlign::Right => (shape.left + width, "end"),
            };
            render_text(output, text, x, shape.top + font.size, anchor, font, &style)
        }
        ShapeKind::IText { text, font } => render_text(
            output,
            text,
            shape.left,
            shape.top + font.size,
            "start",
            font,
            &style,
        ),
        ShapeKind::Path { points } => {
            let mut d = String::new();
            for (i, [x, y]) in points.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                write!(d, "{}{cmd} {x} {y}", if i == 0 { "" } else { " " })?;
            }
            writeln!(output, r#"  <path d="{d}"{style}/>"#)
        }
    }
}

fn render_text(
    output: &mut String,
    text: &str,
    x: f64,
    baseline: f64,
    anchor: &str,
    font: &easel_core::Font,
    style: &str,
) -> fmt::Result {
    let weight = match font.weight {
        FontWeight::Normal => "normal",
        FontWeight::Bold => "bold",
    };
    writeln!(
        output,
        r#"  <text x="{x}" y="{baseline}" font-family="{}" font-size="{}" font-weight="{weight}" text-anchor="{anchor}"{style}>{}</text>"#,
        escape_xml(&font.family),
        font.size,
        escape_xml(text)
    )
}

fn style_attrs(style: &Style) -> String {
    let mut attrs = String::new();
    let fill = style.fill.as_deref().unwrap_or("none");
    let _ = write!(attrs, r#" fill="{}""#, escape_xml(fill));
    if let Some(stroke) = &style.stroke {
        let _ = write!(
            attrs,
            r#" stroke="{}" stroke-width="{}""#,
            escape_xml(stroke),
            style.stroke_width
        );
    }
    if style.opacity < 1.0 {
        let _ = write!(attrs, r#" opacity="{}""#, style.opacity);
    }
    attrs
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::Font;

    fn canvas() -> Canvas {
        Canvas::new(800, 600, "white").unwrap()
    }

    #[test]
    fn test_empty_canvas() {
        let svg = export_svg(&canvas());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
        assert!(svg.contains(r#"fill="white""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_shapes_in_paint_order() {
        let mut canvas = canvas();
        canvas.add(Shape::rect(
            100.0,
            100.0,
            100.0,
            80.0,
            Style::filled("#3498db").stroked("#2980b9", 2.0),
        ));
        canvas.add(Shape::circle(100.0, 100.0, 50.0, Style::filled("#e74c3c")));
        canvas.add(Shape::path(vec![[0.0, 0.0], [5.0, 5.0]], "#2c3e50", 3.0));

        let svg = export_svg(&canvas);
        let rect = svg.find(r#"<rect x="100""#).unwrap();
        let circle = svg.find(r#"<circle cx="150" cy="150" r="50""#).unwrap();
        let path = svg.find(r#"<path d="M 0 0 L 5 5""#).unwrap();
        assert!(rect < circle && circle < path);
        assert!(svg.contains(r##"stroke="#2980b9" stroke-width="2""##));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = canvas();
        canvas.add(Shape::itext(
            "Fish & <Chips>",
            10.0,
            10.0,
            Font::sized(24.0).family("Arial"),
            "#333",
        ));
        let svg = export_svg(&canvas);
        assert!(svg.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(svg.contains(r#"y="34""#));
    }

    #[test]
    fn test_save_svg_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name(&CanvasId::parse("abc").unwrap()));
        save_svg(&canvas(), &path).unwrap();
        assert!(path.ends_with("canvas-abc.svg"));
        assert!(std::fs::read_to_string(path).unwrap().contains("<svg"));
    }
}
