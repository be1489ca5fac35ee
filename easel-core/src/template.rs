//! Predefined starting layouts for new canvases.
//!
//! Each template is a fixed list of shapes and text with literal positions
//! and colours. The set is closed; unknown ids resolve to `Blank`.

use serde::{Deserialize, Serialize};

use crate::{Font, Shape, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    Blank,
    BusinessCard,
    Presentation,
    SocialPost,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::Blank,
        Template::BusinessCard,
        Template::Presentation,
        Template::SocialPost,
    ];

    /// Stable id used in template markers.
    pub fn id(&self) -> &'static str {
        match self {
            Template::Blank => "blank",
            Template::BusinessCard => "business-card",
            Template::Presentation => "presentation",
            Template::SocialPost => "social-post",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Template::Blank => "Blank Canvas",
            Template::BusinessCard => "Business Card",
            Template::Presentation => "Presentation Slide",
            Template::SocialPost => "Social Media Post",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::Blank => "Start with a clean canvas",
            Template::BusinessCard => "Professional business card layout",
            Template::Presentation => "Clean presentation slide template",
            Template::SocialPost => "Square social media post design",
        }
    }

    pub fn from_id(id: &str) -> Option<Template> {
        Template::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Resolve a marker value, treating unknown ids as a blank canvas.
    pub fn resolve(id: &str) -> Template {
        match Template::from_id(id) {
            Some(template) => template,
            None => {
                tracing::warn!(template_id = %id, "unknown template, using blank canvas");
                Template::Blank
            }
        }
    }

    /// The template's objects in paint order. Every call yields fresh object ids.
    pub fn shapes(&self) -> Vec<Shape> {
        match self {
            Template::Blank => Vec::new(),
            Template::BusinessCard => business_card(),
            Template::Presentation => presentation(),
            Template::SocialPost => social_post(),
        }
    }
}

fn business_card() -> Vec<Shape> {
    vec![
        Shape::rect(
            50.0,
            50.0,
            300.0,
            180.0,
            Style::filled("#f0f0f0").stroked("#ccc", 2.0),
        ),
        Shape::textbox("Your Name", 70.0, 80.0, 200.0, Font::sized(24.0).bold(), "#333"),
        Shape::textbox("Your Title", 70.0, 120.0, 200.0, Font::sized(16.0), "#666"),
        Shape::textbox(
            "contact@email.com",
            70.0,
            160.0,
            200.0,
            Font::sized(14.0),
            "#888",
        ),
    ]
}

fn presentation() -> Vec<Shape> {
    vec![
        Shape::rect(
            20.0,
            20.0,
            760.0,
            560.0,
            Style::filled("#ffffff").stroked("#ddd", 1.0),
        ),
        Shape::textbox(
            "Presentation Title",
            50.0,
            50.0,
            700.0,
            Font::sized(36.0).bold().centered(),
            "#2c3e50",
        ),
        Shape::rect(
            50.0,
            150.0,
            700.0,
            300.0,
            Style::filled("#ecf0f1").stroked("#bdc3c7", 1.0),
        ),
        Shape::textbox(
            "Content goes here...",
            70.0,
            280.0,
            660.0,
            Font::sized(18.0).centered(),
            "#34495e",
        ),
    ]
}

fn social_post() -> Vec<Shape> {
    vec![
        Shape::rounded_rect(100.0, 100.0, 400.0, 400.0, 20.0, Style::filled("#3498db")),
        Shape::circle(
            250.0,
            150.0,
            40.0,
            Style::filled("#ffffff").with_opacity(0.8),
        ),
        Shape::textbox(
            "Your Message",
            150.0,
            250.0,
            300.0,
            Font::sized(24.0).bold().centered(),
            "#ffffff",
        ),
    ]
}
