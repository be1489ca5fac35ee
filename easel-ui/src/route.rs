//! Editor routes, share links and the home screen's "new canvas" flow.
//!
//! The editor lives at `/canvas/:id`; `?viewOnly=true` opens it read-only.

use easel_core::{CanvasId, Template};
use easel_persist::TemplateMarkerStore;
use thiserror::Error;
use tracing::info;

const CANVAS_PREFIX: &str = "/canvas/";
const VIEW_ONLY_PARAM: &str = "viewOnly";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("not a canvas route: {0}")]
    NotCanvasRoute(String),

    #[error("canvas route has no id")]
    MissingId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub canvas_id: CanvasId,
    pub view_only: bool,
}

impl Route {
    pub fn edit(canvas_id: CanvasId) -> Self {
        Self {
            canvas_id,
            view_only: false,
        }
    }

    pub fn view(canvas_id: CanvasId) -> Self {
        Self {
            canvas_id,
            view_only: true,
        }
    }

    /// Parse a path such as `/canvas/abc?viewOnly=true`. Only the exact
    /// value `true` enables view-only mode.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let raw_id = path
            .strip_prefix(CANVAS_PREFIX)
            .ok_or_else(|| RouteError::NotCanvasRoute(path.to_string()))?
            .trim_end_matches('/');
        if raw_id.contains('/') {
            return Err(RouteError::NotCanvasRoute(path.to_string()));
        }
        let canvas_id = CanvasId::parse(raw_id).ok_or(RouteError::MissingId)?;

        let view_only = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == VIEW_ONLY_PARAM && value == "true");

        Ok(Self {
            canvas_id,
            view_only,
        })
    }

    pub fn to_path(&self) -> String {
        if self.view_only {
            format!("{CANVAS_PREFIX}{}?{VIEW_ONLY_PARAM}=true", self.canvas_id)
        } else {
            format!("{CANVAS_PREFIX}{}", self.canvas_id)
        }
    }
}

/// The two links offered by the share dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub edit: String,
    pub view_only: String,
}

impl ShareLinks {
    pub fn new(base: &str, canvas_id: &CanvasId) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            edit: format!("{base}{}", Route::edit(canvas_id.clone()).to_path()),
            view_only: format!("{base}{}", Route::view(canvas_id.clone()).to_path()),
        }
    }
}

/// Start a blank canvas under a fresh id.
pub fn new_blank_canvas() -> Route {
    let id = CanvasId::generate();
    info!(canvas_id = %id, "new blank canvas");
    Route::edit(id)
}

/// Start a canvas from a template. The editor picks up the marker on entry.
pub fn new_from_template(markers: &TemplateMarkerStore, template: Template) -> Route {
    let id = CanvasId::generate();
    markers.mark(&id, template);
    info!(canvas_id = %id, template = template.id(), "new canvas from template");
    Route::edit(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_and_view_routes() {
        let route = Route::parse("/canvas/abc").unwrap();
        assert_eq!(route.canvas_id.as_str(), "abc");
        assert!(!route.view_only);

        let route = Route::parse("/canvas/abc?viewOnly=true").unwrap();
        assert!(route.view_only);

        let route = Route::parse("/canvas/abc?foo=1&viewOnly=false").unwrap();
        assert!(!route.view_only);
    }

    #[test]
    fn test_parse_rejects_other_paths() {
        assert_eq!(
            Route::parse("/home"),
            Err(RouteError::NotCanvasRoute("/home".into()))
        );
        assert_eq!(Route::parse("/canvas/"), Err(RouteError::MissingId));
        assert!(Route::parse("/canvas/a/b").is_err());
    }

    #[test]
    fn test_path_round_trips() {
        for path in ["/canvas/abc", "/canvas/abc?viewOnly=true"] {
            assert_eq!(Route::parse(path).unwrap().to_path(), path);
        }
    }

    #[test]
    fn test_share_links() {
        let id = CanvasId::parse("abc").unwrap();
        let links = ShareLinks::new("https://easel.app/", &id);
        assert_eq!(links.edit, "https://easel.app/canvas/abc");
        assert_eq!(links.view_only, "https://easel.app/canvas/abc?viewOnly=true");
    }

    #[test]
    fn test_home_flow() {
        let markers = TemplateMarkerStore::new();
        let blank = new_blank_canvas();
        assert!(!markers.contains(&blank.canvas_id));

        let route = new_from_template(&markers, Template::SocialPost);
        assert_ne!(route.canvas_id, blank.canvas_id);
        assert_eq!(markers.take(&route.canvas_id).as_deref(), Some("social-post"));
    }
}
