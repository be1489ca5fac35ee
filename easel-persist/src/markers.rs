//! One-shot template markers.
//!
//! The "new canvas from template" flow leaves a marker keyed by the new
//! canvas id; the editor consumes it on entry. Markers live only as long as
//! the store value (one browsing session) and are never persisted.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use easel_core::{CanvasId, Template};

/// Clones share the same markers.
#[derive(Debug, Clone, Default)]
pub struct TemplateMarkerStore {
    markers: Rc<RefCell<HashMap<String, String>>>,
}

impl TemplateMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_for(id: &CanvasId) -> String {
        format!("template_{id}")
    }

    pub fn mark(&self, id: &CanvasId, template: Template) {
        self.mark_raw(id, template.id());
    }

    /// Store an arbitrary template id, as an older client might.
    pub fn mark_raw(&self, id: &CanvasId, template_id: &str) {
        tracing::debug!(canvas_id = %id, template_id, "template marker set");
        self.markers
            .borrow_mut()
            .insert(Self::key_for(id), template_id.to_string());
    }

    /// Read and clear the marker for `id`.
    pub fn take(&self, id: &CanvasId) -> Option<String> {
        self.markers.borrow_mut().remove(&Self::key_for(id))
    }

    pub fn contains(&self, id: &CanvasId) -> bool {
        self.markers.borrow().contains_key(&Self::key_for(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_read_once() {
        let markers = TemplateMarkerStore::new();
        let id = CanvasId::parse("abc").unwrap();
        markers.mark(&id, Template::Presentation);

        assert!(markers.contains(&id));
        assert_eq!(markers.take(&id).as_deref(), Some("presentation"));
        assert_eq!(markers.take(&id), None);
    }

    #[test]
    fn test_markers_are_per_canvas() {
        let markers = TemplateMarkerStore::new();
        let a = CanvasId::parse("a").unwrap();
        let b = CanvasId::parse("b").unwrap();
        markers.mark(&a, Template::SocialPost);
        assert_eq!(markers.take(&b), None);
        assert!(markers.contains(&a));
    }
}
