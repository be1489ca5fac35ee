// Headless scene surface for the Easel editor.
// Holds the object list, fires mutation events, and applies snapshot loads
// asynchronously: `load` queues the document and `settle` applies it.

use easel_core::{
    ObjectId, SceneDocument, SceneError, SceneEvent, SceneSurface, Shape, Snapshot,
};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: String,
    objects: Vec<Shape>,
    pending_load: Option<SceneDocument>,
    events: Vec<SceneEvent>,
    drawing_mode: bool,
    render_count: u64,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: impl Into<String>) -> Result<Self, SceneError> {
        let background = background.into();
        if width == 0 || height == 0 {
            warn!("Refusing to create canvas of size {}x{}", width, height);
            return Err(SceneError::InvalidSize { width, height });
        }

        info!(
            "Creating new canvas of size {}x{} with background {}",
            width, height, background
        );

        Ok(Self {
            width,
            height,
            background,
            objects: Vec::new(),
            pending_load: None,
            events: Vec::new(),
            drawing_mode: false,
            render_count: 0,
        })
    }

    // Add an object on top of the paint order
    pub fn add(&mut self, shape: Shape) -> ObjectId {
        let id = shape.id;
        trace!("Adding {} {}", shape.type_name(), id);
        self.objects.push(shape);
        self.events.push(SceneEvent::ObjectAdded(Some(id)));
        id
    }

    pub fn add_all(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        for shape in shapes {
            self.add(shape);
        }
    }

    // Remove an object, returning it if it existed
    pub fn remove(&mut self, id: ObjectId) -> Option<Shape> {
        let index = self.objects.iter().position(|s| s.id == id)?;
        let shape = self.objects.remove(index);
        trace!("Removed {} {}", shape.type_name(), id);
        self.events.push(SceneEvent::ObjectRemoved(Some(id)));
        Some(shape)
    }

    // Edit an object in place and fire a modified event
    pub fn modify(&mut self, id: ObjectId, edit: impl FnOnce(&mut Shape)) -> Result<(), SceneError> {
        let shape = self
            .objects
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SceneError::UnknownObject(id))?;
        edit(shape);
        trace!("Modified {}", id);
        self.events.push(SceneEvent::ObjectModified(Some(id)));
        Ok(())
    }

    // Edit an object without firing any event
    pub fn set_quietly(&mut self, id: ObjectId, edit: impl FnOnce(&mut Shape)) -> bool {
        match self.objects.iter_mut().find(|s| s.id == id) {
            Some(shape) => {
                edit(shape);
                true
            }
            None => false,
        }
    }

    // Remove every object
    pub fn clear(&mut self) {
        debug!("Clearing canvas with {} objects", self.objects.len());
        for shape in self.objects.drain(..) {
            self.events.push(SceneEvent::ObjectRemoved(Some(shape.id)));
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&Shape> {
        self.objects.iter().find(|s| s.id == id)
    }

    // Objects in paint order
    pub fn shapes(&self) -> &[Shape] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn document(&self) -> SceneDocument {
        SceneDocument::new(self.background.clone(), self.objects.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Apply a pending load, if any. Fires a removed event per old object,
    /// an added event per new object, then `LoadCompleted`.
    pub fn settle(&mut self) -> bool {
        let Some(doc) = self.pending_load.take() else {
            return false;
        };

        self.clear();
        self.background = doc.background;
        for shape in doc.objects {
            self.add(shape);
        }
        self.events.push(SceneEvent::LoadCompleted);
        debug!("Load settled with {} objects", self.objects.len());
        true
    }

    pub fn set_drawing_mode(&mut self, enabled: bool) {
        trace!("Drawing mode {}", enabled);
        self.drawing_mode = enabled;
    }

    pub fn is_drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    // Get canvas dimensions
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> &str {
        &self.background
    }
}

impl SceneSurface for Canvas {
    fn serialize(&self) -> Result<Snapshot, SceneError> {
        self.document().to_snapshot()
    }

    fn objects(&self) -> Result<Vec<serde_json::Value>, SceneError> {
        self.document().descriptors()
    }

    fn load(&mut self, snapshot: &Snapshot) -> Result<(), SceneError> {
        let doc = snapshot.decode()?;
        if self.pending_load.replace(doc).is_some() {
            debug!("Replacing a load that had not settled yet");
        }
        Ok(())
    }

    fn render(&mut self) {
        self.render_count += 1;
        trace!("Render #{} ({} objects)", self.render_count, self.objects.len());
    }

    fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::Style;

    fn canvas() -> Canvas {
        Canvas::new(800, 600, "white").unwrap()
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 600, "white"),
            Err(SceneError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_mutations_fire_events_in_order() {
        let mut canvas = canvas();
        let id = canvas.add(Shape::circle(0.0, 0.0, 5.0, Style::default()));
        canvas.modify(id, |s| s.left = 10.0).unwrap();
        canvas.remove(id);

        assert_eq!(
            canvas.drain_events(),
            vec![
                SceneEvent::ObjectAdded(Some(id)),
                SceneEvent::ObjectModified(Some(id)),
                SceneEvent::ObjectRemoved(Some(id)),
            ]
        );
        assert!(canvas.drain_events().is_empty());
    }

    #[test]
    fn test_quiet_edit_fires_nothing() {
        let mut canvas = canvas();
        let id = canvas.add(Shape::circle(0.0, 0.0, 5.0, Style::default()));
        canvas.drain_events();
        assert!(canvas.set_quietly(id, |s| s.top = 3.0));
        assert!(canvas.drain_events().is_empty());
        assert_eq!(canvas.get(id).unwrap().top, 3.0);
    }

    #[test]
    fn test_load_applies_only_when_settled() {
        let mut canvas = canvas();
        let kept = Shape::rect(1.0, 2.0, 3.0, 4.0, Style::default());
        let snapshot = SceneDocument::new("white", vec![kept.clone()])
            .to_snapshot()
            .unwrap();

        canvas.add(Shape::circle(0.0, 0.0, 5.0, Style::default()));
        canvas.drain_events();

        canvas.load(&snapshot).unwrap();
        assert!(canvas.is_loading());
        assert_eq!(canvas.len(), 1);
        assert!(canvas.drain_events().is_empty());

        assert!(canvas.settle());
        assert_eq!(canvas.shapes(), &[kept]);
        let events = canvas.drain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events.last(), Some(&SceneEvent::LoadCompleted));
        assert!(!canvas.settle());
    }

    #[test]
    fn test_undecodable_snapshot_fails_to_start_loading() {
        let mut canvas = canvas();
        assert!(canvas.load(&Snapshot::from_json("nope")).is_err());
        assert!(!canvas.is_loading());
    }

    #[test]
    fn test_modify_unknown_object() {
        let mut canvas = canvas();
        let err = canvas.modify(ObjectId::new(), |_| {}).unwrap_err();
        assert!(matches!(err, SceneError::UnknownObject(_)));
    }
}
