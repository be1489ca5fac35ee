// Editor session: one open canvas with its history and autosave.
//
// All user edits go through the canvas, and the canvas reports them as
// events. `process_events` is the single place where edits turn into a
// scheduled save and a history capture.

use std::rc::Rc;
use std::time::Duration;

use easel_core::{
    CanvasId, ConfigError, EditorConfig, ObjectId, SceneDocument, SceneError, SceneEvent,
    SceneSurface, Shape, Template,
};
use easel_persist::{
    Clock, FileKeyValueStore, LocalRecordStore, MemoryKeyValueStore, MemoryRecordStore,
    PersistencePipeline, RecordStore, SaveOutcome, SystemClock, TemplateMarkerStore,
};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::editor::shortcuts::{shortcut_for, KeyChord, ShortcutAction};
use crate::editor::tools::{
    snap_to_grid, Brush, CircleTool, RectangleTool, TextTool, Tool, ToolKind,
    DEFAULT_INSERT_POSITION,
};
use crate::editor::{Canvas, History};
use crate::export;
use crate::route::Route;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("canvas could not be created: {0}")]
    SurfaceInit(#[from] SceneError),

    #[error("invalid editor configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Stores and clock the session runs against.
pub struct EditorDeps {
    pub remote: Box<dyn RecordStore>,
    pub local: Box<dyn RecordStore>,
    pub markers: TemplateMarkerStore,
    pub clock: Rc<dyn Clock>,
}

impl EditorDeps {
    /// Demo-mode dependencies: no remote, local store from `config.local_dir`
    /// (in memory when unset), system clock.
    pub fn from_config(config: &EditorConfig, markers: TemplateMarkerStore) -> Self {
        let local: Box<dyn RecordStore> = match &config.local_dir {
            Some(dir) => Box::new(LocalRecordStore::new(FileKeyValueStore::new(dir))),
            None => Box::new(LocalRecordStore::new(MemoryKeyValueStore::new())),
        };
        if config.remote.is_configured() {
            warn!("remote credentials set but no remote client supplied, saving locally");
        }
        Self {
            remote: Box::new(MemoryRecordStore::unconfigured()),
            local,
            markers,
            clock: Rc::new(SystemClock),
        }
    }

    /// Swap in a remote store client.
    pub fn with_remote(mut self, remote: Box<dyn RecordStore>) -> Self {
        self.remote = remote;
        self
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// What the scene was populated from on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapSource {
    Template(Template),
    Record,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the persisted record to finish loading.
    Bootstrapping,
    Ready,
}

pub struct Editor {
    route: Route,
    config: EditorConfig,
    canvas: Canvas,
    history: History,
    pipeline: PersistencePipeline,
    phase: Phase,
    source: BootstrapSource,
    tool: ToolKind,
    brush: Brush,
    selected: Option<ObjectId>,
    snap_to_grid: bool,
}

impl Editor {
    /// Open the editor for `route`.
    ///
    /// Scene priority: a pending template marker, then a persisted record
    /// with objects, then an empty scene. Only surface or config errors are
    /// fatal; a failed record load just means an empty scene.
    pub fn open(route: Route, config: EditorConfig, deps: EditorDeps) -> Result<Self, EditorError> {
        let canvas = Canvas::new(
            config.canvas.width,
            config.canvas.height,
            config.canvas.background.clone(),
        )?;
        config.validate()?;

        let mut pipeline = PersistencePipeline::new(
            route.canvas_id.clone(),
            deps.remote,
            deps.local,
            deps.clock,
            Duration::from_millis(config.save_debounce_ms),
        );
        pipeline.set_read_only(route.view_only);

        info!(
            canvas_id = %route.canvas_id,
            view_only = route.view_only,
            demo_mode = pipeline.is_local_only(),
            "opening editor"
        );

        let mut editor = Self {
            history: History::new(config.history_limit),
            route,
            config,
            canvas,
            pipeline,
            phase: Phase::Bootstrapping,
            source: BootstrapSource::Empty,
            tool: ToolKind::Select,
            brush: Brush::default(),
            selected: None,
            snap_to_grid: false,
        };
        editor.bootstrap(&deps.markers);
        Ok(editor)
    }

    fn bootstrap(&mut self, markers: &TemplateMarkerStore) {
        let id = self.route.canvas_id.clone();

        if let Some(template_id) = markers.take(&id) {
            let template = Template::resolve(&template_id);
            debug!(canvas_id = %id, template = template.id(), "populating from template");
            self.canvas.add_all(template.shapes());
            self.source = BootstrapSource::Template(template);
            self.finish_bootstrap(true);
            return;
        }

        if let Some(record) = self.pipeline.load().filter(|r| r.has_objects()) {
            let decoded = SceneDocument::from_descriptors(self.canvas.background(), &record.objects)
                .and_then(|doc| doc.to_snapshot())
                .and_then(|snapshot| self.canvas.load(&snapshot));
            match decoded {
                Ok(()) => {
                    debug!(canvas_id = %id, objects = record.objects.len(), "loading saved record");
                    self.source = BootstrapSource::Record;
                    // finished when the surface reports LoadCompleted
                    return;
                }
                Err(e) => {
                    // the stored record must survive until the user edits
                    warn!(canvas_id = %id, error = %e, "saved record unreadable, starting empty");
                    self.source = BootstrapSource::Empty;
                    self.finish_bootstrap(false);
                    return;
                }
            }
        }

        self.source = BootstrapSource::Empty;
        self.finish_bootstrap(true);
    }

    fn finish_bootstrap(&mut self, save: bool) {
        // population is not an edit
        let discarded = self.canvas.drain_events().len();
        trace!(discarded, "bootstrap events dropped");

        self.canvas.render();
        self.history.initialize(&self.canvas);
        if save {
            self.pipeline.schedule_save();
        }
        self.phase = Phase::Ready;
        info!(
            canvas_id = %self.route.canvas_id,
            source = ?self.source,
            objects = self.canvas.len(),
            "editor ready"
        );
    }

    /// Drive pending work: finish a scene load, react to edits and fire a
    /// due autosave. Call once per frame or timer tick.
    pub fn tick(&mut self) -> Option<SaveOutcome> {
        self.canvas.settle();
        self.process_events();
        self.pipeline.poll(&self.canvas)
    }

    fn process_events(&mut self) {
        for event in self.canvas.drain_events() {
            match event {
                SceneEvent::LoadCompleted => self.on_load_completed(),
                _ if self.phase == Phase::Bootstrapping => {}
                SceneEvent::ObjectModified(_) => self.on_mutation(),
                SceneEvent::ObjectRemoved(id) => {
                    if id.is_some() && self.selected == id {
                        self.selected = None;
                    }
                    self.on_mutation();
                }
                SceneEvent::ObjectAdded(_) => self.on_mutation(),
            }
        }
    }

    fn on_mutation(&mut self) {
        self.pipeline.schedule_save();
        self.history.capture(&self.canvas);
    }

    fn on_load_completed(&mut self) {
        if self.phase == Phase::Bootstrapping {
            self.finish_bootstrap(true);
        } else if self.history.complete_replay() {
            self.canvas.render();
        }
    }

    fn editable(&self, action: &str) -> bool {
        if self.route.view_only {
            trace!(action, "ignored in view-only mode");
            return false;
        }
        if self.phase == Phase::Bootstrapping {
            trace!(action, "ignored while loading");
            return false;
        }
        true
    }

    fn place(&mut self, tool: &dyn Tool) -> Option<ObjectId> {
        if !self.editable(tool.name()) {
            return None;
        }
        let (x, y) = DEFAULT_INSERT_POSITION;
        let id = tool.apply(&mut self.canvas, x, y)?;
        self.selected = Some(id);
        self.process_events();
        Some(id)
    }

    pub fn add_rectangle(&mut self) -> Option<ObjectId> {
        self.place(&RectangleTool::default())
    }

    pub fn add_circle(&mut self) -> Option<ObjectId> {
        self.place(&CircleTool::default())
    }

    pub fn add_text(&mut self) -> Option<ObjectId> {
        self.place(&TextTool::default())
    }

    /// Switch tools. Entering or leaving the pen toggles drawing mode and
    /// schedules a save. Shape tools place their object right away and hand
    /// back to `Select`.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if !self.editable("set_tool") {
            return false;
        }
        if self.canvas.is_drawing_mode() != tool.is_drawing() {
            self.canvas.set_drawing_mode(tool.is_drawing());
            self.pipeline.schedule_save();
        }
        self.tool = tool;

        let placed = match tool {
            ToolKind::Select | ToolKind::Pen => return true,
            ToolKind::Rectangle => self.add_rectangle(),
            ToolKind::Circle => self.add_circle(),
            ToolKind::Text => self.add_text(),
        };
        self.tool = ToolKind::Select;
        placed.is_some()
    }

    /// Commit a free-drawn stroke. Only while the pen is active.
    pub fn draw_stroke(&mut self, points: Vec<[f64; 2]>) -> Option<ObjectId> {
        if !self.editable("draw_stroke") || !self.canvas.is_drawing_mode() {
            return None;
        }
        let id = self.brush.stroke(&mut self.canvas, points)?;
        self.process_events();
        Some(id)
    }

    /// Locked objects cannot be selected.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if self.route.view_only {
            return false;
        }
        match self.canvas.get(id) {
            Some(shape) if !shape.locked => {
                self.selected = Some(id);
                true
            }
            _ => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn delete_selected(&mut self) -> bool {
        if !self.editable("delete") {
            return false;
        }
        let Some(id) = self.selected.take() else {
            return false;
        };
        let removed = self.canvas.remove(id).is_some();
        self.process_events();
        removed
    }

    /// Flip the lock on the selection. Returns the new lock state.
    pub fn toggle_lock(&mut self) -> Option<bool> {
        if !self.editable("toggle_lock") {
            return None;
        }
        let id = self.selected?;
        let mut locked = false;
        self.canvas
            .modify(id, |shape| {
                shape.locked = !shape.locked;
                locked = shape.locked;
            })
            .ok()?;
        self.process_events();
        Some(locked)
    }

    /// Drag the selection by `(dx, dy)`. Locked objects stay put. With snap
    /// enabled the new position is rounded to the grid.
    pub fn move_selected(&mut self, dx: f64, dy: f64) -> bool {
        if !self.editable("move") {
            return false;
        }
        let Some(id) = self.selected else {
            return false;
        };
        if self.canvas.get(id).map_or(true, |s| s.locked) {
            return false;
        }
        let snap = self.snap_to_grid.then_some(self.config.canvas.grid_size);
        let moved = self
            .canvas
            .modify(id, |shape| {
                shape.left += dx;
                shape.top += dy;
                if let Some(grid) = snap {
                    snap_to_grid(shape, grid);
                }
            })
            .is_ok();
        self.process_events();
        moved
    }

    /// Property edit on the selection (fill, opacity, font, text...).
    pub fn update_selected(&mut self, edit: impl FnOnce(&mut Shape)) -> bool {
        if !self.editable("update") {
            return false;
        }
        let Some(id) = self.selected else {
            return false;
        };
        let updated = self.canvas.modify(id, edit).is_ok();
        self.process_events();
        updated
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
    }

    pub fn undo(&mut self) -> bool {
        if !self.editable("undo") {
            return false;
        }
        self.history.undo(&mut self.canvas)
    }

    pub fn redo(&mut self) -> bool {
        if !self.editable("redo") {
            return false;
        }
        self.history.redo(&mut self.canvas)
    }

    pub fn can_undo(&self) -> bool {
        !self.route.view_only && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.route.view_only && self.history.can_redo()
    }

    /// Route a key press to its shortcut. Returns true if it was handled.
    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        match shortcut_for(chord) {
            Some(ShortcutAction::Undo) => self.undo(),
            Some(ShortcutAction::Redo) => self.redo(),
            None => false,
        }
    }

    pub fn export_svg(&self) -> String {
        export::export_svg(&self.canvas)
    }

    pub fn export_file_name(&self) -> String {
        export::export_file_name(&self.route.canvas_id)
    }

    /// Close the session, writing any save still waiting for its quiet period.
    pub fn dispose(mut self) -> Option<SaveOutcome> {
        info!(canvas_id = %self.route.canvas_id, "closing editor");
        self.canvas.settle();
        self.process_events();
        if !self.pipeline.has_pending_save() {
            return None;
        }
        self.pipeline.cancel_pending();
        Some(self.pipeline.commit(&self.canvas))
    }

    pub fn canvas_id(&self) -> &CanvasId {
        &self.route.canvas_id
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn is_view_only(&self) -> bool {
        self.route.view_only
    }

    /// True when saves can only reach the local store.
    pub fn is_demo_mode(&self) -> bool {
        self.pipeline.is_local_only()
    }

    pub fn bootstrap_source(&self) -> BootstrapSource {
        self.source
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn snap_to_grid_enabled(&self) -> bool {
        self.snap_to_grid
    }

    pub fn has_pending_save(&self) -> bool {
        self.pipeline.has_pending_save()
    }

    pub fn last_save(&self) -> Option<SaveOutcome> {
        self.pipeline.last_outcome()
    }
}
