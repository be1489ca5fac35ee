//! Debounced autosave of a scene to a remote store with local fallback.
//!
//! Every mutation calls [`PersistencePipeline::schedule_save`], which
//! cancels the pending write and re-arms the quiet-period timer. When the
//! timer fires, [`PersistencePipeline::commit`] serializes the scene as it
//! is *then* and writes it. Write failures fall back to the local store and
//! are otherwise swallowed: no retry, nothing surfaced to the user. Last
//! writer wins; there is no conflict detection between editors sharing an id.

use std::rc::Rc;
use std::time::Duration;

use easel_core::{CanvasId, CanvasRecord, SceneSurface};
use tracing::{debug, error, info, trace, warn};

use crate::clock::Clock;
use crate::debounce::DebounceTimer;
use crate::store::{RecordStore, StoreError};

/// Where a commit ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Remote,
    /// Written to the local store (remote failed or unconfigured).
    Local,
    /// Both stores failed; the edit is not persisted.
    Failed,
    /// Read-only session, nothing written.
    Skipped,
}

pub struct PersistencePipeline {
    canvas_id: CanvasId,
    remote: Box<dyn RecordStore>,
    local: Box<dyn RecordStore>,
    clock: Rc<dyn Clock>,
    timer: DebounceTimer,
    read_only: bool,
    last_outcome: Option<SaveOutcome>,
}

impl PersistencePipeline {
    pub fn new(
        canvas_id: CanvasId,
        remote: Box<dyn RecordStore>,
        local: Box<dyn RecordStore>,
        clock: Rc<dyn Clock>,
        quiet: Duration,
    ) -> Self {
        info!(
            canvas_id = %canvas_id,
            remote_configured = remote.is_configured(),
            quiet_ms = quiet.as_millis() as u64,
            "persistence pipeline created"
        );
        Self {
            canvas_id,
            remote,
            local,
            clock,
            timer: DebounceTimer::new(quiet),
            read_only: false,
            last_outcome: None,
        }
    }

    pub fn canvas_id(&self) -> &CanvasId {
        &self.canvas_id
    }

    /// View-only sessions never write; switching to read-only drops any
    /// pending save.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only && self.timer.cancel().is_some() {
            debug!(canvas_id = %self.canvas_id, "pending save dropped for read-only session");
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// True when writes can only go to the local store (demo mode).
    pub fn is_local_only(&self) -> bool {
        !self.remote.is_configured()
    }

    /// Cancel any pending write and re-arm the quiet-period timer.
    /// Returns false (and does nothing) in a read-only session.
    pub fn schedule_save(&mut self) -> bool {
        if self.read_only {
            trace!(canvas_id = %self.canvas_id, "save not scheduled: read-only");
            return false;
        }
        let now = self.clock.now_ms();
        self.timer.schedule(now);
        trace!(canvas_id = %self.canvas_id, deadline = ?self.timer.deadline(), "save scheduled");
        true
    }

    pub fn has_pending_save(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn cancel_pending(&mut self) {
        self.timer.cancel();
    }

    /// Commit if the quiet period has elapsed. Call on every tick.
    pub fn poll<S: SceneSurface + ?Sized>(&mut self, scene: &S) -> Option<SaveOutcome> {
        let now = self.clock.now_ms();
        self.timer.poll(now)?;
        Some(self.commit(scene))
    }

    /// Write the scene's current object list. Never returns an error.
    pub fn commit<S: SceneSurface + ?Sized>(&mut self, scene: &S) -> SaveOutcome {
        let outcome = self.write(scene);
        self.last_outcome = Some(outcome);
        outcome
    }

    pub fn last_outcome(&self) -> Option<SaveOutcome> {
        self.last_outcome
    }

    fn write<S: SceneSurface + ?Sized>(&self, scene: &S) -> SaveOutcome {
        if self.read_only {
            return SaveOutcome::Skipped;
        }

        let objects = match scene.objects() {
            Ok(objects) => objects,
            Err(e) => {
                error!(canvas_id = %self.canvas_id, error = %e, "could not serialize scene for save");
                return SaveOutcome::Failed;
            }
        };
        let now = self.clock.now_ms() as i64;
        let count = objects.len();

        if self.remote.is_configured() {
            match self.write_remote(objects.clone(), now) {
                Ok(()) => {
                    debug!(canvas_id = %self.canvas_id, objects = count, "canvas saved");
                    return SaveOutcome::Remote;
                }
                Err(e) => {
                    warn!(canvas_id = %self.canvas_id, error = %e, "remote save failed, using local store");
                }
            }
        }

        match self.local.update(&self.canvas_id, objects, now) {
            Ok(()) => {
                debug!(canvas_id = %self.canvas_id, objects = count, "canvas saved locally");
                SaveOutcome::Local
            }
            Err(e) => {
                error!(canvas_id = %self.canvas_id, error = %e, "local save failed, edit not persisted");
                SaveOutcome::Failed
            }
        }
    }

    /// `update`, creating the record with a merging `put` on first save.
    fn write_remote(&self, objects: Vec<serde_json::Value>, now: i64) -> Result<(), StoreError> {
        match self.remote.update(&self.canvas_id, objects.clone(), now) {
            Err(StoreError::NotFound(_)) => {
                trace!(canvas_id = %self.canvas_id, "no remote record yet, creating");
                self.remote.put(&self.canvas_id, objects, true, now)
            }
            other => other,
        }
    }

    /// Fetch the persisted record, preferring the remote store.
    ///
    /// Any remote failure (or a remote without the record) falls through to
    /// the local store. `None` means "no existing data", not an error.
    pub fn load(&self) -> Option<CanvasRecord> {
        if self.remote.is_configured() {
            match self.remote.get(&self.canvas_id) {
                Ok(Some(record)) => {
                    debug!(canvas_id = %self.canvas_id, objects = record.objects.len(), "loaded remote record");
                    return Some(record);
                }
                Ok(None) => {
                    trace!(canvas_id = %self.canvas_id, "no remote record, checking local store");
                }
                Err(e) => {
                    warn!(canvas_id = %self.canvas_id, error = %e, "remote load failed, using local store");
                }
            }
        }

        match self.local.get(&self.canvas_id) {
            Ok(Some(record)) => {
                debug!(canvas_id = %self.canvas_id, objects = record.objects.len(), "loaded local record");
                Some(record)
            }
            Ok(None) => {
                debug!(canvas_id = %self.canvas_id, "no existing data");
                None
            }
            Err(e) => {
                warn!(canvas_id = %self.canvas_id, error = %e, "local load failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::{LocalRecordStore, MemoryKeyValueStore, MemoryRecordStore};
    use easel_core::{SceneError, SceneEvent, Snapshot};
    use serde_json::json;
    use std::cell::RefCell;

    /// Scene stand-in whose object list the test edits directly.
    #[derive(Default)]
    struct FakeScene {
        objects: RefCell<Vec<serde_json::Value>>,
    }

    impl FakeScene {
        fn push(&self, v: serde_json::Value) {
            self.objects.borrow_mut().push(v);
        }
    }

    impl SceneSurface for FakeScene {
        fn serialize(&self) -> Result<Snapshot, SceneError> {
            Ok(Snapshot::from_json(
                json!({ "objects": self.objects.borrow().clone() }).to_string(),
            ))
        }

        fn objects(&self) -> Result<Vec<serde_json::Value>, SceneError> {
            Ok(self.objects.borrow().clone())
        }

        fn load(&mut self, _snapshot: &Snapshot) -> Result<(), SceneError> {
            Ok(())
        }

        fn render(&mut self) {}

        fn drain_events(&mut self) -> Vec<SceneEvent> {
            Vec::new()
        }
    }

    struct Fixture {
        clock: ManualClock,
        remote: MemoryRecordStore,
        local: LocalRecordStore<MemoryKeyValueStore>,
        pipeline: PersistencePipeline,
    }

    fn fixture(remote: MemoryRecordStore) -> Fixture {
        let clock = ManualClock::new(0);
        let local = LocalRecordStore::new(MemoryKeyValueStore::new());
        let pipeline = PersistencePipeline::new(
            CanvasId::parse("abc").unwrap(),
            Box::new(remote.clone()),
            Box::new(local.clone()),
            Rc::new(clock.clone()),
            Duration::from_millis(1000),
        );
        Fixture {
            clock,
            remote,
            local,
            pipeline,
        }
    }

    fn id() -> CanvasId {
        CanvasId::parse("abc").unwrap()
    }

    #[test]
    fn test_burst_of_mutations_writes_once() {
        let mut f = fixture(MemoryRecordStore::new());
        let scene = FakeScene::default();

        for _ in 0..5 {
            scene.push(json!({"type": "rect"}));
            f.pipeline.schedule_save();
            f.clock.advance(300);
            assert_eq!(f.pipeline.poll(&scene), None);
        }

        f.clock.advance(700);
        assert_eq!(f.pipeline.poll(&scene), Some(SaveOutcome::Remote));
        assert_eq!(f.remote.write_count(), 1);
        assert_eq!(f.remote.record(&id()).unwrap().objects.len(), 5);
    }

    #[test]
    fn test_write_reflects_state_at_fire_time() {
        let mut f = fixture(MemoryRecordStore::new());
        let scene = FakeScene::default();
        scene.push(json!({"n": 1}));
        f.pipeline.schedule_save();

        // edited during the quiet period without a reschedule
        f.clock.advance(500);
        scene.push(json!({"n": 2}));

        f.clock.advance(500);
        f.pipeline.poll(&scene);
        assert_eq!(f.remote.record(&id()).unwrap().objects.len(), 2);
    }

    #[test]
    fn test_remote_failure_falls_back_to_local() {
        let remote = MemoryRecordStore::new();
        remote.set_fail_writes(true);
        let mut f = fixture(remote);
        let scene = FakeScene::default();
        scene.push(json!({"type": "circle"}));

        assert_eq!(f.pipeline.commit(&scene), SaveOutcome::Local);
        assert!(f.remote.record(&id()).is_none());
        assert_eq!(f.local.get(&id()).unwrap().unwrap().objects.len(), 1);
    }

    #[test]
    fn test_unconfigured_remote_goes_straight_to_local() {
        let mut f = fixture(MemoryRecordStore::unconfigured());
        assert!(f.pipeline.is_local_only());
        let scene = FakeScene::default();
        assert_eq!(f.pipeline.commit(&scene), SaveOutcome::Local);
        assert!(f.local.get(&id()).unwrap().is_some());
    }

    #[test]
    fn test_first_remote_save_creates_record() {
        let mut f = fixture(MemoryRecordStore::new());
        f.clock.set(42);
        f.pipeline.commit(&FakeScene::default());
        let record = f.remote.record(&id()).unwrap();
        assert_eq!(record.created_at, 42);
    }

    #[test]
    fn test_read_only_never_schedules_or_writes() {
        let mut f = fixture(MemoryRecordStore::new());
        f.pipeline.set_read_only(true);
        assert!(!f.pipeline.schedule_save());
        assert!(!f.pipeline.has_pending_save());
        assert_eq!(f.pipeline.commit(&FakeScene::default()), SaveOutcome::Skipped);
        assert_eq!(f.remote.write_count(), 0);
    }

    #[test]
    fn test_switching_to_read_only_drops_pending_save() {
        let mut f = fixture(MemoryRecordStore::new());
        f.pipeline.schedule_save();
        f.pipeline.set_read_only(true);
        f.clock.advance(5000);
        assert_eq!(f.pipeline.poll(&FakeScene::default()), None);
    }

    #[test]
    fn test_load_prefers_remote_then_local() {
        let f = fixture(MemoryRecordStore::new());
        assert!(f.pipeline.load().is_none());

        f.local.update(&id(), vec![json!({"from": "local"})], 1).unwrap();
        assert_eq!(f.pipeline.load().unwrap().objects[0]["from"], "local");

        f.remote
            .insert(CanvasRecord::new(id(), vec![json!({"from": "remote"})], 2));
        assert_eq!(f.pipeline.load().unwrap().objects[0]["from"], "remote");

        f.remote.set_fail_reads(true);
        assert_eq!(f.pipeline.load().unwrap().objects[0]["from"], "local");
    }

    #[test]
    fn test_both_stores_failing_is_swallowed() {
        let remote = MemoryRecordStore::new();
        remote.set_fail_writes(true);
        let clock = ManualClock::new(0);
        let mut pipeline = PersistencePipeline::new(
            id(),
            Box::new(remote),
            Box::new(MemoryRecordStore::unconfigured()),
            Rc::new(clock),
            Duration::from_millis(1000),
        );
        assert_eq!(pipeline.commit(&FakeScene::default()), SaveOutcome::Failed);
        assert_eq!(pipeline.last_outcome(), Some(SaveOutcome::Failed));
    }
}
