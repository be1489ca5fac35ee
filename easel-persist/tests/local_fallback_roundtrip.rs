use std::rc::Rc;
use std::time::Duration;

use easel_core::{
    CanvasId, SceneDocument, SceneError, SceneEvent, SceneSurface, Shape, Snapshot, Style,
};
use easel_persist::{
    FileKeyValueStore, LocalRecordStore, ManualClock, MemoryRecordStore, PersistencePipeline,
    SaveOutcome,
};

struct DocScene(SceneDocument);

impl SceneSurface for DocScene {
    fn serialize(&self) -> Result<Snapshot, SceneError> {
        self.0.to_snapshot()
    }

    fn objects(&self) -> Result<Vec<serde_json::Value>, SceneError> {
        self.0.descriptors()
    }

    fn load(&mut self, snapshot: &Snapshot) -> Result<(), SceneError> {
        self.0 = snapshot.decode()?;
        Ok(())
    }

    fn render(&mut self) {}

    fn drain_events(&mut self) -> Vec<SceneEvent> {
        Vec::new()
    }
}

fn pipeline_over(
    dir: &std::path::Path,
    remote: MemoryRecordStore,
    clock: &ManualClock,
) -> PersistencePipeline {
    PersistencePipeline::new(
        CanvasId::parse("abc").unwrap(),
        Box::new(remote),
        Box::new(LocalRecordStore::new(FileKeyValueStore::new(dir))),
        Rc::new(clock.clone()),
        Duration::from_millis(1000),
    )
}

#[test]
fn demo_mode_save_survives_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(1_000);

    let scene = DocScene(SceneDocument::new(
        "white",
        vec![
            Shape::rect(100.0, 100.0, 100.0, 80.0, Style::filled("#3498db")),
            Shape::circle(100.0, 100.0, 50.0, Style::filled("#e74c3c")),
        ],
    ));

    let mut first = pipeline_over(dir.path(), MemoryRecordStore::unconfigured(), &clock);
    assert!(first.schedule_save());
    clock.advance(1_000);
    assert_eq!(first.poll(&scene), Some(SaveOutcome::Local));

    // a later session on the same id reads it back
    let second = pipeline_over(dir.path(), MemoryRecordStore::unconfigured(), &clock);
    let record = second.load().expect("record saved by first session");
    let restored = SceneDocument::from_descriptors("white", &record.objects).unwrap();
    assert_eq!(restored.objects, scene.0.objects);
}

#[test]
fn remote_outage_is_invisible_to_the_caller() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(0);
    let remote = MemoryRecordStore::new();
    remote.set_fail_reads(true);
    remote.set_fail_writes(true);

    let mut pipeline = pipeline_over(dir.path(), remote.clone(), &clock);
    assert!(pipeline.load().is_none());

    let scene = DocScene(SceneDocument::empty("white"));
    assert_eq!(pipeline.commit(&scene), SaveOutcome::Local);
    assert_eq!(remote.write_count(), 0);
    assert!(pipeline.load().is_some());
}
