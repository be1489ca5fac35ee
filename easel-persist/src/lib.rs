//! easel-persist: keeping a durable copy of the scene in sync with edits.
//!
//! Design rules:
//! - Writes are debounced (trailing edge) and reflect the scene at fire time.
//! - The remote store is preferred; any failure falls back to the local store.
//! - Failures are logged and swallowed. Autosave is best effort.
//! - Time comes from an injected [`Clock`], never read directly.

pub mod clock;
pub mod debounce;
pub mod markers;
pub mod pipeline;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::{DebounceTimer, TimerHandle};
pub use markers::TemplateMarkerStore;
pub use pipeline::{PersistencePipeline, SaveOutcome};
pub use store::{
    FileKeyValueStore, KeyValueStore, LocalRecordStore, MemoryKeyValueStore, MemoryRecordStore,
    RecordStore, StoreError,
};
