// Undo/redo history module for the editor.
//
// A bounded, linear stack of whole-scene snapshots plus a cursor. Replaying
// a snapshot makes the surface fire the same mutation events a user edit
// would; the replay state machine is what keeps those from being captured.

use easel_core::{SceneSurface, Snapshot};
use tracing::{debug, trace, warn};

pub const DEFAULT_MAX_STATES: usize = 50;

/// Whether a snapshot is currently being loaded into the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayState {
    #[default]
    Idle,
    ApplyingUndo,
    ApplyingRedo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayEvent {
    BeginUndo,
    BeginRedo,
    LoadCompleted,
    LoadFailed,
}

impl ReplayState {
    /// The single transition table. `None` means the event is not allowed
    /// in this state and must be ignored.
    pub fn next(self, event: ReplayEvent) -> Option<ReplayState> {
        use ReplayEvent::*;
        use ReplayState::*;

        match (self, event) {
            (Idle, BeginUndo) => Some(ApplyingUndo),
            (Idle, BeginRedo) => Some(ApplyingRedo),
            (ApplyingUndo | ApplyingRedo, LoadCompleted | LoadFailed) => Some(Idle),
            _ => None,
        }
    }

    pub fn is_replaying(self) -> bool {
        self != ReplayState::Idle
    }
}

#[derive(Debug, Clone)]
pub struct History {
    states: Vec<Snapshot>,
    current_index: Option<usize>,
    max_states: usize,
    replay: ReplayState,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STATES)
    }
}

impl History {
    pub fn new(max_states: usize) -> Self {
        Self {
            states: Vec::new(),
            current_index: None,
            max_states: max_states.max(1),
            replay: ReplayState::Idle,
        }
    }

    /// Record the scene as the newest state. Silently skipped while a
    /// snapshot is being replayed or when the scene cannot be serialized.
    pub fn capture<S: SceneSurface + ?Sized>(&mut self, scene: &S) -> bool {
        if self.replay.is_replaying() {
            trace!(state = ?self.replay, "capture suppressed during replay");
            return false;
        }

        let snapshot = match scene.serialize() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "capture skipped, scene did not serialize");
                return false;
            }
        };

        // Drop the redo branch
        let keep = self.current_index.map_or(0, |i| i + 1);
        self.states.truncate(keep);

        self.states.push(snapshot);
        self.current_index = Some(self.states.len() - 1);

        if self.states.len() > self.max_states {
            self.states.remove(0);
            self.current_index = self.current_index.map(|i| i - 1);
        }

        trace!(
            index = ?self.current_index,
            len = self.states.len(),
            "state captured"
        );
        true
    }

    /// Reset to a single snapshot of the scene: the undo floor.
    pub fn initialize<S: SceneSurface + ?Sized>(&mut self, scene: &S) -> bool {
        match scene.serialize() {
            Ok(snapshot) => {
                self.states = vec![snapshot];
                self.current_index = Some(0);
                debug!("history initialized");
                true
            }
            Err(e) => {
                warn!(error = %e, "history not initialized, scene did not serialize");
                false
            }
        }
    }

    /// Step back one state. No-op at the floor or while a replay is in flight.
    pub fn undo<S: SceneSurface + ?Sized>(&mut self, scene: &mut S) -> bool {
        let target = match self.current_index {
            Some(i) if i > 0 => i - 1,
            _ => {
                trace!("undo ignored: at start of history");
                return false;
            }
        };
        self.begin_replay(scene, target, ReplayEvent::BeginUndo)
    }

    /// Step forward one state. No-op at the newest state or mid-replay.
    pub fn redo<S: SceneSurface + ?Sized>(&mut self, scene: &mut S) -> bool {
        let target = match self.current_index {
            Some(i) if i + 1 < self.states.len() => i + 1,
            _ => {
                trace!("redo ignored: at end of history");
                return false;
            }
        };
        self.begin_replay(scene, target, ReplayEvent::BeginRedo)
    }

    fn begin_replay<S: SceneSurface + ?Sized>(
        &mut self,
        scene: &mut S,
        target: usize,
        begin: ReplayEvent,
    ) -> bool {
        let Some(next) = self.replay.next(begin) else {
            debug!(state = ?self.replay, event = ?begin, "ignored while a replay is in flight");
            return false;
        };

        let previous = self.current_index;
        self.replay = next;
        self.current_index = Some(target);

        if let Err(e) = scene.load(&self.states[target]) {
            warn!(error = %e, index = target, "snapshot could not be loaded");
            self.current_index = previous;
            self.finish(ReplayEvent::LoadFailed);
            return false;
        }

        debug!(state = ?self.replay, index = target, "replay started");
        true
    }

    /// Called when the surface reports a finished load. Returns false if no
    /// replay was in flight (the load was someone else's).
    pub fn complete_replay(&mut self) -> bool {
        if !self.replay.is_replaying() {
            return false;
        }
        self.finish(ReplayEvent::LoadCompleted);
        debug!(index = ?self.current_index, "replay completed");
        true
    }

    fn finish(&mut self, event: ReplayEvent) {
        if let Some(next) = self.replay.next(event) {
            self.replay = next;
        }
    }

    /// Undo is offered only when idle and above the floor.
    pub fn can_undo(&self) -> bool {
        !self.replay.is_replaying() && matches!(self.current_index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        !self.replay.is_replaying()
            && matches!(self.current_index, Some(i) if i + 1 < self.states.len())
    }

    pub fn replay_state(&self) -> ReplayState {
        self.replay
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn max_states(&self) -> usize {
        self.max_states
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.current_index.and_then(|i| self.states.get(i))
    }
}
