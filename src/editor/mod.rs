//! Editing session for a single zone polygon
//!
//! Models the map editor as an explicit state machine, independent of any UI:
//!
//! ```text
//! Idle --Begin--> Editing --mutation--> Dirty --Save--> Saving --Saved--> Idle
//!                    ^                    |               |
//!                    +------Cancel--------+   SaveFailed -+-> Dirty
//! ```
//!
//! Every vertex mutation publishes a [`PathChanged`] snapshot on a channel, so
//! observers receive copies of the path instead of sharing it.

use std::fmt;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::domain::{LatLng, ZoneKind, ZonePolygon};
use crate::error::{GeofenceError, Result};
use crate::zones::serialize_polygon;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Editing,
    Dirty,
    Saving,
}

impl fmt::Display for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditorState::Idle => "idle",
            EditorState::Editing => "editing",
            EditorState::Dirty => "dirty",
            EditorState::Saving => "saving",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    Begin,
    AddVertex(LatLng),
    /// Insert before the vertex at the given index
    InsertVertex(usize, LatLng),
    MoveVertex(usize, LatLng),
    RemoveVertex(usize),
    Save,
    Saved,
    SaveFailed,
    Cancel,
}

impl EditEvent {
    fn name(&self) -> &'static str {
        match self {
            EditEvent::Begin => "begin",
            EditEvent::AddVertex(_) => "add-vertex",
            EditEvent::InsertVertex(..) => "insert-vertex",
            EditEvent::MoveVertex(..) => "move-vertex",
            EditEvent::RemoveVertex(_) => "remove-vertex",
            EditEvent::Save => "save",
            EditEvent::Saved => "saved",
            EditEvent::SaveFailed => "save-failed",
            EditEvent::Cancel => "cancel",
        }
    }
}

/// Snapshot of the path after a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct PathChanged {
    pub kind: ZoneKind,
    pub polygon: ZonePolygon,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEffect {
    None,
    /// Persist this settings entry, then report `Saved` or `SaveFailed`
    Persist { key: &'static str, value: String },
}

#[derive(Debug)]
pub struct ZoneEditor {
    kind: ZoneKind,
    state: EditorState,
    /// Last persisted path, restored on cancel
    committed: ZonePolygon,
    working: ZonePolygon,
    listeners: Vec<Sender<PathChanged>>,
}

impl ZoneEditor {
    pub fn new(kind: ZoneKind, polygon: ZonePolygon) -> Self {
        Self {
            kind,
            state: EditorState::Idle,
            committed: polygon.clone(),
            working: polygon,
            listeners: Vec::new(),
        }
    }

    pub fn kind(&self) -> ZoneKind {
        self.kind
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Copy of the current working path
    pub fn snapshot(&self) -> ZonePolygon {
        self.working.clone()
    }

    /// Register an observer for path changes
    pub fn subscribe(&mut self) -> Receiver<PathChanged> {
        let (tx, rx) = channel();
        self.listeners.push(tx);
        rx
    }

    pub fn apply(&mut self, event: EditEvent) -> Result<EditorEffect> {
        use EditEvent::*;
        use EditorState::*;

        let from = self.state;
        let effect = match (self.state, event.clone()) {
            (Idle, Begin) => {
                self.state = Editing;
                EditorEffect::None
            }
            (Editing | Dirty, AddVertex(p)) => {
                self.working.vertices.push(p);
                self.mark_dirty();
                EditorEffect::None
            }
            (Editing | Dirty, InsertVertex(index, p)) => {
                self.check_index(index, self.working.len() + 1)?;
                self.working.vertices.insert(index, p);
                self.mark_dirty();
                EditorEffect::None
            }
            (Editing | Dirty, MoveVertex(index, p)) => {
                self.check_index(index, self.working.len())?;
                self.working.vertices[index] = p;
                self.mark_dirty();
                EditorEffect::None
            }
            (Editing | Dirty, RemoveVertex(index)) => {
                self.check_index(index, self.working.len())?;
                self.working.vertices.remove(index);
                self.mark_dirty();
                EditorEffect::None
            }
            (Dirty, Save) => {
                let value =
                    serialize_polygon(&self.working).map_err(|e| GeofenceError::InvalidZone {
                        key: self.kind.settings_key().to_string(),
                        reason: e.to_string(),
                    })?;
                self.state = Saving;
                EditorEffect::Persist {
                    key: self.kind.settings_key(),
                    value,
                }
            }
            // Nothing to persist
            (Editing, Save) => {
                self.state = Idle;
                EditorEffect::None
            }
            (Saving, Saved) => {
                self.committed = self.working.clone();
                self.state = Idle;
                EditorEffect::None
            }
            (Saving, SaveFailed) => {
                self.state = Dirty;
                EditorEffect::None
            }
            (Editing | Dirty, Cancel) => {
                let reverted = self.working != self.committed;
                self.working = self.committed.clone();
                self.state = Idle;
                if reverted {
                    self.publish();
                }
                EditorEffect::None
            }
            (state, event) => {
                return Err(GeofenceError::InvalidTransition {
                    state: state.to_string(),
                    event: event.name().to_string(),
                });
            }
        };

        if from != self.state {
            tracing::debug!(zone = %self.kind, from = %from, to = %self.state, event = event.name(), "editor transition");
        }
        Ok(effect)
    }

    fn check_index(&self, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(GeofenceError::VertexOutOfRange {
                index,
                len: self.working.len(),
            });
        }
        Ok(())
    }

    fn mark_dirty(&mut self) {
        self.state = EditorState::Dirty;
        self.publish();
    }

    fn publish(&mut self) {
        let change = PathChanged {
            kind: self.kind,
            polygon: self.working.clone(),
        };
        // Drop observers whose receivers are gone
        self.listeners.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
