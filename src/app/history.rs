use crate::core::{CurveModel, SplitAnchors};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Snapshot reduziert auf die für Undo/Redo relevanten Teile.
///
/// Vollständige Kopie von Punkten und Split-Ankern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub points: Vec<Vec2>,
    pub split_anchors: SplitAnchors,
}

impl Snapshot {
    /// Erstellt einen Snapshot des aktuellen Modells.
    pub fn from_model(model: &CurveModel) -> Self {
        Self {
            points: model.points().to_vec(),
            split_anchors: model.split_anchors().clone(),
        }
    }

    /// Stellt den Snapshot im Modell wieder her (neue Revision).
    pub fn apply_to(self, model: &mut CurveModel) {
        model.replace(self.points, self.split_anchors);
    }
}

/// Einfacher Undo/Redo-Manager mit Snapshotting.
#[derive(Debug, Default)]
pub struct EditHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::with_capacity(max_depth),
            max_depth,
        }
    }

    /// Baut eine History aus gesicherten Stacks wieder auf (Backup-Restore).
    /// Überzählige alte Einträge werden verworfen.
    pub fn from_stacks(max_depth: usize, undo: Vec<Snapshot>, redo: Vec<Snapshot>) -> Self {
        let mut history = Self::new_with_capacity(max_depth);
        let skip_undo = undo.len().saturating_sub(history.max_depth);
        let skip_redo = redo.len().saturating_sub(history.max_depth);
        history.undo_stack.extend(undo.into_iter().skip(skip_undo));
        history.redo_stack.extend(redo.into_iter().skip(skip_redo));
        history
    }

    /// Beide Stacks, älteste Einträge zuerst.
    pub fn stacks(&self) -> (&[Snapshot], &[Snapshot]) {
        (&self.undo_stack, &self.redo_stack)
    }

    /// Speichert einen Snapshot vor einer Mutation und leert den Redo-Stack.
    pub fn record_snapshot(&mut self, snap: Snapshot) {
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(snap);
        self.redo_stack.clear();
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop undo stack and push `current` onto redo stack; returns the snapshot to apply.
    pub fn pop_undo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo_stack.pop()?;
        if self.redo_stack.len() >= self.max_depth {
            self.redo_stack.remove(0);
        }
        self.redo_stack.push(current);
        Some(prev)
    }

    /// Pop redo stack and push `current` onto undo stack; returns the snapshot to apply.
    pub fn pop_redo_with_current(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(current);
        Some(next)
    }
}
