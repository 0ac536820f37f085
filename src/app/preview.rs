//! Vorschau von Einfüge-/Löschaktionen, ohne das Modell zu verändern.
//!
//! Jede Vorschau arbeitet auf einer Kopie des Modells und nutzt dieselben
//! Einfüge-/Lösch-Routinen (inkl. Split-Anker-Nachführung) wie die echte Aktion.

use crate::core::{sample_curve, CurveModel, SplitAnchors};
use glam::Vec2;

/// Art der Vorschau.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Einfügen zwischen zwei bestehenden Ankern
    InsertBetween,
    /// Verlängern am Kopf oder Ende
    InsertEnd,
    Delete,
}

/// Ergebnis einer Vorschau: Kandidatenkurve und Abweichung zur bestehenden.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePreview {
    pub kind: PreviewKind,
    /// Index des eingefügten bzw. gelöschten Ankers
    pub index: usize,
    pub points: Vec<Vec2>,
    pub split_anchors: SplitAnchors,
    pub samples: Vec<Vec2>,
    /// Abstand Vorschau-Abtastpunkt i ↔ bestehender Abtastpunkt i (0 ohne Gegenstück)
    pub offsets: Vec<f32>,
    /// Bestehendes Ankerpaar, zwischen dem eingefügt wird
    pub highlighted_pair: Option<(usize, usize)>,
}

impl CurvePreview {
    /// Größte Abweichung, Bezugsgröße für die Farbskala der Vorschau.
    pub fn max_offset(&self) -> f32 {
        self.offsets.iter().copied().fold(0.0, f32::max)
    }
}

/// Plant Vorschauen gegen den bestehenden Zustand und dessen Abtastung.
pub struct PreviewPlanner<'a> {
    model: &'a CurveModel,
    committed: &'a [Vec2],
    resolution: usize,
}

impl<'a> PreviewPlanner<'a> {
    pub fn new(model: &'a CurveModel, committed: &'a [Vec2], resolution: usize) -> Self {
        Self {
            model,
            committed,
            resolution,
        }
    }

    /// Vorschau für das Einfügen zwischen dem nächstgelegenen Ankerpaar.
    pub fn insert_nearest(&self, position: Vec2, threshold: f32) -> Option<CurvePreview> {
        if self.model.len() < 2 {
            return None;
        }
        let index = self.model.nearest_insert_index(position, threshold)?;
        let mut candidate = self.model.clone();
        candidate.insert_at(index, position).ok()?;
        self.finish(
            candidate,
            PreviewKind::InsertBetween,
            index,
            Some((index - 1, index)),
        )
    }

    /// Vorschau für das Verlängern am näheren Ende.
    pub fn insert_end(&self, position: Vec2) -> Option<CurvePreview> {
        if self.model.len() < 2 {
            return None;
        }
        let mut candidate = self.model.clone();
        let index = candidate.insert_end_nearest(position).ok()?;
        self.finish(candidate, PreviewKind::InsertEnd, index, None)
    }

    /// Vorschau für das Löschen von `index`; nur solange mehr als zwei Anker existieren.
    pub fn delete(&self, index: usize) -> Option<CurvePreview> {
        let mut candidate = self.model.clone();
        candidate.delete_at(index).ok()?;
        self.finish(candidate, PreviewKind::Delete, index, None)
    }

    fn finish(
        &self,
        candidate: CurveModel,
        kind: PreviewKind,
        index: usize,
        highlighted_pair: Option<(usize, usize)>,
    ) -> Option<CurvePreview> {
        let samples = sample_curve(candidate.points(), candidate.split_anchors(), self.resolution)?;
        let offsets = samples
            .iter()
            .enumerate()
            .map(|(i, s)| self.committed.get(i).map_or(0.0, |c| c.distance(*s)))
            .collect();
        Some(CurvePreview {
            kind,
            index,
            points: candidate.points().to_vec(),
            split_anchors: candidate.split_anchors().clone(),
            samples,
            offsets,
            highlighted_pair,
        })
    }
}
