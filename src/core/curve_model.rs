//! Kurvenmodell: geordnete Ankerpunkte plus Split-Anker-Menge.
//!
//! Alle Mutationen prüfen ihre Vorbedingungen, bevor sie etwas verändern, und
//! erhöhen danach die Revision. Der Abtast-Cache des Evaluators hängt an
//! dieser Revision.

use super::evaluator::{segments_of, SegmentRange};
use super::geometry::{direction, point_to_segment_distance, project_onto_line, rotate_point};
use super::{EditError, SplitAnchors};
use glam::Vec2;
use std::sync::atomic::{AtomicU64, Ordering};

/// Mindestanzahl Ankerpunkte, unter die `delete_at` nicht löscht.
pub const MIN_POINTS: usize = 2;

static REVISION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Prozessweit eindeutige Revision; zwei Modelle teilen nie dieselbe.
fn next_revision() -> u64 {
    REVISION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Segmentierte Bézier-Kurve im Editor-Koordinatensystem.
#[derive(Debug, Clone)]
pub struct CurveModel {
    points: Vec<Vec2>,
    split_anchors: SplitAnchors,
    revision: u64,
}

impl Default for CurveModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for CurveModel {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.split_anchors == other.split_anchors
    }
}

impl CurveModel {
    /// Leeres Modell; der Benutzer setzt die ersten Anker per `append`.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            split_anchors: SplitAnchors::new(),
            revision: next_revision(),
        }
    }

    /// Baut ein Modell aus Punkten und Split-Ankern; ungültige Indizes fallen weg.
    pub fn from_parts(points: Vec<Vec2>, mut split_anchors: SplitAnchors) -> Self {
        split_anchors.retain_below(points.len());
        Self {
            points,
            split_anchors,
            revision: next_revision(),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn split_anchors(&self) -> &SplitAnchors {
        &self.split_anchors
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    pub fn is_split(&self, index: usize) -> bool {
        self.split_anchors.contains(index)
    }

    /// Revision des aktuellen Zustands (Cache-Schlüssel).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Segmentzerlegung des aktuellen Zustands.
    pub fn segments(&self) -> Vec<SegmentRange> {
        segments_of(self.points.len(), &self.split_anchors)
    }

    fn touch(&mut self) {
        self.revision = next_revision();
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(EditError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
        }
    }

    // ── Einfügen / Löschen ──────────────────────────────────────────

    /// Hängt einen Anker ans Ende an. Die Split-Menge bleibt unverändert.
    pub fn append(&mut self, point: Vec2) {
        self.points.push(point);
        self.touch();
    }

    /// Fügt einen Anker an `index` ein (`index == len` hängt an).
    pub fn insert_at(&mut self, index: usize, point: Vec2) -> Result<(), EditError> {
        if index > self.points.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.points.len(),
            });
        }
        self.points.insert(index, point);
        self.split_anchors.shift_for_insert(index);
        self.touch();
        Ok(())
    }

    /// Einfügeindex für `position`: Grenze des nächstgelegenen Punktpaars,
    /// sofern dessen Strecke höchstens `threshold` entfernt ist.
    pub fn nearest_insert_index(&self, position: Vec2, threshold: f32) -> Option<usize> {
        self.points
            .windows(2)
            .enumerate()
            .map(|(i, pair)| (i + 1, point_to_segment_distance(position, pair[0], pair[1])))
            .filter(|&(_, dist)| dist <= threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Fügt `position` zwischen dem nächstgelegenen Punktpaar ein.
    ///
    /// Liefert den neuen Index oder `NoSegmentInRange`, wenn kein Paar nah genug ist.
    pub fn insert_nearest(&mut self, position: Vec2, threshold: f32) -> Result<usize, EditError> {
        if self.points.len() < 2 {
            return Err(EditError::NotEnoughPoints);
        }
        let index = self
            .nearest_insert_index(position, threshold)
            .ok_or(EditError::NoSegmentInRange)?;
        self.insert_at(index, position)?;
        Ok(index)
    }

    /// Kopf (0) oder Ende (`len`), je nachdem welcher Endpunkt näher liegt.
    pub fn end_insert_index(&self, position: Vec2) -> Option<usize> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if position.distance_squared(*first) < position.distance_squared(*last) {
            Some(0)
        } else {
            Some(self.points.len())
        }
    }

    /// Verlängert die Kurve am näheren Ende um `position`.
    pub fn insert_end_nearest(&mut self, position: Vec2) -> Result<usize, EditError> {
        let index = self
            .end_insert_index(position)
            .ok_or(EditError::NotEnoughPoints)?;
        self.insert_at(index, position)?;
        Ok(index)
    }

    /// Entfernt den Anker an `index` und liefert seine Position.
    pub fn delete_at(&mut self, index: usize) -> Result<Vec2, EditError> {
        if self.points.len() <= MIN_POINTS {
            return Err(EditError::MinimumSize);
        }
        self.check_index(index)?;
        let removed = self.points.remove(index);
        self.split_anchors.shift_for_delete(index);
        self.touch();
        Ok(removed)
    }

    /// Schaltet die Split-Markierung an `index` um; liefert den neuen Zustand.
    pub fn toggle_split(&mut self, index: usize) -> Result<bool, EditError> {
        self.check_index(index)?;
        let now_split = self.split_anchors.toggle(index);
        self.touch();
        Ok(now_split)
    }

    // ── Verschieben ─────────────────────────────────────────────────

    /// Setzt einen Anker direkt auf `position`.
    pub fn move_point(&mut self, index: usize, position: Vec2) -> Result<(), EditError> {
        self.check_index(index)?;
        self.points[index] = position;
        self.touch();
        Ok(())
    }

    /// Richtet den Nachfolger eines Split-Ankers gegenüber dem Vorgänger aus:
    /// beide Nachbarn liegen danach kollinear und gleich weit entfernt.
    ///
    /// `Ok(false)` ohne Änderung, wenn ein Nachbar fehlt oder Vorgänger und
    /// Split-Anker zusammenfallen.
    pub fn balance_split(&mut self, index: usize) -> Result<bool, EditError> {
        self.check_index(index)?;
        if !self.split_anchors.contains(index) {
            return Err(EditError::NotASplitAnchor(index));
        }
        if index == 0 || index + 1 >= self.points.len() {
            return Ok(false);
        }
        let split = self.points[index];
        let prev = self.points[index - 1];
        let Some(dir) = direction(split, prev) else {
            return Ok(false);
        };
        self.points[index + 1] = split - dir * split.distance(prev);
        self.touch();
        Ok(true)
    }

    /// Projiziert beide Nachbarn eines Split-Ankers auf dessen Tangente
    /// (Richtung Vorgänger → Nachfolger). Glättet den Knick, ohne Abstände zu erzwingen.
    pub fn align_split_neighbours(&mut self, index: usize) -> Result<bool, EditError> {
        self.check_index(index)?;
        if !self.split_anchors.contains(index) {
            return Err(EditError::NotASplitAnchor(index));
        }
        if index == 0 || index + 1 >= self.points.len() {
            return Ok(false);
        }
        let split = self.points[index];
        let Some(dir) = direction(self.points[index - 1], self.points[index + 1]) else {
            return Ok(false);
        };
        self.points[index - 1] = project_onto_line(self.points[index - 1], split, dir);
        self.points[index + 1] = project_onto_line(self.points[index + 1], split, dir);
        self.touch();
        Ok(true)
    }

    /// Addiert Versätze ab `start` auf die Punkte; überzählige Einträge fallen weg.
    pub fn apply_offsets(&mut self, start: usize, offsets: &[Vec2]) {
        if start >= self.points.len() || offsets.is_empty() {
            return;
        }
        for (point, offset) in self.points[start..].iter_mut().zip(offsets) {
            *point += *offset;
        }
        self.touch();
    }

    // ── Ganze Kurve ─────────────────────────────────────────────────

    /// Verschiebt alle Punkte um `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        if self.points.is_empty() || delta == Vec2::ZERO {
            return;
        }
        for p in &mut self.points {
            *p += delta;
        }
        self.touch();
    }

    /// Dreht alle Punkte um `pivot` (Radiant).
    pub fn rotate_about(&mut self, pivot: Vec2, angle: f32) {
        if self.points.is_empty() || angle == 0.0 {
            return;
        }
        for p in &mut self.points {
            *p = rotate_point(*p, pivot, angle);
        }
        self.touch();
    }

    /// Skaliert alle Punkte gleichmäßig um `center`.
    pub fn scale_about(&mut self, center: Vec2, factor: f32) {
        if self.points.is_empty() || factor == 1.0 || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        for p in &mut self.points {
            *p = center + (*p - center) * factor;
        }
        self.touch();
    }

    /// Skaliert um den ersten Punkt (der Slider-Kopf bleibt liegen).
    pub fn scale_from_head(&mut self, factor: f32) {
        if let Some(head) = self.points.first().copied() {
            self.scale_about(head, factor);
        }
    }

    /// Ersetzt den kompletten Zustand (Undo/Redo, Import).
    pub fn replace(&mut self, points: Vec<Vec2>, mut split_anchors: SplitAnchors) {
        split_anchors.retain_below(points.len());
        self.points = points;
        self.split_anchors = split_anchors;
        self.touch();
    }

    /// Nächster Anker innerhalb von `radius` um `position`.
    pub fn nearest_point(&self, position: Vec2, radius: f32) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance(position)))
            .filter(|&(_, dist)| dist <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}
