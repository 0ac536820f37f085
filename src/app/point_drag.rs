//! Ziehen einzelner Anker, optional an benachbarte Split-Anker gebunden.

use crate::core::geometry::{direction, line_intersection, project_onto_line, tangent_at};
use crate::core::{CurveModel, EditError};
use glam::Vec2;

/// Bewegungsbeschränkung eines gezogenen Ankers, beim Drücken festgelegt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragConstraint {
    /// Anker folgt dem Cursor
    Free,
    /// Anker gleitet auf dem Strahl vom benachbarten Split-Anker durch seine Startposition
    LockedLine { origin: Vec2, direction: Vec2 },
    /// Beide Nachbarn sind Split-Anker: Anker springt auf den Schnittpunkt
    /// der beiden äußeren Tangenten
    TangentIntersection { prev_split: usize, next_split: usize },
}

/// Laufende Ziehgeste eines Ankers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointDrag {
    pub index: usize,
    pub constraint: DragConstraint,
}

impl PointDrag {
    /// Beginnt das Ziehen. Split-Anker selbst bewegen sich immer frei.
    pub fn begin(model: &CurveModel, index: usize, constrained: bool) -> Result<Self, EditError> {
        let Some(start) = model.point(index) else {
            return Err(EditError::IndexOutOfRange {
                index,
                len: model.len(),
            });
        };
        let free = Self {
            index,
            constraint: DragConstraint::Free,
        };
        if !constrained || model.is_split(index) {
            return Ok(free);
        }

        let prev_split = (index > 0 && model.is_split(index - 1)).then(|| index - 1);
        let next_split = (index + 1 < model.len() && model.is_split(index + 1)).then(|| index + 1);

        let constraint = match (prev_split, next_split) {
            (Some(prev_split), Some(next_split)) => DragConstraint::TangentIntersection {
                prev_split,
                next_split,
            },
            (Some(split), None) | (None, Some(split)) => {
                let origin = model.points()[split];
                match direction(origin, start) {
                    Some(direction) => DragConstraint::LockedLine { origin, direction },
                    None => DragConstraint::Free,
                }
            }
            (None, None) => DragConstraint::Free,
        };
        Ok(Self { index, constraint })
    }

    /// Zielposition für den aktuellen Cursor; `None` → Anker bleibt liegen.
    pub fn target(&self, model: &CurveModel, cursor: Vec2) -> Option<Vec2> {
        match self.constraint {
            DragConstraint::Free => Some(cursor),
            DragConstraint::LockedLine { origin, direction } => {
                Some(project_onto_line(cursor, origin, direction))
            }
            DragConstraint::TangentIntersection {
                prev_split,
                next_split,
            } => {
                let points = model.points();
                let prev = *points.get(prev_split)?;
                let next = *points.get(next_split)?;
                let prev_dir = match prev_split.checked_sub(1).and_then(|i| points.get(i)) {
                    Some(&outer) => direction(outer, prev),
                    None => tangent_at(points, prev_split),
                }?;
                let next_dir = match points.get(next_split + 1) {
                    Some(&outer) => direction(outer, next),
                    None => tangent_at(points, next_split),
                }?;
                line_intersection(prev, prev_dir, next, next_dir)
            }
        }
    }
}
