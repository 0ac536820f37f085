//! Einfluss-gewichtete Verformung: Ziehen an einem Kurvenpunkt verschiebt die
//! Anker des zugehörigen Segments gemäß ihrer Bernstein-Gewichte.
//!
//! Segment und lokales `t` werden beim Drücken einmal bestimmt und bleiben für
//! die ganze Geste fest, auch wenn sich die Kurve unter dem Cursor verändert.

use crate::core::{bernstein_basis, segment_sample_ranges, CurveModel, SegmentRange};
use glam::Vec2;

pub use crate::shared::options::DEFORM_SENSITIVITY;

/// Index des nächstgelegenen Abtastpunkts innerhalb von `threshold`.
pub fn locate(samples: &[Vec2], position: Vec2, threshold: f32) -> Option<usize> {
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| (i, s.distance(position)))
        .filter(|&(_, dist)| dist <= threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Ordnet einen globalen Abtastindex seinem Segment und lokalen `t` zu.
///
/// Randindizes gehören zum früheren Segment (`t = 1`).
pub fn resolve_segment(
    model: &CurveModel,
    global_index: usize,
    resolution: usize,
) -> Option<(SegmentRange, f32)> {
    let resolution = resolution.max(1);
    let segments = model.segments();
    segment_sample_ranges(segments.len(), resolution)
        .into_iter()
        .zip(segments)
        .find(|((start, end), _)| (*start..=*end).contains(&global_index))
        .map(|((start, _), segment)| {
            (segment, (global_index - start) as f32 / resolution as f32)
        })
}

/// Gewicht jedes Ankers für eine Verformung bei `t`.
///
/// Mit Segment: Bernstein-Gewichte innerhalb des Segments, sonst 0.
/// Ohne Segment: Gewichte über die gesamte Punktfolge.
pub fn influences(model: &CurveModel, segment: Option<SegmentRange>, t: f32) -> Vec<f32> {
    let len = model.len();
    match segment {
        Some(range) if range.end < len => (0..len)
            .map(|i| {
                if range.contains(i) {
                    bernstein_basis(range.degree(), i - range.start, t)
                } else {
                    0.0
                }
            })
            .collect(),
        _ => {
            let degree = len.saturating_sub(1);
            (0..len).map(|i| bernstein_basis(degree, i, t)).collect()
        }
    }
}

/// Verschiebt jeden Anker um `delta · Gewicht · sensitivity`.
pub fn apply_drag(
    model: &mut CurveModel,
    segment: Option<SegmentRange>,
    t: f32,
    delta: Vec2,
    sensitivity: f32,
) {
    if model.is_empty() || delta == Vec2::ZERO {
        return;
    }
    let offsets: Vec<Vec2> = influences(model, segment, t)
        .into_iter()
        .map(|w| delta * w * sensitivity)
        .collect();
    model.apply_offsets(0, &offsets);
}

/// Beim Drücken fixierte Parameter einer Verformungsgeste.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformLock {
    /// Abtastindex, an dem die Geste begann
    pub sample_index: usize,
    /// Besitzendes Segment; `None` → ganze Punktfolge
    pub segment: Option<SegmentRange>,
    pub t: f32,
    /// Cursorposition beim letzten Schritt (inkrementelles Delta)
    pub last_cursor: Vec2,
}

/// Zustandsmaschine Idle → Armed → Dragging → Idle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DeformGesture {
    #[default]
    Idle,
    Armed(DeformLock),
    Dragging(DeformLock),
}

impl DeformGesture {
    /// Startet die Geste, wenn ein Kurvenpunkt innerhalb von `threshold` liegt.
    pub fn press(
        &mut self,
        model: &CurveModel,
        samples: &[Vec2],
        cursor: Vec2,
        threshold: f32,
        resolution: usize,
    ) -> bool {
        let Some(sample_index) = locate(samples, cursor, threshold) else {
            return false;
        };
        let (segment, t) = match resolve_segment(model, sample_index, resolution) {
            Some((segment, t)) => (Some(segment), t),
            None => {
                let last = samples.len().saturating_sub(1).max(1);
                (None, (sample_index as f32 / last as f32).clamp(0.0, 1.0))
            }
        };
        *self = Self::Armed(DeformLock {
            sample_index,
            segment,
            t,
            last_cursor: cursor,
        });
        true
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed(_))
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn lock(&self) -> Option<&DeformLock> {
        match self {
            Self::Idle => None,
            Self::Armed(lock) | Self::Dragging(lock) => Some(lock),
        }
    }

    /// Wendet das Delta seit dem letzten Schritt an. `false` im Idle-Zustand.
    pub fn drag(&mut self, model: &mut CurveModel, cursor: Vec2, sensitivity: f32) -> bool {
        let Some(mut lock) = self.lock().copied() else {
            return false;
        };
        let delta = cursor - lock.last_cursor;
        apply_drag(model, lock.segment, lock.t, delta, sensitivity);
        lock.last_cursor = cursor;
        *self = Self::Dragging(lock);
        true
    }

    /// Beendet die Geste; `true`, wenn tatsächlich gezogen wurde.
    pub fn release(&mut self) -> bool {
        let was_dragging = matches!(self, Self::Dragging(_));
        *self = Self::Idle;
        was_dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{sample_curve, SplitAnchors};
    use approx::assert_relative_eq;

    fn split_model() -> CurveModel {
        CurveModel::from_parts(
            vec![
                Vec2::ZERO,
                Vec2::new(10.0, 20.0),
                Vec2::new(20.0, 0.0),
                Vec2::new(30.0, 20.0),
                Vec2::new(40.0, 0.0),
            ],
            [2].into_iter().collect(),
        )
    }

    #[test]
    fn locate_respects_threshold() {
        let samples = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)];
        assert_eq!(locate(&samples, Vec2::new(9.0, 2.0), 5.0), Some(1));
        assert_eq!(locate(&samples, Vec2::new(9.0, 20.0), 5.0), None);
    }

    #[test]
    fn boundary_sample_belongs_to_earlier_segment() {
        let model = split_model();
        let (segment, t) = resolve_segment(&model, 10, 10).unwrap();
        assert_eq!(segment, SegmentRange::new(0, 2));
        assert_relative_eq!(t, 1.0);

        let (segment, t) = resolve_segment(&model, 15, 10).unwrap();
        assert_eq!(segment, SegmentRange::new(2, 4));
        assert_relative_eq!(t, 0.5);
        assert!(resolve_segment(&model, 21, 10).is_none());
    }

    #[test]
    fn drag_only_moves_owning_segment() {
        let mut model = split_model();
        let before = model.points().to_vec();
        apply_drag(
            &mut model,
            Some(SegmentRange::new(2, 4)),
            0.5,
            Vec2::new(0.0, 10.0),
            DEFORM_SENSITIVITY,
        );
        assert_eq!(&model.points()[..2], &before[..2]);
        // n=2, t=0.5 → Gewichte 0.25 / 0.5 / 0.25, Verstärkung 2
        assert_relative_eq!(model.points()[2].y, 5.0, epsilon = 1e-5);
        assert_relative_eq!(model.points()[3].y, 30.0, epsilon = 1e-5);
        assert_relative_eq!(model.points()[4].y, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn missing_segment_falls_back_to_whole_curve() {
        let model = CurveModel::from_parts(vec![Vec2::ZERO, Vec2::X, Vec2::Y], SplitAnchors::new());
        let weights = influences(&model, None, 0.5);
        assert_eq!(weights.len(), 3);
        assert_relative_eq!(weights.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn gesture_locks_segment_and_applies_incremental_delta() {
        let mut model = split_model();
        let samples = sample_curve(model.points(), model.split_anchors(), 10).unwrap();
        let grab = samples[15];

        let mut gesture = DeformGesture::default();
        assert!(gesture.press(&model, &samples, grab, 5.0, 10));
        assert!(gesture.is_armed());
        let lock = *gesture.lock().unwrap();
        assert_eq!(lock.segment, Some(SegmentRange::new(2, 4)));

        assert!(gesture.drag(&mut model, grab + Vec2::new(0.0, 2.0), DEFORM_SENSITIVITY));
        assert!(gesture.drag(&mut model, grab + Vec2::new(0.0, 4.0), DEFORM_SENSITIVITY));
        // Zwei Schritte à 2 Einheiten → gesamt 4 · 0.5 · 2 am mittleren Anker
        assert_relative_eq!(model.points()[3].y, 24.0, epsilon = 1e-4);
        assert_eq!(gesture.lock().unwrap().segment, lock.segment);

        assert!(gesture.release());
        assert_eq!(gesture, DeformGesture::Idle);
    }

    #[test]
    fn press_without_nearby_sample_stays_idle() {
        let model = split_model();
        let samples = sample_curve(model.points(), model.split_anchors(), 10).unwrap();
        let mut gesture = DeformGesture::default();
        assert!(!gesture.press(&model, &samples, Vec2::new(500.0, 500.0), 5.0, 10));
        assert!(!gesture.is_active());
        assert!(!gesture.release());
    }
}
