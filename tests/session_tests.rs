//! Integrationstests für die Editor-Sitzung:
//! - Undo/Redo über Löschen, Einfügen und Split-Anker
//! - Begrenzte History-Tiefe
//! - Einfluss-Verformung mit Split-Ankern
//! - Automatische Sicherung

use glam::Vec2;
use osu_slider_editor::app::backup;
use osu_slider_editor::{EditError, EditorOptions, EditorSession};

fn session(options: EditorOptions) -> EditorSession {
    EditorSession::new(options, Vec2::new(1280.0, 720.0))
}

/// Sitzung mit fünf Ankern auf einer flachen Zickzack-Linie.
fn zigzag(options: EditorOptions) -> EditorSession {
    let mut s = session(options);
    for i in 0..5 {
        let y = if i % 2 == 0 { 360.0 } else { 330.0 };
        s.append_point(Vec2::new(400.0 + i as f32 * 120.0, y));
    }
    s
}

#[test]
fn delete_then_undo_restores_points_and_splits() {
    let mut s = zigzag(EditorOptions::default());
    s.toggle_split(1).unwrap();
    s.toggle_split(3).unwrap();
    let points = s.model().points().to_vec();
    let splits = s.model().split_anchors().clone();

    s.delete_point(1).unwrap();
    assert_eq!(s.model().split_anchors().iter().collect::<Vec<_>>(), vec![2]);

    s.undo().unwrap();
    assert_eq!(s.model().points(), points.as_slice());
    assert_eq!(s.model().split_anchors(), &splits);
}

#[test]
fn insert_then_delete_restores_split_set() {
    let mut s = zigzag(EditorOptions::default());
    s.toggle_split(2).unwrap();
    let splits = s.model().split_anchors().clone();

    let index = s.insert_nearest(Vec2::new(460.0, 350.0)).unwrap();
    assert_eq!(index, 1);
    assert_eq!(s.model().split_anchors().iter().collect::<Vec<_>>(), vec![3]);

    s.delete_point(index).unwrap();
    assert_eq!(s.model().split_anchors(), &splits);
}

#[test]
fn history_depth_two_allows_two_undos() {
    let options = EditorOptions {
        history_depth: 2,
        ..EditorOptions::default()
    };
    let mut s = zigzag(options);
    for step in 1..=3 {
        s.move_point(2, Vec2::new(640.0, 360.0 + step as f32 * 10.0))
            .unwrap();
    }
    assert!(s.undo().is_ok());
    assert!(s.undo().is_ok());
    assert_eq!(s.undo(), Err(EditError::NothingToUndo));
    assert_eq!(s.model().point(2), Some(Vec2::new(640.0, 370.0)));
}

#[test]
fn new_mutation_clears_redo() {
    let mut s = zigzag(EditorOptions::default());
    s.move_point(0, Vec2::new(390.0, 360.0)).unwrap();
    s.undo().unwrap();
    assert!(s.can_redo());
    s.toggle_split(2).unwrap();
    assert!(!s.can_redo());
    assert_eq!(s.redo(), Err(EditError::NothingToRedo));
}

#[test]
fn deform_with_split_leaves_other_segment_untouched() {
    let mut s = zigzag(EditorOptions::default());
    s.toggle_split(2).unwrap();
    let before = s.model().points().to_vec();

    // Kurvenpunkt im zweiten Segment (Anker 2..=4) greifen
    let samples = s.samples().unwrap().to_vec();
    let grab = samples[samples.len() * 3 / 4];
    s.begin_deform(grab).unwrap();
    assert!(s.deform_to(grab + Vec2::new(0.0, -25.0)));
    assert!(s.end_deform());

    let after = s.model().points();
    assert_eq!(&after[..2], &before[..2]);
    assert!(after[3].y < before[3].y);
}

#[test]
fn hover_influences_are_zero_outside_owning_segment() {
    let mut s = zigzag(EditorOptions::default());
    s.toggle_split(2).unwrap();
    let samples = s.samples().unwrap().to_vec();
    let weights = s.hover_influences(samples[samples.len() / 4]).unwrap();
    assert_eq!(weights.len(), 5);
    assert_eq!(weights[3], 0.0);
    assert_eq!(weights[4], 0.0);
    assert!(weights[1] > 0.0);
}

#[test]
fn constrained_drag_keeps_point_on_split_ray() {
    let mut s = zigzag(EditorOptions::default());
    s.toggle_split(2).unwrap();
    let split = s.model().point(2).unwrap();
    let start = s.model().point(3).unwrap();
    let dir = (start - split).normalize();

    s.begin_point_drag(3, true).unwrap();
    s.drag_point(Vec2::new(900.0, 200.0));
    s.end_point_drag();

    let moved = s.model().point(3).unwrap();
    assert!((moved - split).perp_dot(dir).abs() < 1e-3);
}

#[test]
fn auto_backup_written_after_threshold() {
    let path = std::env::temp_dir().join("osu_slider_editor_session_backup.bin");
    let _ = std::fs::remove_file(&path);
    let options = EditorOptions {
        backup_threshold: 3,
        ..EditorOptions::default()
    };
    let mut s = session(options).with_backup_file(path.clone());
    s.append_point(Vec2::new(100.0, 100.0));
    s.append_point(Vec2::new(200.0, 100.0));
    assert!(backup::read_backup(&path).unwrap().is_none());

    s.append_point(Vec2::new(300.0, 150.0));
    let restored = backup::read_backup(&path).unwrap().expect("Sicherung geschrieben");
    assert_eq!(restored.current.points.len(), 3);
    assert_eq!(restored.undo.len(), 3);

    let mut fresh = session(EditorOptions::default());
    fresh.restore_backup(restored);
    assert_eq!(fresh.model().len(), 3);
    fresh.undo().unwrap();
    assert_eq!(fresh.model().len(), 2);

    s.discard_backup().unwrap();
    assert!(!path.exists());
}
