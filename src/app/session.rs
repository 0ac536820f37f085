//! Editor-Sitzung: besitzt Modell, Evaluator, History und Gesten-Zustand.
//!
//! Jede Mutation läuft über [`EditorSession::commit`]: Snapshot vorher ziehen,
//! Operation ausführen, Snapshot nur ablegen, wenn sich die Revision geändert
//! hat. Gesten (Anker ziehen, Verformen) legen ihren Snapshot einmal beim
//! ersten echten Schritt ab.

use super::backup::{self, AutoBackup, BackupFile};
use super::deformer::{self, DeformGesture};
use super::history::{EditHistory, Snapshot};
use super::point_drag::PointDrag;
use super::preview::{CurvePreview, PreviewPlanner};
use crate::core::{CurveEvaluator, CurveModel, EditError, EditorRect, SplitAnchors};
use crate::osu::LinkedSlider;
use crate::shared::options::WHEEL_ZOOM_STEP;
use crate::shared::EditorOptions;
use glam::Vec2;
use std::path::PathBuf;

/// Gesamter Bearbeitungszustand eines Sliders.
pub struct EditorSession {
    model: CurveModel,
    evaluator: CurveEvaluator,
    history: EditHistory,
    options: EditorOptions,
    viewport: Vec2,
    rect: EditorRect,
    deform: DeformGesture,
    point_drag: Option<PointDrag>,
    /// Snapshot vor Beginn der laufenden Geste, abgelegt beim ersten Schritt
    gesture_snapshot: Option<Snapshot>,
    auto_backup: AutoBackup,
    backup_path: Option<PathBuf>,
    linked: Option<LinkedSlider>,
    initial_length: f32,
}

impl EditorSession {
    /// Neue leere Sitzung für einen Viewport der Größe `viewport`.
    ///
    /// Automatische Sicherung ist aus, bis [`Self::with_backup_file`] einen Pfad setzt.
    pub fn new(options: EditorOptions, viewport: Vec2) -> Self {
        Self {
            model: CurveModel::new(),
            evaluator: CurveEvaluator::new(options.curve_resolution),
            history: EditHistory::new_with_capacity(options.history_depth),
            rect: EditorRect::centered(viewport, options.rect_scale),
            viewport,
            deform: DeformGesture::Idle,
            point_drag: None,
            gesture_snapshot: None,
            auto_backup: AutoBackup::new(options.backup_threshold),
            backup_path: None,
            linked: None,
            initial_length: 0.0,
            options,
        }
    }

    /// Aktiviert die automatische Sicherung nach `path`.
    pub fn with_backup_file(mut self, path: PathBuf) -> Self {
        self.backup_path = Some(path);
        self
    }

    // ── Lesezugriffe ────────────────────────────────────────────────

    pub fn model(&self) -> &CurveModel {
        &self.model
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn rect(&self) -> &EditorRect {
        &self.rect
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn resolution(&self) -> usize {
        self.evaluator.resolution()
    }

    /// Abtastpunkte der aktuellen Kurve (Cache wird bei Bedarf neu gebaut).
    pub fn samples(&mut self) -> Option<&[Vec2]> {
        self.evaluator.samples(&self.model)
    }

    /// Länge der abgetasteten Kurve in Editor-Einheiten.
    pub fn curve_length(&mut self) -> f32 {
        self.evaluator.length(&self.model)
    }

    /// Länge beim Laden des Sliders (Referenz für "auf Ausgangslänge skalieren").
    pub fn initial_length(&self) -> f32 {
        self.initial_length
    }

    /// Strichbreite des Sliders im aktuellen Rahmen.
    pub fn stroke_width(&self) -> f32 {
        self.rect.stroke_width(self.options.circle_size)
    }

    /// Schwelle, ab der ein Kurvenpunkt als "unter dem Cursor" gilt.
    pub fn highlight_threshold(&self) -> f32 {
        self.options.highlight_threshold(self.stroke_width())
    }

    fn insert_threshold(&self) -> f32 {
        self.options.insert_threshold(self.rect.height())
    }

    /// Nächster Anker innerhalb des Pick-Radius.
    pub fn pick_point(&self, position: Vec2) -> Option<usize> {
        self.model.nearest_point(position, self.options.pick_radius)
    }

    pub fn linked(&self) -> Option<&LinkedSlider> {
        self.linked.as_ref()
    }

    pub fn set_linked(&mut self, linked: Option<LinkedSlider>) {
        self.linked = linked;
    }

    /// Entnimmt die Verknüpfung (nach erfolgreichem Rückschreiben).
    pub fn take_linked(&mut self) -> Option<LinkedSlider> {
        self.linked.take()
    }

    // ── Commit / History ────────────────────────────────────────────

    fn commit<T>(
        &mut self,
        action: &str,
        op: impl FnOnce(&mut CurveModel) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        // Laufende Gesten halten Indizes und Segmente des alten Zustands
        self.cancel_gestures();
        let before = Snapshot::from_model(&self.model);
        let revision = self.model.revision();
        let result = op(&mut self.model);
        match &result {
            Ok(_) => self.finish_commit(action, before, revision),
            Err(e) => log::info!("{} abgelehnt: {}", action, e),
        }
        result
    }

    /// Wie [`Self::commit`] für Operationen ohne Ablehnungsfall.
    fn commit_infallible(&mut self, action: &str, op: impl FnOnce(&mut CurveModel)) {
        self.cancel_gestures();
        let before = Snapshot::from_model(&self.model);
        let revision = self.model.revision();
        op(&mut self.model);
        self.finish_commit(action, before, revision);
    }

    fn finish_commit(&mut self, action: &str, before: Snapshot, revision: u64) {
        if self.model.revision() != revision {
            self.record(before);
            log::debug!("{}: {} Anker", action, self.model.len());
        } else {
            log::debug!("{}: keine Änderung", action);
        }
    }

    fn record(&mut self, snapshot: Snapshot) {
        self.history.record_snapshot(snapshot);
        if self.auto_backup.tick() {
            self.write_backup();
        }
    }

    fn write_backup(&self) {
        let Some(path) = &self.backup_path else {
            return;
        };
        let file = BackupFile::new(Snapshot::from_model(&self.model), &self.history);
        if let Err(e) = backup::write_backup(path, &file) {
            log::warn!("Automatische Sicherung fehlgeschlagen: {:#}", e);
        }
    }

    /// Legt den Gesten-Snapshot ab, falls noch nicht geschehen.
    fn record_gesture_step(&mut self) {
        if let Some(snapshot) = self.gesture_snapshot.take() {
            self.record(snapshot);
        }
    }

    /// Macht den letzten Schritt rückgängig.
    pub fn undo(&mut self) -> Result<(), EditError> {
        self.cancel_gestures();
        let current = Snapshot::from_model(&self.model);
        match self.history.pop_undo_with_current(current) {
            Some(prev) => {
                prev.apply_to(&mut self.model);
                log::info!("Undo ausgeführt");
                Ok(())
            }
            None => {
                log::debug!("Undo: nichts zu tun");
                Err(EditError::NothingToUndo)
            }
        }
    }

    /// Stellt den zuletzt rückgängig gemachten Schritt wieder her.
    pub fn redo(&mut self) -> Result<(), EditError> {
        self.cancel_gestures();
        let current = Snapshot::from_model(&self.model);
        match self.history.pop_redo_with_current(current) {
            Some(next) => {
                next.apply_to(&mut self.model);
                log::info!("Redo ausgeführt");
                Ok(())
            }
            None => {
                log::debug!("Redo: nichts zu tun");
                Err(EditError::NothingToRedo)
            }
        }
    }

    // ── Anker bearbeiten ────────────────────────────────────────────

    /// Hängt einen Anker ans Ende an (Klick ins Leere).
    pub fn append_point(&mut self, position: Vec2) {
        self.commit_infallible("Anker anhängen", |m| m.append(position));
    }

    /// Fügt zwischen dem nächstgelegenen Ankerpaar ein.
    pub fn insert_nearest(&mut self, position: Vec2) -> Result<usize, EditError> {
        let threshold = self.insert_threshold();
        self.commit("Anker einfügen", |m| m.insert_nearest(position, threshold))
    }

    /// Verlängert die Kurve am näheren Ende.
    pub fn insert_end(&mut self, position: Vec2) -> Result<usize, EditError> {
        if self.model.len() < 2 {
            return Err(EditError::NotEnoughPoints);
        }
        self.commit("Kopf/Ende anfügen", |m| m.insert_end_nearest(position))
    }

    pub fn delete_point(&mut self, index: usize) -> Result<Vec2, EditError> {
        self.commit("Anker löschen", |m| m.delete_at(index))
    }

    pub fn toggle_split(&mut self, index: usize) -> Result<bool, EditError> {
        self.commit("Split-Anker umschalten", |m| m.toggle_split(index))
    }

    pub fn balance_split(&mut self, index: usize) -> Result<bool, EditError> {
        self.commit("Split-Anker ausgleichen", |m| m.balance_split(index))
    }

    pub fn align_split_neighbours(&mut self, index: usize) -> Result<bool, EditError> {
        self.commit("Split-Nachbarn ausrichten", |m| m.align_split_neighbours(index))
    }

    /// Setzt einen Anker direkt (ohne Geste, z.B. Tastatur-Nudge).
    pub fn move_point(&mut self, index: usize, position: Vec2) -> Result<(), EditError> {
        self.commit("Anker verschieben", |m| m.move_point(index, position))
    }

    // ── Ganze Kurve ─────────────────────────────────────────────────

    /// Verschiebt die Kurve (mittlere Maustaste). Eine Geste, ein Undo-Schritt.
    pub fn translate(&mut self, delta: Vec2) {
        self.commit_infallible("Kurve verschieben", |m| m.translate(delta));
    }

    pub fn rotate_about(&mut self, pivot: Vec2, angle: f32) {
        self.commit_infallible("Kurve drehen", |m| m.rotate_about(pivot, angle));
    }

    /// Mausrad: positive Rasten vergrößern, negative verkleinern (um die Viewport-Mitte).
    pub fn wheel_zoom(&mut self, steps: f32) {
        if steps == 0.0 {
            return;
        }
        let factor = if steps > 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            2.0 - WHEEL_ZOOM_STEP
        };
        let center = self.viewport * 0.5;
        self.commit_infallible("Kurve skalieren", |m| m.scale_about(center, factor));
    }

    /// Merkt die aktuelle Länge als Referenzlänge.
    pub fn reset_initial_length(&mut self) {
        self.initial_length = self.curve_length();
        log::info!("Referenzlänge gesetzt: {:.1}", self.initial_length);
    }

    /// Skaliert um den Slider-Kopf, bis die Länge der Referenzlänge entspricht.
    pub fn scale_to_initial_length(&mut self) -> Result<(), EditError> {
        if self.model.len() < 2 {
            return Err(EditError::NotEnoughPoints);
        }
        let current = self.curve_length();
        if current <= 0.0 || self.initial_length <= 0.0 {
            return Ok(());
        }
        let factor = self.initial_length / current;
        self.commit("Auf Referenzlänge skalieren", |m| {
            m.scale_from_head(factor);
            Ok(())
        })
    }

    /// Ersetzt die ganze Kurve (Import); als ein Undo-Schritt.
    pub fn replace_curve(&mut self, points: Vec<Vec2>, split_anchors: SplitAnchors) {
        self.commit_infallible("Kurve ersetzen", |m| m.replace(points, split_anchors));
    }

    // ── Ansicht ─────────────────────────────────────────────────────

    /// Ändert die Abtastauflösung; das Modell bleibt unverändert.
    pub fn set_resolution(&mut self, resolution: usize) {
        self.evaluator.set_resolution(resolution);
        self.options.curve_resolution = self.evaluator.resolution();
    }

    pub fn set_circle_size(&mut self, circle_size: f32) {
        self.options.circle_size = circle_size;
    }

    /// Neue Fenstergröße: Rahmen neu zentrieren, Kurve mitverschieben.
    pub fn resize_viewport(&mut self, viewport: Vec2) {
        let old_center = self.rect.center();
        self.viewport = viewport;
        let old_rect = self.rect;
        self.rect = EditorRect::centered(viewport, self.options.rect_scale);
        let factor = if old_rect.width() > 0.0 {
            self.rect.width() / old_rect.width()
        } else {
            1.0
        };
        let new_center = self.rect.center();
        self.commit_infallible("Viewport anpassen", |m| {
            m.scale_about(old_center, factor);
            m.translate(new_center - old_center);
        });
    }

    /// Ändert die Rahmengröße; die Kurve wird um die Viewport-Mitte mitskaliert,
    /// damit ihre osu!-Koordinaten gleich bleiben.
    pub fn set_rect_scale(&mut self, rect_scale: f32) {
        if rect_scale <= 0.0 || !rect_scale.is_finite() {
            return;
        }
        let factor = rect_scale / self.options.rect_scale;
        self.options.rect_scale = rect_scale;
        self.rect = EditorRect::centered(self.viewport, rect_scale);
        let center = self.viewport * 0.5;
        self.commit_infallible("Rahmen skalieren", |m| m.scale_about(center, factor));
    }

    // ── Anker ziehen ────────────────────────────────────────────────

    /// Beginnt das Ziehen eines Ankers. `constrained` bindet ihn an
    /// benachbarte Split-Anker.
    pub fn begin_point_drag(&mut self, index: usize, constrained: bool) -> Result<(), EditError> {
        let drag = PointDrag::begin(&self.model, index, constrained)?;
        self.cancel_gestures();
        self.point_drag = Some(drag);
        self.gesture_snapshot = Some(Snapshot::from_model(&self.model));
        Ok(())
    }

    /// Bewegt den gezogenen Anker; `false`, wenn nichts gezogen wird oder
    /// die Beschränkung keine Position liefert.
    pub fn drag_point(&mut self, cursor: Vec2) -> bool {
        let Some(drag) = self.point_drag else {
            return false;
        };
        let Some(target) = drag.target(&self.model, cursor) else {
            return false;
        };
        if self.model.point(drag.index) == Some(target) {
            return false;
        }
        self.record_gesture_step();
        self.model.move_point(drag.index, target).is_ok()
    }

    pub fn end_point_drag(&mut self) {
        self.point_drag = None;
        self.gesture_snapshot = None;
    }

    pub fn is_dragging_point(&self) -> bool {
        self.point_drag.is_some()
    }

    // ── Verformen ───────────────────────────────────────────────────

    /// Drücken: Kurvenpunkt unter dem Cursor suchen, Segment und `t` fixieren.
    pub fn begin_deform(&mut self, cursor: Vec2) -> Result<(), EditError> {
        if self.model.len() < 2 {
            return Err(EditError::NotEnoughPoints);
        }
        let threshold = self.highlight_threshold();
        let resolution = self.evaluator.resolution();
        let samples = self
            .evaluator
            .samples(&self.model)
            .ok_or(EditError::NotEnoughPoints)?;
        let mut gesture = DeformGesture::Idle;
        if !gesture.press(&self.model, samples, cursor, threshold, resolution) {
            return Err(EditError::NoCurvePointInRange);
        }
        self.cancel_gestures();
        self.deform = gesture;
        self.gesture_snapshot = Some(Snapshot::from_model(&self.model));
        Ok(())
    }

    /// Mausbewegung während der Verformung.
    pub fn deform_to(&mut self, cursor: Vec2) -> bool {
        if !self.deform.is_active() {
            return false;
        }
        if self.deform.lock().is_some_and(|l| l.last_cursor == cursor) {
            return false;
        }
        self.record_gesture_step();
        self.deform
            .drag(&mut self.model, cursor, self.options.deform_sensitivity)
    }

    /// Loslassen; `true`, wenn verformt wurde.
    pub fn end_deform(&mut self) -> bool {
        self.gesture_snapshot = None;
        self.deform.release()
    }

    pub fn deform_gesture(&self) -> &DeformGesture {
        &self.deform
    }

    fn cancel_gestures(&mut self) {
        self.point_drag = None;
        self.deform = DeformGesture::Idle;
        self.gesture_snapshot = None;
    }

    /// Einfluss-Gewichte der Anker für den Kurvenpunkt unter dem Cursor (Hover-Anzeige).
    pub fn hover_influences(&mut self, cursor: Vec2) -> Option<Vec<f32>> {
        let threshold = self.highlight_threshold();
        let resolution = self.evaluator.resolution();
        let samples = self.evaluator.samples(&self.model)?;
        let index = deformer::locate(samples, cursor, threshold)?;
        let (segment, t) = match deformer::resolve_segment(&self.model, index, resolution) {
            Some((segment, t)) => (Some(segment), t),
            None => (None, index as f32 / samples.len().saturating_sub(1).max(1) as f32),
        };
        Some(deformer::influences(&self.model, segment, t))
    }

    // ── Vorschau ────────────────────────────────────────────────────

    pub fn preview_insert_nearest(&mut self, position: Vec2) -> Option<CurvePreview> {
        let threshold = self.insert_threshold();
        let resolution = self.evaluator.resolution();
        let committed = self.evaluator.samples(&self.model)?;
        PreviewPlanner::new(&self.model, committed, resolution).insert_nearest(position, threshold)
    }

    pub fn preview_insert_end(&mut self, position: Vec2) -> Option<CurvePreview> {
        let resolution = self.evaluator.resolution();
        let committed = self.evaluator.samples(&self.model)?;
        PreviewPlanner::new(&self.model, committed, resolution).insert_end(position)
    }

    pub fn preview_delete(&mut self, index: usize) -> Option<CurvePreview> {
        let resolution = self.evaluator.resolution();
        let committed = self.evaluator.samples(&self.model)?;
        PreviewPlanner::new(&self.model, committed, resolution).delete(index)
    }

    // ── Sicherung ───────────────────────────────────────────────────

    /// Schreibt sofort eine Sicherung (unabhängig vom Zähler).
    pub fn save_backup(&self) -> anyhow::Result<()> {
        let Some(path) = &self.backup_path else {
            anyhow::bail!("Kein Backup-Pfad gesetzt");
        };
        let file = BackupFile::new(Snapshot::from_model(&self.model), &self.history);
        backup::write_backup(path, &file)
    }

    /// Stellt Kurve und History aus einer Sicherung wieder her.
    pub fn restore_backup(&mut self, file: BackupFile) {
        self.cancel_gestures();
        file.current.apply_to(&mut self.model);
        self.history = EditHistory::from_stacks(self.options.history_depth, file.undo, file.redo);
        self.linked = None;
        log::info!(
            "Sicherung wiederhergestellt: {} Anker, {} Undo-Schritte",
            self.model.len(),
            self.history.stacks().0.len()
        );
    }

    /// Löscht die Sicherungsdatei (reguläres Beenden).
    pub fn discard_backup(&self) -> anyhow::Result<()> {
        match &self.backup_path {
            Some(path) => backup::remove_backup(path),
            None => Ok(()),
        }
    }
}
