//! Use-Case-Funktionen für Slider-Import und -Export.
//! Alle Dateisystem- und osu!-Zugriffe der Sitzung sind hier zentralisiert.

use super::EditorSession;
use crate::osu::{
    self, parse_hit_object, HitObjectLine, LinkedSlider, PathType, SelectedPathSource,
};
use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Lädt den im osu!-Editor ausgewählten Slider und verknüpft die Sitzung damit.
pub fn load_selected_slider(
    session: &mut EditorSession,
    source: &mut dyn SelectedPathSource,
) -> anyhow::Result<()> {
    let Some(line) = source
        .selected_hit_object()
        .context("Auswahl aus osu! nicht lesbar")?
    else {
        bail!("Kein Slider in osu! ausgewählt");
    };
    let hit = parse_hit_object(&line).context("Ausgewähltes Objekt ist kein unterstützter Slider")?;
    let (points, split_anchors) = hit.to_model(session.rect());

    log::info!(
        "Slider geladen: {} Anker, {} Split-Anker, Typ {}",
        points.len(),
        split_anchors.len(),
        hit.path_type.letter()
    );

    session.replace_curve(points, split_anchors);
    session.set_linked(Some(LinkedSlider {
        original_line: line.trim().to_string(),
        meta: hit.meta,
    }));
    session.reset_initial_length();
    Ok(())
}

/// Schreibt die aktuelle Kurve in die Beatmap-Datei des verknüpften Sliders.
///
/// Die Verknüpfung wird nur bei Erfolg verbraucht; vor dem nächsten
/// Rückschreiben muss der Slider erneut geladen werden.
pub fn save_slider_to_beatmap(
    session: &mut EditorSession,
    source: &mut dyn SelectedPathSource,
) -> anyhow::Result<PathBuf> {
    let Some(songs_path) = session.options().osu_songs_path.clone() else {
        bail!("osu! Songs-Verzeichnis ist nicht gesetzt");
    };
    if !session.options().songs_path_valid() {
        bail!("osu! Songs-Verzeichnis existiert nicht: {}", songs_path.display());
    }
    let Some(linked) = session.linked() else {
        bail!("Kein verknüpfter Slider, bitte zuerst aus osu! laden");
    };

    let model = session.model();
    let Some(hit) = HitObjectLine::from_model(
        model.points(),
        model.split_anchors(),
        session.rect(),
        linked.meta.clone(),
    ) else {
        bail!("Eine Kurve braucht mindestens 2 Ankerpunkte");
    };

    let folder = source.containing_folder().context("Beatmap-Ordner nicht lesbar")?;
    let title = source.process_title().context("Fenstertitel nicht lesbar")?;
    let path = osu::beatmap_path(&songs_path, &folder, &title);

    osu::write_back(&path, &linked.original_line, &hit.to_line())?;
    session.take_linked();
    log::info!("Slider in Beatmap geschrieben: {}", path.display());
    Ok(path)
}

/// Importiert eine Sliderdatei (eine Hit-Object-Zeile mit `B|`-Pfad).
///
/// Hebt eine bestehende osu!-Verknüpfung auf.
pub fn import_slider_file(session: &mut EditorSession, path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Sliderdatei nicht lesbar: {}", path.display()))?;
    let line = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default();
    let hit = parse_hit_object(line)
        .with_context(|| format!("Ungültige Sliderdatei: {}", path.display()))?;
    if hit.path_type != PathType::Bezier {
        bail!("Sliderdatei enthält keinen Bézier-Pfad: {}", path.display());
    }
    let (points, split_anchors) = hit.to_model(session.rect());

    session.set_linked(None);
    session.replace_curve(points, split_anchors);
    log::info!(
        "Sliderdatei importiert: {} ({} Anker)",
        path.display(),
        session.model().len()
    );
    Ok(())
}

/// Exportiert die Kurve als Sliderdatei.
///
/// Ohne Verknüpfung werden Platzhalter-Metadaten geschrieben.
pub fn export_slider_file(session: &EditorSession, path: &Path) -> anyhow::Result<()> {
    let meta = session
        .linked()
        .map(|l| l.meta.clone())
        .unwrap_or_default();
    let model = session.model();
    let Some(line) = osu::format_hit_object(model.points(), model.split_anchors(), session.rect(), meta)
    else {
        bail!("Für den Export werden mindestens 2 Ankerpunkte benötigt");
    };
    std::fs::write(path, format!("{}\n", line))
        .with_context(|| format!("Sliderdatei nicht schreibbar: {}", path.display()))?;
    log::info!("Sliderdatei exportiert: {}", path.display());
    Ok(())
}

/// Dateiname beim Schnellspeichern, z.B. `curve_2024_03_05_07_08_09.txt`.
pub fn quick_save_file_name(time: NaiveDateTime) -> String {
    time.format("curve_%Y_%m_%d_%H_%M_%S.txt").to_string()
}

/// Schnellspeichern: exportiert mit Zeitstempel-Namen nach `dir`.
pub fn quick_save(session: &EditorSession, dir: &Path) -> anyhow::Result<PathBuf> {
    let path = dir.join(quick_save_file_name(chrono::Local::now().naive_local()));
    export_slider_file(session, &path)?;
    Ok(path)
}
