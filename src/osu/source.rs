//! Anbindung an den laufenden osu!-Editor und Rückschreiben in die Beatmap.

use super::parser::SliderMeta;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};

/// Präfix im Fenstertitel des osu!-Editors vor dem Beatmap-Dateinamen.
const PROCESS_TITLE_PREFIX: &str = "osu!  - ";

/// Liefert das aktuell im osu!-Editor ausgewählte Hit-Object.
///
/// Wird von außen injiziert (Prozess-Reader im Produktivbetrieb, feste
/// Werte in Tests).
pub trait SelectedPathSource {
    /// Textdarstellung des ersten ausgewählten Hit-Objects; `None` ohne Auswahl.
    fn selected_hit_object(&mut self) -> anyhow::Result<Option<String>>;
    /// Ordner der Beatmap relativ zum Songs-Verzeichnis.
    fn containing_folder(&mut self) -> anyhow::Result<String>;
    /// Fenstertitel, z.B. `osu!  - Artist - Title (Mapper) [Diff].osu`.
    fn process_title(&mut self) -> anyhow::Result<String>;
}

/// Verknüpfung zum zuletzt aus osu! gelesenen Slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedSlider {
    /// Zeile exakt wie gelesen, Suchschlüssel beim Rückschreiben
    pub original_line: String,
    pub meta: SliderMeta,
}

/// Beatmap-Dateiname aus dem Fenstertitel.
pub fn beatmap_file_name(process_title: &str) -> &str {
    process_title
        .split_once(PROCESS_TITLE_PREFIX)
        .map_or(process_title, |(_, rest)| rest)
        .trim()
}

/// `<songs>/<folder>/<datei aus fenstertitel>`
pub fn beatmap_path(songs_path: &Path, folder: &str, process_title: &str) -> PathBuf {
    songs_path.join(folder).join(beatmap_file_name(process_title))
}

/// Ersetzt das erste Vorkommen von `original` durch `replacement`.
pub fn replace_hit_object(content: &str, original: &str, replacement: &str) -> anyhow::Result<String> {
    if original.is_empty() || !content.contains(original) {
        bail!("Slider nicht in der Beatmap gefunden: {}", original);
    }
    Ok(content.replacen(original, replacement, 1))
}

/// Liest die Beatmap, ersetzt die Slider-Zeile und schreibt die Datei zurück.
///
/// Bei jedem Fehler bleibt die Datei unverändert.
pub fn write_back(path: &Path, original: &str, replacement: &str) -> anyhow::Result<()> {
    if !path.is_file() {
        bail!("Beatmap-Datei nicht gefunden: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Beatmap nicht lesbar: {}", path.display()))?;
    let updated = replace_hit_object(&content, original, replacement)?;
    std::fs::write(path, updated)
        .with_context(|| format!("Beatmap nicht schreibbar: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_taken_after_title_prefix() {
        assert_eq!(
            beatmap_file_name("osu!  - Artist - Song (Mapper) [Hard].osu"),
            "Artist - Song (Mapper) [Hard].osu"
        );
        assert_eq!(beatmap_file_name("  plain.osu "), "plain.osu");
    }

    #[test]
    fn beatmap_path_joins_songs_folder_and_file() {
        let path = beatmap_path(
            Path::new("/songs"),
            "123 Artist - Song",
            "osu!  - a.osu",
        );
        assert_eq!(path, Path::new("/songs/123 Artist - Song/a.osu"));
    }

    #[test]
    fn replace_only_first_occurrence() {
        let content = "x\nA\nA\n";
        assert_eq!(replace_hit_object(content, "A", "B").unwrap(), "x\nB\nA\n");
        assert!(replace_hit_object(content, "C", "B").is_err());
    }

    #[test]
    fn write_back_leaves_file_untouched_when_line_missing() {
        let path = std::env::temp_dir().join("osu_slider_editor_write_back.osu");
        std::fs::write(&path, "[HitObjects]\n1,2,3\n").unwrap();
        assert!(write_back(&path, "9,9,9", "0,0,0").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[HitObjects]\n1,2,3\n");

        write_back(&path, "1,2,3", "4,5,6").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[HitObjects]\n4,5,6\n");
        let _ = std::fs::remove_file(&path);
    }
}
