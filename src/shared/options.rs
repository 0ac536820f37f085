//! Zentrale Konfiguration für den osu! Slider-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Kurve ───────────────────────────────────────────────────────────

/// Abtastabschnitte pro Bézier-Segment.
pub const CURVE_RESOLUTION: usize = 100;
/// Verstärkung der Einfluss-Verformung.
pub const DEFORM_SENSITIVITY: f32 = 2.0;

// ── History / Backup ────────────────────────────────────────────────

/// Maximale Anzahl Undo-Schritte.
pub const HISTORY_DEPTH: usize = 20;
/// Nach so vielen bestätigten Änderungen wird automatisch gesichert.
pub const BACKUP_THRESHOLD: u32 = 5;
/// Dateiname der automatischen Sicherung (neben der Binary).
pub const BACKUP_FILE_NAME: &str = "osu_slider_editor_backup.bin";

// ── Interaktion ─────────────────────────────────────────────────────

/// Einfüge-Schwelle als Anteil der Rahmenhöhe.
pub const INSERT_DISTANCE_RATIO: f32 = 0.11;
/// Pick-Radius für Anker in Editor-Einheiten.
pub const PICK_RADIUS: f32 = 10.0;
/// Hervorhebungs-Schwelle als Anteil der Strichbreite.
pub const HIGHLIGHT_RATIO: f32 = 0.9;
/// Hervorhebungs-Schwelle ohne sichtbaren Strich.
pub const HIGHLIGHT_FALLBACK: f32 = 50.0;

// ── Rahmen ──────────────────────────────────────────────────────────

/// Breite des 4:3-Rahmens relativ zur Fensterbreite.
pub const RECT_SCALE: f32 = 0.75;
/// osu! Circle Size, bestimmt die Strichbreite des Sliders.
pub const CIRCLE_SIZE: f32 = 4.0;
/// Zoomfaktor pro Mausrad-Raste.
pub const WHEEL_ZOOM_STEP: f32 = 1.05;
/// Viewport, auf den sich die Kommandozeile ohne Angabe bezieht.
pub const DEFAULT_VIEWPORT: [f32; 2] = [1280.0, 720.0];

/// Laufzeit-Optionen des Editors, als TOML gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── Kurve ────────────────────────────────────────────────────
    /// Abtastabschnitte pro Segment
    pub curve_resolution: usize,
    /// Verstärkung der Verformung (Cursor-Delta × Gewicht × Faktor)
    pub deform_sensitivity: f32,

    // ── History / Backup ─────────────────────────────────────────
    /// Maximale Undo-Tiefe
    pub history_depth: usize,
    /// Änderungen bis zur nächsten automatischen Sicherung (0 = aus)
    pub backup_threshold: u32,
    /// Pfad der Sicherungsdatei; leer → neben der Binary
    #[serde(default)]
    pub backup_file: Option<PathBuf>,

    // ── Interaktion ──────────────────────────────────────────────
    /// Einfüge-Schwelle als Anteil der Rahmenhöhe
    pub insert_distance_ratio: f32,
    /// Pick-Radius für Anker
    pub pick_radius: f32,
    /// Hervorhebungs-Schwelle als Anteil der Strichbreite
    #[serde(default = "default_highlight_ratio")]
    pub highlight_ratio: f32,

    // ── Rahmen / osu! ────────────────────────────────────────────
    /// Breite des Editor-Rahmens relativ zur Fensterbreite
    pub rect_scale: f32,
    /// Circle Size der Beatmap (Strichbreite)
    #[serde(default = "default_circle_size")]
    pub circle_size: f32,
    /// osu! Songs-Verzeichnis für das Rückschreiben in Beatmaps
    #[serde(default)]
    pub osu_songs_path: Option<PathBuf>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            curve_resolution: CURVE_RESOLUTION,
            deform_sensitivity: DEFORM_SENSITIVITY,

            history_depth: HISTORY_DEPTH,
            backup_threshold: BACKUP_THRESHOLD,
            backup_file: None,

            insert_distance_ratio: INSERT_DISTANCE_RATIO,
            pick_radius: PICK_RADIUS,
            highlight_ratio: HIGHLIGHT_RATIO,

            rect_scale: RECT_SCALE,
            circle_size: CIRCLE_SIZE,
            osu_songs_path: None,
        }
    }
}

/// Serde-Default für `highlight_ratio` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_highlight_ratio() -> f32 {
    HIGHLIGHT_RATIO
}

fn default_circle_size() -> f32 {
    CIRCLE_SIZE
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> PathBuf {
        exe_dir().join("osu_slider_editor.toml")
    }

    /// Sicherungsdatei: konfigurierter Pfad oder Standardname neben der Binary.
    pub fn backup_path(&self) -> PathBuf {
        self.backup_file
            .clone()
            .unwrap_or_else(|| exe_dir().join(BACKUP_FILE_NAME))
    }

    /// Einfüge-Schwelle für einen Rahmen der Höhe `rect_height`.
    ///
    /// `rect_height * insert_distance_ratio`, ohne Rahmen der Fallback-Wert.
    pub fn insert_threshold(&self, rect_height: f32) -> f32 {
        if rect_height > 0.0 {
            rect_height * self.insert_distance_ratio
        } else {
            HIGHLIGHT_FALLBACK
        }
    }

    /// Hervorhebungs-Schwelle für Kurvenpunkte bei gegebener Strichbreite.
    pub fn highlight_threshold(&self, stroke_width: f32) -> f32 {
        if stroke_width > 0.0 {
            stroke_width * self.highlight_ratio
        } else {
            HIGHLIGHT_FALLBACK
        }
    }

    /// Prüft, ob das Songs-Verzeichnis gesetzt ist und existiert.
    pub fn songs_path_valid(&self) -> bool {
        self.osu_songs_path.as_ref().is_some_and(|p| p.is_dir())
    }
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_roundtrip_through_toml() {
        let opts = EditorOptions::default();
        let text = toml::to_string_pretty(&opts).unwrap();
        let back: EditorOptions = toml::from_str(&text).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn missing_optional_fields_fall_back() {
        let text = r#"
curve_resolution = 40
deform_sensitivity = 1.5
history_depth = 5
backup_threshold = 0
insert_distance_ratio = 0.2
pick_radius = 8.0
rect_scale = 0.5
"#;
        let opts: EditorOptions = toml::from_str(text).unwrap();
        assert_eq!(opts.curve_resolution, 40);
        assert_eq!(opts.highlight_ratio, HIGHLIGHT_RATIO);
        assert!(opts.osu_songs_path.is_none());
    }

    #[test]
    fn broken_file_yields_defaults() {
        let path = std::env::temp_dir().join("osu_slider_editor_options_broken.toml");
        std::fs::write(&path, "curve_resolution = \"viele\"").unwrap();
        assert_eq!(EditorOptions::load_from_file(&path), EditorOptions::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = std::env::temp_dir().join("osu_slider_editor_options_roundtrip.toml");
        let opts = EditorOptions {
            curve_resolution: 64,
            osu_songs_path: Some(PathBuf::from("/tmp/songs")),
            ..EditorOptions::default()
        };
        opts.save_to_file(&path).unwrap();
        assert_eq!(EditorOptions::load_from_file(&path), opts);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn thresholds_use_fallback_without_geometry() {
        let opts = EditorOptions::default();
        assert_eq!(opts.highlight_threshold(0.0), HIGHLIGHT_FALLBACK);
        assert!((opts.highlight_threshold(20.0) - 18.0).abs() < 1e-5);
        assert!((opts.insert_threshold(480.0) - 52.8).abs() < 1e-3);
    }
}
