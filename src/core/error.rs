//! Fehler, die eine Benutzeraktion ablehnen, ohne den Zustand zu verändern.

use thiserror::Error;

/// Abgelehnte Bearbeitungsaktion.
///
/// Alle Varianten sind nicht fatal: das Modell bleibt im letzten gültigen
/// Zustand, die UI zeigt den Text als Hinweis an.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// Löschen würde weniger als zwei Ankerpunkte übrig lassen
    #[error("Eine Kurve braucht mindestens 2 Ankerpunkte")]
    MinimumSize,
    /// Einfügen: kein Kurvenabschnitt nah genug an der Position
    #[error("Kein Abschnitt in Reichweite der Einfügeposition")]
    NoSegmentInRange,
    /// Aktion braucht mindestens zwei Punkte
    #[error("Zu wenige Ankerpunkte für diese Aktion")]
    NotEnoughPoints,
    /// Index zeigt hinter das Ende der Punktliste
    #[error("Ankerindex {index} außerhalb von 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Aktion ist nur für Split-Anker definiert
    #[error("Anker {0} ist kein Split-Anker")]
    NotASplitAnchor(usize),
    /// Kein Kurvenpunkt innerhalb der Hervorhebungs-Schwelle
    #[error("Kein Kurvenpunkt unter dem Cursor")]
    NoCurvePointInRange,
    #[error("Nichts zum Rückgängigmachen")]
    NothingToUndo,
    #[error("Nichts zum Wiederherstellen")]
    NothingToRedo,
}
