//! Menge der Split-Anker ("rote Anker") mit zentraler Index-Nachführung.
//!
//! Jede Einfüge- und Löschoperation auf der Punktliste muss die Indizes hier
//! nachziehen. Das passiert ausschließlich über `shift_for_insert` und
//! `shift_for_delete`, damit Modell und Vorschau dieselbe Logik verwenden.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sortierte Menge von Punkt-Indizes, an denen die Kurve in unabhängige
/// Bézier-Segmente zerfällt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitAnchors(BTreeSet<usize>);

impl SplitAnchors {
    /// Erstellt eine leere Menge.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Prüft, ob `index` ein Split-Anker ist.
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Markiert `index` als Split-Anker. Gibt `true` zurück, wenn er neu war.
    pub fn insert(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    /// Entfernt die Markierung. Gibt `true` zurück, wenn sie vorhanden war.
    pub fn remove(&mut self, index: usize) -> bool {
        self.0.remove(&index)
    }

    /// Schaltet die Markierung um und liefert den neuen Zustand.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.0.remove(&index) {
            false
        } else {
            self.0.insert(index);
            true
        }
    }

    /// Aufsteigend sortierte Indizes.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nachführung nach dem Einfügen eines Punkts an `index`:
    /// alle Indizes `>= index` rücken um eins nach hinten.
    pub fn shift_for_insert(&mut self, index: usize) {
        self.0 = self
            .0
            .iter()
            .map(|&i| if i >= index { i + 1 } else { i })
            .collect();
    }

    /// Nachführung nach dem Löschen des Punkts an `index`:
    /// der Index selbst fällt weg, alle größeren rücken um eins nach vorn.
    pub fn shift_for_delete(&mut self, index: usize) {
        self.0 = self
            .0
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
    }

    /// Verwirft alle Indizes `>= len` (nach Import oder Backup-Restore).
    pub fn retain_below(&mut self, len: usize) {
        self.0.retain(|&i| i < len);
    }
}

impl FromIterator<usize> for SplitAnchors {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
