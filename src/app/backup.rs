//! Automatische Sicherung von Kurve und History als Binärdatei (bincode).

use super::history::{EditHistory, Snapshot};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Kennung am Dateianfang; andere Inhalte werden beim Laden abgelehnt.
const BACKUP_MAGIC: &str = "OSB1";

/// Inhalt einer Sicherungsdatei.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
    magic: String,
    pub current: Snapshot,
    pub undo: Vec<Snapshot>,
    pub redo: Vec<Snapshot>,
}

impl BackupFile {
    pub fn new(current: Snapshot, history: &EditHistory) -> Self {
        let (undo, redo) = history.stacks();
        Self {
            magic: BACKUP_MAGIC.to_string(),
            current,
            undo: undo.to_vec(),
            redo: redo.to_vec(),
        }
    }
}

/// Schreibt die Sicherung (überschreibt eine vorhandene Datei).
pub fn write_backup(path: &Path, backup: &BackupFile) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Backup-Datei nicht anlegbar: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, backup)
        .with_context(|| format!("Backup nicht schreibbar: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Backup nicht vollständig geschrieben: {}", path.display()))?;
    log::debug!("Backup geschrieben: {}", path.display());
    Ok(())
}

/// Liest eine Sicherung. `Ok(None)`, wenn keine Datei existiert.
pub fn read_backup(path: &Path) -> anyhow::Result<Option<BackupFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read(path)
        .with_context(|| format!("Backup nicht lesbar: {}", path.display()))?;
    let backup: BackupFile = bincode::deserialize(&raw)
        .with_context(|| format!("Backup beschädigt: {}", path.display()))?;
    if backup.magic != BACKUP_MAGIC {
        bail!("Unbekannte Backup-Kennung '{}'", backup.magic);
    }
    Ok(Some(backup))
}

/// Entfernt die Sicherung nach regulärem Beenden. Fehlende Datei ist kein Fehler.
pub fn remove_backup(path: &Path) -> anyhow::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Backup nicht löschbar: {}", path.display()))
        }
    }
}

/// Zählt bestätigte Mutationen und meldet, wann gesichert werden soll.
#[derive(Debug, Clone)]
pub struct AutoBackup {
    threshold: u32,
    counter: u32,
}

impl AutoBackup {
    /// `threshold == 0` deaktiviert die automatische Sicherung.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            counter: 0,
        }
    }

    /// Registriert eine Mutation; `true`, wenn jetzt gesichert werden soll.
    pub fn tick(&mut self) -> bool {
        if self.threshold == 0 {
            return false;
        }
        self.counter += 1;
        if self.counter >= self.threshold {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}
