//! Snapshot-Persistenz fuer den Ledger
//!
//! Das [`LedgerStorage`]-Trait abstrahiert den konkreten Speicher.
//! Der Snapshot ist ein vollstaendiger Zustands-Dump `{keys, usage_log}`
//! der bei jeder Mutation komplett neu geschrieben wird – kein
//! inkrementelles Log, keine Kompaktierung.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::types::{KeyRecord, UsageLogEntry};

/// Vollstaendiger Zustands-Dump des Ledgers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub keys: Vec<KeyRecord>,
    pub usage_log: Vec<UsageLogEntry>,
}

/// Abstrakter Speicher fuer Ledger-Snapshots
pub trait LedgerStorage: Send + Sync {
    /// Schreibt den Snapshot vollstaendig neu
    fn speichern(&self, snapshot: &Snapshot) -> LedgerResult<()>;

    /// Laedt den zuletzt geschriebenen Snapshot, `None` wenn keiner existiert
    fn laden(&self) -> LedgerResult<Option<Snapshot>>;
}

/// Datei-basierter Snapshot-Speicher (JSON)
#[derive(Debug, Clone)]
pub struct SnapshotDatei {
    pfad: PathBuf,
}

impl SnapshotDatei {
    /// Neuer Datei-Speicher unter dem angegebenen Pfad
    pub fn neu(pfad: impl Into<PathBuf>) -> Self {
        Self { pfad: pfad.into() }
    }
}

impl LedgerStorage for SnapshotDatei {
    fn speichern(&self, snapshot: &Snapshot) -> LedgerResult<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.pfad, json)?;
        tracing::debug!(
            pfad = %self.pfad.display(),
            keys = snapshot.keys.len(),
            log_eintraege = snapshot.usage_log.len(),
            "Snapshot geschrieben"
        );
        Ok(())
    }

    fn laden(&self) -> LedgerResult<Option<Snapshot>> {
        match std::fs::read_to_string(&self.pfad) {
            Ok(inhalt) => {
                let snapshot: Snapshot = serde_json::from_str(&inhalt).map_err(|e| {
                    LedgerError::Persistenz(format!(
                        "Snapshot '{}' nicht lesbar: {e}",
                        self.pfad.display()
                    ))
                })?;
                Ok(Some(snapshot))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-Memory-Speicher fuer Tests
///
/// Haelt den letzten Snapshot im Speicher und kann auf Wunsch jeden
/// Schreibvorgang fehlschlagen lassen, um das Warn-und-Weiter-Verhalten
/// des Ledgers zu pruefen.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<Snapshot>>,
    schreiben_schlaegt_fehl: AtomicBool,
}

impl MemoryStorage {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Laesst alle folgenden `speichern`-Aufrufe fehlschlagen
    pub fn fehler_injizieren(&self, aktiv: bool) {
        self.schreiben_schlaegt_fehl.store(aktiv, Ordering::Relaxed);
    }

    /// Gibt den zuletzt gespeicherten Snapshot zurueck
    pub fn letzter_snapshot(&self) -> Option<Snapshot> {
        self.inner.lock().clone()
    }
}

impl LedgerStorage for MemoryStorage {
    fn speichern(&self, snapshot: &Snapshot) -> LedgerResult<()> {
        if self.schreiben_schlaegt_fehl.load(Ordering::Relaxed) {
            return Err(LedgerError::Persistenz(
                "injizierter Schreibfehler".into(),
            ));
        }
        *self.inner.lock() = Some(snapshot.clone());
        Ok(())
    }

    fn laden(&self) -> LedgerResult<Option<Snapshot>> {
        Ok(self.inner.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeyRecord;
    use chrono::{Duration, Utc};

    fn beispiel_snapshot() -> Snapshot {
        let jetzt = Utc::now();
        Snapshot {
            keys: vec![KeyRecord::neu(
                "qkd_abc".into(),
                "QUJD".into(),
                "a@x".into(),
                "b@y".into(),
                jetzt,
                jetzt + Duration::seconds(3600),
            )],
            usage_log: vec![],
        }
    }

    #[test]
    fn datei_speichern_und_laden() {
        let pfad = std::env::temp_dir().join(format!(
            "qumail_snapshot_test_{}.json",
            uuid::Uuid::new_v4().simple()
        ));
        let storage = SnapshotDatei::neu(&pfad);

        let snapshot = beispiel_snapshot();
        storage.speichern(&snapshot).unwrap();

        let geladen = storage.laden().unwrap().expect("Snapshot sollte existieren");
        assert_eq!(geladen, snapshot);

        std::fs::remove_file(&pfad).unwrap();
    }

    #[test]
    fn fehlende_datei_ist_kein_fehler() {
        let storage = SnapshotDatei::neu("/tmp/qumail_gibt_es_nicht_12345.json");
        assert!(storage.laden().unwrap().is_none());
    }

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::neu();
        assert!(storage.laden().unwrap().is_none());

        let snapshot = beispiel_snapshot();
        storage.speichern(&snapshot).unwrap();
        assert_eq!(storage.laden().unwrap(), Some(snapshot));
    }

    #[test]
    fn fehler_injektion() {
        let storage = MemoryStorage::neu();
        storage.fehler_injizieren(true);
        let ergebnis = storage.speichern(&beispiel_snapshot());
        assert!(matches!(ergebnis, Err(LedgerError::Persistenz(_))));

        storage.fehler_injizieren(false);
        assert!(storage.speichern(&beispiel_snapshot()).is_ok());
    }
}
