//! qumail-ledger – Schluessel-Ledger fuer das QuMail-Backend
//!
//! Der Ledger besitzt alle Schluessel-Eintraege und deren Lebenszyklus:
//! Erzeugung, Ablauf-Uebergang (aktiv -> abgelaufen, monoton) und das
//! append-only Nutzungsprotokoll. Persistenz laeuft ueber das
//! [`storage::LedgerStorage`]-Trait als Ganzdatei-Snapshot; ein
//! fehlgeschriebener Snapshot wird nur als Warnung geloggt, der
//! In-Memory-Zustand bleibt massgeblich.

pub mod error;
pub mod ledger;
pub mod storage;
pub mod types;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{Bb84Einstellungen, KeyLedger, STANDARD_LEBENSDAUER_SEKUNDEN};
pub use storage::{LedgerStorage, MemoryStorage, Snapshot, SnapshotDatei};
pub use types::{KeyRecord, KeySummary, UsageLogEntry};
