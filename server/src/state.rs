//! Geteilter Zustand fuer die Request-Handler
//!
//! Ledger, Session-Store und Mail-Service werden per Dependency-Passing
//! in die Handler injiziert; es gibt keinen globalen Zustand.

use std::sync::Arc;
use std::time::Instant;

use qumail_auth::SessionStore;
use qumail_ledger::{KeyLedger, LedgerStorage, MemoryStorage, SnapshotDatei};
use qumail_mail::MailService;

use crate::config::ServerConfig;

/// Axum-State mit allen Subsystemen
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<KeyLedger>,
    pub sessions: Arc<SessionStore>,
    pub mail: Arc<MailService>,
    pub dienst_name: String,
    pub start_zeit: Arc<Instant>,
}

impl AppState {
    /// Baut alle Subsysteme aus der Konfiguration auf
    pub fn aus_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn LedgerStorage> = if config.persistenz.aktiviert {
            Arc::new(SnapshotDatei::neu(&config.persistenz.snapshot_pfad))
        } else {
            tracing::info!("Persistenz deaktiviert, Ledger laeuft nur In-Memory");
            Arc::new(MemoryStorage::neu())
        };

        let ledger = Arc::new(KeyLedger::neu(
            storage,
            config.schluessel.standard_lebensdauer_sekunden,
            config.bb84.clone().into(),
        )?);

        Ok(Self {
            mail: Arc::new(MailService::neu(Arc::clone(&ledger))),
            ledger,
            sessions: SessionStore::neu(),
            dienst_name: config.server.name.clone(),
            start_zeit: Arc::new(Instant::now()),
        })
    }

    /// Sekunden seit dem Serverstart
    pub fn uptime_seconds(&self) -> u64 {
        self.start_zeit.elapsed().as_secs()
    }
}
