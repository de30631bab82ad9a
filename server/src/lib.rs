//! qumail-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen
//! Einstiegspunkt fuer Integrationstests bereit.

pub mod config;
pub mod fehler;
pub mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::Result;

use config::ServerConfig;
use qumail_auth::SessionStore;
use state::AppState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet die REST-API und laeuft bis zum Shutdown-Signal
    pub async fn starten(self) -> Result<()> {
        let state = AppState::aus_config(&self.config)?;
        SessionStore::cleanup_starten(Arc::clone(&state.sessions));

        let app = routes::router(state, &self.config.netzwerk.cors_origins);
        let adresse = self.config.api_bind_adresse();

        let listener = tokio::net::TcpListener::bind(&adresse).await?;
        tracing::info!(
            adresse = %adresse,
            persistenz = self.config.persistenz.aktiviert,
            bb84 = self.config.bb84.aktiviert,
            "REST-API gestartet"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}

/// Wartet auf Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Shutdown-Signal nicht verfuegbar");
    } else {
        tracing::info!("Shutdown-Signal empfangen");
    }
}
