//! REST-Handler fuer das QuMail-Backend
//!
//! Duenne Adapter-Schicht: Eingaben pruefen, Subsystem aufrufen,
//! Taxonomie-Fehler in Statuscodes uebersetzen. Fachlogik lebt in den
//! Crates, nicht hier.

pub mod nachrichten;
pub mod schluessel;
pub mod sessions;
pub mod system;

use crate::fehler::ApiFehler;
use crate::state::AppState;

/// Validiert eine `session_id` aus dem Request und gibt die Session zurueck
pub async fn session_pruefen(
    state: &AppState,
    session_id: Option<&str>,
) -> Result<qumail_auth::Session, ApiFehler> {
    let session_id = session_id
        .ok_or_else(|| ApiFehler::UngueltigeEingabe("session_id ist ein Pflichtfeld".into()))?;
    Ok(state.sessions.validieren(session_id).await?)
}
