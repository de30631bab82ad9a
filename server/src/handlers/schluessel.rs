//! Handler fuer die Schluessel-Endpunkte
//!
//! `POST /request_key`, `GET /get_key/:key_id`, `GET /keys`

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use qumail_core::SchluesselStatus;

use crate::fehler::ApiFehler;
use crate::state::AppState;

/// Maximale Anzahl Eintraege fuer `GET /keys`
const LISTEN_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RequestKeyAnfrage {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub lifetime: Option<i64>,
}

/// `POST /request_key` – erzeugt einen neuen Quantum-Schluessel
///
/// Gibt das Schluesselmaterial an den Aufrufer zurueck (dokumentierte
/// Prototyp-Vereinfachung, keine Zugriffskontrolle).
pub async fn request_key(
    State(state): State<AppState>,
    Json(anfrage): Json<RequestKeyAnfrage>,
) -> Result<Json<Value>, ApiFehler> {
    let (Some(sender), Some(recipient)) = (anfrage.sender, anfrage.recipient) else {
        return Err(ApiFehler::UngueltigeEingabe(
            "sender und recipient sind Pflichtfelder".into(),
        ));
    };

    let record = state
        .ledger
        .schluessel_anfordern(&sender, &recipient, anfrage.lifetime)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "key_id": record.key_id,
        "key_b64": record.key_b64,
        "expires_at": record.expires_at,
        "algorithm": record.algorithm,
    })))
}

/// `GET /get_key/:key_id` – liest einen Schluessel
///
/// 404 wenn unbekannt, 410 wenn abgelaufen.
pub async fn get_key(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<Value>, ApiFehler> {
    let record = state
        .ledger
        .schluessel_abrufen(&key_id)
        .await?
        .ok_or_else(|| ApiFehler::NichtGefunden(key_id.clone()))?;

    if record.status == SchluesselStatus::Abgelaufen {
        return Err(ApiFehler::SchluesselAbgelaufen(key_id));
    }

    Ok(Json(json!({
        "status": "success",
        "key_data": record,
    })))
}

/// `GET /keys` – listet die 50 neuesten Schluessel (ohne Material)
pub async fn keys(State(state): State<AppState>) -> Json<Value> {
    let liste = state.ledger.neueste_auflisten(LISTEN_LIMIT).await;
    Json(json!({
        "status": "success",
        "count": liste.len(),
        "keys": liste,
    }))
}
