//! Health-Check und Service-Info

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// `GET /health` – Health-Check-Endpunkt
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": state.dienst_name,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.uptime_seconds(),
        "keys_total": state.ledger.anzahl_schluessel().await,
        "active_sessions": state.sessions.anzahl_aktive().await,
        "timestamp": Utc::now(),
    }))
}

/// `GET /` – Service-Info mit Endpunkt-Liste
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": state.dienst_name,
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /health",
            "POST /request_key",
            "GET /get_key/:key_id",
            "GET /keys",
            "POST /decrypt_message",
            "POST /login",
            "POST /logout",
            "POST /send_email",
            "GET /emails",
            "POST /decrypt_email",
        ],
    }))
}
