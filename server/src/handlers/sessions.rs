//! Handler fuer Login/Logout

use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::fehler::ApiFehler;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginAnfrage {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /login` – erstellt eine Session
///
/// Der Prototyp prueft das Passwort nicht, verlangt aber beide Felder
/// (Kompatibilitaet mit dem UI-Formular).
pub async fn login(
    State(state): State<AppState>,
    Json(anfrage): Json<LoginAnfrage>,
) -> Result<Json<Value>, ApiFehler> {
    let (Some(email), Some(password)) = (anfrage.email, anfrage.password) else {
        return Err(ApiFehler::UngueltigeEingabe(
            "email und password sind Pflichtfelder".into(),
        ));
    };
    if password.is_empty() {
        return Err(ApiFehler::UngueltigeEingabe(
            "password darf nicht leer sein".into(),
        ));
    }

    let session = state.sessions.anmelden(&email).await?;
    tracing::info!(email = %session.email, "Benutzer angemeldet");

    Ok(Json(json!({
        "status": "success",
        "message": "Login erfolgreich",
        "session_id": session.session_id,
        "user": { "email": session.email },
    })))
}

#[derive(Debug, Deserialize)]
pub struct LogoutAnfrage {
    pub session_id: Option<String>,
}

/// `POST /logout` – entfernt die Session (idempotent)
pub async fn logout(
    State(state): State<AppState>,
    Json(anfrage): Json<LogoutAnfrage>,
) -> Json<Value> {
    if let Some(session_id) = anfrage.session_id {
        state.sessions.abmelden(&session_id).await;
    }
    Json(json!({
        "status": "success",
        "message": "Logout erfolgreich",
    }))
}
