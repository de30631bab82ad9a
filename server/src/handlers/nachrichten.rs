//! Handler fuer Nachrichten-Endpunkte
//!
//! `POST /decrypt_message` arbeitet direkt auf Schluessel + Ciphertext;
//! die Mail-Endpunkte (`/send_email`, `/emails`, `/decrypt_email`)
//! laufen ueber den Mail-Store und verlangen eine gueltige Session.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use qumail_core::SchluesselStatus;
use qumail_crypto::{nachricht_entschluesseln, VerschluesselteNachricht};

use crate::fehler::ApiFehler;
use crate::handlers::session_pruefen;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DecryptMessageAnfrage {
    pub key_id: Option<String>,
    pub ciphertext: Option<String>,
    pub nonce: Option<String>,
    pub tag: Option<String>,
}

/// `POST /decrypt_message` – entschluesselt einen Ciphertext mit einem
/// Ledger-Schluessel
///
/// 404 wenn der Schluessel unbekannt ist, 410 wenn abgelaufen, 500 wenn
/// der Auth-Tag nicht verifiziert.
pub async fn decrypt_message(
    State(state): State<AppState>,
    Json(anfrage): Json<DecryptMessageAnfrage>,
) -> Result<Json<Value>, ApiFehler> {
    let (Some(key_id), Some(ciphertext), Some(nonce), Some(tag)) = (
        anfrage.key_id,
        anfrage.ciphertext,
        anfrage.nonce,
        anfrage.tag,
    ) else {
        return Err(ApiFehler::UngueltigeEingabe(
            "key_id, ciphertext, nonce und tag sind Pflichtfelder".into(),
        ));
    };

    let record = state
        .ledger
        .schluessel_abrufen(&key_id)
        .await?
        .ok_or_else(|| ApiFehler::NichtGefunden(key_id.clone()))?;

    if record.status == SchluesselStatus::Abgelaufen {
        return Err(ApiFehler::SchluesselAbgelaufen(key_id));
    }

    let nachricht = VerschluesselteNachricht {
        ciphertext,
        nonce,
        tag,
    };
    let klartext = nachricht_entschluesseln(&nachricht, &record.schluessel_bytes()?)?;
    let klartext = String::from_utf8(klartext)
        .map_err(|_| ApiFehler::UngueltigeEingabe("Klartext ist kein UTF-8".into()))?;

    Ok(Json(json!({
        "status": "success",
        "plaintext": klartext,
        "key_id": record.key_id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SendEmailAnfrage {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub session_id: Option<String>,
    pub key_id: Option<String>,
}

/// `POST /send_email` – verschluesselt und speichert eine E-Mail
pub async fn send_email(
    State(state): State<AppState>,
    Json(anfrage): Json<SendEmailAnfrage>,
) -> Result<Json<Value>, ApiFehler> {
    let session = session_pruefen(&state, anfrage.session_id.as_deref()).await?;

    let (Some(to), Some(subject), Some(body)) = (anfrage.to, anfrage.subject, anfrage.body)
    else {
        return Err(ApiFehler::UngueltigeEingabe(
            "to, subject und body sind Pflichtfelder".into(),
        ));
    };

    let email = state
        .mail
        .senden(&session.email, &to, &subject, &body, anfrage.key_id.as_deref())
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "E-Mail quantum-verschluesselt gesendet",
        "email_id": email.email_id,
        "key_id": email.key_id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct InboxAnfrage {
    pub session_id: Option<String>,
}

/// `GET /emails?session_id=` – listet die E-Mails des Benutzers
pub async fn emails(
    State(state): State<AppState>,
    Query(anfrage): Query<InboxAnfrage>,
) -> Result<Json<Value>, ApiFehler> {
    let session = session_pruefen(&state, anfrage.session_id.as_deref()).await?;
    let liste = state.mail.auflisten(&session.email).await;

    Ok(Json(json!({
        "status": "success",
        "count": liste.len(),
        "emails": liste,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DecryptEmailAnfrage {
    pub email_id: Option<String>,
    pub session_id: Option<String>,
}

/// `POST /decrypt_email` – entschluesselt den Body einer gespeicherten E-Mail
pub async fn decrypt_email(
    State(state): State<AppState>,
    Json(anfrage): Json<DecryptEmailAnfrage>,
) -> Result<Json<Value>, ApiFehler> {
    let session = session_pruefen(&state, anfrage.session_id.as_deref()).await?;

    let Some(email_id) = anfrage.email_id else {
        return Err(ApiFehler::UngueltigeEingabe(
            "email_id ist ein Pflichtfeld".into(),
        ));
    };

    let klartext = state.mail.entschluesseln(&email_id, &session.email).await?;

    Ok(Json(json!({
        "status": "success",
        "email_id": email_id,
        "decrypted_body": klartext,
    })))
}
