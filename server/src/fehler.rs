//! API-Fehler: Uebersetzung der Crate-Fehler in HTTP-Antworten
//!
//! Jeder Taxonomie-Eintrag hat genau einen Statuscode; Antwort-Payloads
//! enthalten nie interne Details, Stack-Traces oder Schluesselmaterial.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use qumail_auth::AuthError;
use qumail_crypto::CryptoError;
use qumail_ledger::LedgerError;
use qumail_mail::MailError;

/// Alle Fehler die die REST-Schicht an Clients meldet
#[derive(Debug, Error)]
pub enum ApiFehler {
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Session ungueltig oder abgelaufen")]
    SessionUngueltig,

    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Schluessel abgelaufen: {0}")]
    SchluesselAbgelaufen(String),

    /// Bewusst ohne Ursache: falscher Schluessel und Manipulation sind
    /// nach aussen nicht unterscheidbar
    #[error("Entschluesselung fehlgeschlagen")]
    Entschluesselung,

    #[error("Interner Fehler")]
    Intern(#[source] anyhow::Error),
}

impl ApiFehler {
    /// HTTP-Statuscode fuer die Fehler-Antwort
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
            Self::SessionUngueltig => StatusCode::UNAUTHORIZED,
            Self::NichtGefunden(_) => StatusCode::NOT_FOUND,
            Self::SchluesselAbgelaufen(_) => StatusCode::GONE,
            Self::Entschluesselung | Self::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiFehler {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            if let Self::Intern(quelle) = &self {
                tracing::error!(fehler = %quelle, "Interner Fehler in der REST-Schicht");
            }
        }
        (
            status,
            Json(json!({ "status": "error", "message": self.to_string() })),
        )
            .into_response()
    }
}

impl From<LedgerError> for ApiFehler {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::UngueltigeEingabe(msg) => Self::UngueltigeEingabe(msg),
            LedgerError::Crypto(c) => c.into(),
            LedgerError::Persistenz(_) | LedgerError::Io(_) | LedgerError::Serialisierung(_) => {
                Self::Intern(e.into())
            }
        }
    }
}

impl From<CryptoError> for ApiFehler {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Entschluesselung => Self::Entschluesselung,
            CryptoError::UngueltigeEingabe(_)
            | CryptoError::UngueltigeSchluesselLaenge { .. }
            | CryptoError::UngueltigeNonceLaenge { .. }
            | CryptoError::UngueltigeTagLaenge { .. }
            | CryptoError::Base64(_) => Self::UngueltigeEingabe(e.to_string()),
            CryptoError::Verschluesselung(_) | CryptoError::Bb84Abbruch { .. } => {
                Self::Intern(e.into())
            }
        }
    }
}

impl From<MailError> for ApiFehler {
    fn from(e: MailError) -> Self {
        match e {
            MailError::UngueltigeEingabe(msg) => Self::UngueltigeEingabe(msg),
            MailError::NichtGefunden(id) | MailError::SchluesselNichtGefunden(id) => {
                Self::NichtGefunden(id)
            }
            MailError::SchluesselAbgelaufen(id) => Self::SchluesselAbgelaufen(id),
            MailError::Ledger(l) => l.into(),
            MailError::Crypto(c) => c.into(),
        }
    }
}

impl From<AuthError> for ApiFehler {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UngueltigeEmail(msg) => {
                Self::UngueltigeEingabe(format!("Ungueltige E-Mail-Adresse: {msg}"))
            }
            AuthError::SessionUngueltig | AuthError::SessionAbgelaufen => Self::SessionUngueltig,
        }
    }
}
