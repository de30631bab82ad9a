//! Fehlertypen fuer das Auth-Subsystem

use thiserror::Error;

/// Fehler im Auth-Subsystem
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Ungueltige E-Mail-Adresse: {0}")]
    UngueltigeEmail(String),

    #[error("Session ungueltig")]
    SessionUngueltig,

    #[error("Session abgelaufen")]
    SessionAbgelaufen,
}

pub type AuthResult<T> = Result<T, AuthError>;
