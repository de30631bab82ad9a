//! Fehlertypen fuer den Schluessel-Ledger

use thiserror::Error;

/// Alle moeglichen Fehler im Ledger-Crate
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Persistenz fehlgeschlagen: {0}")]
    Persistenz(String),

    #[error("Krypto-Fehler: {0}")]
    Crypto(#[from] qumail_crypto::CryptoError),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialisierung fehlgeschlagen: {0}")]
    Serialisierung(#[from] serde_json::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
