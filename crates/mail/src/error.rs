//! Fehlertypen fuer den Mail-Store

use thiserror::Error;

/// Alle moeglichen Fehler im Mail-Crate
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("E-Mail nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Schluessel nicht gefunden: {0}")]
    SchluesselNichtGefunden(String),

    #[error("Schluessel abgelaufen: {0}")]
    SchluesselAbgelaufen(String),

    #[error("Ledger-Fehler: {0}")]
    Ledger(#[from] qumail_ledger::LedgerError),

    #[error("Krypto-Fehler: {0}")]
    Crypto(#[from] qumail_crypto::CryptoError),
}

pub type MailResult<T> = Result<T, MailError>;
