//! Fehlertypen fuer das Kryptografie-Subsystem

use thiserror::Error;

/// Fehler im Kryptografie-Subsystem
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Ungueltige Schluessel-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeSchluesselLaenge { erwartet: usize, erhalten: usize },

    #[error("Ungueltige Nonce-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeNonceLaenge { erwartet: usize, erhalten: usize },

    #[error("Ungueltige Tag-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeTagLaenge { erwartet: usize, erhalten: usize },

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    /// Auth-Tag-Verifikation fehlgeschlagen. Bewusst ohne Detail:
    /// falscher Schluessel und manipulierter Ciphertext sind nicht
    /// unterscheidbar.
    #[error("Entschluesselung fehlgeschlagen")]
    Entschluesselung,

    #[error("BB84-Abbruch: Fehlerrate {fehlerrate:.4} ueber Schwellwert {schwellwert:.2}")]
    Bb84Abbruch { fehlerrate: f64, schwellwert: f64 },

    #[error("Base64-Dekodierung fehlgeschlagen: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
