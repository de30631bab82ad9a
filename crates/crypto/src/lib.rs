//! qumail-crypto – Kryptografie-Bausteine fuer das QuMail-Backend
//!
//! Drei Teile:
//! - [`schluessel`]: kryptografisch sichere Zufalls-Schluessel + Base64-Helfer
//! - [`cipher`]: AES-256-GCM Adapter (verschluesseln/entschluesseln mit AAD)
//! - [`bb84`]: Spielzeug-Simulation des BB84-Siebens mit QBER-Schwellwert
//!
//! Alle Funktionen sind zustandslos; Schluessel-Lebenszyklus und Ablauf
//! gehoeren dem Ledger (qumail-ledger).

pub mod bb84;
pub mod cipher;
pub mod error;
pub mod schluessel;

pub use bb84::{bb84_simulieren, Bb84Ergebnis, QBER_SCHWELLWERT};
pub use cipher::{
    nachricht_entschluesseln, nachricht_verschluesseln, VerschluesselteNachricht,
};
pub use error::{CryptoError, CryptoResult};
pub use schluessel::{als_base64, aus_base64, schluessel_generieren, SCHLUESSEL_LAENGE};
