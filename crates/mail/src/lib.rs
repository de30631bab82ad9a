//! qumail-mail – Verschluesselter E-Mail-Store
//!
//! Orchestriert Ledger und Cipher-Adapter: beim Senden wird der Body mit
//! einem Quantum-Schluessel aus dem Ledger verschluesselt, beim Lesen
//! wieder entschluesselt. E-Mails liegen im Speicher; SMTP/IMAP bleiben
//! Platzhalter ausserhalb dieses Crates.

pub mod error;
pub mod service;
pub mod types;

pub use error::{MailError, MailResult};
pub use service::MailService;
pub use types::{Email, EmailUebersicht};
