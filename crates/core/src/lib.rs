//! qumail-core – Gemeinsame Typen fuer das QuMail-Backend
//!
//! Enthaelt die Domaenen-Typen die von Ledger, Mail-Store und Server
//! geteilt werden: Schluessel-Status, Protokoll-Aktionen und das
//! Algorithmus-Label.

pub mod types;

pub use types::{LogAktion, SchluesselStatus, ALGORITHMUS};
