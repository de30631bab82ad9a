//! qumail-auth – Session-Verwaltung fuer das QuMail-Backend
//!
//! Sessions sind die Vorbedingung fuer die Mail-Endpunkte. Sie werden im
//! Speicher gehalten (HashMap mit TTL) und von einem Hintergrund-Task
//! bereinigt. Es gibt keine Passwort-Pruefung – der Prototyp validiert
//! nur die E-Mail-Form (dokumentiertes Demo-Verhalten).

pub mod error;
pub mod session;

pub use error::{AuthError, AuthResult};
pub use session::{Session, SessionStore};
