//! Datentypen des Schluessel-Ledgers
//!
//! [`KeyRecord`] ist der vollstaendige Eintrag inklusive Schluesselmaterial;
//! [`KeySummary`] ist die Ansicht fuer Listen-Endpunkte und enthaelt
//! bewusst kein Schluesselmaterial. [`UsageLogEntry`] bildet das
//! append-only Nutzungsprotokoll.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use qumail_core::{LogAktion, SchluesselStatus, ALGORITHMUS};
use qumail_crypto::{aus_base64, CryptoResult};

/// Ein Schluessel-Eintrag im Ledger
///
/// `key_id` und `key_b64` sind nach der Erzeugung unveraenderlich; nur
/// `status` wechselt (einmalig) zu `Abgelaufen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub key_id: String,
    /// 32 Bytes Schluesselmaterial, Base64-kodiert (Transport-Format)
    pub key_b64: String,
    pub sender: String,
    pub recipient: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: SchluesselStatus,
    pub algorithm: String,
}

impl KeyRecord {
    /// Erstellt einen frischen aktiven Eintrag
    pub fn neu(
        key_id: String,
        key_b64: String,
        sender: String,
        recipient: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key_id,
            key_b64,
            sender,
            recipient,
            created_at,
            expires_at,
            status: SchluesselStatus::Aktiv,
            algorithm: ALGORITHMUS.into(),
        }
    }

    /// Gibt `true` zurueck wenn der Eintrag zum Zeitpunkt `jetzt` abgelaufen ist
    pub fn ist_abgelaufen(&self, jetzt: DateTime<Utc>) -> bool {
        jetzt > self.expires_at
    }

    /// Dekodiert das Schluesselmaterial zurueck zu rohen Bytes
    pub fn schluessel_bytes(&self) -> CryptoResult<Vec<u8>> {
        aus_base64(&self.key_b64)
    }

    /// Ansicht ohne Schluesselmaterial fuer Listen-Endpunkte
    pub fn zusammenfassung(&self) -> KeySummary {
        KeySummary {
            key_id: self.key_id.clone(),
            sender: self.sender.clone(),
            recipient: self.recipient.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
            status: self.status,
            algorithm: self.algorithm.clone(),
        }
    }
}

/// Schluessel-Ansicht ohne Material (fuer `GET /keys`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySummary {
    pub key_id: String,
    pub sender: String,
    pub recipient: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: SchluesselStatus,
    pub algorithm: String,
}

/// Ein Eintrag im append-only Nutzungsprotokoll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub log_id: String,
    pub key_id: String,
    pub action: LogAktion,
    pub timestamp: DateTime<Utc>,
    pub details: String,
}

impl UsageLogEntry {
    /// Erstellt einen Protokoll-Eintrag mit frischer Log-ID und aktuellem Zeitstempel
    pub fn neu(key_id: impl Into<String>, action: LogAktion, details: impl Into<String>) -> Self {
        Self {
            log_id: Uuid::new_v4().simple().to_string(),
            key_id: key_id.into(),
            action,
            timestamp: Utc::now(),
            details: details.into(),
        }
    }
}

/// Generiert eine neue Schluessel-ID: `qkd_` + 16 Zufalls-Bytes als Hex
///
/// 128 Bit Entropie machen Kollisionen praktisch unmoeglich; IDs werden
/// nie wiederverwendet, auch nicht nach Ablauf.
pub fn schluessel_id_generieren() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);

    let mut id = String::with_capacity(4 + 32);
    id.push_str("qkd_");
    for b in bytes {
        let _ = write!(id, "{b:02x}");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn schluessel_id_format() {
        let id = schluessel_id_generieren();
        assert!(id.starts_with("qkd_"));
        assert_eq!(id.len(), 36);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn schluessel_ids_sind_eindeutig() {
        let a = schluessel_id_generieren();
        let b = schluessel_id_generieren();
        assert_ne!(a, b);
    }

    #[test]
    fn ablauf_pruefung() {
        let jetzt = Utc::now();
        let record = KeyRecord::neu(
            "qkd_test".into(),
            "AAAA".into(),
            "a@x".into(),
            "b@y".into(),
            jetzt,
            jetzt + Duration::seconds(60),
        );

        assert!(!record.ist_abgelaufen(jetzt));
        assert!(!record.ist_abgelaufen(jetzt + Duration::seconds(60)));
        assert!(record.ist_abgelaufen(jetzt + Duration::seconds(61)));
    }

    #[test]
    fn zusammenfassung_ohne_schluesselmaterial() {
        let jetzt = Utc::now();
        let record = KeyRecord::neu(
            "qkd_test".into(),
            "Z2VoZWlt".into(),
            "a@x".into(),
            "b@y".into(),
            jetzt,
            jetzt + Duration::seconds(10),
        );

        let json = serde_json::to_value(record.zusammenfassung()).unwrap();
        assert!(json.get("key_b64").is_none());
        assert_eq!(json["key_id"], "qkd_test");
        assert_eq!(json["status"], "active");
        assert_eq!(json["algorithm"], "AES-256-GCM");
    }

    #[test]
    fn log_eintrag_felder() {
        let eintrag = UsageLogEntry::neu("qkd_x", LogAktion::Generiert, "a@x -> b@y");
        assert_eq!(eintrag.key_id, "qkd_x");
        assert_eq!(eintrag.action, LogAktion::Generiert);
        assert!(!eintrag.log_id.is_empty());
    }
}
