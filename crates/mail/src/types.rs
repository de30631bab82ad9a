//! Datentypen des Mail-Stores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use qumail_crypto::VerschluesselteNachricht;

/// Eine gespeicherte E-Mail
///
/// Der Prototyp haelt Klartext und verschluesselten Body nebeneinander:
/// die Inbox-Ansicht kommt ohne Schluessel-Zugriff aus, der verschluesselte
/// Body existiert fuer den Entschluesselungs-Pfad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub email_id: String,
    #[serde(rename = "from")]
    pub absender: String,
    #[serde(rename = "to")]
    pub empfaenger: String,
    pub subject: String,
    pub body: String,
    pub encrypted_body: VerschluesselteNachricht,
    pub key_id: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

impl Email {
    /// Erstellt eine frisch gesendete E-Mail
    pub fn neu(
        absender: String,
        empfaenger: String,
        subject: String,
        body: String,
        encrypted_body: VerschluesselteNachricht,
        key_id: String,
    ) -> Self {
        Self {
            email_id: Uuid::new_v4().simple().to_string(),
            absender,
            empfaenger,
            subject,
            body,
            encrypted_body,
            key_id,
            created_at: Utc::now(),
            status: "sent".into(),
        }
    }

    /// Listen-Ansicht ohne den verschluesselten Body
    pub fn uebersicht(&self) -> EmailUebersicht {
        EmailUebersicht {
            email_id: self.email_id.clone(),
            absender: self.absender.clone(),
            empfaenger: self.empfaenger.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            key_id: self.key_id.clone(),
            created_at: self.created_at,
            status: self.status.clone(),
        }
    }
}

/// E-Mail-Ansicht fuer den Inbox-Endpunkt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailUebersicht {
    pub email_id: String,
    #[serde(rename = "from")]
    pub absender: String,
    #[serde(rename = "to")]
    pub empfaenger: String,
    pub subject: String,
    pub body: String,
    pub key_id: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}
