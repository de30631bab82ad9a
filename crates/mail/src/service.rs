//! Mail-Service: Senden, Auflisten, Entschluesseln
//!
//! Der Service haelt alle E-Mails im Speicher und zieht die Schluessel
//! ausschliesslich aus dem Ledger. Abgelaufene Schluessel werden beim
//! Senden wie beim Entschluesseln abgelehnt (410 auf HTTP-Ebene).

use std::sync::Arc;

use tokio::sync::RwLock;

use qumail_core::SchluesselStatus;
use qumail_crypto::{nachricht_entschluesseln, nachricht_verschluesseln};
use qumail_ledger::{KeyLedger, KeyRecord};

use crate::error::{MailError, MailResult};
use crate::types::{Email, EmailUebersicht};

/// Maximale Anzahl E-Mails pro Inbox-Abfrage
const INBOX_LIMIT: usize = 50;

/// In-Memory Mail-Store mit Ledger-Anbindung
pub struct MailService {
    ledger: Arc<KeyLedger>,
    mails: RwLock<Vec<Email>>,
}

impl MailService {
    /// Erstellt einen leeren Mail-Store ueber dem gegebenen Ledger
    pub fn neu(ledger: Arc<KeyLedger>) -> Self {
        Self {
            ledger,
            mails: RwLock::new(Vec::new()),
        }
    }

    /// Sendet eine E-Mail: holt oder erzeugt einen Schluessel, verschluesselt
    /// den Body und legt die Mail ab
    ///
    /// Mit `key_id` wird der angegebene Schluessel wiederverwendet (Fehler
    /// wenn unbekannt oder abgelaufen), sonst fordert der Service einen
    /// frischen Schluessel beim Ledger an.
    pub async fn senden(
        &self,
        absender: &str,
        empfaenger: &str,
        subject: &str,
        body: &str,
        key_id: Option<&str>,
    ) -> MailResult<Email> {
        if empfaenger.trim().is_empty() || subject.trim().is_empty() || body.is_empty() {
            return Err(MailError::UngueltigeEingabe(
                "to, subject und body sind Pflichtfelder".into(),
            ));
        }

        let schluessel = match key_id {
            Some(id) => self.gueltigen_schluessel_holen(id).await?,
            None => {
                self.ledger
                    .schluessel_anfordern(absender, empfaenger, None)
                    .await?
            }
        };

        let encrypted_body =
            nachricht_verschluesseln(body.as_bytes(), &schluessel.schluessel_bytes()?)?;

        let email = Email::neu(
            absender.to_string(),
            empfaenger.to_string(),
            subject.to_string(),
            body.to_string(),
            encrypted_body,
            schluessel.key_id.clone(),
        );

        self.mails.write().await.push(email.clone());
        tracing::info!(
            email_id = %email.email_id,
            from = %email.absender,
            to = %email.empfaenger,
            key_id = %email.key_id,
            "E-Mail verschluesselt gespeichert"
        );
        Ok(email)
    }

    /// Listet die E-Mails eines Benutzers (als Absender oder Empfaenger),
    /// neueste zuerst, maximal 50
    pub async fn auflisten(&self, benutzer: &str) -> Vec<EmailUebersicht> {
        let mails = self.mails.read().await;
        mails
            .iter()
            .rev()
            .filter(|m| m.absender == benutzer || m.empfaenger == benutzer)
            .take(INBOX_LIMIT)
            .map(Email::uebersicht)
            .collect()
    }

    /// Entschluesselt den Body einer E-Mail fuer einen beteiligten Benutzer
    pub async fn entschluesseln(&self, email_id: &str, benutzer: &str) -> MailResult<String> {
        let email = {
            let mails = self.mails.read().await;
            mails
                .iter()
                .find(|m| {
                    m.email_id == email_id
                        && (m.absender == benutzer || m.empfaenger == benutzer)
                })
                .cloned()
                .ok_or_else(|| MailError::NichtGefunden(email_id.to_string()))?
        };

        let schluessel = self.gueltigen_schluessel_holen(&email.key_id).await?;
        let klartext =
            nachricht_entschluesseln(&email.encrypted_body, &schluessel.schluessel_bytes()?)?;

        String::from_utf8(klartext)
            .map_err(|_| MailError::UngueltigeEingabe("Klartext ist kein UTF-8".into()))
    }

    /// Holt einen Schluessel aus dem Ledger und lehnt abgelaufene ab
    async fn gueltigen_schluessel_holen(&self, key_id: &str) -> MailResult<KeyRecord> {
        let record = self
            .ledger
            .schluessel_abrufen(key_id)
            .await?
            .ok_or_else(|| MailError::SchluesselNichtGefunden(key_id.to_string()))?;

        if record.status == SchluesselStatus::Abgelaufen {
            return Err(MailError::SchluesselAbgelaufen(key_id.to_string()));
        }
        Ok(record)
    }
}
