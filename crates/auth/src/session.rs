//! Session-Store mit TTL
//!
//! Sessions werden im Speicher gehalten (session_id -> Session) und laufen
//! nach 24 Stunden ab. Abgelaufene Sessions sind schlicht ungueltig – es
//! gibt keinen protokollierten Status-Uebergang wie beim Schluessel-Ledger,
//! nur den Zeitstempel-Vergleich beim Lesen. Ein Hintergrund-Task entfernt
//! abgelaufene Eintraege periodisch.

use std::{collections::HashMap, fmt::Write as _, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use tokio::sync::RwLock;

use crate::error::{AuthError, AuthResult};

/// Standard-Session-Lebensdauer: 24 Stunden
const SESSION_TTL_SEKUNDEN: i64 = 24 * 60 * 60;

/// Intervall fuer den automatischen Cleanup-Task: 15 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(15 * 60);

/// Eine aktive Benutzer-Session
#[derive(Debug, Clone, serde::Serialize)]
pub struct Session {
    /// Session-ID (32 Hex-Zeichen)
    pub session_id: String,
    /// E-Mail-Adresse des eingeloggten Benutzers
    pub email: String,
    /// Zeitpunkt der Session-Erstellung
    pub created_at: DateTime<Utc>,
    /// Zeitpunkt des Session-Ablaufs
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Gibt `true` zurueck wenn die Session noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// In-Memory Session-Store mit TTL-Unterstuetzung
#[derive(Debug, Default)]
pub struct SessionStore {
    /// session_id -> Session
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Erstellt einen neuen leeren Session-Store
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Startet den Cleanup-Task fuer den gegebenen Store
    pub fn cleanup_starten(store: Arc<Self>) -> Arc<Self> {
        let store_klon = Arc::clone(&store);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = store_klon.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Sessions bereinigt");
                }
            }
        });
        store
    }

    /// Meldet einen Benutzer an und erstellt eine neue Session
    ///
    /// Der Prototyp prueft kein Passwort, nur die minimale E-Mail-Form.
    pub async fn anmelden(&self, email: &str) -> AuthResult<Session> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::UngueltigeEmail(email.to_string()));
        }

        let jetzt = Utc::now();
        let session = Session {
            session_id: session_id_generieren(),
            email: email.to_string(),
            created_at: jetzt,
            expires_at: jetzt + chrono::Duration::seconds(SESSION_TTL_SEKUNDEN),
        };

        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session.clone());
        tracing::debug!(email = %session.email, "Neue Session erstellt");
        Ok(session)
    }

    /// Validiert eine Session-ID und gibt die Session zurueck
    ///
    /// `SessionUngueltig` wenn die ID unbekannt ist,
    /// `SessionAbgelaufen` wenn die TTL ueberschritten wurde.
    pub async fn validieren(&self, session_id: &str) -> AuthResult<Session> {
        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            None => Err(AuthError::SessionUngueltig),
            Some(session) if !session.ist_gueltig() => Err(AuthError::SessionAbgelaufen),
            Some(session) => Ok(session.clone()),
        }
    }

    /// Meldet eine Session ab (loescht sie)
    pub async fn abmelden(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
        tracing::debug!("Session abgemeldet");
    }

    /// Entfernt abgelaufene Sessions, gibt die Anzahl der entfernten zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Utc::now();
        let mut sessions = self.sessions.write().await;
        let vorher = sessions.len();
        sessions.retain(|_, s| s.expires_at > jetzt);
        vorher - sessions.len()
    }

    /// Anzahl der aktiven (nicht abgelaufenen) Sessions
    pub async fn anzahl_aktive(&self) -> usize {
        let jetzt = Utc::now();
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| s.expires_at > jetzt).count()
    }
}

/// Generiert eine kryptografisch sichere Session-ID (16 Zufalls-Bytes, Hex)
fn session_id_generieren() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);

    let mut id = String::with_capacity(32);
    for b in bytes {
        let _ = write!(id, "{b:02x}");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn anmelden_und_validieren() {
        let store = SessionStore::neu();
        let session = store
            .anmelden("alice@qumail.dev")
            .await
            .expect("Anmeldung fehlgeschlagen");

        assert_eq!(session.email, "alice@qumail.dev");
        assert!(session.ist_gueltig());
        assert_eq!(session.session_id.len(), 32);

        let validiert = store.validieren(&session.session_id).await.unwrap();
        assert_eq!(validiert.email, "alice@qumail.dev");
    }

    #[tokio::test]
    async fn ungueltige_email_wird_abgelehnt() {
        let store = SessionStore::neu();
        assert!(matches!(
            store.anmelden("keine-adresse").await,
            Err(AuthError::UngueltigeEmail(_))
        ));
        assert!(matches!(
            store.anmelden("   ").await,
            Err(AuthError::UngueltigeEmail(_))
        ));
    }

    #[tokio::test]
    async fn unbekannte_session_gibt_fehler() {
        let store = SessionStore::neu();
        assert!(matches!(
            store.validieren("gibt_es_nicht").await,
            Err(AuthError::SessionUngueltig)
        ));
    }

    #[tokio::test]
    async fn abmelden_invalidiert() {
        let store = SessionStore::neu();
        let session = store.anmelden("bob@qumail.dev").await.unwrap();

        store.abmelden(&session.session_id).await;
        assert!(matches!(
            store.validieren(&session.session_id).await,
            Err(AuthError::SessionUngueltig)
        ));
    }

    #[tokio::test]
    async fn session_ids_sind_eindeutig() {
        let store = SessionStore::neu();
        let s1 = store.anmelden("a@x.dev").await.unwrap();
        let s2 = store.anmelden("a@x.dev").await.unwrap();
        assert_ne!(s1.session_id, s2.session_id);
        assert_eq!(store.anzahl_aktive().await, 2);
    }

    #[tokio::test]
    async fn cleanup_entfernt_abgelaufene() {
        let store = SessionStore::neu();
        let session = store.anmelden("a@x.dev").await.unwrap();

        // Ablauf kuenstlich herbeifuehren
        {
            let mut sessions = store.sessions.write().await;
            let eintrag = sessions.get_mut(&session.session_id).unwrap();
            eintrag.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }

        assert!(matches!(
            store.validieren(&session.session_id).await,
            Err(AuthError::SessionAbgelaufen)
        ));
        assert_eq!(store.cleanup_abgelaufene().await, 1);
        assert_eq!(store.anzahl_aktive().await, 0);
    }
}
