//! Der Schluessel-Ledger
//!
//! Einziger Besitzer des Schluessel-Zustands: alle Mutationen (Erzeugung,
//! Ablauf-Uebergang, Protokoll-Append) laufen serialisiert hinter einem
//! `RwLock`. Der Ablauf-Uebergang ist idempotent – zwei Zugriffe die
//! gleichzeitig `aktiv` beobachten duerfen ihn beide anwenden.
//!
//! Lesezugriffe sehen Mutationen sofort (read-your-writes gegen den
//! Speicher); der Snapshot ist best-effort und darf zurueckfallen.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use qumail_core::{LogAktion, SchluesselStatus};
use qumail_crypto::{als_base64, bb84_simulieren, schluessel_generieren, SCHLUESSEL_LAENGE};

use crate::error::{LedgerError, LedgerResult};
use crate::storage::{LedgerStorage, Snapshot};
use crate::types::{schluessel_id_generieren, KeyRecord, KeySummary, UsageLogEntry};

/// Standard-Lebensdauer eines Schluessels: 1 Stunde
pub const STANDARD_LEBENSDAUER_SEKUNDEN: i64 = 3600;

/// Einstellungen fuer die BB84-Simulation bei der Schluessel-Ausgabe
#[derive(Debug, Clone)]
pub struct Bb84Einstellungen {
    /// Simulation pro `schluessel_anfordern` ausfuehren
    pub aktiviert: bool,
    /// Anzahl simulierter Qubits pro Runde
    pub anzahl_bits: usize,
    /// Kanal-Rauschen (Bit-Kipp-Wahrscheinlichkeit auf gesiebten Bits)
    pub rauschen: f64,
}

impl Default for Bb84Einstellungen {
    fn default() -> Self {
        Self {
            aktiviert: false,
            anzahl_bits: 1024,
            rauschen: 0.02,
        }
    }
}

/// Innerer Zustand: Eintraege in Erzeugungs-Reihenfolge + ID-Index + Protokoll
#[derive(Debug, Default)]
struct LedgerZustand {
    eintraege: Vec<KeyRecord>,
    index: HashMap<String, usize>,
    protokoll: Vec<UsageLogEntry>,
}

impl LedgerZustand {
    fn aus_snapshot(snapshot: Snapshot) -> Self {
        let index = snapshot
            .keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.key_id.clone(), i))
            .collect();
        Self {
            eintraege: snapshot.keys,
            index,
            protokoll: snapshot.usage_log,
        }
    }

    fn als_snapshot(&self) -> Snapshot {
        Snapshot {
            keys: self.eintraege.clone(),
            usage_log: self.protokoll.clone(),
        }
    }
}

/// Der Schluessel-Ledger
///
/// Wird per Dependency-Passing in die Request-Handler injiziert; es gibt
/// keinen globalen Zustand.
pub struct KeyLedger {
    zustand: RwLock<LedgerZustand>,
    storage: Arc<dyn LedgerStorage>,
    standard_lebensdauer: i64,
    bb84: Bb84Einstellungen,
}

impl KeyLedger {
    /// Erstellt einen Ledger und laedt einen eventuell vorhandenen Snapshot
    pub fn neu(
        storage: Arc<dyn LedgerStorage>,
        standard_lebensdauer_sekunden: i64,
        bb84: Bb84Einstellungen,
    ) -> LedgerResult<Self> {
        let zustand = match storage.laden()? {
            Some(snapshot) => {
                tracing::info!(
                    keys = snapshot.keys.len(),
                    log_eintraege = snapshot.usage_log.len(),
                    "Ledger-Snapshot geladen"
                );
                LedgerZustand::aus_snapshot(snapshot)
            }
            None => LedgerZustand::default(),
        };

        Ok(Self {
            zustand: RwLock::new(zustand),
            storage,
            standard_lebensdauer: standard_lebensdauer_sekunden,
            bb84,
        })
    }

    /// Erzeugt einen neuen Schluessel fuer das Paar (sender, recipient)
    ///
    /// Gibt den vollstaendigen Eintrag inklusive Schluesselmaterial zurueck.
    /// Der Prototyp kennt keine Zugriffskontrolle auf das Material; das ist
    /// eine dokumentierte Vereinfachung, keine Empfehlung.
    pub async fn schluessel_anfordern(
        &self,
        sender: &str,
        recipient: &str,
        lebensdauer_sekunden: Option<i64>,
    ) -> LedgerResult<KeyRecord> {
        if sender.trim().is_empty() {
            return Err(LedgerError::UngueltigeEingabe(
                "sender darf nicht leer sein".into(),
            ));
        }
        if recipient.trim().is_empty() {
            return Err(LedgerError::UngueltigeEingabe(
                "recipient darf nicht leer sein".into(),
            ));
        }

        let lebensdauer = lebensdauer_sekunden.unwrap_or(self.standard_lebensdauer);
        if lebensdauer <= 0 {
            return Err(LedgerError::UngueltigeEingabe(format!(
                "lifetime muss positiv sein, war {lebensdauer}"
            )));
        }

        let mut detail = format!("Generiert fuer {sender} -> {recipient}");
        if self.bb84.aktiviert {
            let ergebnis = bb84_simulieren(self.bb84.anzahl_bits, self.bb84.rauschen)?;
            detail.push_str(&format!(
                ", BB84 QBER {:.4} ({} gesiebte Bits)",
                ergebnis.fehlerrate, ergebnis.gesiebte_laenge
            ));
        }

        let material = schluessel_generieren(SCHLUESSEL_LAENGE)?;
        let jetzt = Utc::now();
        let record = KeyRecord::neu(
            schluessel_id_generieren(),
            als_base64(&material),
            sender.to_string(),
            recipient.to_string(),
            jetzt,
            jetzt + Duration::seconds(lebensdauer),
        );

        let mut zustand = self.zustand.write().await;
        let pos = zustand.eintraege.len();
        zustand.index.insert(record.key_id.clone(), pos);
        zustand.eintraege.push(record.clone());
        zustand
            .protokoll
            .push(UsageLogEntry::neu(&record.key_id, LogAktion::Generiert, detail));
        self.persistieren(&zustand);

        tracing::info!(
            key_id = %record.key_id,
            sender = %record.sender,
            recipient = %record.recipient,
            expires_at = %record.expires_at,
            "Quantum-Schluessel erzeugt"
        );
        Ok(record)
    }

    /// Liest einen Schluessel per ID
    ///
    /// Wendet beim ersten Zugriff nach Ablauf den Uebergang
    /// aktiv -> abgelaufen an (monoton, idempotent) und protokolliert
    /// jeden Lesezugriff – auch auf abgelaufene oder unbekannte IDs.
    /// Abgelaufene Eintraege werden markiert zurueckgegeben, nie verweigert.
    pub async fn schluessel_abrufen(&self, key_id: &str) -> LedgerResult<Option<KeyRecord>> {
        let mut zustand = self.zustand.write().await;

        let Some(&pos) = zustand.index.get(key_id) else {
            zustand.protokoll.push(UsageLogEntry::neu(
                key_id,
                LogAktion::Zugegriffen,
                "Schluessel nicht gefunden",
            ));
            self.persistieren(&zustand);
            return Ok(None);
        };

        let jetzt = Utc::now();
        let abgelaufen = zustand.eintraege[pos].ist_abgelaufen(jetzt);
        if abgelaufen && zustand.eintraege[pos].status == SchluesselStatus::Aktiv {
            zustand.eintraege[pos].status = SchluesselStatus::Abgelaufen;
            tracing::debug!(key_id = %key_id, "Schluessel als abgelaufen markiert");
        }

        let detail = if abgelaufen {
            "Schluessel gelesen (abgelaufen)"
        } else {
            "Schluessel gelesen"
        };
        zustand
            .protokoll
            .push(UsageLogEntry::neu(key_id, LogAktion::Zugegriffen, detail));
        self.persistieren(&zustand);

        Ok(Some(zustand.eintraege[pos].clone()))
    }

    /// Listet die zuletzt erzeugten Schluessel, neueste zuerst
    ///
    /// Reiner Lesezugriff: kein Status-Uebergang, kein Protokoll-Eintrag,
    /// kein Schluesselmaterial in der Antwort.
    pub async fn neueste_auflisten(&self, limit: usize) -> Vec<KeySummary> {
        let zustand = self.zustand.read().await;
        zustand
            .eintraege
            .iter()
            .rev()
            .take(limit)
            .map(KeyRecord::zusammenfassung)
            .collect()
    }

    /// Gibt das vollstaendige Nutzungsprotokoll zurueck (Audit-Ansicht)
    pub async fn nutzungsprotokoll(&self) -> Vec<UsageLogEntry> {
        self.zustand.read().await.protokoll.clone()
    }

    /// Anzahl der Eintraege im Ledger (aktiv und abgelaufen)
    pub async fn anzahl_schluessel(&self) -> usize {
        self.zustand.read().await.eintraege.len()
    }

    /// Schreibt den Snapshot; ein Fehlschlag ist nur eine Warnung, der
    /// In-Memory-Zustand bleibt massgeblich
    fn persistieren(&self, zustand: &LedgerZustand) {
        if let Err(e) = self.storage.speichern(&zustand.als_snapshot()) {
            tracing::warn!(
                fehler = %e,
                "Snapshot-Schreiben fehlgeschlagen, In-Memory-Zustand bleibt massgeblich"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ledger_mit_storage(storage: Arc<MemoryStorage>) -> KeyLedger {
        KeyLedger::neu(
            storage,
            STANDARD_LEBENSDAUER_SEKUNDEN,
            Bb84Einstellungen::default(),
        )
        .unwrap()
    }

    fn ledger() -> KeyLedger {
        ledger_mit_storage(Arc::new(MemoryStorage::neu()))
    }

    #[tokio::test]
    async fn anfordern_liefert_vollstaendigen_eintrag() {
        let ledger = ledger();
        let record = ledger
            .schluessel_anfordern("alice@qumail.dev", "bob@qumail.dev", None)
            .await
            .unwrap();

        assert!(record.key_id.starts_with("qkd_"));
        assert_eq!(record.status, SchluesselStatus::Aktiv);
        assert_eq!(record.algorithm, "AES-256-GCM");
        assert_eq!(record.schluessel_bytes().unwrap().len(), 32);
        assert_eq!(
            (record.expires_at - record.created_at).num_seconds(),
            STANDARD_LEBENSDAUER_SEKUNDEN
        );

        let protokoll = ledger.nutzungsprotokoll().await;
        assert_eq!(protokoll.len(), 1);
        assert_eq!(protokoll[0].action, LogAktion::Generiert);
        assert!(protokoll[0]
            .details
            .contains("alice@qumail.dev -> bob@qumail.dev"));
    }

    #[tokio::test]
    async fn eigene_lebensdauer_wird_uebernommen() {
        let ledger = ledger();
        let record = ledger
            .schluessel_anfordern("a@x", "b@y", Some(120))
            .await
            .unwrap();
        assert_eq!((record.expires_at - record.created_at).num_seconds(), 120);
    }

    #[tokio::test]
    async fn leere_eingaben_sind_fehler() {
        let ledger = ledger();
        assert!(matches!(
            ledger.schluessel_anfordern("", "b@y", None).await,
            Err(LedgerError::UngueltigeEingabe(_))
        ));
        assert!(matches!(
            ledger.schluessel_anfordern("a@x", "   ", None).await,
            Err(LedgerError::UngueltigeEingabe(_))
        ));
        assert!(matches!(
            ledger.schluessel_anfordern("a@x", "b@y", Some(0)).await,
            Err(LedgerError::UngueltigeEingabe(_))
        ));
    }

    #[tokio::test]
    async fn gleiche_eingabe_liefert_verschiedene_schluessel() {
        let ledger = ledger();
        let r1 = ledger.schluessel_anfordern("a@x", "b@y", None).await.unwrap();
        let r2 = ledger.schluessel_anfordern("a@x", "b@y", None).await.unwrap();

        assert_ne!(r1.key_id, r2.key_id);
        assert_ne!(r1.key_b64, r2.key_b64);
    }

    #[tokio::test]
    async fn abrufen_unbekannt_gibt_none_und_wird_protokolliert() {
        let ledger = ledger();
        let ergebnis = ledger.schluessel_abrufen("qkd_gibt_es_nicht").await.unwrap();
        assert!(ergebnis.is_none());

        let protokoll = ledger.nutzungsprotokoll().await;
        assert_eq!(protokoll.len(), 1);
        assert_eq!(protokoll[0].action, LogAktion::Zugegriffen);
        assert_eq!(protokoll[0].key_id, "qkd_gibt_es_nicht");
    }

    #[tokio::test]
    async fn ablauf_uebergang_ist_monoton_und_idempotent() {
        let ledger = ledger();
        let record = ledger
            .schluessel_anfordern("a@x", "b@y", Some(1))
            .await
            .unwrap();

        let vor_ablauf = ledger
            .schluessel_abrufen(&record.key_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vor_ablauf.status, SchluesselStatus::Aktiv);

        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        let erster = ledger
            .schluessel_abrufen(&record.key_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(erster.status, SchluesselStatus::Abgelaufen);

        // Zweiter Zugriff: bleibt abgelaufen, kein Rueck-Uebergang
        let zweiter = ledger
            .schluessel_abrufen(&record.key_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(zweiter.status, SchluesselStatus::Abgelaufen);

        // Jeder der drei Zugriffe wurde protokolliert
        let zugriffe = ledger
            .nutzungsprotokoll()
            .await
            .into_iter()
            .filter(|e| e.action == LogAktion::Zugegriffen)
            .count();
        assert_eq!(zugriffe, 3);
    }

    #[tokio::test]
    async fn neueste_auflisten_sortiert_und_begrenzt() {
        let ledger = ledger();
        let r1 = ledger.schluessel_anfordern("a@x", "b@y", None).await.unwrap();
        let r2 = ledger.schluessel_anfordern("a@x", "c@z", None).await.unwrap();
        let r3 = ledger.schluessel_anfordern("a@x", "d@w", None).await.unwrap();

        let liste = ledger.neueste_auflisten(2).await;
        assert_eq!(liste.len(), 2);
        assert_eq!(liste[0].key_id, r3.key_id);
        assert_eq!(liste[1].key_id, r2.key_id);

        let alle = ledger.neueste_auflisten(50).await;
        assert_eq!(alle.len(), 3);
        assert_eq!(alle[2].key_id, r1.key_id);

        // Auflisten ist ein reiner Lesezugriff
        let zugriffe = ledger
            .nutzungsprotokoll()
            .await
            .into_iter()
            .filter(|e| e.action == LogAktion::Zugegriffen)
            .count();
        assert_eq!(zugriffe, 0);
    }

    #[tokio::test]
    async fn persistenz_fehler_ist_nur_warnung() {
        let storage = Arc::new(MemoryStorage::neu());
        let ledger = ledger_mit_storage(Arc::clone(&storage));

        storage.fehler_injizieren(true);
        let record = ledger.schluessel_anfordern("a@x", "b@y", None).await.unwrap();
        assert!(storage.letzter_snapshot().is_none());

        // In-Memory-Zustand bleibt korrekt lesbar
        let gelesen = ledger
            .schluessel_abrufen(&record.key_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(gelesen.key_id, record.key_id);

        // Naechste erfolgreiche Mutation holt den vollen Zustand nach
        storage.fehler_injizieren(false);
        ledger.schluessel_anfordern("c@z", "d@w", None).await.unwrap();
        let snapshot = storage.letzter_snapshot().unwrap();
        assert_eq!(snapshot.keys.len(), 2);
    }

    #[tokio::test]
    async fn snapshot_wird_beim_start_geladen() {
        let storage = Arc::new(MemoryStorage::neu());
        let record = {
            let ledger = ledger_mit_storage(Arc::clone(&storage));
            ledger.schluessel_anfordern("a@x", "b@y", None).await.unwrap()
        };

        let neu_geladen = ledger_mit_storage(Arc::clone(&storage));
        let gefunden = neu_geladen
            .schluessel_abrufen(&record.key_id)
            .await
            .unwrap()
            .expect("Eintrag muss den Neustart ueberleben");
        assert_eq!(gefunden.key_b64, record.key_b64);
        assert_eq!(neu_geladen.anzahl_schluessel().await, 1);
    }

    #[tokio::test]
    async fn bb84_qber_landet_im_protokoll() {
        let storage = Arc::new(MemoryStorage::neu());
        let ledger = KeyLedger::neu(
            storage,
            STANDARD_LEBENSDAUER_SEKUNDEN,
            Bb84Einstellungen {
                aktiviert: true,
                anzahl_bits: 2048,
                rauschen: 0.0,
            },
        )
        .unwrap();

        ledger.schluessel_anfordern("a@x", "b@y", None).await.unwrap();
        let protokoll = ledger.nutzungsprotokoll().await;
        assert!(protokoll[0].details.contains("BB84 QBER"));
    }

    #[tokio::test]
    async fn bb84_abbruch_verhindert_ausgabe() {
        let storage = Arc::new(MemoryStorage::neu());
        let ledger = KeyLedger::neu(
            storage,
            STANDARD_LEBENSDAUER_SEKUNDEN,
            Bb84Einstellungen {
                aktiviert: true,
                anzahl_bits: 4096,
                // Intercept-Resend-Niveau, liegt sicher ueber 11%
                rauschen: 0.25,
            },
        )
        .unwrap();

        let ergebnis = ledger.schluessel_anfordern("a@x", "b@y", None).await;
        assert!(matches!(
            ergebnis,
            Err(LedgerError::Crypto(
                qumail_crypto::CryptoError::Bb84Abbruch { .. }
            ))
        ));
        assert_eq!(ledger.anzahl_schluessel().await, 0);
    }
}
