//! Integration-Tests fuer den Schluessel-Lebenszyklus mit Datei-Snapshot

use std::path::PathBuf;
use std::sync::Arc;

use qumail_core::SchluesselStatus;
use qumail_ledger::{
    Bb84Einstellungen, KeyLedger, Snapshot, SnapshotDatei, STANDARD_LEBENSDAUER_SEKUNDEN,
};

fn temp_pfad() -> PathBuf {
    std::env::temp_dir().join(format!(
        "qumail_ledger_test_{}.json",
        uuid::Uuid::new_v4().simple()
    ))
}

fn ledger(pfad: &PathBuf) -> KeyLedger {
    KeyLedger::neu(
        Arc::new(SnapshotDatei::neu(pfad)),
        STANDARD_LEBENSDAUER_SEKUNDEN,
        Bb84Einstellungen::default(),
    )
    .expect("Ledger-Start fehlgeschlagen")
}

#[tokio::test]
async fn snapshot_datei_enthaelt_keys_und_protokoll() {
    let pfad = temp_pfad();
    let ledger = ledger(&pfad);

    let record = ledger
        .schluessel_anfordern("alice@qumail.dev", "bob@qumail.dev", None)
        .await
        .unwrap();
    ledger.schluessel_abrufen(&record.key_id).await.unwrap();

    let inhalt = std::fs::read_to_string(&pfad).expect("Snapshot-Datei fehlt");
    let snapshot: Snapshot = serde_json::from_str(&inhalt).expect("Snapshot nicht parsbar");
    assert_eq!(snapshot.keys.len(), 1);
    assert_eq!(snapshot.keys[0].key_id, record.key_id);
    // GENERATED + ACCESSED
    assert_eq!(snapshot.usage_log.len(), 2);

    std::fs::remove_file(&pfad).unwrap();
}

#[tokio::test]
async fn neustart_laedt_zustand_aus_datei() {
    let pfad = temp_pfad();
    let record = {
        let ledger = ledger(&pfad);
        ledger
            .schluessel_anfordern("a@x", "b@y", Some(600))
            .await
            .unwrap()
    };

    let neu = ledger(&pfad);
    let gefunden = neu
        .schluessel_abrufen(&record.key_id)
        .await
        .unwrap()
        .expect("Eintrag muss nach Neustart auffindbar sein");
    assert_eq!(gefunden.key_b64, record.key_b64);
    assert_eq!(gefunden.status, SchluesselStatus::Aktiv);

    std::fs::remove_file(&pfad).unwrap();
}

#[tokio::test]
async fn ablauf_ueberlebt_neustart() {
    let pfad = temp_pfad();
    let record = {
        let ledger = ledger(&pfad);
        let record = ledger
            .schluessel_anfordern("a@x", "b@y", Some(1))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        let abgelaufen = ledger
            .schluessel_abrufen(&record.key_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(abgelaufen.status, SchluesselStatus::Abgelaufen);
        record
    };

    // Der persistierte Status ist bereits abgelaufen, kein Rueck-Uebergang
    let neu = ledger(&pfad);
    let gelesen = neu
        .schluessel_abrufen(&record.key_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(gelesen.status, SchluesselStatus::Abgelaufen);

    std::fs::remove_file(&pfad).unwrap();
}
