//! Domaenen-Typen die in mehreren Crates gebraucht werden

use serde::{Deserialize, Serialize};

/// Label des AEAD-Algorithmus der fuer alle Nachrichten verwendet wird.
///
/// Rein informativ: der Ledger erzwingt das Label nicht, der Cipher-Adapter
/// implementiert genau diesen Algorithmus.
pub const ALGORITHMUS: &str = "AES-256-GCM";

/// Lebenszyklus-Status eines Quantum-Schluessels
///
/// Ein Schluessel startet als `Aktiv` und wechselt beim ersten Lesezugriff
/// nach Ablauf zu `Abgelaufen`. Der Uebergang ist monoton: zurueck zu
/// `Aktiv` gibt es nicht.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchluesselStatus {
    #[serde(rename = "active")]
    Aktiv,
    #[serde(rename = "expired")]
    Abgelaufen,
}

impl SchluesselStatus {
    /// Gibt das Wire-Format-Label zurueck ("active" / "expired")
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Aktiv => "active",
            Self::Abgelaufen => "expired",
        }
    }
}

/// Aktion eines Eintrags im Nutzungsprotokoll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogAktion {
    #[serde(rename = "GENERATED")]
    Generiert,
    #[serde(rename = "ACCESSED")]
    Zugegriffen,
}
