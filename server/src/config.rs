//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};

use qumail_ledger::{Bb84Einstellungen, STANDARD_LEBENSDAUER_SEKUNDEN};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Schluessel-Einstellungen
    pub schluessel: SchluesselEinstellungen,
    /// Persistenz-Einstellungen (Ledger-Snapshot)
    pub persistenz: PersistenzEinstellungen,
    /// BB84-Simulations-Einstellungen
    pub bb84: Bb84Konfig,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Dienstes
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "QuMail Backend".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer die REST-API
    pub bind_adresse: String,
    /// Port fuer die REST-API
    pub api_port: u16,
    /// CORS-Origins (leer = alle erlaubt, nur fuer Entwicklung)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 5001,
            cors_origins: vec![],
        }
    }
}

/// Schluessel-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchluesselEinstellungen {
    /// Standard-Lebensdauer eines Schluessels in Sekunden
    pub standard_lebensdauer_sekunden: i64,
}

impl Default for SchluesselEinstellungen {
    fn default() -> Self {
        Self {
            standard_lebensdauer_sekunden: STANDARD_LEBENSDAUER_SEKUNDEN,
        }
    }
}

/// Persistenz-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenzEinstellungen {
    /// Snapshot auf Platte schreiben (false = nur In-Memory)
    pub aktiviert: bool,
    /// Pfad der Snapshot-Datei
    pub snapshot_pfad: String,
}

impl Default for PersistenzEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: true,
            snapshot_pfad: "qkd_ledger.json".into(),
        }
    }
}

/// BB84-Simulations-Einstellungen
///
/// Der QBER-Schwellwert (11%) ist eine Protokoll-Konstante und nicht
/// konfigurierbar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Bb84Konfig {
    /// Simulation pro Schluessel-Anforderung ausfuehren
    pub aktiviert: bool,
    /// Anzahl simulierter Qubits pro Runde
    pub anzahl_bits: usize,
    /// Kanal-Rauschen (Bit-Kipp-Wahrscheinlichkeit)
    pub rauschen: f64,
}

impl Default for Bb84Konfig {
    fn default() -> Self {
        let standard = Bb84Einstellungen::default();
        Self {
            aktiviert: standard.aktiviert,
            anzahl_bits: standard.anzahl_bits,
            rauschen: standard.rauschen,
        }
    }
}

impl From<Bb84Konfig> for Bb84Einstellungen {
    fn from(konfig: Bb84Konfig) -> Self {
        Self {
            aktiviert: konfig.aktiviert,
            anzahl_bits: konfig.anzahl_bits,
            rauschen: konfig.rauschen,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl LoggingEinstellungen {
    /// Gibt `true` zurueck wenn das JSON-Format konfiguriert ist;
    /// alles andere faellt auf das Text-Format zurueck
    pub fn ist_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    /// Initialisiert tracing-subscriber mit dem konfigurierten Level
    /// und Format. `RUST_LOG` uebersteuert das konfigurierte Level.
    pub fn initialisieren(&self) {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        if self.ist_json() {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        } else {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Gibt die vollstaendige Bind-Adresse fuer die REST-API zurueck
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port)
    }
}
