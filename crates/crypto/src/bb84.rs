//! Spielzeug-Simulation des BB84-Siebens
//!
//! Simuliert den klassischen Teil von BB84: Sender und Empfaenger waehlen
//! zufaellige Basen, nur Positionen mit uebereinstimmender Basis ueberleben
//! das Sieben, und ein Kanal-Rauschen kippt gesiebte Bits. Die geschaetzte
//! Fehlerrate (QBER) entscheidet ausschliesslich ob die Ausgabe verworfen
//! wird – es gibt keine Fehlerkorrektur und keine Privacy Amplification.

use rand::Rng;

use crate::error::{CryptoError, CryptoResult};

/// QBER-Abbruch-Schwellwert: 11% (ueblicher BB84-Grenzwert)
pub const QBER_SCHWELLWERT: f64 = 0.11;

/// Ergebnis einer BB84-Simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bb84Ergebnis {
    /// Anzahl der Bits die das Basis-Sieben ueberlebt haben
    pub gesiebte_laenge: usize,
    /// Geschaetzte Quanten-Bit-Fehlerrate
    pub fehlerrate: f64,
}

/// Simuliert eine BB84-Runde ueber `anzahl_bits` Qubits
///
/// `rauschen` ist die Wahrscheinlichkeit dass ein gesiebtes Bit auf dem
/// Kanal kippt (0.0 = idealer Kanal, ein Lauscher hebt die Rate auf ~25%).
/// Gibt [`CryptoError::Bb84Abbruch`] zurueck wenn die Fehlerrate den
/// Schwellwert ueberschreitet.
pub fn bb84_simulieren(anzahl_bits: usize, rauschen: f64) -> CryptoResult<Bb84Ergebnis> {
    if anzahl_bits == 0 {
        return Err(CryptoError::UngueltigeEingabe(
            "anzahl_bits muss positiv sein".into(),
        ));
    }
    if !(0.0..=1.0).contains(&rauschen) {
        return Err(CryptoError::UngueltigeEingabe(format!(
            "rauschen muss in [0, 1] liegen, war {rauschen}"
        )));
    }

    let mut rng = rand::thread_rng();
    let mut gesiebte_laenge = 0usize;
    let mut fehler = 0usize;

    for _ in 0..anzahl_bits {
        let basis_sender: bool = rng.gen();
        let basis_empfaenger: bool = rng.gen();
        if basis_sender != basis_empfaenger {
            continue;
        }

        gesiebte_laenge += 1;
        if rng.gen_bool(rauschen) {
            fehler += 1;
        }
    }

    let fehlerrate = if gesiebte_laenge == 0 {
        0.0
    } else {
        fehler as f64 / gesiebte_laenge as f64
    };

    if fehlerrate > QBER_SCHWELLWERT {
        return Err(CryptoError::Bb84Abbruch {
            fehlerrate,
            schwellwert: QBER_SCHWELLWERT,
        });
    }

    Ok(Bb84Ergebnis {
        gesiebte_laenge,
        fehlerrate,
    })
}
