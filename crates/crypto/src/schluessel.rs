//! Zufalls-Schluessel-Generator
//!
//! Erzeugt kryptografisch sichere Zufalls-Bytes fuer symmetrische
//! Schluessel. Die Base64-Helfer sind das Transport-Encoding fuer die
//! REST-API und den Snapshot; Encode/Decode ist verlustfrei invertierbar.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};

/// Schluessel-Laenge fuer AES-256: 32 Bytes
pub const SCHLUESSEL_LAENGE: usize = 32;

/// Erzeugt `laenge_bytes` kryptografisch sichere Zufalls-Bytes
///
/// Jeder Aufruf zieht frisch aus dem OS-CSPRNG; es gibt kein Caching und
/// keinen vorhersagbaren Seed. Laenge 0 ist ein Eingabefehler.
pub fn schluessel_generieren(laenge_bytes: usize) -> CryptoResult<Vec<u8>> {
    if laenge_bytes == 0 {
        return Err(CryptoError::UngueltigeEingabe(
            "Schluessel-Laenge muss positiv sein".into(),
        ));
    }

    let mut bytes = vec![0u8; laenge_bytes];
    OsRng.fill_bytes(&mut bytes);
    Ok(bytes)
}

/// Kodiert Bytes als Standard-Base64 (Transport-Format)
pub fn als_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Dekodiert Standard-Base64 zurueck zu Bytes
pub fn aus_base64(s: &str) -> CryptoResult<Vec<u8>> {
    Ok(STANDARD.decode(s)?)
}
