//! AES-256-GCM Cipher-Adapter
//!
//! Verschluesselt Nachrichten-Bodies gegen einen 32-Byte-Schluessel aus dem
//! Ledger. Pro Aufruf wird eine frische 12-Byte-Zufalls-Nonce erzeugt –
//! Nonce-Wiederverwendung unter demselben Schluessel bricht die
//! AEAD-Garantien vollstaendig und ist hier eine Korrektheits-Invariante.
//!
//! ## Wire-Format
//! ```text
//! { ciphertext: base64, nonce: base64(12 Bytes), tag: base64(16 Bytes) }
//! ```
//!
//! ## AAD
//! Das konstante Protokoll-Label `QuMail-v1.0` wird als Associated Data in
//! den Auth-Tag gebunden; Ciphertexte aus einem anderen Protokollkontext
//! verifizieren nicht.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce as AesNonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::schluessel::{als_base64, aus_base64, SCHLUESSEL_LAENGE};

/// Protokoll-/Versions-Label, als AAD in jeden Auth-Tag gebunden
pub const AAD_KONTEXT: &[u8] = b"QuMail-v1.0";

/// Nonce-Laenge fuer AES-GCM: 12 Bytes
pub const NONCE_LAENGE: usize = 12;

/// Auth-Tag-Laenge fuer AES-256-GCM: 16 Bytes
pub const TAG_LAENGE: usize = 16;

/// Eine verschluesselte Nachricht im Transport-Format (alles Base64)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerschluesselteNachricht {
    pub ciphertext: String,
    pub nonce: String,
    pub tag: String,
}

/// Verschluesselt einen Klartext mit AES-256-GCM
///
/// Erzeugt pro Aufruf eine frische Zufalls-Nonce und gibt Ciphertext,
/// Nonce und Auth-Tag getrennt Base64-kodiert zurueck.
pub fn nachricht_verschluesseln(
    plaintext: &[u8],
    schluessel: &[u8],
) -> CryptoResult<VerschluesselteNachricht> {
    if schluessel.len() != SCHLUESSEL_LAENGE {
        return Err(CryptoError::UngueltigeSchluesselLaenge {
            erwartet: SCHLUESSEL_LAENGE,
            erhalten: schluessel.len(),
        });
    }

    let mut nonce_bytes = [0u8; NONCE_LAENGE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = Key::<Aes256Gcm>::from_slice(schluessel);
    let cipher = Aes256Gcm::new(key);
    let nonce = AesNonce::from_slice(&nonce_bytes);

    // aes-gcm haengt den 16-Byte-Tag an den Ciphertext an
    let mit_tag = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: AAD_KONTEXT,
            },
        )
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    let (ciphertext, tag) = mit_tag.split_at(mit_tag.len() - TAG_LAENGE);

    Ok(VerschluesselteNachricht {
        ciphertext: als_base64(ciphertext),
        nonce: als_base64(&nonce_bytes),
        tag: als_base64(tag),
    })
}

/// Entschluesselt eine Nachricht und verifiziert den Auth-Tag
///
/// Schlaegt ohne Teil-Klartext fehl wenn der Tag nicht verifiziert
/// (manipulierter Ciphertext, falscher Schluessel, falsche Nonce oder
/// fremde AAD). Malformierte Eingaben (Base64, Laengen) sind
/// Eingabefehler, keine Authentifizierungs-Fehler.
pub fn nachricht_entschluesseln(
    nachricht: &VerschluesselteNachricht,
    schluessel: &[u8],
) -> CryptoResult<Vec<u8>> {
    if schluessel.len() != SCHLUESSEL_LAENGE {
        return Err(CryptoError::UngueltigeSchluesselLaenge {
            erwartet: SCHLUESSEL_LAENGE,
            erhalten: schluessel.len(),
        });
    }

    let ciphertext = aus_base64(&nachricht.ciphertext)?;
    let nonce_bytes = aus_base64(&nachricht.nonce)?;
    let tag = aus_base64(&nachricht.tag)?;

    if nonce_bytes.len() != NONCE_LAENGE {
        return Err(CryptoError::UngueltigeNonceLaenge {
            erwartet: NONCE_LAENGE,
            erhalten: nonce_bytes.len(),
        });
    }
    if tag.len() != TAG_LAENGE {
        return Err(CryptoError::UngueltigeTagLaenge {
            erwartet: TAG_LAENGE,
            erhalten: tag.len(),
        });
    }

    let key = Key::<Aes256Gcm>::from_slice(schluessel);
    let cipher = Aes256Gcm::new(key);
    let nonce = AesNonce::from_slice(&nonce_bytes);

    let mut mit_tag = ciphertext;
    mit_tag.extend_from_slice(&tag);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: &mit_tag,
                aad: AAD_KONTEXT,
            },
        )
        .map_err(|_| CryptoError::Entschluesselung)
}
