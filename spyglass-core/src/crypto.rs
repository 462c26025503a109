//! Sealing of user settings into opaque URL tokens.
//!
//! Settings travel inside the addon URL, so they are encrypted rather than
//! merely encoded: AES-256-GCM with a key derived from the server secret,
//! a fresh random nonce prepended to every ciphertext, and the whole
//! envelope URL-safe base64 encoded without padding. GCM authentication
//! means any tampering or truncation surfaces as [`CryptoError::Tampered`].

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::settings::UserSettings;

const NONCE_SIZE: usize = 12;

/// Errors that can occur while sealing or unsealing settings tokens.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Token is not valid URL-safe base64.
    #[error("Settings token is not valid base64: {reason}")]
    Encoding {
        /// The reason decoding failed
        reason: String,
    },

    /// Token is truncated, tampered with, or sealed under another secret.
    #[error("Settings token failed authentication")]
    Tampered,

    /// Settings could not be serialized or deserialized.
    #[error("Settings serialization failed: {reason}")]
    Serialization {
        /// The reason serialization failed
        reason: String,
    },
}

/// Seals and unseals [`UserSettings`] tokens under a server secret.
#[derive(Clone)]
pub struct SettingsSealer {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SettingsSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsSealer").finish_non_exhaustive()
    }
}

impl SettingsSealer {
    /// Creates a sealer whose key is derived from `secret` via SHA-256.
    ///
    /// The secret is a server-side random value, so a single hash is the
    /// whole key schedule; password-grade stretching is not needed here.
    pub fn new(secret: &str) -> Self {
        let key_bytes: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
        Self { cipher }
    }

    /// Seals settings into a URL-safe token.
    ///
    /// # Errors
    /// - `CryptoError::Serialization` - Settings could not be serialized
    /// - `CryptoError::Tampered` - Cipher rejected the payload
    pub fn seal(&self, settings: &UserSettings) -> Result<String, CryptoError> {
        let plaintext =
            serde_json::to_vec(settings).map_err(|e| CryptoError::Serialization {
                reason: e.to_string(),
            })?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_slice())
            .map_err(|_| CryptoError::Tampered)?;

        let mut envelope = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(envelope))
    }

    /// Unseals a token back into settings.
    ///
    /// # Errors
    /// - `CryptoError::Encoding` - Token is not valid base64
    /// - `CryptoError::Tampered` - Token failed authentication
    /// - `CryptoError::Serialization` - Sealed payload is not valid settings
    pub fn unseal(&self, token: &str) -> Result<UserSettings, CryptoError> {
        let envelope = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| CryptoError::Encoding {
                reason: e.to_string(),
            })?;

        if envelope.len() <= NONCE_SIZE {
            return Err(CryptoError::Tampered);
        }
        let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_SIZE);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CryptoError::Tampered)?;

        serde_json::from_slice(&plaintext).map_err(|e| CryptoError::Serialization {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_unseal_round_trip() {
        let sealer = SettingsSealer::new("round-trip-secret");
        let settings = UserSettings::for_testing();

        let token = sealer.seal(&settings).unwrap();
        assert_eq!(sealer.unseal(&token).unwrap(), settings);
    }

    #[test]
    fn test_token_is_url_safe() {
        let sealer = SettingsSealer::new("url-safety-secret");
        let token = sealer.seal(&UserSettings::for_testing()).unwrap();

        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_nonces_differ_between_seals() {
        let sealer = SettingsSealer::new("nonce-secret");
        let settings = UserSettings::for_testing();

        let first = sealer.seal(&settings).unwrap();
        let second = sealer.seal(&settings).unwrap();
        assert_ne!(first, second);
        assert_eq!(sealer.unseal(&first).unwrap(), sealer.unseal(&second).unwrap());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let sealer = SettingsSealer::new("tamper-secret");
        let token = sealer.seal(&UserSettings::for_testing()).unwrap();

        let mut tampered: Vec<char> = token.chars().collect();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();

        assert!(matches!(
            sealer.unseal(&tampered),
            Err(CryptoError::Tampered) | Err(CryptoError::Encoding { .. })
        ));
    }

    #[test]
    fn test_truncated_token_rejected() {
        let sealer = SettingsSealer::new("truncation-secret");
        assert!(matches!(sealer.unseal("c2hvcnQ"), Err(CryptoError::Tampered)));
        assert!(sealer.unseal("").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = SettingsSealer::new("first-secret")
            .seal(&UserSettings::for_testing())
            .unwrap();

        assert!(matches!(
            SettingsSealer::new("second-secret").unseal(&token),
            Err(CryptoError::Tampered)
        ));
    }
}
