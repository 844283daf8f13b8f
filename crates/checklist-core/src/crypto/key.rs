//! Normalized key material.

use secrecy::SecretString;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ChecklistError, Result};

/// The secret used to encrypt a store.
///
/// Construct it from the raw bytes the caller resolved. Trailing line
/// endings are stripped so that a key file's final newline does not become
/// part of the key.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Normalize `raw` into key material.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistError::InvalidKey` if nothing remains after
    /// normalization.
    ///
    /// # Examples
    ///
    /// ```
    /// use checklist_core::crypto::KeyMaterial;
    ///
    /// let key = KeyMaterial::new(b"correct horse battery staple\n").unwrap();
    /// assert_eq!(key.len(), 28);
    /// assert!(KeyMaterial::new(b"\r\n").is_err());
    /// ```
    pub fn new(raw: impl Into<Vec<u8>>) -> Result<Self> {
        let mut bytes = raw.into();
        while matches!(bytes.last(), Some(b'\n' | b'\r')) {
            bytes.pop();
        }
        if bytes.is_empty() {
            bytes.zeroize();
            return Err(ChecklistError::InvalidKey(
                "Key cannot be empty".to_string(),
            ));
        }
        Ok(Self { bytes })
    }

    /// Number of key bytes after normalization.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty keys are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The passphrase handed to Age.
    ///
    /// Age passphrases are strings, so the key bytes are hex encoded. This
    /// keeps arbitrary binary keys representable and the mapping one-to-one.
    pub(crate) fn passphrase(&self) -> SecretString {
        SecretString::from(hex::encode(&self.bytes))
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl PartialEq for KeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for KeyMaterial {}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_trailing_newlines_are_stripped() {
        let plain = KeyMaterial::new("secret").unwrap();
        assert_eq!(KeyMaterial::new("secret\n").unwrap(), plain);
        assert_eq!(KeyMaterial::new("secret\r\n").unwrap(), plain);
        assert_eq!(KeyMaterial::new("secret\n\n").unwrap(), plain);
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        let spaced = KeyMaterial::new(" secret ").unwrap();
        assert_eq!(spaced.len(), 8);
        assert_ne!(spaced, KeyMaterial::new("secret").unwrap());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            KeyMaterial::new(Vec::new()),
            Err(ChecklistError::InvalidKey(_))
        ));
        assert!(matches!(
            KeyMaterial::new("\n"),
            Err(ChecklistError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_binary_keys_are_hex_encoded() {
        let key = KeyMaterial::new(vec![0x00, 0xff, 0x10]).unwrap();
        assert_eq!(key.passphrase().expose_secret(), "00ff10");
    }

    #[test]
    fn test_debug_redacts() {
        let key = KeyMaterial::new("user@host").unwrap();
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("user@host"));
        assert!(!debug_output.contains(&hex::encode("user@host")));
    }
}
