//! Age encryption/decryption of store payloads.
//!
//! Stores are encrypted with Age's scrypt passphrase recipient. The work
//! factor is configurable for encryption; decryption accepts whatever work
//! factor the file header declares, up to Age's own ceiling.

use std::io::{Read, Write};
use std::iter;

use zeroize::Zeroizing;

use crate::crypto::KeyMaterial;
use crate::error::{ChecklistError, Result};
use crate::storage::types::StoreOptions;

/// Encrypt `data` under `key`.
///
/// `work_factor` is the scrypt log2 N. `None` keeps Age's default, which is
/// tuned to take about a second on the current machine.
///
/// # Errors
///
/// Returns `ChecklistError::WorkFactor` if `work_factor` is outside
/// `StoreOptions::MIN_WORK_FACTOR..=StoreOptions::MAX_WORK_FACTOR`.
///
/// # Examples
///
/// ```
/// use checklist_core::crypto::KeyMaterial;
/// use checklist_core::storage::encryption::{decrypt, encrypt};
///
/// let key = KeyMaterial::new("my-secure-key").unwrap();
/// let encrypted = encrypt(b"secret data", &key, Some(10)).unwrap();
/// assert_ne!(encrypted.as_slice(), b"secret data");
/// assert_eq!(decrypt(&encrypted, &key).unwrap().as_slice(), b"secret data");
/// ```
pub fn encrypt(data: &[u8], key: &KeyMaterial, work_factor: Option<u8>) -> Result<Vec<u8>> {
    let encryptor = match work_factor {
        None => age::Encryptor::with_user_passphrase(key.passphrase()),
        Some(log_n) => {
            StoreOptions::check_work_factor(log_n)?;
            let mut recipient = age::scrypt::Recipient::new(key.passphrase());
            recipient.set_work_factor(log_n);
            age::Encryptor::with_recipients(iter::once(&recipient as &dyn age::Recipient))
                .map_err(|e| ChecklistError::Crypto(format!("Failed to create encryptor: {}", e)))?
        }
    };

    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .map_err(|e| ChecklistError::Crypto(format!("Failed to create encryptor: {}", e)))?;

    writer
        .write_all(data)
        .map_err(|e| ChecklistError::Crypto(format!("Encryption write failed: {}", e)))?;

    writer
        .finish()
        .map_err(|e| ChecklistError::Crypto(format!("Encryption finish failed: {}", e)))?;

    Ok(encrypted)
}

/// Decrypt a payload produced by [`encrypt`].
///
/// # Errors
///
/// Returns `ChecklistError::Authentication` if the key is wrong or the
/// header or payload is corrupted. The two cases are indistinguishable by
/// design of the format. Returns `ChecklistError::WorkFactor` if the file
/// demands more than `StoreOptions::MAX_WORK_FACTOR`.
pub fn decrypt(encrypted_data: &[u8], key: &KeyMaterial) -> Result<Zeroizing<Vec<u8>>> {
    decrypt_with_limit(encrypted_data, key, StoreOptions::MAX_WORK_FACTOR)
}

fn decrypt_with_limit(
    encrypted_data: &[u8],
    key: &KeyMaterial,
    max_work_factor: u8,
) -> Result<Zeroizing<Vec<u8>>> {
    let decryptor = age::Decryptor::new(encrypted_data).map_err(|e| {
        ChecklistError::Authentication(format!("Store header is unreadable: {}", e))
    })?;

    let mut identity = age::scrypt::Identity::new(key.passphrase());
    identity.set_max_work_factor(max_work_factor);
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(|e| match e {
            age::DecryptError::NoMatchingKeys
            | age::DecryptError::DecryptionFailed
            | age::DecryptError::KeyDecryptionFailed => {
                ChecklistError::Authentication("Incorrect key".to_string())
            }
            age::DecryptError::ExcessiveWork { required, .. } => ChecklistError::WorkFactor {
                log_n: required,
                min: StoreOptions::MIN_WORK_FACTOR,
                max: max_work_factor,
            },
            _ => ChecklistError::Authentication(format!("Decryption failed: {}", e)),
        })?;

    let mut decrypted = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut decrypted).map_err(|e| {
        ChecklistError::Authentication(format!("Store payload is corrupted: {}", e))
    })?;

    Ok(decrypted)
}
