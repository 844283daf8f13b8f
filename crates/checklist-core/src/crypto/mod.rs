//! Key handling for Checklist stores.
//!
//! The engine accepts an already-resolved byte secret. Where that secret comes
//! from (a key file, an explicit value, an environment fallback) is decided by
//! the caller.
//!
//! ## Security Model
//!
//! - Store files are encrypted with Age using its scrypt passphrase recipient
//! - Key bytes are zeroized from memory on drop
//! - Keys never appear in `Debug` output
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the encrypted store file
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to process memory while a store is open

pub mod key;

pub use key::KeyMaterial;
