//! Cryptographic primitives for secure-keygen
//!
//! This module provides:
//! - The `CryptoProvider` seam the key generator talks to
//! - A default provider on RSA / NIST P-curves / Ed25519 from RustCrypto
//! - PBKDF2-HMAC key derivation and AES-CBC encryption for PBES2
//! - Secure memory handling with automatic zeroing

mod aes_cbc;
mod algorithm;
mod keys;
mod pbkdf2;
mod provider;
mod rustcrypto;
mod secure_bytes;

pub use algorithm::{
    Cipher, NamedCurve, PrfHash, RsaHash, AES_BLOCK_LEN, OID_PBES2, OID_PBKDF2,
};
pub use keys::KeyPair;
pub use provider::{CryptoProvider, ExportFormat, ExportedKey, KeyGenParams, Pbkdf2Params};
pub use rustcrypto::RustCryptoProvider;
pub use secure_bytes::SecureBytes;
