//! Cryptographic provider seam
//!
//! The key generator never touches a crypto library directly. Everything that
//! may block for a noticeable time (prime search, key export, PBKDF2, bulk
//! encryption) goes through a [`CryptoProvider`] handle, which makes those calls
//! the only suspension points of a generation and lets tests swap in a double.

use async_trait::async_trait;

use super::{Cipher, NamedCurve, PrfHash, SecureBytes};
use crate::error::Result;

/// What to generate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyGenParams {
    Rsa {
        modulus_length: usize,
        public_exponent: u64,
    },
    Ecdsa {
        curve: NamedCurve,
    },
    Ed25519,
}

/// Export formats a provider understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Public RSA components
    Jwk,
    /// Raw public key: SEC1 uncompressed point for ECDSA, 32 bytes for Ed25519
    Raw,
    /// Private key as PKCS#8 DER
    Pkcs8,
}

/// Provider export output
///
/// JWK members are optional because a provider may legitimately return a JWK
/// without them; the encoder turns that into an export shape error.
#[derive(Debug)]
pub enum ExportedKey {
    Jwk {
        n: Option<Vec<u8>>,
        e: Option<Vec<u8>>,
    },
    Raw(Vec<u8>),
    Pkcs8(SecureBytes),
}

/// PBKDF2 parameters for [`CryptoProvider::derive_key`]
#[derive(Clone, Copy, Debug)]
pub struct Pbkdf2Params<'a> {
    pub salt: &'a [u8],
    pub iterations: u32,
    pub hash: PrfHash,
    pub key_len: usize,
}

#[async_trait]
pub trait CryptoProvider: Send + Sync {
    /// Opaque handle to a generated keypair
    type KeyPair: Send + Sync;

    /// Whether the underlying crypto subsystem can be used at all
    fn is_available(&self) -> bool;

    async fn generate_key_pair(&self, params: KeyGenParams) -> Result<Self::KeyPair>;

    async fn export_key(&self, format: ExportFormat, key_pair: &Self::KeyPair)
        -> Result<ExportedKey>;

    async fn derive_key(&self, passphrase: &[u8], params: Pbkdf2Params<'_>)
        -> Result<SecureBytes>;

    /// CBC-encrypt block-aligned `plaintext`; no padding is added
    async fn encrypt(
        &self,
        cipher: Cipher,
        key: &[u8],
        iv: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Fresh bytes from a cryptographically secure source
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>>;
}
