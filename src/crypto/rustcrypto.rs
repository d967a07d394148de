//! Default provider backed by the RustCrypto crates
//!
//! RSA prime search and PBKDF2 run on the blocking thread pool so that an
//! async caller is never stalled by them.

use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use tokio::task;
use tracing::debug;

use super::{
    aes_cbc, pbkdf2, Cipher, CryptoProvider, ExportFormat, ExportedKey, KeyGenParams, KeyPair,
    Pbkdf2Params, SecureBytes,
};
use crate::error::{Result, SecureKeygenError};

#[derive(Clone, Copy, Debug, Default)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    pub fn new() -> Self {
        Self
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(SecureKeygenError::provider)?
}

#[async_trait]
impl CryptoProvider for RustCryptoProvider {
    type KeyPair = KeyPair;

    fn is_available(&self) -> bool {
        let mut probe = [0u8; 1];
        OsRng.try_fill_bytes(&mut probe).is_ok()
    }

    async fn generate_key_pair(&self, params: KeyGenParams) -> Result<KeyPair> {
        debug!(?params, "generating keypair");
        blocking(move || KeyPair::generate(params)).await
    }

    async fn export_key(&self, format: ExportFormat, key_pair: &KeyPair) -> Result<ExportedKey> {
        debug!(?format, algorithm = key_pair.algorithm(), "exporting key");
        match format {
            ExportFormat::Jwk => key_pair.export_jwk(),
            ExportFormat::Raw => key_pair.export_raw(),
            ExportFormat::Pkcs8 => key_pair.export_pkcs8(),
        }
    }

    async fn derive_key(&self, passphrase: &[u8], params: Pbkdf2Params<'_>) -> Result<SecureBytes> {
        debug!(
            iterations = params.iterations,
            hash = %params.hash,
            key_len = params.key_len,
            "deriving key"
        );
        let passphrase = SecureBytes::from(passphrase);
        let salt = params.salt.to_vec();
        let (iterations, hash, key_len) = (params.iterations, params.hash, params.key_len);

        blocking(move || pbkdf2::derive_key(&passphrase, &salt, iterations, hash, key_len)).await
    }

    async fn encrypt(
        &self,
        cipher: Cipher,
        key: &[u8],
        iv: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        aes_cbc::encrypt(cipher, key, iv, plaintext)
    }

    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(SecureKeygenError::provider)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrfHash;

    #[tokio::test]
    async fn test_random_bytes_are_fresh() {
        let provider = RustCryptoProvider::new();
        let a = provider.random_bytes(16).unwrap();
        let b = provider.random_bytes(16).unwrap();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_derive_key_off_thread_matches_inline() {
        let provider = RustCryptoProvider::new();
        let params = Pbkdf2Params {
            salt: b"salt",
            iterations: 2,
            hash: PrfHash::Sha1,
            key_len: 20,
        };
        let derived = provider.derive_key(b"password", params).await.unwrap();
        assert_eq!(
            hex::encode(&*derived),
            "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957"
        );
    }

    #[tokio::test]
    async fn test_export_formats() {
        let provider = RustCryptoProvider::new();
        assert!(provider.is_available());

        let keypair = provider
            .generate_key_pair(KeyGenParams::Ed25519)
            .await
            .unwrap();
        assert!(matches!(
            provider.export_key(ExportFormat::Raw, &keypair).await.unwrap(),
            ExportedKey::Raw(_)
        ));
        assert!(matches!(
            provider.export_key(ExportFormat::Pkcs8, &keypair).await.unwrap(),
            ExportedKey::Pkcs8(_)
        ));
        assert!(provider.export_key(ExportFormat::Jwk, &keypair).await.is_err());
    }
}
