//! Key generation orchestration
//!
//! One call = validate, generate, export public, export private, protect,
//! assemble. Any failure aborts the whole call; there is no partial result and
//! no retry (a retried generation must start from a fresh random draw, which is
//! the caller's decision).

use serde::Serialize;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::pbes2::{self, EncryptionDescriptor};
use super::request::{AlgorithmSpec, KeySpec};
use crate::crypto::{
    CryptoProvider, ExportFormat, ExportedKey, KeyGenParams, NamedCurve, RsaHash,
    RustCryptoProvider,
};
use crate::encoding::openssh;
use crate::encoding::wire;
use crate::error::{Result, SecureKeygenError};

pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// Algorithm parameters actually used
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KeyMeta {
    Rsa {
        #[serde(rename = "modulusLength")]
        modulus_length: usize,
        hash: RsaHash,
    },
    Ecdsa {
        #[serde(rename = "namedCurve")]
        named_curve: NamedCurve,
    },
    Ed25519,
}

impl KeyMeta {
    fn from_spec(spec: &AlgorithmSpec) -> Self {
        match spec {
            AlgorithmSpec::Rsa(rsa) => KeyMeta::Rsa {
                modulus_length: rsa.modulus_length,
                hash: rsa.hash,
            },
            AlgorithmSpec::Ecdsa(ecdsa) => KeyMeta::Ecdsa {
                named_curve: ecdsa.named_curve,
            },
            AlgorithmSpec::Ed25519 => KeyMeta::Ed25519,
        }
    }
}

/// Everything one generation produces
pub struct GeneratedKey<K> {
    /// `authorized_keys` line
    pub public_openssh: String,
    /// "PRIVATE KEY" or "ENCRYPTED PRIVATE KEY" PEM
    pub private_pem: Zeroizing<String>,
    pub fingerprint: String,
    pub key_pair: K,
    pub meta: KeyMeta,
    /// Present exactly when a non-empty passphrase was given
    pub encryption: Option<EncryptionDescriptor>,
}

impl<K> GeneratedKey<K> {
    pub fn is_encrypted(&self) -> bool {
        self.encryption.is_some()
    }
}

impl<K> std::fmt::Debug for GeneratedKey<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedKey")
            .field("public_openssh", &self.public_openssh)
            .field("private_pem", &"[REDACTED]")
            .field("fingerprint", &self.fingerprint)
            .field("meta", &self.meta)
            .field("encryption", &self.encryption)
            .finish()
    }
}

/// Drives a [`CryptoProvider`] through one key generation
pub struct KeyGenerator<P> {
    provider: P,
}

impl Default for KeyGenerator<RustCryptoProvider> {
    fn default() -> Self {
        Self::new(RustCryptoProvider::new())
    }
}

impl<P: CryptoProvider> KeyGenerator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generate a keypair and encode both halves
    pub async fn generate(&self, spec: &KeySpec) -> Result<GeneratedKey<P::KeyPair>> {
        if !self.provider.is_available() {
            return Err(SecureKeygenError::ProviderUnavailable);
        }
        let params = spec.validate()?;

        let key_pair = self.provider.generate_key_pair(params).await?;

        let public_format = match params {
            KeyGenParams::Rsa { .. } => ExportFormat::Jwk,
            KeyGenParams::Ecdsa { .. } | KeyGenParams::Ed25519 => ExportFormat::Raw,
        };
        let public_export = self.provider.export_key(public_format, &key_pair).await?;
        let public = openssh::encode_public_key(&params, &public_export, spec.comment())?;
        debug!(key_type = %public.key_type, "encoded public key");

        let pkcs8 = match self.provider.export_key(ExportFormat::Pkcs8, &key_pair).await? {
            ExportedKey::Pkcs8(der) => der,
            _ => {
                return Err(SecureKeygenError::ExportShape(
                    "private key export is not PKCS#8".into(),
                ));
            }
        };

        let (private_pem, encryption) = match spec.passphrase_bytes() {
            Some(passphrase) => {
                let encrypted =
                    pbes2::encrypt_pkcs8(&self.provider, &pkcs8, passphrase, &spec.protection)
                        .await?;
                (encrypted.pem, Some(encrypted.descriptor))
            }
            None => (wire::pem(PRIVATE_KEY_LABEL, &pkcs8), None),
        };

        let fingerprint = public.fingerprint();
        info!(
            key_type = %public.key_type,
            %fingerprint,
            encrypted = encryption.is_some(),
            "generated SSH key"
        );

        Ok(GeneratedKey {
            public_openssh: public.line,
            private_pem: Zeroizing::new(private_pem),
            fingerprint,
            key_pair,
            meta: KeyMeta::from_spec(&spec.algorithm),
            encryption,
        })
    }

    /// [`generate`](Self::generate) from the UI's JSON option object
    pub async fn generate_from_json(&self, json: &str) -> Result<GeneratedKey<P::KeyPair>> {
        let spec = KeySpec::from_json(json)?;
        self.generate(&spec).await
    }
}

/// Generate with the default RustCrypto provider
pub async fn generate_ssh_key(spec: &KeySpec) -> Result<GeneratedKey<crate::crypto::KeyPair>> {
    KeyGenerator::default().generate(spec).await
}
