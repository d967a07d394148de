//! PBES2 protection of PKCS#8 private keys (RFC 8018 §6.2, RFC 5958 §3)
//!
//! ```text
//! EncryptedPrivateKeyInfo ::= SEQUENCE {
//!     encryptionAlgorithm  AlgorithmIdentifier {PBES2, PBES2-params},
//!     encryptedData        OCTET STRING }
//!
//! PBES2-params ::= SEQUENCE {
//!     keyDerivationFunc  AlgorithmIdentifier {PBKDF2, PBKDF2-params},
//!     encryptionScheme   AlgorithmIdentifier {aesXXX-CBC, OCTET STRING iv} }
//!
//! PBKDF2-params ::= SEQUENCE {
//!     salt            OCTET STRING,
//!     iterationCount  INTEGER,
//!     keyLength       INTEGER,
//!     prf             AlgorithmIdentifier DEFAULT hmacWithSHA1 }
//! ```

use serde::Serialize;
use tracing::debug;

use super::ProtectionConfig;
use crate::crypto::{
    Cipher, CryptoProvider, PrfHash, Pbkdf2Params, AES_BLOCK_LEN, OID_PBES2, OID_PBKDF2,
};
use crate::encoding::{der, wire};
use crate::error::Result;

pub const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

/// What protected the key, for display only
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionDescriptor {
    pub scheme: &'static str,
    pub kdf: KdfDescriptor,
    pub cipher: Cipher,
    #[serde(rename = "ivB64")]
    pub iv_b64: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfDescriptor {
    pub algo: &'static str,
    pub prf: PrfHash,
    pub iterations: u32,
    #[serde(rename = "saltB64")]
    pub salt_b64: String,
}

/// PEM document plus its descriptor
#[derive(Clone, Debug)]
pub struct EncryptedPem {
    pub pem: String,
    pub descriptor: EncryptionDescriptor,
}

/// PKCS#7 padding to `block_size`; aligned input gains a full block
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad = block_size - data.len() % block_size;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

/// `AlgorithmIdentifier {PBKDF2, PBKDF2-params}`
pub fn pbkdf2_algorithm_identifier(
    salt: &[u8],
    iterations: u32,
    key_len: usize,
    prf: PrfHash,
) -> Result<Vec<u8>> {
    let salt = der::octet_string(salt);
    let iterations = der::integer(u64::from(iterations));
    let key_len = der::integer(key_len as u64);
    let prf = if prf.is_der_default() {
        None
    } else {
        Some(der::algorithm_identifier(prf.hmac_oid(), None)?)
    };

    let params = der::sequence([
        Some(salt.as_slice()),
        Some(iterations.as_slice()),
        Some(key_len.as_slice()),
        prf.as_deref(),
    ]);
    der::algorithm_identifier(OID_PBKDF2, Some(&params))
}

/// Full `EncryptedPrivateKeyInfo` DER around an already encrypted payload
pub fn encrypted_private_key_info(
    salt: &[u8],
    iterations: u32,
    prf: PrfHash,
    cipher: Cipher,
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let kdf = pbkdf2_algorithm_identifier(salt, iterations, cipher.key_len(), prf)?;
    let enc = der::algorithm_identifier(cipher.oid(), Some(&der::octet_string(iv)))?;
    let pbes2_params = der::sequence([kdf.as_slice(), enc.as_slice()]);
    let algorithm = der::algorithm_identifier(OID_PBES2, Some(&pbes2_params))?;
    let data = der::octet_string(ciphertext);

    Ok(der::sequence([algorithm.as_slice(), data.as_slice()]))
}

/// Encrypt a PKCS#8 document under `passphrase` and armor it as
/// "ENCRYPTED PRIVATE KEY"
///
/// Salt and IV are drawn from the provider on every call.
pub async fn encrypt_pkcs8<P>(
    provider: &P,
    pkcs8: &[u8],
    passphrase: &[u8],
    config: &ProtectionConfig,
) -> Result<EncryptedPem>
where
    P: CryptoProvider + ?Sized,
{
    config.validate()?;
    let cipher = config.cipher;
    let kdf = &config.kdf;

    let salt = provider.random_bytes(kdf.salt_size)?;
    let iv = provider.random_bytes(cipher.iv_len())?;

    debug!(%cipher, prf = %kdf.hash, iterations = kdf.iterations, "protecting private key");
    let key = provider
        .derive_key(
            passphrase,
            Pbkdf2Params {
                salt: &salt,
                iterations: kdf.iterations,
                hash: kdf.hash,
                key_len: cipher.key_len(),
            },
        )
        .await?;

    let padded = zeroize::Zeroizing::new(pkcs7_pad(pkcs8, AES_BLOCK_LEN));
    let ciphertext = provider.encrypt(cipher, &key, &iv, &padded).await?;

    let der =
        encrypted_private_key_info(&salt, kdf.iterations, kdf.hash, cipher, &iv, &ciphertext)?;

    Ok(EncryptedPem {
        pem: wire::pem(ENCRYPTED_PRIVATE_KEY_LABEL, &der),
        descriptor: EncryptionDescriptor {
            scheme: "PBES2",
            kdf: KdfDescriptor {
                algo: "PBKDF2",
                prf: kdf.hash,
                iterations: kdf.iterations,
                salt_b64: wire::base64(&salt),
            },
            cipher,
            iv_b64: wire::base64(&iv),
        },
    })
}
