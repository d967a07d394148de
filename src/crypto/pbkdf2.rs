//! PBKDF2 key derivation (RFC 8018 §5.2)
//!
//! HMAC-SHA-1 stays available as the PRF because it is the PBES2 default that
//! every PKCS#8 reader understands; the SHA-2 family is selectable.

use ::pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use super::{PrfHash, SecureBytes};
use crate::error::{Result, SecureKeygenError};

/// Derive `key_len` bytes from `password`
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    hash: PrfHash,
    key_len: usize,
) -> Result<SecureBytes> {
    if iterations == 0 {
        return Err(SecureKeygenError::provider(
            "PBKDF2 iteration count must be positive",
        ));
    }
    if key_len == 0 {
        return Err(SecureKeygenError::provider("PBKDF2 output length must be positive"));
    }

    let mut key = SecureBytes::zeroed(key_len);
    let out = key.as_mut_slice();
    match hash {
        PrfHash::Sha1 => pbkdf2_hmac::<Sha1>(password, salt, iterations, out),
        PrfHash::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, iterations, out),
        PrfHash::Sha384 => pbkdf2_hmac::<Sha384>(password, salt, iterations, out),
        PrfHash::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, iterations, out),
    }
    Ok(key)
}
