//! AES-CBC block encryption
//!
//! Input must already be block-aligned: padding belongs to the PBES2 layer,
//! so this function never adds a second padding block.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::NoPadding, BlockEncryptMut, KeyIvInit};

use super::{Cipher, AES_BLOCK_LEN};
use crate::error::{Result, SecureKeygenError};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Encrypt block-aligned `plaintext` under `key` / `iv`
pub fn encrypt(cipher: Cipher, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    if key.len() != cipher.key_len() {
        return Err(SecureKeygenError::provider(format!(
            "Invalid {} key length: expected {}, got {}",
            cipher,
            cipher.key_len(),
            key.len()
        )));
    }
    if iv.len() != AES_BLOCK_LEN {
        return Err(SecureKeygenError::provider(format!(
            "Invalid IV length: expected {}, got {}",
            AES_BLOCK_LEN,
            iv.len()
        )));
    }
    if plaintext.len() % AES_BLOCK_LEN != 0 {
        return Err(SecureKeygenError::provider(format!(
            "Plaintext length {} is not a multiple of the AES block size",
            plaintext.len()
        )));
    }

    let ciphertext = match cipher {
        Cipher::Aes128Cbc => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(SecureKeygenError::provider)?
            .encrypt_padded_vec_mut::<NoPadding>(plaintext),
        Cipher::Aes192Cbc => Aes192CbcEnc::new_from_slices(key, iv)
            .map_err(SecureKeygenError::provider)?
            .encrypt_padded_vec_mut::<NoPadding>(plaintext),
        Cipher::Aes256Cbc => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(SecureKeygenError::provider)?
            .encrypt_padded_vec_mut::<NoPadding>(plaintext),
    };

    Ok(ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbc::cipher::BlockDecryptMut;

    const IV: &str = "000102030405060708090a0b0c0d0e0f";
    const BLOCK: &str = "6bc1bee22e409f96e93d7e117393172a";

    // NIST SP 800-38A F.2.1
    #[test]
    fn test_aes128_cbc_vector() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let ct = encrypt(
            Cipher::Aes128Cbc,
            &key,
            &hex::decode(IV).unwrap(),
            &hex::decode(BLOCK).unwrap(),
        )
        .unwrap();
        assert_eq!(hex::encode(ct), "7649abac8119b246cee98e9b12e9197d");
    }

    // NIST SP 800-38A F.2.5
    #[test]
    fn test_aes256_cbc_vector() {
        let key =
            hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
                .unwrap();
        let ct = encrypt(
            Cipher::Aes256Cbc,
            &key,
            &hex::decode(IV).unwrap(),
            &hex::decode(BLOCK).unwrap(),
        )
        .unwrap();
        assert_eq!(hex::encode(ct), "f58c4c04d6e5f1ba779eabfb5f7bfbd6");
    }

    #[test]
    fn test_aes192_roundtrip_adds_no_padding() {
        let key = [0x11u8; 24];
        let iv = [0x22u8; 16];
        let plaintext = [0x33u8; 48];

        let ct = encrypt(Cipher::Aes192Cbc, &key, &iv, &plaintext).unwrap();
        assert_eq!(ct.len(), plaintext.len());

        let pt = cbc::Decryptor::<Aes192>::new_from_slices(&key, &iv)
            .unwrap()
            .decrypt_padded_vec_mut::<NoPadding>(&ct)
            .unwrap();
        assert_eq!(pt, plaintext);
    }

    #[test]
    fn test_rejects_bad_lengths() {
        let iv = [0u8; 16];
        assert!(encrypt(Cipher::Aes256Cbc, &[0u8; 16], &iv, &[0u8; 16]).is_err());
        assert!(encrypt(Cipher::Aes128Cbc, &[0u8; 16], &[0u8; 12], &[0u8; 16]).is_err());
        assert!(matches!(
            encrypt(Cipher::Aes128Cbc, &[0u8; 16], &iv, &[0u8; 15]),
            Err(SecureKeygenError::ProviderOperation(_))
        ));
    }
}
