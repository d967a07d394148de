//! SSH key generation engine
//!
//! `request` describes what to generate, `pbes2` protects private keys under a
//! passphrase and `generator` ties the provider and the encoders together.

mod generator;
mod pbes2;
mod request;

pub use generator::{generate_ssh_key, GeneratedKey, KeyGenerator, KeyMeta, PRIVATE_KEY_LABEL};
pub use pbes2::{
    encrypt_pkcs8, encrypted_private_key_info, pkcs7_pad, EncryptedPem, EncryptionDescriptor,
    KdfDescriptor, ENCRYPTED_PRIVATE_KEY_LABEL,
};
pub use request::{
    AlgorithmSpec, EcdsaSpec, KdfConfig, KeySpec, ProtectionConfig, RsaSpec,
    DEFAULT_KDF_ITERATIONS, DEFAULT_RSA_MODULUS_LENGTH, DEFAULT_RSA_PUBLIC_EXPONENT,
    DEFAULT_SALT_SIZE, MAX_RSA_PUBLIC_EXPONENT, MAX_SALT_SIZE, RSA_MODULUS_LENGTHS,
};
