use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use super::envelope::{Envelope, KdfParams, VERSION};
use crate::errors::CoreError;

/// Encrypt `plaintext` under `password` into a self-describing envelope.
/// A fresh salt and nonce are drawn on every call.
pub fn seal(plaintext: &[u8], password: &str, kdf: KdfParams) -> Result<Vec<u8>, CoreError> {
    let salt: [u8; 16] = random_bytes()?;
    let nonce: [u8; 12] = random_bytes()?;
    let key = derive_key(password, &salt, &kdf)?;

    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::Encryption(format!("cipher init: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CoreError::Encryption(e.to_string()))?;

    Envelope {
        version: VERSION,
        kdf,
        salt,
        nonce,
        ciphertext: &ciphertext,
    }
    .encode()
}

/// Inverse of [`seal`]. A wrong password and a tampered file both surface
/// as `CoreError::Decryption`.
pub fn open(sealed: &[u8], password: &str) -> Result<Vec<u8>, CoreError> {
    let env = Envelope::decode(sealed)?;
    let key = derive_key(password, &env.salt, &env.kdf)?;

    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::Encryption(format!("cipher init: {e}")))?;
    Ok(cipher.decrypt(Nonce::from_slice(&env.nonce), env.ciphertext)?)
}

/// Argon2id, 256-bit output.
fn derive_key(password: &str, salt: &[u8; 16], kdf: &KdfParams) -> Result<[u8; 32], CoreError> {
    let params = Params::new(kdf.memory_cost, kdf.time_cost, kdf.parallelism, Some(32))
        .map_err(|e| CoreError::Encryption(format!("Argon2 params: {e}")))?;

    let mut key = [0u8; 32];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::Encryption(format!("key derivation: {e}")))?;
    Ok(key)
}

fn random_bytes<const N: usize>() -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| CoreError::Encryption(format!("OS randomness unavailable: {e}")))?;
    Ok(buf)
}
