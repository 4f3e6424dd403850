//! This module holds the key material supplied by a caller, and the validator that turns it into
//! parameters the ciphers can trust.
//!
//! Validation is a pure function: it never touches the filesystem, so a bad key is always
//! reported before any output file exists.
//!
//! # Examples
//!
//! ```rust
//! # use tricrypt_core::key::*;
//! # use tricrypt_core::primitives::*;
//! # use tricrypt_core::protected::Protected;
//! let material = KeyMaterial::Aes {
//!     key: Protected::new(b"0123456789abcdef".to_vec()),
//! };
//!
//! let params = validate(Algorithm::Aes128, Mode::Encrypt, material).unwrap();
//! assert!(matches!(params.key, ValidatedKey::Aes128 { .. }));
//! ```

use num_bigint::BigUint;

use crate::error::ValidationError;
use crate::primitives::{
    Algorithm, Mode, RsaFormat, AES_KEY_LEN, CHACHA_KEY_LEN, CHACHA_NONCE_LEN,
    RSA_MIN_BINARY_MODULUS,
};
use crate::protected::Protected;

/// Unvalidated, algorithm-specific key material, exactly as the caller provided it
#[derive(Debug)]
pub enum KeyMaterial {
    Rsa {
        modulus: BigUint,
        exponent: BigUint,
        format: RsaFormat,
    },
    Aes {
        key: Protected<Vec<u8>>,
    },
    ChaCha20 {
        key: Protected<Vec<u8>>,
        nonce: Vec<u8>,
    },
}

impl KeyMaterial {
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeyMaterial::Rsa { .. } => Algorithm::Rsa,
            KeyMaterial::Aes { .. } => Algorithm::Aes128,
            KeyMaterial::ChaCha20 { .. } => Algorithm::ChaCha20,
        }
    }
}

/// An RSA modulus and the exponent to raise each block to (public `e` or private `d`)
#[derive(Debug, Clone)]
pub struct RsaKey {
    pub(crate) modulus: BigUint,
    pub(crate) exponent: BigUint,
}

/// Key material that has passed `validate()`, with sizes fixed in the types
#[derive(Debug)]
pub enum ValidatedKey {
    Rsa { key: RsaKey, format: RsaFormat },
    Aes128 { key: Protected<[u8; AES_KEY_LEN]> },
    ChaCha20 {
        key: Protected<[u8; CHACHA_KEY_LEN]>,
        nonce: [u8; CHACHA_NONCE_LEN],
    },
}

#[derive(Debug)]
pub struct ValidatedParams {
    pub mode: Mode,
    pub key: ValidatedKey,
}

/// This checks the algorithm-specific size and format rules on the provided key material
///
/// Key material belonging to another algorithm than the one requested is rejected with
/// `UnsupportedAlgorithm`. Sizes are never padded or truncated.
pub fn validate(
    algorithm: Algorithm,
    mode: Mode,
    material: KeyMaterial,
) -> Result<ValidatedParams, ValidationError> {
    if material.algorithm() != algorithm {
        return Err(ValidationError::UnsupportedAlgorithm);
    }

    let key = match material {
        KeyMaterial::Rsa {
            modulus,
            exponent,
            format,
        } => {
            let min_modulus = match format {
                RsaFormat::Binary => BigUint::from(RSA_MIN_BINARY_MODULUS),
                RsaFormat::Decimal => BigUint::from(2u32),
            };

            if modulus < min_modulus {
                return Err(ValidationError::InvalidModulus);
            }

            if exponent.bits() == 0 {
                return Err(ValidationError::InvalidExponent);
            }

            ValidatedKey::Rsa {
                key: RsaKey { modulus, exponent },
                format,
            }
        }
        KeyMaterial::Aes { key } => ValidatedKey::Aes128 {
            key: Protected::new(fixed_key::<AES_KEY_LEN>(&key)?),
        },
        KeyMaterial::ChaCha20 { key, nonce } => {
            let key = Protected::new(fixed_key::<CHACHA_KEY_LEN>(&key)?);

            let nonce: [u8; CHACHA_NONCE_LEN] =
                nonce
                    .as_slice()
                    .try_into()
                    .map_err(|_| ValidationError::InvalidNonceLength {
                        expected: CHACHA_NONCE_LEN,
                        actual: nonce.len(),
                    })?;

            ValidatedKey::ChaCha20 { key, nonce }
        }
    };

    Ok(ValidatedParams { mode, key })
}

fn fixed_key<const N: usize>(key: &Protected<Vec<u8>>) -> Result<[u8; N], ValidationError> {
    key.expose()
        .as_slice()
        .try_into()
        .map_err(|_| ValidationError::InvalidKeyLength {
            expected: N,
            actual: key.expose().len(),
        })
}
