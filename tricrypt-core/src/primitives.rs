//! This module contains the algorithm and mode identifiers, and all size constants used by `tricrypt-core`
use std::str::FromStr;

use crate::error::ValidationError;

/// This is the streaming block size
///
/// It is a multiple of both the AES block and the ChaCha20 keystream block, so chunk
/// boundaries never split a cipher block.
pub const BLOCK_SIZE: usize = 1_048_576; // 1024*1024 bytes

pub const AES_KEY_LEN: usize = 16;
pub const AES_BLOCK_LEN: usize = 16;

pub const CHACHA_KEY_LEN: usize = 32;
pub const CHACHA_NONCE_LEN: usize = 8;
pub const CHACHA_BLOCK_LEN: usize = 64;

/// Smallest modulus accepted for binary RSA framing: anything below 2^8 can't carry a full byte per block.
pub const RSA_MIN_BINARY_MODULUS: u32 = 256;

pub const ALGORITHMS_LEN: usize = 3;

/// This is an `enum` containing all algorithms supported by `tricrypt-core`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Rsa,
    Aes128,
    ChaCha20,
}

/// This is an array containing all algorithms supported by `tricrypt-core`.
///
/// It can be used by an end-user application to show a list of algorithms that they may use
pub static ALGORITHMS: [Algorithm; ALGORITHMS_LEN] =
    [Algorithm::ChaCha20, Algorithm::Aes128, Algorithm::Rsa];

impl Algorithm {
    /// The identifier accepted by `FromStr`
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Algorithm::Rsa => "rsa",
            Algorithm::Aes128 => "aes",
            Algorithm::ChaCha20 => "chacha20",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Algorithm::Rsa => write!(f, "RSA"),
            Algorithm::Aes128 => write!(f, "AES-128"),
            Algorithm::ChaCha20 => write!(f, "ChaCha20"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rsa" => Ok(Algorithm::Rsa),
            "aes" | "aes128" | "aes-128" => Ok(Algorithm::Aes128),
            "chacha20" | "chacha" => Ok(Algorithm::ChaCha20),
            _ => Err(ValidationError::UnsupportedAlgorithm),
        }
    }
}

/// This defines the direction of a transform
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Mode::Encrypt => write!(f, "encrypt"),
            Mode::Decrypt => write!(f, "decrypt"),
        }
    }
}

/// How RSA input and output bytes are interpreted
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RsaFormat {
    /// Arbitrary bytes, split into padded blocks sized from the modulus
    #[default]
    Binary,
    /// The file holds a single decimal integer and is replaced by the decimal result
    Decimal,
}
