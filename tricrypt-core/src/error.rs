//! Error types shared by the validator, the ciphers and the streaming helpers.

use std::fmt;

/// Rejections raised before any cryptographic work (or file I/O) begins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnsupportedAlgorithm,
    InvalidModulus,
    InvalidExponent,
    InvalidKeyLength { expected: usize, actual: usize },
    InvalidNonceLength { expected: usize, actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnsupportedAlgorithm => f.write_str("Unsupported algorithm"),
            ValidationError::InvalidModulus => f.write_str("Invalid RSA modulus"),
            ValidationError::InvalidExponent => f.write_str("Invalid RSA exponent"),
            ValidationError::InvalidKeyLength { expected, actual } => write!(
                f,
                "Invalid key length: expected {expected} bytes, got {actual}"
            ),
            ValidationError::InvalidNonceLength { expected, actual } => write!(
                f,
                "Invalid nonce length: expected {expected} bytes, got {actual}"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failures raised while transforming blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    BlockTooLarge,
    InvalidBlockSize,
    InvalidPadding,
    InvalidNumber,
    KeystreamExhausted,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::BlockTooLarge => {
                f.write_str("Block value is not strictly less than the RSA modulus")
            }
            CryptoError::InvalidBlockSize => f.write_str("Data is not a whole number of blocks"),
            CryptoError::InvalidPadding => f.write_str(
                "Invalid padding. This means either: you're using the wrong key, or this isn't an encrypted file",
            ),
            CryptoError::InvalidNumber => f.write_str("Input is not a decimal integer"),
            CryptoError::KeystreamExhausted => f.write_str("ChaCha20 keystream exhausted"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// The result of streaming a reader through a cipher into a writer
#[derive(Debug)]
pub enum StreamError {
    Crypto(CryptoError),
    Io(std::io::Error),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Crypto(e) => write!(f, "{e}"),
            StreamError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Crypto(e) => Some(e),
            StreamError::Io(e) => Some(e),
        }
    }
}

impl From<CryptoError> for StreamError {
    fn from(e: CryptoError) -> Self {
        StreamError::Crypto(e)
    }
}

impl From<std::io::Error> for StreamError {
    fn from(e: std::io::Error) -> Self {
        StreamError::Io(e)
    }
}
