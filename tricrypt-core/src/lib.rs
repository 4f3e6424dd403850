//! ## What is it?
//!
//! Tricrypt-Core is the cipher engine behind [tricrypt](../tricrypt). It contains three independent,
//! stateless transforms that share one streaming interface:
//!
//! - RSA: textbook modular exponentiation over fixed-size integer blocks
//! - AES-128: ECB mode with PKCS#7 padding
//! - ChaCha20: the legacy 8-byte nonce variant, XORed over the data
//!
//! Key material is checked by [`key::validate`] before any cipher is built, and the resulting
//! [`key::ValidatedParams`] is the only thing [`cipher::Ciphers::initialize`] accepts.
//!
//! ## Security
//!
//! None of these constructions are authenticated. ECB leaks equal plaintext blocks, textbook RSA
//! is malleable and deterministic, and reusing a ChaCha20 key/nonce pair for two different files
//! leaks the XOR of both plaintexts. This crate does not detect nonce reuse; the caller owns that.
//!
//! The AES and ChaCha20 primitives are provided by the [RustCrypto Team](https://github.com/RustCrypto).
#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod aes;
pub mod chacha;
pub mod cipher;
pub mod error;
pub mod key;
pub mod primitives;
pub mod protected;
pub mod rsa;
pub mod stream;
pub use num_bigint::BigUint;
pub use zeroize::Zeroize;

#[cfg(feature = "visual")]
pub mod visual;
