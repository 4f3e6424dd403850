//! This module ties the three ciphers together behind a single streaming interface.
//!
//! A `Ciphers` object can only be created from `ValidatedParams`, so every size and format rule has
//! already been checked by the time a cipher exists.
//!
//! # Examples
//!
//! ```rust
//! # use std::io::Cursor;
//! # use tricrypt_core::cipher::Ciphers;
//! # use tricrypt_core::key::{validate, KeyMaterial};
//! # use tricrypt_core::primitives::{Algorithm, Mode};
//! # use tricrypt_core::protected::Protected;
//! let material = KeyMaterial::ChaCha20 {
//!     key: Protected::new(vec![0u8; 32]),
//!     nonce: vec![0u8; 8],
//! };
//! let params = validate(Algorithm::ChaCha20, Mode::Encrypt, material).unwrap();
//!
//! let mut output = Vec::new();
//! Ciphers::initialize(params)
//!     .transform_stream(&mut Cursor::new(b"hello"), &mut output)
//!     .unwrap();
//!
//! assert_eq!(output.len(), 5);
//! ```

use std::io::{Read, Write};

use crate::aes::AesCipher;
use crate::chacha::ChaChaCipher;
use crate::error::StreamError;
use crate::key::{ValidatedKey, ValidatedParams};
use crate::primitives::{Mode, RsaFormat};
use crate::rsa::RsaCipher;

/// This `enum` contains a ready-to-use cipher for each supported algorithm, along with the
/// direction it should run in
pub enum Ciphers {
    Rsa(RsaCipher, RsaFormat, Mode),
    Aes128(Box<AesCipher>, Mode),
    ChaCha20(Box<ChaChaCipher>),
}

impl Ciphers {
    /// Builds the cipher described by the validated parameters
    ///
    /// Raw key bytes are dropped once the cipher state has been derived from them.
    #[must_use]
    pub fn initialize(params: ValidatedParams) -> Self {
        let mode = params.mode;

        match params.key {
            ValidatedKey::Rsa { key, format } => Ciphers::Rsa(RsaCipher::new(key), format, mode),
            ValidatedKey::Aes128 { key } => Ciphers::Aes128(Box::new(AesCipher::new(&key)), mode),
            ValidatedKey::ChaCha20 { key, nonce } => {
                Ciphers::ChaCha20(Box::new(ChaChaCipher::new(&key, &nonce)))
            }
        }
    }

    /// Reads the reader to EOF, and writes the transformed bytes to the writer
    ///
    /// The cipher is consumed, as ChaCha20 state must never be carried over to another stream.
    pub fn transform_stream(
        self,
        reader: &mut impl Read,
        writer: &mut impl Write,
    ) -> Result<(), StreamError> {
        match self {
            Ciphers::Rsa(rsa, RsaFormat::Decimal, _) => rsa.transform_decimal(reader, writer),
            Ciphers::Rsa(rsa, RsaFormat::Binary, Mode::Encrypt) => {
                rsa.encrypt_stream(reader, writer)
            }
            Ciphers::Rsa(rsa, RsaFormat::Binary, Mode::Decrypt) => {
                rsa.decrypt_stream(reader, writer)
            }
            Ciphers::Aes128(aes, Mode::Encrypt) => aes.encrypt_stream(reader, writer),
            Ciphers::Aes128(aes, Mode::Decrypt) => aes.decrypt_stream(reader, writer),
            Ciphers::ChaCha20(chacha) => chacha.transform_stream(reader, writer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;
    use crate::key::{validate, KeyMaterial};
    use crate::primitives::Algorithm;
    use crate::protected::Protected;
    use num_bigint::BigUint;
    use std::io::Cursor;

    fn run(algorithm: Algorithm, mode: Mode, material: KeyMaterial, input: &[u8]) -> Vec<u8> {
        let params = validate(algorithm, mode, material).unwrap();
        let mut output = vec![];
        Ciphers::initialize(params)
            .transform_stream(&mut Cursor::new(input), &mut output)
            .unwrap();
        output
    }

    fn rsa(modulus: u32, exponent: u32, format: RsaFormat) -> KeyMaterial {
        KeyMaterial::Rsa {
            modulus: BigUint::from(modulus),
            exponent: BigUint::from(exponent),
            format,
        }
    }

    fn aes() -> KeyMaterial {
        KeyMaterial::Aes {
            key: Protected::new(b"0123456789abcdef".to_vec()),
        }
    }

    fn chacha() -> KeyMaterial {
        KeyMaterial::ChaCha20 {
            key: Protected::new(vec![b'k'; 32]),
            nonce: vec![b'n'; 8],
        }
    }

    #[test]
    fn should_pick_cipher_from_params() {
        let params = validate(Algorithm::Aes128, Mode::Decrypt, aes()).unwrap();
        assert!(matches!(
            Ciphers::initialize(params),
            Ciphers::Aes128(_, Mode::Decrypt)
        ));

        let params = validate(Algorithm::ChaCha20, Mode::Encrypt, chacha()).unwrap();
        assert!(matches!(Ciphers::initialize(params), Ciphers::ChaCha20(_)));

        let material = rsa(3233, 17, RsaFormat::Decimal);
        let params = validate(Algorithm::Rsa, Mode::Encrypt, material).unwrap();
        assert!(matches!(
            Ciphers::initialize(params),
            Ciphers::Rsa(_, RsaFormat::Decimal, Mode::Encrypt)
        ));
    }

    #[test]
    fn should_roundtrip_every_algorithm() {
        let plaintext = b"Hello, world! This is a test of all three ciphers.".to_vec();

        let ciphertext = run(Algorithm::Aes128, Mode::Encrypt, aes(), &plaintext);
        assert_eq!(ciphertext.len() % 16, 0);
        assert_eq!(run(Algorithm::Aes128, Mode::Decrypt, aes(), &ciphertext), plaintext);

        let ciphertext = run(Algorithm::ChaCha20, Mode::Encrypt, chacha(), &plaintext);
        assert_eq!(ciphertext.len(), plaintext.len());
        assert_eq!(run(Algorithm::ChaCha20, Mode::Decrypt, chacha(), &ciphertext), plaintext);

        let public = rsa(3233, 17, RsaFormat::Binary);
        let ciphertext = run(Algorithm::Rsa, Mode::Encrypt, public, &plaintext);
        let private = rsa(3233, 2753, RsaFormat::Binary);
        assert_eq!(run(Algorithm::Rsa, Mode::Decrypt, private, &ciphertext), plaintext);
    }

    #[test]
    fn should_use_decimal_format_for_rsa_numbers() {
        let output = run(Algorithm::Rsa, Mode::Encrypt, rsa(3233, 17, RsaFormat::Decimal), b"65");
        assert_eq!(output, b"2790");
    }

    #[test]
    fn should_surface_cipher_errors() {
        let params = validate(Algorithm::Aes128, Mode::Decrypt, aes()).unwrap();
        let mut output = Vec::new();

        match Ciphers::initialize(params).transform_stream(&mut Cursor::new([0u8; 7]), &mut output) {
            Err(StreamError::Crypto(CryptoError::InvalidBlockSize)) => {}
            _ => unreachable!(),
        }
    }
}
