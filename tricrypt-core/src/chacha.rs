//! ChaCha20 with a 32-byte key and the legacy 8-byte nonce.
//!
//! The keystream is produced in 64-byte blocks from (key, nonce, block counter). The counter starts
//! at 0 for every new `ChaChaCipher`, so one instance must be used per file, and chunks must be
//! applied strictly in order. XOR is self-inverse, so the same call encrypts and decrypts.
//!
//! Reusing a key and nonce pair for two different plaintexts leaks `P1 ^ P2`. Nonce reuse is not
//! tracked here.

use std::io::{Read, Write};

use chacha20::cipher::{generic_array::GenericArray, KeyIvInit, StreamCipher};
use chacha20::ChaCha20Legacy;
use zeroize::Zeroizing;

use crate::error::{CryptoError, StreamError};
use crate::primitives::{BLOCK_SIZE, CHACHA_KEY_LEN, CHACHA_NONCE_LEN};
use crate::protected::Protected;
use crate::stream::read_chunk;

pub struct ChaChaCipher {
    cipher: ChaCha20Legacy,
}

impl ChaChaCipher {
    #[must_use]
    pub fn new(key: &Protected<[u8; CHACHA_KEY_LEN]>, nonce: &[u8; CHACHA_NONCE_LEN]) -> Self {
        let cipher = ChaCha20Legacy::new(
            GenericArray::from_slice(key.expose()),
            GenericArray::from_slice(nonce),
        );
        ChaChaCipher { cipher }
    }

    /// XORs the next `data.len()` keystream bytes into `data`
    pub fn apply_keystream(&mut self, data: &mut [u8]) -> Result<(), CryptoError> {
        self.cipher
            .try_apply_keystream(data)
            .map_err(|_| CryptoError::KeystreamExhausted)
    }

    /// Streams the reader through the keystream into the writer
    ///
    /// This consumes the cipher so a keystream can never be applied to a second file.
    pub fn transform_stream(
        mut self,
        reader: &mut impl Read,
        writer: &mut impl Write,
    ) -> Result<(), StreamError> {
        let mut buffer = Zeroizing::new(vec![0u8; BLOCK_SIZE].into_boxed_slice());

        loop {
            let read_count = read_chunk(reader, &mut buffer)?;
            self.apply_keystream(&mut buffer[..read_count])?;
            writer.write_all(&buffer[..read_count])?;

            if read_count < BLOCK_SIZE {
                break;
            }
        }

        writer.flush()?;

        Ok(())
    }
}
