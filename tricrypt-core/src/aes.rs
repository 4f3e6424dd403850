//! AES-128 in ECB mode with PKCS#7 padding.
//!
//! Every 16-byte block is transformed independently under the same key schedule. The final block
//! always carries between 1 and 16 bytes of padding, each equal to the padding length, so an empty
//! input encrypts to exactly one block and the padding can always be removed unambiguously.
//!
//! ECB is deterministic: equal plaintext blocks produce equal ciphertext blocks.

use std::io::{Read, Write};

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;
use zeroize::Zeroizing;

use crate::error::{CryptoError, StreamError};
use crate::primitives::{AES_BLOCK_LEN, AES_KEY_LEN, BLOCK_SIZE};
use crate::protected::Protected;
use crate::stream::read_chunk;

pub struct AesCipher {
    cipher: Aes128,
}

impl AesCipher {
    /// Expands the key schedule; the key itself is not retained
    #[must_use]
    pub fn new(key: &Protected<[u8; AES_KEY_LEN]>) -> Self {
        let cipher = Aes128::new(GenericArray::from_slice(key.expose()));
        AesCipher { cipher }
    }

    /// Encrypts a single block in place
    ///
    /// The block must be exactly 16 bytes long.
    pub fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        if block.len() != AES_BLOCK_LEN {
            return Err(CryptoError::InvalidBlockSize);
        }

        self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
        Ok(())
    }

    /// Decrypts a single block in place
    ///
    /// The block must be exactly 16 bytes long.
    pub fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        if block.len() != AES_BLOCK_LEN {
            return Err(CryptoError::InvalidBlockSize);
        }

        self.cipher.decrypt_block(GenericArray::from_mut_slice(block));
        Ok(())
    }

    fn encrypt_blocks(&self, data: &mut [u8]) {
        for block in data.chunks_exact_mut(AES_BLOCK_LEN) {
            self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
        }
    }

    fn decrypt_blocks(&self, data: &mut [u8]) {
        for block in data.chunks_exact_mut(AES_BLOCK_LEN) {
            self.cipher.decrypt_block(GenericArray::from_mut_slice(block));
        }
    }

    /// Reads the whole reader, pads the final block and writes the ciphertext
    pub fn encrypt_stream(
        &self,
        reader: &mut impl Read,
        writer: &mut impl Write,
    ) -> Result<(), StreamError> {
        // one spare block so padding never needs another allocation
        let mut buffer = Zeroizing::new(vec![0u8; BLOCK_SIZE + AES_BLOCK_LEN].into_boxed_slice());

        loop {
            let read_count = read_chunk(reader, &mut buffer[..BLOCK_SIZE])?;
            if read_count == BLOCK_SIZE {
                self.encrypt_blocks(&mut buffer[..BLOCK_SIZE]);
                writer.write_all(&buffer[..BLOCK_SIZE])?;
            } else {
                let padded_len = pad(&mut buffer, read_count);
                self.encrypt_blocks(&mut buffer[..padded_len]);
                writer.write_all(&buffer[..padded_len])?;
                break;
            }
        }

        writer.flush()?;

        Ok(())
    }

    /// Decrypts the whole reader and strips the padding from the final block
    ///
    /// The last decrypted block is held back until EOF proves it is the final one.
    pub fn decrypt_stream(
        &self,
        reader: &mut impl Read,
        writer: &mut impl Write,
    ) -> Result<(), StreamError> {
        let mut buffer = Zeroizing::new(vec![0u8; BLOCK_SIZE].into_boxed_slice());
        let mut pending: Option<Zeroizing<[u8; AES_BLOCK_LEN]>> = None;

        loop {
            let read_count = read_chunk(reader, &mut buffer)?;
            if read_count % AES_BLOCK_LEN != 0 {
                return Err(CryptoError::InvalidBlockSize.into());
            }
            if read_count == 0 {
                break;
            }

            self.decrypt_blocks(&mut buffer[..read_count]);

            if let Some(previous) = pending.take() {
                writer.write_all(&*previous)?;
            }

            let (body, last) = buffer[..read_count].split_at(read_count - AES_BLOCK_LEN);
            writer.write_all(body)?;

            let mut last_block = Zeroizing::new([0u8; AES_BLOCK_LEN]);
            last_block.copy_from_slice(last);
            pending = Some(last_block);

            if read_count < BLOCK_SIZE {
                break;
            }
        }

        // a valid ciphertext always ends with a padding block
        let last_block = pending.ok_or(CryptoError::InvalidBlockSize)?;
        let unpadded_len = unpad(&last_block)?;
        writer.write_all(&last_block[..unpadded_len])?;

        writer.flush()?;

        Ok(())
    }
}

/// Appends PKCS#7 padding after `len` bytes of `buffer` and returns the padded length
fn pad(buffer: &mut [u8], len: usize) -> usize {
    let padding = AES_BLOCK_LEN - (len % AES_BLOCK_LEN);
    buffer[len..len + padding].fill(padding as u8);
    len + padding
}

/// Returns the length of the data in the final block, once the padding has been checked
fn unpad(block: &[u8; AES_BLOCK_LEN]) -> Result<usize, CryptoError> {
    let padding = block[AES_BLOCK_LEN - 1] as usize;
    if padding == 0 || padding > AES_BLOCK_LEN {
        return Err(CryptoError::InvalidPadding);
    }

    let data_len = AES_BLOCK_LEN - padding;
    if block[data_len..].iter().any(|b| *b as usize != padding) {
        return Err(CryptoError::InvalidPadding);
    }

    Ok(data_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::io::Cursor;

    const KEY: &[u8; 16] = b"0123456789abcdef";

    fn cipher() -> AesCipher {
        AesCipher::new(&Protected::new(*KEY))
    }

    fn encrypt(plaintext: &[u8]) -> Vec<u8> {
        let mut output = vec![];
        cipher()
            .encrypt_stream(&mut Cursor::new(plaintext), &mut output)
            .unwrap();
        output
    }

    fn decrypt(ciphertext: &[u8]) -> Result<Vec<u8>, StreamError> {
        let mut output = vec![];
        cipher().decrypt_stream(&mut Cursor::new(ciphertext), &mut output)?;
        Ok(output)
    }

    #[test]
    fn should_match_fips_197_vector() {
        let key = Protected::new([
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ]);
        let mut block: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let plaintext = block;
        let expected: [u8; 16] = [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ];

        let aes = AesCipher::new(&key);
        aes.encrypt_block(&mut block).unwrap();
        assert_eq!(block, expected);

        aes.decrypt_block(&mut block).unwrap();
        assert_eq!(block, plaintext);
    }

    #[test]
    fn should_reject_partial_block() {
        let mut short = [0u8; 15];
        match cipher().encrypt_block(&mut short) {
            Err(CryptoError::InvalidBlockSize) => {}
            _ => unreachable!(),
        }

        let mut long = [0u8; 17];
        match cipher().decrypt_block(&mut long) {
            Err(CryptoError::InvalidBlockSize) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_encrypt_empty_input_to_one_padding_block() {
        let ciphertext = encrypt(b"");
        assert_eq!(ciphertext.len(), AES_BLOCK_LEN);

        let mut padding_block = [16u8; AES_BLOCK_LEN];
        cipher().encrypt_block(&mut padding_block).unwrap();
        assert_eq!(ciphertext, padding_block.to_vec());

        assert_eq!(decrypt(&ciphertext).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn should_add_full_padding_block_on_block_boundary() {
        let ciphertext = encrypt(&[7u8; 32]);
        assert_eq!(ciphertext.len(), 48);
        assert_eq!(decrypt(&ciphertext).unwrap(), vec![7u8; 32]);
    }

    #[test]
    fn should_be_deterministic() {
        let plaintext = b"same block, same key, same ciphertext";
        assert_eq!(encrypt(plaintext), encrypt(plaintext));

        // ECB: identical plaintext blocks map to identical ciphertext blocks
        let ciphertext = encrypt(&[0x42; 32]);
        assert_eq!(ciphertext[..16], ciphertext[16..32]);
    }

    #[test]
    fn should_roundtrip_across_chunk_boundaries() {
        for len in [1, 15, 17, 100, BLOCK_SIZE - 1, BLOCK_SIZE, BLOCK_SIZE + 5] {
            let mut plaintext = vec![0u8; len];
            rand::thread_rng().fill_bytes(&mut plaintext);

            let ciphertext = encrypt(&plaintext);
            assert_eq!(ciphertext.len(), (len / AES_BLOCK_LEN + 1) * AES_BLOCK_LEN);
            assert_eq!(decrypt(&ciphertext).unwrap(), plaintext);
        }
    }

    #[test]
    fn should_reject_truncated_ciphertext() {
        let ciphertext = encrypt(b"hello world");

        match decrypt(&ciphertext[..10]) {
            Err(StreamError::Crypto(CryptoError::InvalidBlockSize)) => {}
            _ => unreachable!(),
        }

        match decrypt(&[]) {
            Err(StreamError::Crypto(CryptoError::InvalidBlockSize)) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_reject_invalid_padding() {
        let mut block = *b"no valid pad\x00\x00\x00\x00";
        cipher().encrypt_block(&mut block).unwrap();

        match decrypt(&block) {
            Err(StreamError::Crypto(CryptoError::InvalidPadding)) => {}
            _ => unreachable!(),
        }

        let mut block = *b"mixed padding\x03\x02\x03";
        cipher().encrypt_block(&mut block).unwrap();

        match decrypt(&block) {
            Err(StreamError::Crypto(CryptoError::InvalidPadding)) => {}
            _ => unreachable!(),
        }
    }
}
