//! Textbook RSA over fixed-size integer blocks.
//!
//! Every block is transformed with `output = input^exponent mod n`. Encryption and decryption are
//! the same operation, the caller just supplies `e` or `d` as the exponent.
//!
//! ## Binary framing
//!
//! With `k` the byte length of `n`, plaintext is cut into blocks of `k - 1` bytes (any such value is
//! strictly less than `n`) and every ciphertext block is written as exactly `k` big-endian bytes.
//! The final plaintext block is padded with a `0x80` marker followed by zeros (ISO/IEC 7816-4), and
//! a whole padding block is added when the data ends on a block boundary, so decoding is always
//! unambiguous.
//!
//! ## Decimal format
//!
//! The input is a single decimal integer `m < n`, and the output is the decimal text of
//! `m^exponent mod n`.

use std::io::{Read, Write};

use num_bigint::BigUint;
use zeroize::Zeroizing;

use crate::error::{CryptoError, StreamError};
use crate::key::RsaKey;
use crate::stream::read_chunk;

/// This is how many RSA blocks are read from the reader at a time
const BLOCKS_PER_CHUNK: usize = 256;

const PADDING_MARKER: u8 = 0x80;

pub struct RsaCipher {
    key: RsaKey,
    block_len: usize,
}

impl RsaCipher {
    #[must_use]
    pub fn new(key: RsaKey) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let block_len = ((key.modulus.bits() + 7) / 8) as usize;
        RsaCipher { key, block_len }
    }

    /// Bytes per ciphertext block (the byte length of the modulus)
    #[must_use]
    pub fn ciphertext_block_len(&self) -> usize {
        self.block_len
    }

    /// Bytes of data carried by each plaintext block
    #[must_use]
    pub fn plaintext_block_len(&self) -> usize {
        self.block_len - 1
    }

    /// Raises a single block to the exponent, modulo `n`
    ///
    /// The block must be strictly less than the modulus, otherwise it would be silently reduced
    /// and could never be recovered.
    pub fn transform_block(&self, input: &BigUint) -> Result<BigUint, CryptoError> {
        if input >= &self.key.modulus {
            return Err(CryptoError::BlockTooLarge);
        }

        Ok(input.modpow(&self.key.exponent, &self.key.modulus))
    }

    fn encrypt_block(&self, block: &[u8], writer: &mut impl Write) -> Result<(), StreamError> {
        let output = self.transform_block(&BigUint::from_bytes_be(block))?;
        writer.write_all(&left_pad(&output.to_bytes_be(), self.block_len))?;
        Ok(())
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let output = self.transform_block(&BigUint::from_bytes_be(block))?;
        let bytes = output.to_bytes_be();

        // only a wrong key or a corrupted block decrypts to more than k - 1 bytes
        if bytes.len() > self.plaintext_block_len() {
            return Err(CryptoError::InvalidPadding);
        }

        Ok(left_pad(&bytes, self.plaintext_block_len()))
    }

    /// Splits the reader into padded blocks and writes one `k`-byte block for each of them
    pub fn encrypt_stream(
        &self,
        reader: &mut impl Read,
        writer: &mut impl Write,
    ) -> Result<(), StreamError> {
        let plain_len = self.plaintext_block_len();
        let chunk_len = plain_len * BLOCKS_PER_CHUNK;
        let mut buffer = Zeroizing::new(vec![0u8; chunk_len]);

        loop {
            let read_count = read_chunk(reader, &mut buffer)?;
            let whole_blocks = read_count - (read_count % plain_len);

            for block in buffer[..whole_blocks].chunks_exact(plain_len) {
                self.encrypt_block(block, writer)?;
            }

            if read_count < chunk_len {
                let mut last = Zeroizing::new(vec![0u8; plain_len]);
                let tail = &buffer[whole_blocks..read_count];
                last[..tail.len()].copy_from_slice(tail);
                last[tail.len()] = PADDING_MARKER;

                self.encrypt_block(&last, writer)?;
                break;
            }
        }

        writer.flush()?;

        Ok(())
    }

    /// Decrypts every `k`-byte block and strips the padding from the final one
    pub fn decrypt_stream(
        &self,
        reader: &mut impl Read,
        writer: &mut impl Write,
    ) -> Result<(), StreamError> {
        let chunk_len = self.block_len * BLOCKS_PER_CHUNK;
        let mut buffer = Zeroizing::new(vec![0u8; chunk_len]);
        let mut pending: Option<Zeroizing<Vec<u8>>> = None;

        loop {
            let read_count = read_chunk(reader, &mut buffer)?;
            if read_count % self.block_len != 0 {
                return Err(CryptoError::InvalidBlockSize.into());
            }

            for block in buffer[..read_count].chunks_exact(self.block_len) {
                let plaintext = Zeroizing::new(self.decrypt_block(block)?);
                if let Some(previous) = pending.replace(plaintext) {
                    writer.write_all(&previous)?;
                }
            }

            if read_count < chunk_len {
                break;
            }
        }

        let last = pending.ok_or(CryptoError::InvalidBlockSize)?;
        writer.write_all(unpad(&last)?)?;

        writer.flush()?;

        Ok(())
    }

    /// Reads a single decimal integer and writes the decimal result
    pub fn transform_decimal(
        &self,
        reader: &mut impl Read,
        writer: &mut impl Write,
    ) -> Result<(), StreamError> {
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents)?;

        let input = parse_decimal(&contents)?;
        let output = self.transform_block(&input)?;

        writer.write_all(output.to_str_radix(10).as_bytes())?;
        writer.flush()?;

        Ok(())
    }
}

fn parse_decimal(contents: &[u8]) -> Result<BigUint, CryptoError> {
    let text = std::str::from_utf8(contents)
        .map_err(|_| CryptoError::InvalidNumber)?
        .trim_matches(|c: char| c.is_ascii_whitespace());

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CryptoError::InvalidNumber);
    }

    BigUint::parse_bytes(text.as_bytes(), 10).ok_or(CryptoError::InvalidNumber)
}

fn left_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut padded = vec![0u8; len - bytes.len()];
    padded.extend_from_slice(bytes);
    padded
}

/// Returns the data in front of the `0x80` marker, after checking only zeros follow it
fn unpad(block: &[u8]) -> Result<&[u8], CryptoError> {
    let marker = block
        .iter()
        .rposition(|b| *b != 0)
        .ok_or(CryptoError::InvalidPadding)?;

    if block[marker] != PADDING_MARKER {
        return Err(CryptoError::InvalidPadding);
    }

    Ok(&block[..marker])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::io::Cursor;

    // p = 2^31 - 1, q = 2^61 - 1
    const MODULUS: &str = "4951760154835678088235319297";
    const PUBLIC_EXPONENT: u32 = 65537;
    const PRIVATE_EXPONENT: &str = "4181459486416926817284415673";

    fn cipher(modulus: &BigUint, exponent: &BigUint) -> RsaCipher {
        RsaCipher::new(RsaKey {
            modulus: modulus.clone(),
            exponent: exponent.clone(),
        })
    }

    fn keypair() -> (RsaCipher, RsaCipher) {
        let modulus: BigUint = MODULUS.parse().unwrap();
        let e = BigUint::from(PUBLIC_EXPONENT);
        let d: BigUint = PRIVATE_EXPONENT.parse().unwrap();
        (cipher(&modulus, &e), cipher(&modulus, &d))
    }

    fn textbook() -> (RsaCipher, RsaCipher) {
        let modulus = BigUint::from(3233u32);
        (
            cipher(&modulus, &BigUint::from(17u32)),
            cipher(&modulus, &BigUint::from(2753u32)),
        )
    }

    fn encrypt(rsa: &RsaCipher, plaintext: &[u8]) -> Vec<u8> {
        let mut output = vec![];
        rsa.encrypt_stream(&mut Cursor::new(plaintext), &mut output)
            .unwrap();
        output
    }

    fn decrypt(rsa: &RsaCipher, ciphertext: &[u8]) -> Result<Vec<u8>, StreamError> {
        let mut output = vec![];
        rsa.decrypt_stream(&mut Cursor::new(ciphertext), &mut output)?;
        Ok(output)
    }

    #[test]
    fn should_transform_textbook_block() {
        let (public, private) = textbook();

        let ciphertext = public.transform_block(&BigUint::from(65u32)).unwrap();
        assert_eq!(ciphertext, BigUint::from(2790u32));

        let plaintext = private.transform_block(&ciphertext).unwrap();
        assert_eq!(plaintext, BigUint::from(65u32));
    }

    #[test]
    fn should_reject_block_equal_to_or_above_modulus() {
        let (public, _) = textbook();

        for value in [3233u32, 3234, 65535] {
            match public.transform_block(&BigUint::from(value)) {
                Err(CryptoError::BlockTooLarge) => {}
                _ => unreachable!(),
            }
        }

        assert!(public.transform_block(&BigUint::from(3232u32)).is_ok());
    }

    #[test]
    fn should_size_blocks_from_modulus() {
        let (public, _) = textbook();
        assert_eq!(public.ciphertext_block_len(), 2);
        assert_eq!(public.plaintext_block_len(), 1);

        let (public, _) = keypair();
        assert_eq!(public.ciphertext_block_len(), 12);
        assert_eq!(public.plaintext_block_len(), 11);
    }

    #[test]
    fn should_roundtrip_with_textbook_key() {
        let (public, private) = textbook();
        let plaintext: Vec<u8> = (0..=255).collect();

        let ciphertext = encrypt(&public, &plaintext);
        assert_eq!(ciphertext.len(), (plaintext.len() + 1) * 2);
        assert_eq!(decrypt(&private, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn should_roundtrip_across_chunk_boundaries() {
        let (public, private) = keypair();
        let chunk = public.plaintext_block_len() * BLOCKS_PER_CHUNK;

        for len in [1, 10, 11, 12, 100, chunk - 1, chunk, chunk + 3] {
            let mut plaintext = vec![0u8; len];
            rand::thread_rng().fill_bytes(&mut plaintext);

            let ciphertext = encrypt(&public, &plaintext);
            assert_eq!(ciphertext.len(), (len / 11 + 1) * 12);
            assert_eq!(decrypt(&private, &ciphertext).unwrap(), plaintext);
        }
    }

    #[test]
    fn should_keep_trailing_zero_bytes() {
        let (public, private) = keypair();
        let plaintext = b"ends with zeros\x00\x00\x00".to_vec();

        let ciphertext = encrypt(&public, &plaintext);
        assert_eq!(decrypt(&private, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn should_encrypt_empty_input_to_one_block() {
        let (public, private) = keypair();

        let ciphertext = encrypt(&public, b"");
        assert_eq!(ciphertext.len(), 12);
        assert_eq!(decrypt(&private, &ciphertext).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn should_be_deterministic() {
        let (public, _) = keypair();
        let plaintext = b"the same block twice";
        assert_eq!(encrypt(&public, plaintext), encrypt(&public, plaintext));
    }

    #[test]
    fn should_reject_malformed_ciphertext() {
        let (public, private) = textbook();
        let ciphertext = encrypt(&public, b"hello");

        match decrypt(&private, &ciphertext[..ciphertext.len() - 1]) {
            Err(StreamError::Crypto(CryptoError::InvalidBlockSize)) => {}
            _ => unreachable!(),
        }

        match decrypt(&private, &[0xff, 0xff]) {
            Err(StreamError::Crypto(CryptoError::BlockTooLarge)) => {}
            _ => unreachable!(),
        }

        match decrypt(&private, &[]) {
            Err(StreamError::Crypto(CryptoError::InvalidBlockSize)) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn should_transform_decimal_numbers() {
        let (public, private) = textbook();

        let mut ciphertext = vec![];
        public
            .transform_decimal(&mut Cursor::new(b"65\n"), &mut ciphertext)
            .unwrap();
        assert_eq!(ciphertext, b"2790");

        let mut plaintext = vec![];
        private
            .transform_decimal(&mut Cursor::new(&ciphertext), &mut plaintext)
            .unwrap();
        assert_eq!(plaintext, b"65");
    }

    #[test]
    fn should_reject_bad_decimal_input() {
        let (public, _) = textbook();

        for input in [&b"12a"[..], b"", b"  ", b"-5", b"1 2"] {
            let mut output: Vec<u8> = vec![];
            match public.transform_decimal(&mut Cursor::new(input), &mut output) {
                Err(StreamError::Crypto(CryptoError::InvalidNumber)) => {}
                _ => unreachable!(),
            }
        }

        let mut output: Vec<u8> = vec![];
        match public.transform_decimal(&mut Cursor::new(b"3233"), &mut output) {
            Err(StreamError::Crypto(CryptoError::BlockTooLarge)) => {}
            _ => unreachable!(),
        }
    }
}
