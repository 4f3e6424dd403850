//! This provides hashing of whole files, so the output of a transform can be checked later.

use std::cell::RefCell;
use std::fmt;
use std::io::{Read, Seek};

use tricrypt_core::primitives::BLOCK_SIZE;
use tricrypt_core::stream::read_chunk;

use crate::hasher::Hasher;

#[derive(Debug)]
pub enum Error {
    ResetCursorPosition,
    ReadData,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ResetCursorPosition => f.write_str("Unable to reset cursor position"),
            Error::ReadData => f.write_str("Unable to read data"),
        }
    }
}

impl std::error::Error for Error {}

pub struct Request<'a, R: Read + Seek> {
    pub reader: &'a RefCell<R>,
}

/// Hashes everything from the start of the reader, and returns the hex digest
pub fn execute<R: Read + Seek>(
    mut hasher: impl Hasher,
    req: Request<'_, R>,
) -> Result<String, Error> {
    let mut reader = req.reader.borrow_mut();
    reader.rewind().map_err(|_| Error::ResetCursorPosition)?;

    let mut buffer = vec![0u8; BLOCK_SIZE];

    loop {
        let read_count = read_chunk(&mut *reader, &mut buffer).map_err(|_| Error::ReadData)?;
        hasher.write(&buffer[..read_count]);
        if read_count != BLOCK_SIZE {
            break;
        }
    }

    Ok(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Blake3Hasher;
    use rand::RngCore;
    use std::io::{Cursor, SeekFrom};

    #[test]
    fn should_hash_string() {
        let text = "Hello world";
        let reader = RefCell::new(Cursor::new(text.as_bytes()));

        match execute(Blake3Hasher::new(), Request { reader: &reader }) {
            Ok(hash) => assert_eq!(hash, blake3::hash(text.as_bytes()).to_hex().to_string()),
            Err(_) => unreachable!(),
        }
    }

    #[test]
    fn should_hash_big_string() {
        let mut buf = vec![0u8; BLOCK_SIZE + BLOCK_SIZE / 2];
        rand::thread_rng().fill_bytes(&mut buf);

        let reader = RefCell::new(Cursor::new(buf.clone()));

        match execute(Blake3Hasher::new(), Request { reader: &reader }) {
            Ok(hash) => assert_eq!(hash, blake3::hash(&buf).to_hex().to_string()),
            Err(_) => unreachable!(),
        }
    }

    #[test]
    fn should_hash_from_the_start() {
        let reader = RefCell::new(Cursor::new(b"hello world".to_vec()));
        reader.borrow_mut().seek(SeekFrom::End(0)).unwrap();

        match execute(Blake3Hasher::new(), Request { reader: &reader }) {
            Ok(hash) => assert_eq!(hash, blake3::hash(b"hello world").to_hex().to_string()),
            Err(_) => unreachable!(),
        }
    }
}
