//! Reader helpers shared by the streaming cipher implementations.
//!
//! `Read::read` may return fewer bytes than requested even when more data follows (pipes, network
//! filesystems). Block ciphers need whole blocks, so every cipher reads through `read_chunk`.

use std::io::{ErrorKind, Read};

/// Reads until `buffer` is full or the reader hits EOF, and returns the number of bytes read.
///
/// A return value smaller than `buffer.len()` always means EOF was reached.
pub fn read_chunk(reader: &mut impl Read, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    // hands out at most 3 bytes per call
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(3).min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn should_fill_buffer_from_short_reads() {
        let data = b"hello world, this is a short read";
        let mut reader = Trickle(data);
        let mut buffer = [0u8; 16];

        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 16);
        assert_eq!(&buffer, &data[..16]);

        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 16);
        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 1);
        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 0);
    }
}
