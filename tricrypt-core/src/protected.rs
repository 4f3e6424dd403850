//! A wrapper for key and nonce bytes.
//!
//! Anything stored in `Protected` is zeroized when it is dropped, and can only be read through
//! `expose()`. `Debug` prints `[REDACTED]`, so key material never ends up in logs or panics.

use std::fmt::Debug;
use zeroize::Zeroize;

pub struct Protected<T>
where
    T: Zeroize,
{
    data: T,
}

impl<T> Protected<T>
where
    T: Zeroize,
{
    pub fn new(value: T) -> Self {
        Protected { data: value }
    }

    pub fn expose(&self) -> &T {
        &self.data
    }
}

impl<T> Clone for Protected<T>
where
    T: Zeroize + Clone,
{
    fn clone(&self) -> Self {
        Protected::new(self.data.clone())
    }
}

impl<T> Drop for Protected<T>
where
    T: Zeroize,
{
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl<T> Debug for Protected<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_redact_debug_output() {
        let secret = Protected::new(b"super secret".to_vec());
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.expose(), b"super secret");
    }
}
