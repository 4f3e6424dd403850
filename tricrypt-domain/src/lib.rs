//! ## What is it?
//!
//! Tricrypt-Domain holds the inner-workings of tricrypt: a storage abstraction, the file transform
//! driver built on top of it, and file hashing. Every operation takes a `Request` and is run with
//! `execute`, so the CLI only has to deal with user interaction.
#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod hash;
pub mod hasher;
pub mod storage;
pub mod transform;
