//! This provides the file transform driver: validate, stream through the cipher, then publish.
//!
//! Output is always written to a temporary file in the destination's directory, which is only
//! renamed onto the destination once every byte has been transformed and flushed. A failure at any
//! point removes the temporary file, so the destination (and, in place, the source) is untouched.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tricrypt_core::cipher::Ciphers;
use tricrypt_core::error::{CryptoError, StreamError, ValidationError};
use tricrypt_core::key::{validate, KeyMaterial, ValidatedParams};
use tricrypt_core::primitives::{Algorithm, Mode};

use crate::storage::{self, Entry, Storage};

pub const ENCRYPTED_EXTENSION: &str = "enc";
pub const DECRYPTED_EXTENSION: &str = "dec";

#[derive(Debug)]
pub enum Error {
    Validation(ValidationError),
    Crypto(CryptoError),
    Io(std::io::Error),
    Storage(storage::Error),
    SameFile,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(inner) => write!(f, "Invalid parameters: {inner}"),
            Error::Crypto(inner) => write!(f, "Unable to transform the file: {inner}"),
            Error::Io(inner) => write!(f, "Unable to stream the file: {inner}"),
            Error::Storage(inner) => write!(f, "{inner}"),
            Error::SameFile => f.write_str("Input and output files cannot be the same file"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(inner) => Some(inner),
            Error::Crypto(inner) => Some(inner),
            Error::Io(inner) => Some(inner),
            Error::Storage(inner) => Some(inner),
            Error::SameFile => None,
        }
    }
}

impl From<StreamError> for Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Crypto(inner) => Error::Crypto(inner),
            StreamError::Io(inner) => Error::Io(inner),
        }
    }
}

/// Progress of a single transform, reported through `Request::on_stage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// The request was accepted and its parameters are being validated
    #[default]
    Idle,
    /// Opening the source
    Reading,
    /// Streaming the source through the cipher into the temporary file
    Transforming,
    /// Flushing the temporary file and moving it onto the destination
    Writing,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// `<source>.enc` when encrypting, and the source without `.enc` (or `<source>.dec`) when decrypting
    Derived,
    Path(PathBuf),
    /// The source file is replaced once the transform has succeeded
    InPlace,
}

pub struct Request<'a> {
    pub source: PathBuf,
    pub destination: Destination,
    pub algorithm: Algorithm,
    pub mode: Mode,
    pub key_material: KeyMaterial,
    pub on_stage: Option<Box<dyn FnMut(Stage) + 'a>>,
}

/// Works out where the output of a transform should go when no path was given
#[must_use]
pub fn derive_destination(source: &Path, mode: Mode) -> PathBuf {
    match mode {
        Mode::Encrypt => append_extension(source, ENCRYPTED_EXTENSION),
        Mode::Decrypt => {
            if source.extension().map_or(false, |ext| ext == OsStr::new(ENCRYPTED_EXTENSION)) {
                source.with_extension("")
            } else {
                append_extension(source, DECRYPTED_EXTENSION)
            }
        }
    }
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }

    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Validates the request, transforms the source and publishes the result
///
/// Returns the path the output was written to.
pub fn execute<RW>(stor: Arc<impl Storage<RW>>, req: Request<'_>) -> Result<PathBuf, Error>
where
    RW: Read + Write + Seek,
{
    let Request {
        source,
        destination,
        algorithm,
        mode,
        key_material,
        mut on_stage,
    } = req;

    let mut report = |stage: Stage| {
        if let Some(on_stage) = on_stage.as_mut() {
            on_stage(stage);
        }
    };

    report(Stage::Idle);

    let result = run(
        stor.as_ref(),
        &source,
        &destination,
        algorithm,
        mode,
        key_material,
        &mut report,
    );

    match &result {
        Ok(_) => report(Stage::Done),
        Err(_) => report(Stage::Failed),
    }

    result
}

fn run<RW>(
    stor: &impl Storage<RW>,
    source: &Path,
    destination: &Destination,
    algorithm: Algorithm,
    mode: Mode,
    key_material: KeyMaterial,
    report: &mut dyn FnMut(Stage),
) -> Result<PathBuf, Error>
where
    RW: Read + Write + Seek,
{
    // 1. validate before any file is touched
    let params = validate(algorithm, mode, key_material).map_err(Error::Validation)?;

    let destination = match destination {
        Destination::Derived => derive_destination(source, mode),
        Destination::Path(path) if is_same_file(source, path) => return Err(Error::SameFile),
        Destination::Path(path) => path.clone(),
        Destination::InPlace => source.to_path_buf(),
    };

    // 2. open the source
    report(Stage::Reading);
    let input = stor.read_file(source).map_err(Error::Storage)?;
    if input.is_dir() {
        return Err(Error::Storage(storage::Error::IsDirectory(
            source.to_path_buf(),
        )));
    }

    // 3. stream into a temporary file
    let output = stor
        .create_temp_file(&destination)
        .map_err(Error::Storage)?;

    if let Err(e) = write_output(stor, &input, &output, params, report) {
        stor.remove_file(output).ok();
        return Err(e);
    }

    drop(input);

    // 4. publish
    stor.persist_file(output, &destination)
        .map_err(Error::Storage)
}

fn write_output<RW>(
    stor: &impl Storage<RW>,
    input: &Entry<RW>,
    output: &Entry<RW>,
    params: ValidatedParams,
    report: &mut dyn FnMut(Stage),
) -> Result<(), Error>
where
    RW: Read + Write + Seek,
{
    let reader = input.try_reader().map_err(Error::Storage)?;
    let writer = output.try_writer().map_err(Error::Storage)?;

    report(Stage::Transforming);
    Ciphers::initialize(params)
        .transform_stream(&mut *reader.borrow_mut(), &mut *writer.borrow_mut())?;

    report(Stage::Writing);
    stor.flush_file(output).map_err(Error::Storage)
}
