use rand::distributions::{Alphanumeric, DistString};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(test)]
use std::thread;

/// Storage failures; the variants raised by the OS keep the underlying `io::Error` as their source
#[derive(Debug)]
pub enum Error {
    CreateFile(io::Error),
    OpenFile(io::Error),
    RemoveFile(io::Error),
    FlushFile(io::Error),
    PersistFile(io::Error),
    IsDirectory(PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::CreateFile(_) => f.write_str("Unable to create a new file"),
            Error::OpenFile(_) => f.write_str("Unable to open the file for reading"),
            Error::FlushFile(_) => f.write_str("Unable to flush the file"),
            Error::RemoveFile(_) => f.write_str("Unable to remove the file"),
            Error::PersistFile(_) => f.write_str("Unable to move the file into place"),
            Error::IsDirectory(path) => write!(f, "{} is a directory, not a file", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreateFile(inner)
            | Error::OpenFile(inner)
            | Error::RemoveFile(inner)
            | Error::FlushFile(inner)
            | Error::PersistFile(inner) => Some(inner),
            Error::IsDirectory(_) => None,
        }
    }
}

pub trait Storage<RW>: Send + Sync
where
    RW: Read + Write + Seek,
{
    /// Creates a uniquely named, hidden file next to `destination`
    ///
    /// Keeping the temporary file in the destination's directory means `persist_file` never has
    /// to cross a filesystem boundary.
    fn create_temp_file<P: AsRef<Path>>(&self, destination: P) -> Result<Entry<RW>, Error> {
        let dir = destination.as_ref().parent().unwrap_or_else(|| Path::new(""));
        let file_name = format!(
            ".tricrypt-{}.tmp",
            Alphanumeric.sample_string(&mut rand::thread_rng(), 16)
        );

        self.create_file(dir.join(file_name))
    }

    fn create_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<RW>, Error>;
    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<RW>, Error>;
    fn flush_file(&self, file: &Entry<RW>) -> Result<(), Error>;
    fn remove_file(&self, file: Entry<RW>) -> Result<(), Error>;
    /// Atomically replaces `destination` with the file, and returns the destination path
    fn persist_file<P: AsRef<Path>>(&self, file: Entry<RW>, destination: P)
        -> Result<PathBuf, Error>;
}

pub struct FileStorage;

impl Storage<fs::File> for FileStorage {
    fn create_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<fs::File>, Error> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::options()
            .create_new(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(Error::CreateFile)?;
        Ok(Entry::File(FileData {
            path,
            stream: RefCell::new(file),
        }))
    }

    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<fs::File>, Error> {
        let path = path.as_ref().to_path_buf();
        if path.is_dir() {
            Ok(Entry::Dir(path))
        } else {
            let file = fs::File::open(&path).map_err(Error::OpenFile)?;
            Ok(Entry::File(FileData {
                path,
                stream: RefCell::new(file),
            }))
        }
    }

    fn flush_file(&self, file: &Entry<fs::File>) -> Result<(), Error> {
        let mut stream = file.try_writer()?.borrow_mut();
        stream.flush().map_err(Error::FlushFile)?;
        stream.sync_all().map_err(Error::FlushFile)
    }

    fn remove_file(&self, file: Entry<fs::File>) -> Result<(), Error> {
        if let Entry::File(FileData { stream, .. }) = &file {
            let mut stream = stream.borrow_mut();
            stream.set_len(0).map_err(Error::RemoveFile)?;
            stream.flush().map_err(Error::FlushFile)?;
        }

        fs::remove_file(file.path()).map_err(Error::RemoveFile)
    }

    fn persist_file<P: AsRef<Path>>(
        &self,
        file: Entry<fs::File>,
        destination: P,
    ) -> Result<PathBuf, Error> {
        let path = match file {
            // the handle is closed before the rename, as some platforms refuse to move open files
            Entry::File(FileData { path, stream }) => {
                drop(stream);
                path
            }
            Entry::Dir(path) => return Err(Error::IsDirectory(path)),
        };

        let destination = destination.as_ref().to_path_buf();
        if let Err(e) = fs::rename(&path, &destination) {
            fs::remove_file(&path).ok();
            return Err(Error::PersistFile(e));
        }

        Ok(destination)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct InMemoryStorage {
    pub files: RwLock<HashMap<PathBuf, IMFile>>,
}

#[cfg(test)]
impl InMemoryStorage {
    pub(crate) fn save_file<P: AsRef<Path>>(&self, path: P, buf: &[u8]) {
        self.mut_files().insert(
            path.as_ref().to_owned(),
            IMFile::File(InMemoryFile {
                len: buf.len(),
                buf: buf.to_vec(),
            }),
        );
    }

    pub(crate) fn files(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, IMFile>> {
        loop {
            match self.files.try_read() {
                Ok(files) => break files,
                _ => thread::sleep(std::time::Duration::from_micros(100)),
            }
        }
    }

    pub(crate) fn mut_files(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, IMFile>> {
        loop {
            match self.files.try_write() {
                Ok(files) => break files,
                _ => thread::sleep(std::time::Duration::from_micros(100)),
            }
        }
    }

    pub(crate) fn file_content<P: AsRef<Path>>(&self, path: P) -> Option<Vec<u8>> {
        match self.files().get(path.as_ref()) {
            Some(IMFile::File(InMemoryFile { buf, .. })) => Some(buf.clone()),
            _ => None,
        }
    }

    pub(crate) fn file_names(&self) -> Vec<PathBuf> {
        let mut names = self.files().keys().cloned().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    // --------------------------------
    // TEST DATA
    // -------------------------------

    pub(crate) fn add_hello_txt(&self) {
        self.save_file("hello.txt", b"hello world");
    }

    pub(crate) fn add_bar_dir(&self) {
        self.mut_files().insert(PathBuf::from("bar/"), IMFile::Dir);
    }
}

#[cfg(test)]
impl Storage<io::Cursor<Vec<u8>>> for InMemoryStorage {
    fn create_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<io::Cursor<Vec<u8>>>, Error> {
        let file_path = path.as_ref().to_path_buf();

        if self.files().contains_key(&file_path) {
            return Err(Error::CreateFile(io::ErrorKind::AlreadyExists.into()));
        }

        self.mut_files()
            .insert(file_path.clone(), IMFile::File(InMemoryFile::default()));

        Ok(Entry::File(FileData {
            path: file_path,
            stream: RefCell::new(io::Cursor::new(Vec::new())),
        }))
    }

    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<io::Cursor<Vec<u8>>>, Error> {
        let in_file = self
            .files()
            .get(path.as_ref())
            .cloned()
            .ok_or_else(|| Error::OpenFile(io::ErrorKind::NotFound.into()))?;

        let file_path = path.as_ref().to_path_buf();

        match in_file {
            IMFile::Dir => Ok(Entry::Dir(file_path)),
            IMFile::File(f) => Ok(Entry::File(FileData {
                path: file_path,
                stream: RefCell::new(io::Cursor::new(f.buf)),
            })),
        }
    }

    fn flush_file(&self, file: &Entry<io::Cursor<Vec<u8>>>) -> Result<(), Error> {
        let writer = file.try_writer()?;
        writer.borrow_mut().flush().map_err(Error::FlushFile)?;

        let buf = writer.borrow().get_ref().clone();
        self.save_file(file.path(), &buf);

        Ok(())
    }

    fn remove_file(&self, file: Entry<io::Cursor<Vec<u8>>>) -> Result<(), Error> {
        self.mut_files()
            .remove(file.path())
            .ok_or_else(|| Error::RemoveFile(io::ErrorKind::NotFound.into()))?;
        Ok(())
    }

    fn persist_file<P: AsRef<Path>>(
        &self,
        file: Entry<io::Cursor<Vec<u8>>>,
        destination: P,
    ) -> Result<PathBuf, Error> {
        if file.is_dir() {
            return Err(Error::IsDirectory(file.path().to_path_buf()));
        }

        let destination = destination.as_ref().to_path_buf();
        let mut files = self.mut_files();
        let im_file = files
            .remove(file.path())
            .ok_or_else(|| Error::PersistFile(io::ErrorKind::NotFound.into()))?;
        files.insert(destination.clone(), im_file);

        Ok(destination)
    }
}

/// In-memory storage whose files stop being readable after `fail_after` bytes
#[cfg(test)]
pub struct FaultyStorage {
    pub inner: InMemoryStorage,
    pub fail_after: u64,
}

#[cfg(test)]
pub struct FaultyFile {
    cursor: io::Cursor<Vec<u8>>,
    fail_after: u64,
}

#[cfg(test)]
impl Read for FaultyFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.fail_after.saturating_sub(self.cursor.position());
        if remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "device error"));
        }

        let len = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        self.cursor.read(&mut buf[..len])
    }
}

#[cfg(test)]
impl Write for FaultyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.cursor.flush()
    }
}

#[cfg(test)]
impl Seek for FaultyFile {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

#[cfg(test)]
impl FaultyStorage {
    pub(crate) fn new(fail_after: u64) -> Self {
        FaultyStorage {
            inner: InMemoryStorage::default(),
            fail_after,
        }
    }

    fn wrap(&self, entry: Entry<io::Cursor<Vec<u8>>>) -> Entry<FaultyFile> {
        match entry {
            Entry::File(FileData { path, stream }) => Entry::File(FileData {
                path,
                stream: RefCell::new(FaultyFile {
                    cursor: stream.into_inner(),
                    fail_after: self.fail_after,
                }),
            }),
            Entry::Dir(path) => Entry::Dir(path),
        }
    }

    fn into_inner(entry: Entry<FaultyFile>) -> Entry<io::Cursor<Vec<u8>>> {
        match entry {
            Entry::File(FileData { path, stream }) => Entry::File(FileData {
                path,
                stream: RefCell::new(stream.into_inner().cursor),
            }),
            Entry::Dir(path) => Entry::Dir(path),
        }
    }
}

#[cfg(test)]
impl Storage<FaultyFile> for FaultyStorage {
    fn create_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<FaultyFile>, Error> {
        self.inner.create_file(path).map(|entry| self.wrap(entry))
    }

    fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Entry<FaultyFile>, Error> {
        self.inner.read_file(path).map(|entry| self.wrap(entry))
    }

    fn flush_file(&self, file: &Entry<FaultyFile>) -> Result<(), Error> {
        let writer = file.try_writer()?;
        writer.borrow_mut().flush().map_err(Error::FlushFile)?;

        let buf = writer.borrow().cursor.get_ref().clone();
        self.inner.save_file(file.path(), &buf);

        Ok(())
    }

    fn remove_file(&self, file: Entry<FaultyFile>) -> Result<(), Error> {
        self.inner.remove_file(Self::into_inner(file))
    }

    fn persist_file<P: AsRef<Path>>(
        &self,
        file: Entry<FaultyFile>,
        destination: P,
    ) -> Result<PathBuf, Error> {
        self.inner.persist_file(Self::into_inner(file), destination)
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryFile {
    pub buf: Vec<u8>,
    pub len: usize,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IMFile {
    File(InMemoryFile),
    Dir,
}

pub struct FileData<RW>
where
    RW: Read + Write + Seek,
{
    path: PathBuf,
    stream: RefCell<RW>,
}

pub enum Entry<RW>
where
    RW: Read + Write + Seek,
{
    File(FileData<RW>),
    Dir(PathBuf),
}

impl<RW> Entry<RW>
where
    RW: Read + Write + Seek,
{
    pub fn path(&self) -> &Path {
        match self {
            Entry::File(FileData { path, .. }) | Entry::Dir(path) => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir(_))
    }

    pub fn try_reader(&self) -> Result<&RefCell<RW>, Error> {
        match self {
            Entry::File(file) => Ok(&file.stream),
            Entry::Dir(path) => Err(Error::IsDirectory(path.clone())),
        }
    }

    pub fn try_writer(&self) -> Result<&RefCell<RW>, Error> {
        match self {
            Entry::File(file) => Ok(&file.stream),
            Entry::Dir(path) => Err(Error::IsDirectory(path.clone())),
        }
    }
}
