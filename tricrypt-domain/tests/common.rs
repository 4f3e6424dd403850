#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tricrypt_domain::storage::{Error, FileStorage, Storage};

/// File storage rooted in its own directory, which is removed once the test is over
pub struct TestFileStorage {
    inner: Arc<FileStorage>,
    test_case_n: u32,
}

impl TestFileStorage {
    pub fn new(test_case_n: u32) -> Self {
        let stor = Self {
            inner: Arc::new(FileStorage),
            test_case_n,
        };
        fs::remove_dir_all(stor.dir()).ok();
        fs::create_dir_all(stor.dir()).unwrap();
        stor
    }

    pub fn dir(&self) -> PathBuf {
        PathBuf::from(format!("test_case_{}", self.test_case_n))
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir().join(file_name)
    }

    pub fn shared(&self) -> Arc<FileStorage> {
        self.inner.clone()
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names = fs::read_dir(self.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl Deref for TestFileStorage {
    type Target = FileStorage;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Drop for TestFileStorage {
    fn drop(&mut self) {
        fs::remove_dir_all(self.dir()).ok();
    }
}

pub fn save_file<P>(stor: &TestFileStorage, path: P, content: &[u8]) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let file = stor.create_file(path)?;
    file.try_writer()?
        .borrow_mut()
        .write_all(content)
        .map_err(Error::CreateFile)?;
    stor.flush_file(&file)
}

// --------------------------------
// TEST DATA
// -------------------------------

pub fn add_hello_txt(stor: &TestFileStorage) -> Result<PathBuf, Error> {
    let path = stor.path("hello.txt");
    save_file(stor, &path, b"hello world")?;
    Ok(path)
}
