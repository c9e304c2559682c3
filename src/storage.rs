//! [`Storage`] backends: a file on disk, and an in-memory buffer

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{
    errors::Error,
    types::{Storage, DEFAULT_LEDGER_PATH},
};

/// A ledger kept in a single plain-text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    /// Location of the ledger file
    path: PathBuf,
}

impl FileStorage {
    /// Creates a handle for the ledger file at `path`. Nothing is opened yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the location of the ledger file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileStorage {
    /// `expenses.txt`, relative to the working directory
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_PATH)
    }
}

impl Storage for FileStorage {
    fn reader(&self) -> Result<Option<Box<dyn BufRead + '_>>, Error> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no ledger file yet");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn writer(&mut self) -> Result<Box<dyn Write + '_>, Error> {
        let file = File::create(&self.path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Holds the stored text in memory.
///
/// # Limitations
/// No persistence beyond the lifetime of the value.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MemoryStorage {
    /// The stored bytes, or `None` if nothing has been written yet
    pub(crate) contents: Option<Vec<u8>>,
}

impl MemoryStorage {
    /// Creates a new, empty [`MemoryStorage`] that reads as non-existent
    #[must_use]
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Returns the stored text, if anything has been written
    #[must_use]
    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }
}

impl From<&str> for MemoryStorage {
    fn from(contents: &str) -> Self {
        Self {
            contents: Some(contents.as_bytes().to_vec()),
        }
    }
}

impl Storage for MemoryStorage {
    fn reader(&self) -> Result<Option<Box<dyn BufRead + '_>>, Error> {
        Ok(self
            .contents
            .as_deref()
            .map(|contents| Box::new(Cursor::new(contents)) as Box<dyn BufRead + '_>))
    }

    fn writer(&mut self) -> Result<Box<dyn Write + '_>, Error> {
        let contents = self.contents.insert(Vec::new());
        Ok(Box::new(contents))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("missing.txt"));
        assert!(storage.reader().unwrap().is_none());
    }

    #[test]
    fn test_file_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path().join("ledger.txt"));
        {
            let mut writer = storage.writer().unwrap();
            writer.write_all(b"first\n").unwrap();
            writer.flush().unwrap();
        }
        {
            let mut writer = storage.writer().unwrap();
            writer.write_all(b"second\n").unwrap();
            writer.flush().unwrap();
        }
        let mut text = String::new();
        storage
            .reader()
            .unwrap()
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "second\n");
    }

    #[test]
    fn test_file_write_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path().join("no/such/dir/ledger.txt"));
        assert!(matches!(storage.writer(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_default_path() {
        assert_eq!(FileStorage::default().path(), Path::new("expenses.txt"));
    }

    #[test]
    fn test_memory_write_overwrites() {
        let mut storage = MemoryStorage::from("old contents\n");
        storage.writer().unwrap().write_all(b"new\n").unwrap();
        assert_eq!(storage.contents(), Some(&b"new\n"[..]));
        assert!(MemoryStorage::new().reader().unwrap().is_none());
    }
}
