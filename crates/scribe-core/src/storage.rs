#![forbid(unsafe_code)]

//! Load/save collaborators.
//!
//! The buffer never touches the filesystem directly. It reads whole contents
//! from a [`TextSource`] and writes whole contents to a [`TextSink`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Something the buffer can load its full contents from.
pub trait TextSource {
    fn read_all(&mut self) -> io::Result<Vec<u8>>;
}

/// Something the buffer can save its full contents to.
pub trait TextSink {
    /// Replace the destination's contents with `bytes`.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// File-backed collaborator. Writes overwrite the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for FileStore {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

impl TextSink for FileStore {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        fs::write(&self.path, bytes)
    }
}

/// In-memory collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    bytes: Vec<u8>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl TextSource for MemoryStore {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

impl TextSink for MemoryStore {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }
}

impl<T: TextSource + ?Sized> TextSource for &mut T {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        (**self).read_all()
    }
}

impl<T: TextSink + ?Sized> TextSink for &mut T {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_write_replaces() {
        let mut store = MemoryStore::new("old contents");
        store.write_all(b"new").unwrap();
        assert_eq!(store.bytes(), b"new");
        assert_eq!(store.read_all().unwrap(), b"new");
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("note.txt"));
        store.write_all(b"line one\nline two").unwrap();
        assert_eq!(store.read_all().unwrap(), b"line one\nline two");

        store.write_all(b"short").unwrap();
        assert_eq!(store.read_all().unwrap(), b"short");
    }

    #[test]
    fn file_store_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("absent.txt"));
        let err = store.read_all().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn mutable_reference_forwards() {
        fn drain(mut source: impl TextSource) -> Vec<u8> {
            source.read_all().unwrap()
        }
        let mut store = MemoryStore::new("abc");
        assert_eq!(drain(&mut store), b"abc");
    }
}
