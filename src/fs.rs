//! Filesystem access used by config loading, `WriteFile` steps and resume files.
//!
//! [`FileSystem`] keeps the engine independent of the real disk so tests can
//! run whole sequences against [`MemoryFileSystem`].

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Permissions for files written by `WriteFile` steps (owner read/write).
pub const WRITE_FILE_MODE: u32 = 0o600;

/// Permissions for resume files.
pub const RESUME_FILE_MODE: u32 = 0o660;

/// Read and write whole files.
pub trait FileSystem {
    /// Read the file at `path`.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or replace the file at `path` with `contents` and permission `mode`.
    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()>;

    /// Read the file at `path` as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// The operating system's filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        use std::io::Write;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }

        let mut file = options.open(path)?;
        file.write_all(contents)?;

        // An existing file keeps its old permissions on open.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(mode))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(())
    }
}

/// In-memory filesystem for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, (Vec<u8>, u32)>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, as if written with mode 0o644.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), (contents.into(), 0o644));
        }
        self
    }

    /// Contents of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let files = self.files.lock().ok()?;
        files.get(path.as_ref()).map(|(bytes, _)| bytes.clone())
    }

    /// Permission bits a file was written with, if present.
    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        let files = self.files.lock().ok()?;
        files.get(path.as_ref()).map(|(_, mode)| *mode)
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.contents(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| io::Error::other("memory filesystem lock poisoned"))?;
        files.insert(path.to_path_buf(), (contents.to_vec(), mode));
        Ok(())
    }
}
