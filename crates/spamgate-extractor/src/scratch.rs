//! Temporary files for decoders that shell out

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile, TempDir};

/// Where decoders place their temp files
///
/// Every file and directory handed out is removed when its handle drops,
/// whether or not decoding succeeded.
#[derive(Debug, Clone, Default)]
pub struct ScratchSpace {
    root: Option<PathBuf>,
}

impl ScratchSpace {
    /// Use the system temp directory
    pub fn system() -> Self {
        Self { root: None }
    }

    /// Use `root` for temp files
    pub fn under(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Write `bytes` to a fresh temp file with the given suffix
    pub fn file_with(&self, bytes: &[u8], suffix: &str) -> io::Result<NamedTempFile> {
        let mut builder = Builder::new();
        builder.prefix("spamgate-").suffix(suffix);

        let mut file = match self.root() {
            Some(root) => builder.tempfile_in(root)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;
        Ok(file)
    }

    /// Create a fresh temp directory
    pub fn dir(&self) -> io::Result<TempDir> {
        let mut builder = Builder::new();
        builder.prefix("spamgate-");

        match self.root() {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}
