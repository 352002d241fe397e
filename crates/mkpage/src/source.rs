//! Include file sources.
//!
//! [`IncludeSource`] abstracts where header, footer, stylesheet and script
//! includes are read from. [`FsSource`] reads the filesystem;
//! [`MemorySource`] serves text registered up front.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

/// Reads include files as text.
pub trait IncludeSource: Send + Sync {
    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;
}

/// Filesystem include source.
///
/// Relative paths are resolved against the process working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl IncludeSource for FsSource {
    async fn read(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// In-memory include source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl IncludeSource for MemorySource {
    async fn read(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}
