//! Page build errors.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Which configured include a file was loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    /// Inline stylesheet (`css`).
    Css,
    /// Inline script (`javascript`).
    Javascript,
    /// Content at the start of the body (`header`).
    Header,
    /// Content at the end of the body (`footer`).
    Footer,
}

impl fmt::Display for IncludeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Css => "css",
            Self::Javascript => "javascript",
            Self::Header => "header",
            Self::Footer => "footer",
        })
    }
}

/// Error that aborts a page build.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The include file does not exist.
    #[error("{kind} include not found: {}", path.display())]
    NotFound {
        kind: IncludeKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The include file exists but could not be read as text.
    #[error("Failed to read {kind} include {}: {source}", path.display())]
    Unreadable {
        kind: IncludeKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PageError {
    /// Classify an I/O error raised while loading an include.
    #[must_use]
    pub fn include(kind: IncludeKind, path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                kind,
                path,
                source: err,
            },
            _ => Self::Unreadable {
                kind,
                path,
                source: err,
            },
        }
    }

    /// The include that failed.
    pub fn kind(&self) -> IncludeKind {
        match self {
            Self::NotFound { kind, .. } | Self::Unreadable { kind, .. } => *kind,
        }
    }

    /// Path of the include that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path, .. } | Self::Unreadable { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
