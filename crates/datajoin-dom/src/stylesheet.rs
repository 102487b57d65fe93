#![forbid(unsafe_code)]

//! External stylesheets.
//!
//! A stylesheet is an opaque collaborator: it is loaded and linked from the
//! document head, but its rules are never parsed or applied here.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Failure to load a stylesheet from disk.
#[derive(Debug)]
pub enum StylesheetError {
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StylesheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read stylesheet {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StylesheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// A linked stylesheet resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    href: String,
    contents: Option<String>,
}

impl Stylesheet {
    /// Link by reference only; nothing is read.
    pub fn linked(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            contents: None,
        }
    }

    /// Read a stylesheet from disk. The file name becomes the link target.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StylesheetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| StylesheetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let href = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        datajoin_core::debug!(href = %href, bytes = contents.len(), "stylesheet loaded");
        Ok(Self {
            href,
            contents: Some(contents),
        })
    }

    #[inline]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Raw contents, when the sheet was loaded rather than linked.
    #[inline]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}
