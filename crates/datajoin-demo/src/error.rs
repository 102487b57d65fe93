//! Demo errors.
//!
//! Synchronization itself cannot fail; everything here comes from the edges:
//! reading configuration, data, stylesheets, and writing output.

use std::fmt;
use std::io;
use std::path::PathBuf;

use datajoin_core::record::RecordError;
use datajoin_dom::selector::SelectorError;
use datajoin_dom::stylesheet::StylesheetError;

#[derive(Debug)]
pub enum DemoError {
    /// An environment variable held an unusable value.
    Config {
        var: &'static str,
        value: String,
        reason: String,
    },
    /// The mount point selector did not parse.
    Selector(SelectorError),
    /// The data file could not be read.
    DataRead { path: PathBuf, error: io::Error },
    /// The data file did not hold a valid record list.
    Records(RecordError),
    Stylesheet(StylesheetError),
    /// Writing the rendered output failed.
    Output(io::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { var, value, reason } => {
                write!(f, "invalid {var}={value:?}: {reason}")
            }
            Self::Selector(e) => write!(f, "invalid mount selector: {e}"),
            Self::DataRead { path, error } => {
                write!(f, "failed to read data file '{}': {error}", path.display())
            }
            Self::Records(e) => write!(f, "{e}"),
            Self::Stylesheet(e) => write!(f, "{e}"),
            Self::Output(e) => write!(f, "failed to write output: {e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Selector(e) => Some(e),
            Self::DataRead { error, .. } => Some(error),
            Self::Records(e) => Some(e),
            Self::Stylesheet(e) => Some(e),
            Self::Output(e) => Some(e),
            Self::Config { .. } => None,
        }
    }
}

impl From<SelectorError> for DemoError {
    fn from(e: SelectorError) -> Self {
        Self::Selector(e)
    }
}

impl From<RecordError> for DemoError {
    fn from(e: RecordError) -> Self {
        Self::Records(e)
    }
}

impl From<StylesheetError> for DemoError {
    fn from(e: StylesheetError) -> Self {
        Self::Stylesheet(e)
    }
}

impl From<io::Error> for DemoError {
    fn from(e: io::Error) -> Self {
        Self::Output(e)
    }
}
