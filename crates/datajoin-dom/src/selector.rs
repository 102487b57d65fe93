#![forbid(unsafe_code)]

//! Minimal element selectors.
//!
//! Supported forms: `*`, `tag`, `#id`, and `tag#id`. Tag matching is
//! case-insensitive; id matching is exact.

use std::fmt;
use std::str::FromStr;

use crate::document::Element;

/// Selector parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Nothing but whitespace.
    Empty,
    /// `#` with no id after it.
    MissingId,
    /// A character that cannot appear in a tag or id.
    InvalidChar { ch: char, position: usize },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::MissingId => write!(f, "selector has '#' without an id"),
            Self::InvalidChar { ch, position } => {
                write!(f, "invalid character {ch:?} at position {position}")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `*`
    Universal,
    /// `div`
    Tag(String),
    /// `#d3-graph`
    Id(String),
    /// `main#d3-graph`
    TagId { tag: String, id: String },
}

impl Selector {
    /// Parse selector text.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        if trimmed == "*" {
            return Ok(Self::Universal);
        }
        let offset = text.len() - text.trim_start().len();

        let (tag, id) = match trimmed.split_once('#') {
            Some((tag, id)) => (tag, Some(id)),
            None => (trimmed, None),
        };
        validate(tag, offset)?;
        let tag = tag.to_ascii_lowercase();

        match id {
            None => Ok(Self::Tag(tag)),
            Some("") => Err(SelectorError::MissingId),
            Some(id) => {
                validate(id, offset + tag.len() + 1)?;
                if tag.is_empty() {
                    Ok(Self::Id(id.to_string()))
                } else {
                    Ok(Self::TagId {
                        tag,
                        id: id.to_string(),
                    })
                }
            }
        }
    }

    /// Selector matching elements with the given tag.
    pub fn tag(tag: &str) -> Self {
        Self::Tag(tag.to_ascii_lowercase())
    }

    /// Selector matching the element with the given id.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Whether `element` matches.
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag() == tag,
            Self::Id(id) => element.attr("id") == Some(id.as_str()),
            Self::TagId { tag, id } => {
                element.tag() == tag && element.attr("id") == Some(id.as_str())
            }
        }
    }
}

fn validate(name: &str, offset: usize) -> Result<(), SelectorError> {
    match name
        .char_indices()
        .find(|&(_, ch)| !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'))
    {
        Some((pos, ch)) => Err(SelectorError::InvalidChar {
            ch,
            position: offset + pos,
        }),
        None => Ok(()),
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => write!(f, "*"),
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::TagId { tag, id } => write!(f, "{tag}#{id}"),
        }
    }
}
