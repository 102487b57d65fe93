#![forbid(unsafe_code)]

//! Retained element tree and the data-join renderer built on it.
//!
//! - [`document`]: arena-backed element tree standing in for the DOM
//! - [`selector`]: `#id`, `tag`, `tag#id` and `*` selectors
//! - [`selection`]: d3-style `select` / `data` / `enter` / `exit` chaining
//! - [`renderer`]: the [`Renderer`] seam and the [`BarRenderer`]
//! - [`html`] and [`terminal`]: presenters for a synchronized tree

pub mod document;
pub mod html;
pub mod renderer;
pub mod selection;
pub mod selector;
pub mod stylesheet;
pub mod terminal;

pub use document::{Document, Element, NodeId};
pub use renderer::{BarEncoding, BarRenderer, Renderer, SyncReport};
pub use selection::{BoundSelection, DataJoin, EnterSelection, Selection};
pub use selector::{Selector, SelectorError};
pub use stylesheet::{Stylesheet, StylesheetError};
