#![forbid(unsafe_code)]

//! Retained element tree.
//!
//! A [`Document`] owns every [`Element`] in a slot arena and hands out
//! [`NodeId`] handles. Handles carry a generation counter, so a handle to a
//! removed element never aliases a later element that reuses its slot.
//!
//! The tree models the small slice of the DOM a data join needs: tags,
//! attributes, inline style properties, text content, a bound datum, and an
//! ordered child list.
//!
//! # Example
//! ```
//! use datajoin_dom::document::Document;
//!
//! let mut doc = Document::new();
//! let main = doc.create_element("main");
//! doc.set_attr(main, "id", "d3-graph");
//! doc.append_child(doc.root(), main);
//!
//! assert_eq!(doc.get_element_by_id("d3-graph"), Some(main));
//! ```

use datajoin_core::record::Record;

use crate::stylesheet::Stylesheet;

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// A single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: String,
    datum: Option<Record>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            datum: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Lowercase tag name.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        lookup(&self.attrs, name)
    }

    /// Attributes in insertion order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Inline style property by name.
    pub fn style(&self, name: &str) -> Option<&str> {
        lookup(&self.style, name)
    }

    /// Inline style properties in insertion order.
    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Text content.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Datum bound by the last data join, if any.
    #[inline]
    pub fn datum(&self) -> Option<Record> {
        self.datum
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

fn lookup<'a>(entries: &'a [(String, String)], name: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn upsert(entries: &mut Vec<(String, String)>, name: &str, value: String) {
    match entries.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => *v = value,
        None => entries.push((name.to_string(), value)),
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// Arena-backed element tree rooted at a `body` element.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    stylesheets: Vec<Stylesheet>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the root `body` element.
    pub fn new() -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                element: Some(Element::new("body")),
            }],
            free: Vec::new(),
            root,
            stylesheets: Vec::new(),
        }
    }

    /// The root element.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live elements, detached ones included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always false; the root element cannot be removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `id` refers to a live element.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Borrow an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        let slot = self.slots.get(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_ref()
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_mut()
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let element = Element::new(tag);
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.element = Some(element);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    element: Some(element),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.element(id).and_then(Element::parent);
        }
        false
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    ///
    /// Returns `false` (and changes nothing) when either handle is stale,
    /// when `child` is the root, or when the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent)
            || !self.contains(child)
            || child == self.root
            || self.is_ancestor(child, parent)
        {
            return false;
        }
        self.detach(child);
        if let Some(el) = self.element_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.element_mut(parent) {
            el.children.push(child);
        }
        true
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.element_mut(id).and_then(|el| el.parent.take()) else {
            return;
        };
        if let Some(el) = self.element_mut(parent) {
            el.children.retain(|&c| c != id);
        }
    }

    /// Remove an element and its whole subtree.
    ///
    /// Returns `false` for stale handles and for the root.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let slot = &mut self.slots[next.index];
            if let Some(el) = slot.element.take() {
                stack.extend(el.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(next.index);
            }
        }
        true
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                upsert(&mut el.attrs, name, value.into());
                true
            }
            None => false,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let el = self.element_mut(id)?;
        let pos = el.attrs.iter().position(|(k, _)| k == name)?;
        Some(el.attrs.remove(pos).1)
    }

    pub fn set_style(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                upsert(&mut el.style, name, value.into());
                true
            }
            None => false,
        }
    }

    pub fn style(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.style(name)
    }

    /// Replace the text content. Like `textContent`, this drops all children.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        el.text = text.into();
        let children = std::mem::take(&mut el.children);
        for child in children {
            if let Some(c) = self.element_mut(child) {
                c.parent = None;
            }
            self.remove(child);
        }
        true
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::text)
    }

    /// Bind a datum to an element.
    pub fn bind(&mut self, id: NodeId, datum: Record) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.datum = Some(datum);
                true
            }
            None => false,
        }
    }

    pub fn datum(&self, id: NodeId) -> Option<Record> {
        self.element(id)?.datum()
    }

    /// Child handles; empty for stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map(Element::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id)?.parent()
    }

    /// Descendants of `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// First attached element whose `id` attribute equals `value`.
    pub fn get_element_by_id(&self, value: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&id| self.attr(id, "id") == Some(value))
    }

    /// Rearrange the listed children of `parent` into the given order.
    ///
    /// Only the positions currently occupied by the listed nodes change;
    /// other children stay where they are. Entries that are not children of
    /// `parent` are ignored, and a repeated entry counts only at its first
    /// position.
    pub fn reorder_children(&mut self, parent: NodeId, order: &[NodeId]) {
        let Some(el) = self.element_mut(parent) else {
            return;
        };
        let mut wanted: Vec<NodeId> = Vec::with_capacity(order.len());
        for &id in order {
            if el.children.contains(&id) && !wanted.contains(&id) {
                wanted.push(id);
            }
        }
        let mut next = wanted.iter();
        for child in el.children.iter_mut() {
            if wanted.contains(child) {
                if let Some(&id) = next.next() {
                    *child = id;
                }
            }
        }
    }

    /// Register an external stylesheet with the document.
    pub fn attach_stylesheet(&mut self, sheet: Stylesheet) {
        self.stylesheets.push(sheet);
    }

    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
