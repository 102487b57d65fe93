#![forbid(unsafe_code)]

//! d3-style selections over a [`Document`].
//!
//! Selections are plain lists of [`NodeId`]s grouped by parent; every
//! operation takes the document explicitly. An empty selection turns every
//! operation into a no-op, which is how a missing mount point degrades.
//!
//! # Example
//! ```
//! use datajoin_core::join::JoinMode;
//! use datajoin_core::record::Record;
//! use datajoin_dom::document::Document;
//! use datajoin_dom::selection::Selection;
//! use datajoin_dom::selector::Selector;
//!
//! let mut doc = Document::new();
//! let main = doc.create_element("main");
//! doc.set_attr(main, "id", "d3-graph");
//! doc.append_child(doc.root(), main);
//!
//! let data = [Record::new(1, 1), Record::new(2, 4)];
//! let join = Selection::select(&doc, &Selector::id("d3-graph"))
//!     .select_all(&doc, &Selector::tag("div"))
//!     .data(&mut doc, &data, JoinMode::Keyed);
//!
//! join.exit().remove(&mut doc);
//! let entered = join.enter().append(&mut doc, "div");
//! entered
//!     .attr(&mut doc, "id", |d| d.key.to_string())
//!     .style(&mut doc, "width", |d| format!("{}px", d.value * 10))
//!     .text(&mut doc, |d| d.value.to_string());
//!
//! assert_eq!(doc.children(main).len(), 2);
//! ```

use datajoin_core::join::{Join, JoinMode};
use datajoin_core::record::Record;

use crate::document::{Document, NodeId};
use crate::selector::Selector;

/// Elements sharing a parent.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Group {
    parent: NodeId,
    nodes: Vec<NodeId>,
}

/// A list of element groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    groups: Vec<Group>,
}

impl Selection {
    /// The selection with no elements.
    pub fn empty() -> Self {
        Self::default()
    }

    /// First element in document order matching `selector`, or an empty selection.
    pub fn select(doc: &Document, selector: &Selector) -> Self {
        let root = doc.root();
        let found = std::iter::once(root)
            .chain(doc.descendants(root))
            .find(|&id| doc.element(id).is_some_and(|el| selector.matches(el)));
        match found {
            Some(id) => Self {
                groups: vec![Group {
                    parent: doc.parent(id).unwrap_or(root),
                    nodes: vec![id],
                }],
            },
            None => Self::empty(),
        }
    }

    /// Wrap an explicit element handle.
    pub fn from_node(doc: &Document, id: NodeId) -> Self {
        if !doc.contains(id) {
            return Self::empty();
        }
        Self {
            groups: vec![Group {
                parent: doc.parent(id).unwrap_or(doc.root()),
                nodes: vec![id],
            }],
        }
    }

    /// For each selected element, its direct children matching `selector`.
    ///
    /// Each selected element becomes the parent of one group, so an element
    /// with no matching children still yields an (empty) group that entering
    /// data can be appended to.
    pub fn select_all(&self, doc: &Document, selector: &Selector) -> Self {
        let groups = self
            .nodes()
            .filter(|&id| doc.contains(id))
            .map(|parent| Group {
                parent,
                nodes: doc
                    .children(parent)
                    .iter()
                    .copied()
                    .filter(|&c| doc.element(c).is_some_and(|el| selector.matches(el)))
                    .collect(),
            })
            .collect();
        Self { groups }
    }

    /// Every selected element, group by group.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.groups.iter().flat_map(|g| g.nodes.iter().copied())
    }

    /// Parents of the groups.
    pub fn parents(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.groups.iter().map(|g| g.parent)
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.nodes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there are no groups at all (nothing to append into).
    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Join `data` against each group.
    ///
    /// Keyed joins identify an element by its bound datum's key or, for
    /// elements never bound, by an integer `id` attribute. Matched elements
    /// are rebound to their new datum immediately.
    pub fn data(&self, doc: &mut Document, data: &[Record], mode: JoinMode) -> DataJoin {
        let _span = datajoin_core::debug_span!(
            "selection_data",
            groups = self.groups.len(),
            data = data.len()
        );
        let _guard = _span.enter();

        let mut update = Vec::with_capacity(self.groups.len());
        let mut enter = Vec::with_capacity(self.groups.len());
        let mut exit = Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            let join = Join::compute(
                mode,
                &group.nodes,
                data,
                |&id| element_key(doc, id),
                |d| d.key,
            );

            let mut items = Vec::with_capacity(join.update().len());
            for &(existing, incoming) in join.update() {
                let node = group.nodes[existing];
                let datum = data[incoming];
                doc.bind(node, datum);
                items.push(Bound {
                    node,
                    index: incoming,
                    datum,
                });
            }
            update.push(BoundGroup {
                parent: group.parent,
                items,
            });
            enter.push(EnterGroup {
                parent: group.parent,
                data: join.enter().iter().map(|&i| (i, data[i])).collect(),
            });
            exit.push(Group {
                parent: group.parent,
                nodes: join.exit().iter().map(|&e| group.nodes[e]).collect(),
            });
        }

        DataJoin {
            update: BoundSelection { groups: update },
            enter: EnterSelection { groups: enter },
            exit: Selection { groups: exit },
        }
    }

    /// Remove every selected element from the document.
    ///
    /// Returns how many elements were actually removed.
    pub fn remove(&self, doc: &mut Document) -> usize {
        self.nodes().filter(|&id| doc.remove(id)).count()
    }
}

fn element_key(doc: &Document, id: NodeId) -> Option<i64> {
    let el = doc.element(id)?;
    match el.datum() {
        Some(datum) => Some(datum.key),
        None => el.attr("id")?.trim().parse().ok(),
    }
}

/// The three partitions produced by [`Selection::data`].
#[derive(Debug, Clone, Default)]
pub struct DataJoin {
    update: BoundSelection,
    enter: EnterSelection,
    exit: Selection,
}

impl DataJoin {
    /// Existing elements that matched a datum.
    pub fn update(&self) -> &BoundSelection {
        &self.update
    }

    /// Data that still need an element.
    pub fn enter(&self) -> &EnterSelection {
        &self.enter
    }

    /// Existing elements with no datum.
    pub fn exit(&self) -> &Selection {
        &self.exit
    }
}

/// An element bound to a datum, with the datum's position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub node: NodeId,
    pub index: usize,
    pub datum: Record,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BoundGroup {
    parent: NodeId,
    items: Vec<Bound>,
}

/// Elements paired with data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundSelection {
    groups: Vec<BoundGroup>,
}

impl BoundSelection {
    /// Bound items, group by group.
    pub fn items(&self) -> impl Iterator<Item = &Bound> + '_ {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    /// Bound element handles, group by group.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items().map(|b| b.node)
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set an inline style property from each datum.
    pub fn style(
        &self,
        doc: &mut Document,
        name: &str,
        value: impl Fn(&Record) -> String,
    ) -> &Self {
        for item in self.items() {
            doc.set_style(item.node, name, value(&item.datum));
        }
        self
    }

    /// Set an attribute from each datum.
    pub fn attr(
        &self,
        doc: &mut Document,
        name: &str,
        value: impl Fn(&Record) -> String,
    ) -> &Self {
        for item in self.items() {
            doc.set_attr(item.node, name, value(&item.datum));
        }
        self
    }

    /// Set the text content from each datum.
    pub fn text(&self, doc: &mut Document, value: impl Fn(&Record) -> String) -> &Self {
        for item in self.items() {
            doc.set_text(item.node, value(&item.datum));
        }
        self
    }

    /// Combine with another selection from the same join (typically the
    /// appended enter selection), keeping input order within each group.
    ///
    /// Groups are paired by position; surplus groups on either side are kept.
    pub fn merge(&self, other: &BoundSelection) -> BoundSelection {
        let len = self.groups.len().max(other.groups.len());
        let groups = (0..len)
            .filter_map(|i| {
                let mut merged = match (self.groups.get(i), other.groups.get(i)) {
                    (Some(a), Some(b)) => {
                        let mut g = a.clone();
                        g.items.extend_from_slice(&b.items);
                        g
                    }
                    (Some(g), None) | (None, Some(g)) => g.clone(),
                    (None, None) => return None,
                };
                merged.items.sort_by_key(|b| b.index);
                Some(merged)
            })
            .collect();
        BoundSelection { groups }
    }

    /// Move the elements of each group into input order within their parent.
    pub fn order(&self, doc: &mut Document) -> &Self {
        for group in &self.groups {
            let mut items = group.items.clone();
            items.sort_by_key(|b| b.index);
            let order: Vec<NodeId> = items.iter().map(|b| b.node).collect();
            doc.reorder_children(group.parent, &order);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EnterGroup {
    parent: NodeId,
    data: Vec<(usize, Record)>,
}

/// Data awaiting elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnterSelection {
    groups: Vec<EnterGroup>,
}

impl EnterSelection {
    /// Pending data, group by group.
    pub fn data(&self) -> impl Iterator<Item = Record> + '_ {
        self.groups.iter().flat_map(|g| g.data.iter().map(|&(_, d)| d))
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.data.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create one `tag` element per pending datum, bind it, and append it
    /// to the group's parent.
    pub fn append(&self, doc: &mut Document, tag: &str) -> BoundSelection {
        let groups = self
            .groups
            .iter()
            .map(|group| {
                let items = group
                    .data
                    .iter()
                    .map(|&(index, datum)| {
                        let node = doc.create_element(tag);
                        doc.bind(node, datum);
                        if !doc.append_child(group.parent, node) {
                            datajoin_core::warn!(
                                key = datum.key,
                                "enter parent vanished; element left detached"
                            );
                        }
                        Bound { node, index, datum }
                    })
                    .collect();
                BoundGroup {
                    parent: group.parent,
                    items,
                }
            })
            .collect();
        BoundSelection { groups }
    }
}
