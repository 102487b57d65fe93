#![forbid(unsafe_code)]

//! Record-to-element synchronization.
//!
//! [`Renderer`] is the seam between data and a retained element tree:
//! implementations make the children of a mount point match a record list.
//! [`BarRenderer`] is the bar-chart encoding: one element per record, its
//! `width` proportional to the value and its text equal to the value.
//!
//! # Usage
//!
//! ```
//! use datajoin_core::record::Record;
//! use datajoin_dom::document::Document;
//! use datajoin_dom::renderer::{BarRenderer, Renderer};
//! use datajoin_dom::selector::Selector;
//!
//! let mut doc = Document::new();
//! let main = doc.create_element("main");
//! doc.set_attr(main, "id", "d3-graph");
//! doc.append_child(doc.root(), main);
//!
//! let report = BarRenderer::default().synchronize(
//!     &mut doc,
//!     &Selector::id("d3-graph"),
//!     &Record::DEFAULT_DATASET,
//! );
//! assert_eq!(report.entered, 5);
//! assert_eq!(doc.style(doc.children(main)[4], "width"), Some("250px"));
//! ```

use datajoin_core::join::JoinMode;
use datajoin_core::record::Record;

use crate::document::Document;
use crate::selection::Selection;
use crate::selector::Selector;

/// What a synchronization pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether the mount point was found.
    pub container_found: bool,
    /// Elements created.
    pub entered: usize,
    /// Elements kept and refreshed.
    pub updated: usize,
    /// Elements removed.
    pub exited: usize,
}

impl SyncReport {
    /// True when the pass neither created nor removed anything.
    pub fn is_stable(&self) -> bool {
        self.entered == 0 && self.exited == 0
    }
}

/// Makes a container's children mirror a record list.
pub trait Renderer {
    /// Reconcile the children of the first element matching `container`
    /// with `records`.
    ///
    /// A missing container is not an error: nothing changes and the report
    /// has `container_found == false`.
    fn synchronize(
        &self,
        doc: &mut Document,
        container: &Selector,
        records: &[Record],
    ) -> SyncReport;
}

/// Visual encoding for bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarEncoding {
    /// Length units per unit of value.
    pub scale: i64,
    /// CSS length unit appended to the width.
    pub unit: String,
    /// Tag of the generated elements.
    pub tag: String,
}

impl Default for BarEncoding {
    fn default() -> Self {
        Self {
            scale: 10,
            unit: "px".to_string(),
            tag: "div".to_string(),
        }
    }
}

impl BarEncoding {
    /// Width for `value`, e.g. `"90px"` for 9 at the default scale.
    ///
    /// Saturates instead of overflowing on extreme values.
    pub fn width(&self, value: i64) -> String {
        format!("{}{}", value.saturating_mul(self.scale), self.unit)
    }

    /// Displayed text for `value`.
    pub fn label(&self, value: i64) -> String {
        value.to_string()
    }
}

/// Renders each record as a bar element.
#[derive(Debug, Clone, Default)]
pub struct BarRenderer {
    encoding: BarEncoding,
    mode: JoinMode,
}

impl BarRenderer {
    pub fn new(encoding: BarEncoding) -> Self {
        Self {
            encoding,
            mode: JoinMode::Keyed,
        }
    }

    /// Pair elements with records by position instead of by key.
    ///
    /// The final tree is the same either way; only the enter/update/exit
    /// split differs, since positional pairing rewrites identifiers in place.
    #[must_use]
    pub fn with_mode(mut self, mode: JoinMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn encoding(&self) -> &BarEncoding {
        &self.encoding
    }

    pub fn mode(&self) -> JoinMode {
        self.mode
    }
}

impl Renderer for BarRenderer {
    fn synchronize(
        &self,
        doc: &mut Document,
        container: &Selector,
        records: &[Record],
    ) -> SyncReport {
        let _span = datajoin_core::debug_span!(
            "synchronize",
            container = %container,
            records = records.len()
        );
        let _guard = _span.enter();

        let mount = Selection::select(doc, container);
        if mount.is_empty() {
            datajoin_core::warn!(
                container = %container,
                "mount point not found; nothing rendered"
            );
            return SyncReport::default();
        }

        let enc = &self.encoding;
        let join = mount
            .select_all(doc, &Selector::tag(&enc.tag))
            .data(doc, records, self.mode);

        let exited = join.exit().remove(doc);
        let entered = join.enter().append(doc, &enc.tag);
        let bars = join.update().merge(&entered);
        bars.attr(doc, "id", |d| d.key.to_string())
            .style(doc, "width", |d| enc.width(d.value))
            .text(doc, |d| enc.label(d.value))
            .order(doc);

        let report = SyncReport {
            container_found: true,
            entered: entered.len(),
            updated: join.update().len(),
            exited,
        };
        datajoin_core::debug!(
            entered = report.entered,
            updated = report.updated,
            exited = report.exited,
            "synchronized"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeId;
    use pretty_assertions::assert_eq;

    fn graph() -> (Document, NodeId) {
        let mut doc = Document::new();
        let main = doc.create_element("main");
        doc.set_attr(main, "id", "d3-graph");
        doc.append_child(doc.root(), main);
        (doc, main)
    }

    fn mount() -> Selector {
        Selector::id("d3-graph")
    }

    fn snapshot(doc: &Document, parent: NodeId) -> Vec<(String, String, String)> {
        doc.children(parent)
            .iter()
            .map(|&id| {
                (
                    doc.attr(id, "id").unwrap_or_default().to_string(),
                    doc.style(id, "width").unwrap_or_default().to_string(),
                    doc.text(id).unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    fn row(id: &str, width: &str, text: &str) -> (String, String, String) {
        (id.to_string(), width.to_string(), text.to_string())
    }

    #[test]
    fn width_uses_scale_and_unit() {
        let enc = BarEncoding::default();
        assert_eq!(enc.width(9), "90px");
        assert_eq!(enc.width(0), "0px");
        assert_eq!(enc.width(-3), "-30px");
        assert_eq!(enc.width(i64::MAX), format!("{}px", i64::MAX));
        let em = BarEncoding {
            scale: 2,
            unit: "em".into(),
            ..BarEncoding::default()
        };
        assert_eq!(em.width(5), "10em");
    }

    #[test]
    fn default_dataset_end_to_end() {
        let (mut doc, main) = graph();
        let report =
            BarRenderer::default().synchronize(&mut doc, &mount(), &Record::DEFAULT_DATASET);
        assert_eq!(
            report,
            SyncReport {
                container_found: true,
                entered: 5,
                updated: 0,
                exited: 0
            }
        );
        assert_eq!(
            snapshot(&doc, main),
            vec![
                row("1", "10px", "1"),
                row("2", "40px", "4"),
                row("3", "90px", "9"),
                row("4", "160px", "16"),
                row("5", "250px", "25"),
            ]
        );
    }

    #[test]
    fn second_pass_is_stable() {
        let (mut doc, main) = graph();
        let renderer = BarRenderer::default();
        renderer.synchronize(&mut doc, &mount(), &Record::DEFAULT_DATASET);
        let before = snapshot(&doc, main);
        let ids_before = doc.children(main).to_vec();

        let report = renderer.synchronize(&mut doc, &mount(), &Record::DEFAULT_DATASET);
        assert!(report.is_stable());
        assert_eq!(report.updated, 5);
        assert_eq!(snapshot(&doc, main), before);
        assert_eq!(doc.children(main), ids_before.as_slice());
    }

    #[test]
    fn incremental_update_swaps_one_record() {
        let (mut doc, main) = graph();
        let renderer = BarRenderer::default();
        renderer.synchronize(&mut doc, &mount(), &[Record::new(1, 1), Record::new(2, 4)]);
        let kept = doc.children(main)[1];

        let report =
            renderer.synchronize(&mut doc, &mount(), &[Record::new(2, 4), Record::new(3, 9)]);
        assert_eq!((report.entered, report.updated, report.exited), (1, 1, 1));
        assert_eq!(doc.children(main)[0], kept);
        assert_eq!(
            snapshot(&doc, main),
            vec![row("2", "40px", "4"), row("3", "90px", "9")]
        );
    }

    #[test]
    fn changed_value_updates_in_place() {
        let (mut doc, main) = graph();
        let renderer = BarRenderer::default();
        renderer.synchronize(&mut doc, &mount(), &[Record::new(7, 1)]);
        let node = doc.children(main)[0];
        renderer.synchronize(&mut doc, &mount(), &[Record::new(7, 12)]);
        assert_eq!(doc.children(main), &[node]);
        assert_eq!(snapshot(&doc, main), vec![row("7", "120px", "12")]);
    }

    #[test]
    fn empty_input_clears_bars() {
        let (mut doc, main) = graph();
        let renderer = BarRenderer::default();
        renderer.synchronize(&mut doc, &mount(), &Record::DEFAULT_DATASET);
        let report = renderer.synchronize(&mut doc, &mount(), &[]);
        assert_eq!(report.exited, 5);
        assert!(doc.children(main).is_empty());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn missing_container_is_a_noop() {
        let mut doc = Document::new();
        let report =
            BarRenderer::default().synchronize(&mut doc, &mount(), &Record::DEFAULT_DATASET);
        assert_eq!(report, SyncReport::default());
        assert!(!report.container_found);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn reorders_to_record_order() {
        let (mut doc, main) = graph();
        let renderer = BarRenderer::default();
        renderer.synchronize(&mut doc, &mount(), &[Record::new(1, 1), Record::new(2, 4)]);
        renderer.synchronize(
            &mut doc,
            &mount(),
            &[Record::new(3, 9), Record::new(2, 4), Record::new(1, 1)],
        );
        let ids: Vec<_> = snapshot(&doc, main).into_iter().map(|r| r.0).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn leaves_non_bar_children_alone() {
        let (mut doc, main) = graph();
        let caption = doc.create_element("p");
        doc.set_text(caption, "squares");
        doc.append_child(main, caption);

        BarRenderer::default().synchronize(&mut doc, &mount(), &Record::DEFAULT_DATASET);
        BarRenderer::default().synchronize(&mut doc, &mount(), &[]);
        assert_eq!(doc.children(main), &[caption]);
        assert_eq!(doc.text(caption), Some("squares"));
    }

    #[test]
    fn adopts_preexisting_elements_by_id() {
        let (mut doc, main) = graph();
        let stale = doc.create_element("div");
        doc.set_attr(stale, "id", "2");
        doc.set_text(stale, "old");
        doc.append_child(main, stale);

        let report =
            BarRenderer::default().synchronize(&mut doc, &mount(), &[Record::new(2, 4)]);
        assert_eq!((report.entered, report.updated), (0, 1));
        assert_eq!(doc.children(main), &[stale]);
        assert_eq!(doc.text(stale), Some("4"));
    }

    #[test]
    fn indexed_mode_reaches_the_same_tree() {
        let (mut keyed_doc, keyed_main) = graph();
        let (mut indexed_doc, indexed_main) = graph();
        let keyed = BarRenderer::default();
        let indexed = BarRenderer::default().with_mode(JoinMode::Indexed);

        let first = [Record::new(1, 1), Record::new(2, 4)];
        let second = [Record::new(2, 4), Record::new(3, 9)];
        keyed.synchronize(&mut keyed_doc, &mount(), &first);
        indexed.synchronize(&mut indexed_doc, &mount(), &first);
        let keyed_report = keyed.synchronize(&mut keyed_doc, &mount(), &second);
        let indexed_report = indexed.synchronize(&mut indexed_doc, &mount(), &second);

        assert_eq!(keyed_report.updated, 1);
        assert_eq!(indexed_report.updated, 2);
        assert!(indexed_report.is_stable());
        assert_eq!(
            snapshot(&keyed_doc, keyed_main),
            snapshot(&indexed_doc, indexed_main)
        );
    }
}
