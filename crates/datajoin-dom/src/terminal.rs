#![forbid(unsafe_code)]

//! Terminal presentation of bar elements.
//!
//! Each child of the container becomes one row. The bar spans
//! `width_px / cell_px` cells (at least one for any positive width, at most
//! `max_cells`) with the element text written at its left edge. A label wider
//! than its bar overflows, the way text overflows a fixed-width box.
//!
//! With a colour the bar is painted as a background; without one it is drawn
//! with a fill character so it still reads on plain output.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor};
use unicode_width::UnicodeWidthStr;

use crate::document::{Document, NodeId};

/// Draws the children of a container as horizontal bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChartPresenter {
    cell_px: u16,
    max_cells: u16,
    color: Option<Color>,
    fill: char,
}

impl Default for BarChartPresenter {
    fn default() -> Self {
        Self {
            cell_px: 10,
            max_cells: Self::DEFAULT_MAX_CELLS,
            color: None,
            fill: '#',
        }
    }
}

/// One laid-out bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRow {
    pub label: String,
    pub cells: usize,
}

impl BarChartPresenter {
    /// Row width used when the output is not a terminal.
    pub const DEFAULT_MAX_CELLS: u16 = 80;

    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels represented by one terminal cell. Zero is treated as one.
    #[must_use]
    pub fn cell_px(mut self, px: u16) -> Self {
        self.cell_px = px.max(1);
        self
    }

    /// Longest bar, in cells. Zero is treated as one.
    #[must_use]
    pub fn max_cells(mut self, cells: u16) -> Self {
        self.max_cells = cells.max(1);
        self
    }

    /// Paint bars with a background colour.
    #[must_use]
    pub fn color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Fill character used when no colour is set.
    #[must_use]
    pub fn fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }

    /// Cells spanned by a CSS width such as `"90px"`.
    ///
    /// Unparseable or non-positive widths span zero cells. Wider bars are
    /// clipped to `max_cells`.
    pub fn cells_for(&self, width: &str) -> usize {
        let digits_end = width
            .char_indices()
            .find(|&(i, ch)| !(ch.is_ascii_digit() || (i == 0 && ch == '-')))
            .map_or(width.len(), |(i, _)| i);
        let Ok(px) = width[..digits_end].parse::<i64>() else {
            return 0;
        };
        if px <= 0 {
            return 0;
        }
        let cells = (px / i64::from(self.cell_px)).clamp(1, i64::from(self.max_cells));
        usize::try_from(cells).unwrap_or(1)
    }

    /// Lay out the container's children, in order.
    pub fn layout(&self, doc: &Document, container: NodeId) -> Vec<BarRow> {
        doc.children(container)
            .iter()
            .filter_map(|&id| doc.element(id))
            .map(|el| BarRow {
                label: el.text().to_string(),
                cells: el.style("width").map_or(0, |w| self.cells_for(w)),
            })
            .collect()
    }

    /// Plain-text rendering: label then fill up to the bar length.
    pub fn lines(&self, doc: &Document, container: NodeId) -> Vec<String> {
        self.layout(doc, container)
            .into_iter()
            .map(|row| {
                let pad = row.cells.saturating_sub(row.label.width());
                let mut line = row.label;
                line.extend(std::iter::repeat_n(self.fill, pad));
                line
            })
            .collect()
    }

    /// Write the chart to `out`. Returns the number of rows written.
    pub fn present<W: Write>(
        &self,
        doc: &Document,
        container: NodeId,
        out: &mut W,
    ) -> io::Result<usize> {
        let rows = self.layout(doc, container);
        for row in &rows {
            let pad = row.cells.saturating_sub(row.label.width());
            match self.color {
                Some(color) => queue!(
                    out,
                    SetBackgroundColor(color),
                    Print(&row.label),
                    Print(" ".repeat(pad)),
                    ResetColor,
                    Print("\n")
                )?,
                None => queue!(
                    out,
                    Print(&row.label),
                    Print(self.fill.to_string().repeat(pad)),
                    Print("\n")
                )?,
            }
        }
        out.flush()?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{BarRenderer, Renderer};
    use crate::selector::Selector;
    use datajoin_core::record::Record;
    use pretty_assertions::assert_eq;

    fn rendered() -> (Document, NodeId) {
        let mut doc = Document::new();
        let main = doc.create_element("main");
        doc.set_attr(main, "id", "d3-graph");
        doc.append_child(doc.root(), main);
        BarRenderer::default().synchronize(
            &mut doc,
            &Selector::id("d3-graph"),
            &Record::DEFAULT_DATASET,
        );
        (doc, main)
    }

    #[test]
    fn cells_for_widths() {
        let p = BarChartPresenter::default();
        assert_eq!(p.cells_for("90px"), 9);
        assert_eq!(p.cells_for("5px"), 1);
        assert_eq!(p.cells_for("0px"), 0);
        assert_eq!(p.cells_for("-40px"), 0);
        assert_eq!(p.cells_for("wide"), 0);
        assert_eq!(p.clone().cell_px(0).cells_for("3px"), 3);
        assert_eq!(p.cells_for("5000px"), 80);
        assert_eq!(p.clone().max_cells(0).cells_for("90px"), 1);
    }

    #[test]
    fn huge_values_are_clipped_to_row_width() {
        let mut doc = Document::new();
        let main = doc.create_element("main");
        doc.set_attr(main, "id", "d3-graph");
        doc.append_child(doc.root(), main);
        BarRenderer::default().synchronize(
            &mut doc,
            &Selector::id("d3-graph"),
            &[Record::new(1, i64::MAX / 10)],
        );
        let presenter = BarChartPresenter::default().max_cells(40);

        let rows = presenter.layout(&doc, main);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, 40);

        let label = (i64::MAX / 10).to_string();
        let lines = presenter.lines(&doc, main);
        assert_eq!(lines, vec![format!("{label}{}", "#".repeat(40 - label.len()))]);

        let mut out = Vec::new();
        assert_eq!(presenter.present(&doc, main, &mut out).unwrap(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", lines[0]));

        let mut colored = Vec::new();
        presenter
            .color(Some(Color::Blue))
            .present(&doc, main, &mut colored)
            .unwrap();
        assert!(colored.len() < 100);
    }

    #[test]
    fn plain_lines_for_default_dataset() {
        let (doc, main) = rendered();
        let lines = BarChartPresenter::default().lines(&doc, main);
        assert_eq!(
            lines,
            vec![
                "1".to_string(),
                "4###".to_string(),
                "9########".to_string(),
                format!("16{}", "#".repeat(14)),
                format!("25{}", "#".repeat(23)),
            ]
        );
    }

    #[test]
    fn present_without_color_matches_lines() {
        let (doc, main) = rendered();
        let presenter = BarChartPresenter::default().fill('=');
        let mut out = Vec::new();
        let rows = presenter.present(&doc, main, &mut out).unwrap();
        assert_eq!(rows, 5);
        let expected: String = presenter
            .lines(&doc, main)
            .into_iter()
            .map(|l| l + "\n")
            .collect();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn present_with_color_emits_sgr() {
        let (doc, main) = rendered();
        let mut out = Vec::new();
        BarChartPresenter::default()
            .color(Some(Color::Blue))
            .present(&doc, main, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b["));
        assert_eq!(text.lines().count(), 5);
        assert!(!text.contains('#'));
    }

    #[test]
    fn wide_labels_overflow_their_bar() {
        let mut doc = Document::new();
        let main = doc.create_element("main");
        doc.append_child(doc.root(), main);
        let div = doc.create_element("div");
        doc.set_style(div, "width", "10px");
        doc.set_text(div, "1000");
        doc.append_child(main, div);
        assert_eq!(
            BarChartPresenter::default().lines(&doc, main),
            vec!["1000".to_string()]
        );
    }
}
