#![forbid(unsafe_code)]

//! HTML serialization of a [`Document`].
//!
//! Output is indented two spaces per level, one element per line. Text is
//! written inline after the opening tag. Attribute values and text are
//! escaped; style properties are folded into a `style` attribute after the
//! regular attributes.

use std::fmt::Write;

use crate::document::{Document, NodeId};

/// Serialize the whole document, stylesheet links included.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
    for sheet in doc.stylesheets() {
        let _ = writeln!(
            out,
            "  <link rel=\"stylesheet\" href=\"{}\">",
            escape_attr(sheet.href())
        );
    }
    out.push_str("</head>\n");
    write_element(doc, doc.root(), 0, &mut out);
    out.push_str("</html>\n");
    out
}

/// Serialize one element and its subtree. Empty for stale handles.
pub fn outer_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_element(doc, id, 0, &mut out);
    out
}

fn write_element(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let Some(el) = doc.element(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}<{}", el.tag());
    for (name, value) in el.attrs() {
        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
    }
    let style = el
        .styles()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("; ");
    if !style.is_empty() {
        let _ = write!(out, " style=\"{}\"", escape_attr(&style));
    }
    out.push('>');
    out.push_str(&escape_text(el.text()));

    if el.children().is_empty() {
        let _ = writeln!(out, "</{}>", el.tag());
        return;
    }
    out.push('\n');
    for &child in el.children() {
        write_element(doc, child, depth + 1, out);
    }
    let _ = writeln!(out, "{indent}</{}>", el.tag());
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
