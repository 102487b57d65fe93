#![forbid(unsafe_code)]

//! Data-join demo.
//!
//! Builds a page with a `<main id="d3-graph">` mount point, binds the squares
//! dataset (or a JSON file) to it as bars whose width is `value * 10px`, and
//! prints the result as HTML, as terminal bars, or both.
//!
//! # Running
//!
//! ```sh
//! cargo run -p datajoin-demo
//! DATAJOIN_OUTPUT=terminal DATAJOIN_COLOR=blue cargo run -p datajoin-demo
//! DATAJOIN_DATA=records.json DATAJOIN_LOG=debug cargo run -p datajoin-demo
//! ```
//!
//! See [`config`] for every variable.

mod config;
mod error;

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use datajoin_core::record::RecordSet;
use datajoin_dom::document::Document;
use datajoin_dom::html::to_html;
use datajoin_dom::renderer::{BarEncoding, BarRenderer, Renderer, SyncReport};
use datajoin_dom::selection::Selection;
use datajoin_dom::stylesheet::Stylesheet;
use datajoin_dom::terminal::BarChartPresenter;
use tracing_subscriber::EnvFilter;

use crate::config::DemoConfig;
use crate::error::DemoError;

fn main() -> ExitCode {
    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };
    init_logging(&config);

    let stdout = io::stdout();
    let max_cells = row_width(&config, stdout.is_terminal());
    let config = DemoConfig {
        max_cells: Some(max_cells),
        ..config
    };
    let mut out = stdout.lock();
    match run(&config, &mut out) {
        Ok(report) => {
            tracing::info!(
                entered = report.entered,
                updated = report.updated,
                exited = report.exited,
                "render complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "render failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean.
fn init_logging(config: &DemoConfig) {
    let filter =
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Longest bar the terminal presenter may draw.
fn row_width(config: &DemoConfig, tty: bool) -> u16 {
    if let Some(cells) = config.max_cells {
        return cells;
    }
    if tty && let Ok((cols, _)) = crossterm::terminal::size() {
        return cols.max(1);
    }
    BarChartPresenter::DEFAULT_MAX_CELLS
}

/// The hosting page: optional stylesheet link and the `#d3-graph` mount point.
fn build_page(config: &DemoConfig) -> Result<Document, DemoError> {
    let mut doc = Document::new();
    if let Some(path) = &config.stylesheet {
        doc.attach_stylesheet(Stylesheet::load(path)?);
    }
    let main = doc.create_element("main");
    doc.set_attr(main, "id", "d3-graph");
    doc.append_child(doc.root(), main);
    Ok(doc)
}

fn load_records(config: &DemoConfig) -> Result<RecordSet, DemoError> {
    let Some(path) = &config.data_path else {
        return Ok(RecordSet::default_dataset());
    };
    let json = fs::read_to_string(path).map_err(|error| DemoError::DataRead {
        path: path.clone(),
        error,
    })?;
    let records = RecordSet::from_json_str(&json)?;
    tracing::debug!(path = %path.display(), records = records.len(), "records loaded");
    Ok(records)
}

/// Build the page, synchronize it once, and write the configured outputs.
fn run<W: Write>(config: &DemoConfig, out: &mut W) -> Result<SyncReport, DemoError> {
    let records = load_records(config)?;
    let mut doc = build_page(config)?;

    let renderer = BarRenderer::new(BarEncoding {
        scale: config.scale,
        ..BarEncoding::default()
    })
    .with_mode(config.join_mode);
    let report = renderer.synchronize(&mut doc, &config.mount, records.as_slice());

    if config.output.html() {
        out.write_all(to_html(&doc).as_bytes())?;
    }
    if config.output.terminal() {
        let mount = Selection::select(&doc, &config.mount);
        if let Some(container) = mount.nodes().next() {
            if config.output.html() {
                writeln!(out)?;
            }
            BarChartPresenter::new()
                .cell_px(config.cell_px)
                .max_cells(
                    config
                        .max_cells
                        .unwrap_or(BarChartPresenter::DEFAULT_MAX_CELLS),
                )
                .color(config.color)
                .present(&doc, container, out)?;
        }
    }
    out.flush()?;
    Ok(report)
}
