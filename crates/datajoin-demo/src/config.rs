//! Environment-driven configuration.
//!
//! | Variable               | Default     | Meaning                                   |
//! |------------------------|-------------|-------------------------------------------|
//! | `DATAJOIN_DATA`        | built-in    | JSON file with `[{"k":..,"v":..}, ...]`   |
//! | `DATAJOIN_MOUNT`       | `#d3-graph` | selector of the container to render into  |
//! | `DATAJOIN_SCALE`       | `10`        | pixels per unit of value                  |
//! | `DATAJOIN_CELL_PX`     | `10`        | pixels per terminal cell                  |
//! | `DATAJOIN_MAX_CELLS`   | see below   | longest terminal bar, in cells            |
//! | `DATAJOIN_JOIN`        | `keyed`     | `keyed` or `indexed`                      |
//! | `DATAJOIN_STYLESHEET`  | unset       | stylesheet file linked from the page      |
//! | `DATAJOIN_OUTPUT`      | `both`      | `html`, `terminal`, or `both`             |
//! | `DATAJOIN_COLOR`       | unset       | terminal bar colour, e.g. `blue`          |
//! | `DATAJOIN_LOG`         | `info`      | tracing filter directives                 |
//! | `DATAJOIN_LOG_JSON`    | off         | `1`/`true` for JSON log lines             |
//!
//! Numbers that fail to parse fall back to their default, and none goes
//! below 1. Names that match nothing (join mode, output, colour, selector)
//! are errors. Without `DATAJOIN_MAX_CELLS` bars are clipped to the terminal
//! width, or to 80 cells when stdout is not a terminal.

use std::path::PathBuf;

use crossterm::style::Color;
use datajoin_core::join::JoinMode;
use datajoin_dom::selector::Selector;

use crate::error::DemoError;

/// Which presenters run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    Html,
    Terminal,
    #[default]
    Both,
}

impl OutputMode {
    pub fn html(self) -> bool {
        matches!(self, Self::Html | Self::Both)
    }

    pub fn terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub data_path: Option<PathBuf>,
    pub mount: Selector,
    pub scale: i64,
    pub cell_px: u16,
    pub max_cells: Option<u16>,
    pub join_mode: JoinMode,
    pub stylesheet: Option<PathBuf>,
    pub output: OutputMode,
    pub color: Option<Color>,
    pub log_filter: String,
    pub log_json: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            mount: Selector::id("d3-graph"),
            scale: 10,
            cell_px: 10,
            max_cells: None,
            join_mode: JoinMode::Keyed,
            stylesheet: None,
            output: OutputMode::Both,
            color: None,
            log_filter: "info".to_string(),
            log_json: false,
        }
    }
}

impl DemoConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DemoError> {
        let var = |name: &str| {
            lookup(name).and_then(|value| {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
        };
        let defaults = Self::default();

        let mount = match var("DATAJOIN_MOUNT") {
            Some(text) => Selector::parse(&text)?,
            None => defaults.mount,
        };

        let scale = var("DATAJOIN_SCALE")
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(defaults.scale)
            .max(1);

        let cell_px = var("DATAJOIN_CELL_PX")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.cell_px)
            .max(1);

        let max_cells = var("DATAJOIN_MAX_CELLS")
            .and_then(|value| value.parse::<u16>().ok())
            .map(|cells| cells.max(1));

        let join_mode = match var("DATAJOIN_JOIN").as_deref() {
            None => defaults.join_mode,
            Some(v) if v.eq_ignore_ascii_case("keyed") => JoinMode::Keyed,
            Some(v) if v.eq_ignore_ascii_case("indexed") => JoinMode::Indexed,
            Some(other) => {
                return Err(DemoError::Config {
                    var: "DATAJOIN_JOIN",
                    value: other.to_string(),
                    reason: "expected `keyed` or `indexed`".to_string(),
                });
            }
        };

        let output = match var("DATAJOIN_OUTPUT").as_deref() {
            None => defaults.output,
            Some(v) if v.eq_ignore_ascii_case("html") => OutputMode::Html,
            Some(v) if v.eq_ignore_ascii_case("terminal") => OutputMode::Terminal,
            Some(v) if v.eq_ignore_ascii_case("both") => OutputMode::Both,
            Some(other) => {
                return Err(DemoError::Config {
                    var: "DATAJOIN_OUTPUT",
                    value: other.to_string(),
                    reason: "expected `html`, `terminal`, or `both`".to_string(),
                });
            }
        };

        let color = match var("DATAJOIN_COLOR") {
            Some(name) => Some(Color::try_from(name.as_str()).map_err(|_| DemoError::Config {
                var: "DATAJOIN_COLOR",
                value: name.clone(),
                reason: "unknown colour name".to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            data_path: var("DATAJOIN_DATA").map(PathBuf::from),
            mount,
            scale,
            cell_px,
            max_cells,
            join_mode,
            stylesheet: var("DATAJOIN_STYLESHEET").map(PathBuf::from),
            output,
            color,
            log_filter: var("DATAJOIN_LOG").unwrap_or(defaults.log_filter),
            log_json: var("DATAJOIN_LOG_JSON")
                .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
        })
    }
}
