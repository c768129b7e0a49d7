//! Rendering for command results: table, JSON, YAML, plain.
//!
//! Every command funnels its result through [`render_view`], which picks
//! the representation selected by `--output`. Structured formats come
//! straight from serde; `table` and `plain` are built by per-command
//! closures since each view decides its own headline lines and
//! scripting token.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Whether ANSI color should decorate table output.
pub fn color_enabled(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
    }
}

/// Render one command result in the chosen format.
///
/// `table` returns the full human-readable view; `plain` returns the one
/// token a shell script would want to capture.
pub fn render_view<T: Serialize>(
    format: &OutputFormat,
    value: &T,
    table: impl FnOnce(&T) -> String,
    plain: impl FnOnce(&T) -> String,
) -> String {
    match format {
        OutputFormat::Table => table(value),
        OutputFormat::Plain => plain(value),
        OutputFormat::Json => to_json(value, true),
        OutputFormat::JsonCompact => to_json(value, false),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).expect("yaml rendering cannot fail for view types")
        }
    }
}

/// Write a rendered view to stdout unless quiet mode suppresses it.
pub fn emit(rendered: &str, quiet: bool) {
    if quiet || rendered.is_empty() {
        return;
    }
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{rendered}");
}

/// Rounded table for the row section of a detail view.
pub(crate) fn rows_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.expect("json rendering cannot fail for view types")
}
