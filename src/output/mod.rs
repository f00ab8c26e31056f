//! Output formatting for analyzer results.
//!
//! Every analyzer returns one [`TabularResult`]; this module turns it into
//! a plain table, csv, Markdown, an Excel workbook, or JSON, and sends it
//! to stdout or a file.
//!
//! CHANGELOG:
//! - 10/18/2026 - Replaced per-command JSON printing with a tabular formatter

pub mod export;
pub mod locale;
pub mod table;
pub mod text;

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::{IcaError, Result};

pub use locale::{configure_locale, current_locale};
pub use table::{prettify_header, Cell, Index, TabularResult};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Csv,
    Markdown,
    Excel,
    Json,
}

impl OutputFormat {
    /// Parse an explicit `--format` value.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            "excel" | "xlsx" => Ok(Self::Excel),
            "json" => Ok(Self::Json),
            _ => Err(IcaError::FormatNotSupported(name.to_string())),
        }
    }

    /// Guess from a destination's extension; unknown extensions are plain text.
    pub fn from_extension(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("csv") => Self::Csv,
            Some("xlsx") => Self::Excel,
            Some("md") => Self::Markdown,
            Some("json") => Self::Json,
            _ => Self::Plain,
        }
    }

    /// An explicit format wins; otherwise infer from the destination.
    pub fn resolve(explicit: Option<&str>, destination: Option<&Path>) -> Result<Self> {
        match (explicit, destination) {
            (Some(name), _) => Self::from_name(name),
            (None, Some(path)) => Ok(Self::from_extension(path)),
            (None, None) => Ok(Self::Plain),
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Self::Excel)
    }
}

/// Caller-supplied rendering tweaks.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Column name -> header label, applied before `Title Case` conversion.
    pub header_overrides: HashMap<String, String>,
}

/// Render `result` into memory.
pub fn render_to_bytes(
    result: &TabularResult,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let overrides = &options.header_overrides;
    match format {
        OutputFormat::Plain => Ok(text::render_plain(result, overrides).into_bytes()),
        OutputFormat::Markdown => Ok(text::render_markdown(result, overrides).into_bytes()),
        OutputFormat::Csv => export::render_csv(result, overrides),
        OutputFormat::Json => export::render_json(result),
        OutputFormat::Excel => export::render_excel(result, overrides),
    }
}

/// Render `result` to `destination`, or to stdout when there is none.
pub fn render(
    result: &TabularResult,
    format: Option<&str>,
    destination: Option<&Path>,
    options: &RenderOptions,
) -> Result<()> {
    let format = OutputFormat::resolve(format, destination)?;
    let bytes = render_to_bytes(result, format, options)?;
    debug!(?format, rows = result.len(), bytes = bytes.len(), "rendered result");

    match destination {
        Some(path) => std::fs::write(path, &bytes)?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&bytes)?;
            if !format.is_binary() && !bytes.ends_with(b"\n") {
                handle.write_all(b"\n")?;
            }
            handle.flush()?;
        }
    }
    Ok(())
}
