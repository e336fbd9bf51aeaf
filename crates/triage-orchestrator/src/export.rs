//! Report export
//!
//! Serializes a session result onto a printable surface. Exporting nothing is
//! a no-op, and a surface that cannot be opened is skipped without an error.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use triage_domain::SessionResult;

/// A printable rendering surface
pub trait ReportSurface {
    /// Write content to the surface
    fn write(&mut self, content: &str) -> io::Result<()>;

    /// Request that the surface be printed
    fn print(&mut self) -> io::Result<()>;
}

/// Opens a new surface per export
pub trait SurfaceFactory {
    /// Surface type produced by this factory
    type Surface: ReportSurface;

    /// Open a surface; `None` when one cannot be created
    fn open(&self) -> Option<Self::Surface>;
}

/// Serialization written to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// HTML document with the pretty JSON in a `<pre>` block
    Html,
    /// Pretty JSON only
    Json,
}

/// Outcome of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    /// No result to export
    Skipped,
    /// Surface unavailable or not writable; nothing surfaced to the user
    Unavailable,
    /// Written and print requested
    Printed,
}

/// Writes session results to surfaces from a factory
pub struct ReportExporter<F> {
    factory: F,
    format: ReportFormat,
}

impl<F: SurfaceFactory> ReportExporter<F> {
    /// Create an exporter writing HTML
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            format: ReportFormat::Html,
        }
    }

    /// Set the serialization format
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Export a result, if there is one
    pub fn export(&self, result: Option<&SessionResult>) -> ExportStatus {
        let Some(result) = result else {
            return ExportStatus::Skipped;
        };

        let Some(mut surface) = self.factory.open() else {
            debug!("Report surface unavailable, export skipped");
            return ExportStatus::Unavailable;
        };

        let content = match self.format {
            ReportFormat::Html => render_html(result),
            ReportFormat::Json => render_json(result),
        };

        match surface.write(&content).and_then(|_| surface.print()) {
            Ok(()) => {
                info!(run = %result.run_id, "Report exported");
                ExportStatus::Printed
            }
            Err(e) => {
                debug!(error = %e, "Report surface failed, export skipped");
                ExportStatus::Unavailable
            }
        }
    }
}

/// Pretty JSON of a session result
pub fn render_json(result: &SessionResult) -> String {
    serde_json::to_string_pretty(&result.to_json()).unwrap_or_else(|_| "{}".to_string())
}

/// Printable HTML document of a session result
pub fn render_html(result: &SessionResult) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Triage Report</title></head>\n<body>\n<pre>{}</pre>\n</body>\n</html>\n",
        escape_html(&render_json(result))
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// File-backed surface
pub struct FileSurface {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReportSurface for FileSurface {
    fn write(&mut self, content: &str) -> io::Result<()> {
        self.writer.write_all(content.as_bytes())
    }

    fn print(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        info!(path = %self.path.display(), "Report ready for printing");
        Ok(())
    }
}

/// Creates (or truncates) one file per export
#[derive(Debug, Clone)]
pub struct FileSurfaceFactory {
    path: PathBuf,
}

impl FileSurfaceFactory {
    /// Factory writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SurfaceFactory for FileSurfaceFactory {
    type Surface = FileSurface;

    fn open(&self) -> Option<FileSurface> {
        File::create(&self.path).ok().map(|file| FileSurface {
            path: self.path.clone(),
            writer: BufWriter::new(file),
        })
    }
}

/// Standard output surface
pub struct StdoutSurface {
    out: io::Stdout,
}

impl ReportSurface for StdoutSurface {
    fn write(&mut self, content: &str) -> io::Result<()> {
        writeln!(self.out, "{}", content)
    }

    fn print(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Factory for [`StdoutSurface`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSurfaceFactory;

impl SurfaceFactory for StdoutSurfaceFactory {
    type Surface = StdoutSurface;

    fn open(&self) -> Option<StdoutSurface> {
        Some(StdoutSurface { out: io::stdout() })
    }
}
