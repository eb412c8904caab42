//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support and
//! an excerpt of the offending source line.

use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::{Diagnostic, Level, Reporter};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const INFO: &str = "\x1b[1;36m"; // Bold cyan
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Terminal emitter with optional color support.
///
/// Source text for excerpts comes from [`add_source`](Self::add_source) or
/// is read from disk the first time a file is mentioned. Unreadable files
/// are remembered and rendered without an excerpt.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    sources: FxHashMap<Rc<Path>, Option<Rc<str>>>,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            sources: FxHashMap::default(),
        }
    }

    /// Register in-memory source text for `path`.
    pub fn add_source(&mut self, path: Rc<Path>, source: &str) {
        self.sources.insert(path, Some(Rc::from(source)));
    }

    /// Consume the emitter and return its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn source(&mut self, path: &Rc<Path>) -> Option<Rc<str>> {
        self.sources
            .entry(Rc::clone(path))
            .or_insert_with(|| {
                std::fs::read(path)
                    .ok()
                    .map(|bytes| Rc::from(String::from_utf8_lossy(&bytes).as_ref()))
            })
            .clone()
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_level(&mut self, level: Level) {
        let color = match level {
            Level::Error => colors::ERROR,
            Level::Warning => colors::WARNING,
            Level::Info => colors::INFO,
        };
        self.write_colored(&level.to_string(), color);
    }

    /// Write the source line of `diagnostic` with a caret under the span.
    fn write_excerpt(&mut self, diagnostic: &Diagnostic) {
        let (Some(file), Some(span)) = (&diagnostic.file, diagnostic.span) else {
            return;
        };
        let Some(source) = self.source(file) else {
            return;
        };
        let line_no = span.start.line as usize;
        let Some(line) = source.lines().nth(line_no.saturating_sub(1)) else {
            return;
        };

        let gutter = line_no.to_string();
        let blank = " ".repeat(gutter.len());
        self.write_colored(&format!("{gutter} | "), colors::GUTTER);
        let _ = writeln!(self.writer, "{line}");

        // Columns count bytes; align on characters so multi-byte text lines up.
        let column = (span.start.column as usize).saturating_sub(1);
        let mut pad = String::new();
        for (i, ch) in line.char_indices() {
            if i >= column {
                break;
            }
            pad.push(if ch == '\t' { '\t' } else { ' ' });
        }
        let width = if span.end.line == span.start.line && span.end.column > span.start.column {
            let end = (span.end.column as usize - 1).min(line.len());
            line.get(column.min(end)..end).map_or(1, |s| s.chars().count().max(1))
        } else {
            1
        };

        self.write_colored(&format!("{blank} | "), colors::GUTTER);
        let _ = write!(self.writer, "{pad}");
        let carets = "^".repeat(width);
        let color = if diagnostic.is_error() {
            colors::ERROR
        } else {
            colors::WARNING
        };
        self.write_colored(&carets, color);
        let _ = writeln!(self.writer);
    }

    /// Emit a summary of errors and warnings.
    pub fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count > 0 {
            self.write_colored("error", colors::ERROR);
            let _ = writeln!(
                self.writer,
                ": {error_count} error{} and {warning_count} warning{} emitted",
                plural_s(error_count),
                plural_s(warning_count)
            );
        } else if warning_count > 0 {
            self.write_colored("warning", colors::WARNING);
            let _ = writeln!(
                self.writer,
                ": {warning_count} warning{} emitted",
                plural_s(warning_count)
            );
        }
    }
}

impl TerminalEmitter<io::Stderr> {
    /// Create a terminal emitter for stderr.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        Self::with_color_mode(io::stderr(), mode, is_tty)
    }
}

/// Returns "s" for plural counts, "" for singular.
#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

impl<W: Write> Reporter for TerminalEmitter<W> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        // Header: path:line:col: level: message
        if let Some(location) = diagnostic.location() {
            self.write_colored(&format!("{location}: "), colors::BOLD);
        }
        self.write_level(diagnostic.level);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);
        self.write_excerpt(diagnostic);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests;
