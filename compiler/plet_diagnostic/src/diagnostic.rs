//! Core diagnostic types.

use plet_ir::Span;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Level {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Info => write!(f, "info"),
        }
    }
}

/// A leveled message keyed to a source position.
///
/// `file` is shared with the AST that produced the diagnostic, `span` is
/// absent for messages that are not tied to source text (such as a file
/// that could not be opened).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub file: Option<Rc<Path>>,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Diagnostic {
            level,
            message: message.into(),
            file: None,
            span: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    #[must_use]
    pub fn with_file(mut self, file: Rc<Path>) -> Self {
        self.file = Some(file);
        self
    }

    #[must_use]
    pub fn with_path(self, file: &Path) -> Self {
        self.with_file(Rc::from(file))
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    /// 1-based line of the primary position, if any.
    pub fn line(&self) -> Option<u32> {
        self.span.map(|span| span.start.line)
    }

    /// 1-based column of the primary position, if any.
    pub fn column(&self) -> Option<u32> {
        self.span.map(|span| span.start.column)
    }

    /// `path:line:column` prefix, as far as it is known.
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.span) {
            (Some(file), Some(span)) => Some(format!("{}:{}", file.display(), span.start)),
            (Some(file), None) => Some(file.display().to_string()),
            (None, Some(span)) => Some(span.start.to_string()),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location() {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Owned path helper for hosts that hold a `PathBuf`.
pub fn shared_path(path: impl Into<PathBuf>) -> Rc<Path> {
    Rc::from(path.into().into_boxed_path())
}
