//! The leveled diagnostic channel.
//!
//! A [`Reporter`] receives diagnostics; the [`Handler`] owns one, counts
//! what passes through it and hands out [`ErrorGuaranteed`] proofs.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::{Diagnostic, ErrorGuaranteed, Level};

/// Sink for diagnostics.
pub trait Reporter {
    fn report(&mut self, diagnostic: &Diagnostic);

    /// Flush any buffered output.
    fn flush(&mut self) {}
}

/// In-memory reporter for tests and embedding hosts.
///
/// Clones share the same buffer, so a host can keep one handle and pass
/// the other to a [`Handler`].
#[derive(Clone, Default)]
pub struct Collector {
    diagnostics: Rc<RefCell<Vec<Diagnostic>>>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Messages of the given level, in report order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == level)
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Level::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Reporter for Collector {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic.clone());
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("len", &self.len())
            .finish()
    }
}

/// Owns the reporter of one build and counts emitted diagnostics.
pub struct Handler {
    reporter: RefCell<Box<dyn Reporter>>,
    error_count: Cell<usize>,
    warning_count: Cell<usize>,
}

impl Handler {
    pub fn new(reporter: impl Reporter + 'static) -> Self {
        Self::from_boxed(Box::new(reporter))
    }

    pub fn from_boxed(reporter: Box<dyn Reporter>) -> Self {
        Handler {
            reporter: RefCell::new(reporter),
            error_count: Cell::new(0),
            warning_count: Cell::new(0),
        }
    }

    /// Emit a diagnostic of any level.
    ///
    /// Returns a guarantee when the diagnostic was an error.
    pub fn emit(&self, diagnostic: &Diagnostic) -> Option<ErrorGuaranteed> {
        match diagnostic.level {
            Level::Error => self.error_count.set(self.error_count.get() + 1),
            Level::Warning => self.warning_count.set(self.warning_count.get() + 1),
            Level::Info => {}
        }
        self.reporter.borrow_mut().report(diagnostic);
        diagnostic.is_error().then(ErrorGuaranteed::new)
    }

    /// Emit a diagnostic as an error.
    pub fn emit_error(&self, mut diagnostic: Diagnostic) -> ErrorGuaranteed {
        diagnostic.level = Level::Error;
        self.emit(&diagnostic);
        ErrorGuaranteed::new()
    }

    pub fn error_count(&self) -> usize {
        self.error_count.get()
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count.get()
    }

    /// Returns `Some(ErrorGuaranteed)` if at least one error was emitted.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count.get())
    }

    pub fn flush(&self) {
        self.reporter.borrow_mut().flush();
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("error_count", &self.error_count.get())
            .field("warning_count", &self.warning_count.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
