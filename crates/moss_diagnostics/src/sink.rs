//! Diagnostic accumulator for a place-and-route run.
//!
//! Place and route is single-threaded and synchronous, so the sink needs no
//! locks: plain interior mutability lets the engine emit through the shared
//! reference it holds while the caller keeps its own handle to inspect the
//! run afterwards.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::cell::{Cell, RefCell};

/// Accumulates the diagnostics of one place-and-route run.
///
/// The engine reports user-caused failures here in addition to stderr, so
/// callers can distinguish failure classes programmatically: a feasibility
/// rejection leaves one error and an untouched mating, a convergence
/// failure leaves a routing error plus whatever the strategy rendered.
/// Diagnostics come back in emission order; the error count is tracked
/// separately so [`has_errors`](Self::has_errors) stays cheap and survives
/// [`take_all`](Self::take_all).
pub struct DiagnosticSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
    error_count: Cell<usize>,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            error_count: Cell::new(0),
        }
    }

    /// Emits a diagnostic into the sink.
    ///
    /// If the diagnostic has [`Severity::Error`], the running error count is
    /// incremented.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.error_count.set(self.error_count.get() + 1);
        }
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Returns `true` if the run has failed, i.e. any error-severity
    /// diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.get() > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.get()
    }

    /// Returns the severity of the worst diagnostic currently held, or
    /// `None` for a sink with nothing in it.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.diagnostics.borrow().iter().map(|d| d.severity).max()
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    ///
    /// The error count is deliberately not reset: it records the run's
    /// outcome, not the sink's current contents.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    /// The diagnostic the engine emits for a design that fails the
    /// pigeonhole feasibility gate.
    fn capacity_error() -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Feasibility, 101),
            "Design is too big for the device \
             (netlist has 3 nodes with label 2, device only has 2)",
        )
    }

    /// The diagnostic the engine emits when the loop exits with unrouted nets.
    fn unroutable_error() -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Routing, 301),
            "Some nets could not be completely routed!",
        )
    }

    /// A congestion-aware strategy's overuse report.
    fn congestion_warning() -> Diagnostic {
        Diagnostic::warning(
            DiagnosticCode::new(Category::Routing, 302),
            "routing resource claimed by 2 nets",
        )
    }

    #[test]
    fn clean_run_leaves_the_sink_empty() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.error_count(), 0);
        assert_eq!(sink.worst_severity(), None);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn feasibility_rejection_fails_the_run() {
        let sink = DiagnosticSink::new();
        sink.emit(capacity_error());
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.worst_severity(), Some(Severity::Error));
        assert!(sink.diagnostics()[0]
            .message
            .contains("netlist has 3 nodes with label 2"));
    }

    #[test]
    fn congestion_warning_does_not_fail_the_run() {
        let sink = DiagnosticSink::new();
        sink.emit(congestion_warning());
        assert!(!sink.has_errors());
        assert_eq!(sink.error_count(), 0);
        assert_eq!(sink.worst_severity(), Some(Severity::Warning));
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn diagnostics_come_back_in_emission_order() {
        // A convergence failure: the strategy's congestion report precedes
        // the engine's final unroute error
        let sink = DiagnosticSink::new();
        sink.emit(congestion_warning());
        sink.emit(unroutable_error());

        let all = sink.diagnostics();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].severity, Severity::Warning);
        assert_eq!(all[1].severity, Severity::Error);
        assert_eq!(format!("{}", all[1].code), "R301");
    }

    #[test]
    fn take_all_drains_but_keeps_the_outcome() {
        let sink = DiagnosticSink::new();
        sink.emit(unroutable_error());
        sink.emit(congestion_warning());

        let all = sink.take_all();
        assert_eq!(all.len(), 2);
        assert!(sink.take_all().is_empty());
        assert_eq!(sink.worst_severity(), None);
        // The run still failed even though the diagnostics moved out
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn repeated_failures_accumulate() {
        let sink = DiagnosticSink::new();
        sink.emit(capacity_error());
        sink.emit(unroutable_error());
        assert_eq!(sink.error_count(), 2);
        assert_eq!(sink.diagnostics().len(), 2);
    }
}
