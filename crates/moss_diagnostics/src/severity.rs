//! Severity levels for place-and-route diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How bad a diagnostic is for the current run.
///
/// The engine emits three levels, ordered least to most severe by the
/// derived `PartialOrd`/`Ord`:
///
/// - [`Note`](Severity::Note): context attached to another diagnostic, such
///   as which site-type label a capacity figure refers to
/// - [`Warning`](Severity::Warning): a placement that is legal but
///   suspicious, such as a routing resource claimed by more than one net
///   under a congestion-aware strategy
/// - [`Error`](Severity::Error): a condition that fails the run, such as a
///   design too big for the device or nets left unrouted when the search
///   gives up
///
/// Internal invariant violations never reach a sink at any severity; the
/// engine panics instead of continuing with a mating it cannot trust.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Context for another diagnostic; never affects the run's outcome.
    Note,
    /// A suspicious but legal condition; the run still succeeds.
    Warning,
    /// A failure: `place_and_route` returns false when one of these is emitted.
    Error,
}

impl Severity {
    /// Returns `true` if a diagnostic of this severity fails the run.
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
