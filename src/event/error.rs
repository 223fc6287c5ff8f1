//! Dispatch error types.

use thiserror::Error;

/// Errors that can occur while firing an event.
///
/// A `find_transition` miss is not an error; it returns `None`. These
/// variants cover misconfiguration (`NoTransitions`, `UnknownEvent`),
/// strict-mode selection failure, and rejections raised by the transition
/// or machine during execution.
#[derive(Debug, Error)]
pub enum FireError {
    /// The event has an empty transition list; there is nothing to select.
    #[error("event '{event}' has no transitions")]
    NoTransitions { event: String },

    /// Strict selection found no transition applicable from the current
    /// state. Only reachable when the event was built with `strict`.
    #[error("event '{event}' has no transition applicable from the current state")]
    NoApplicableTransition { event: String },

    /// The selected transition does not apply from the machine's present
    /// state. Reachable through the fall-back-to-first selection policy.
    #[error("transition to '{to}' is not applicable from state '{current}'")]
    NotApplicable { current: String, to: String },

    /// The transition's guard refused the call arguments.
    #[error("guard rejected arguments for the transition to '{to}'")]
    GuardRejected { to: String },

    /// No event with this name is registered on the machine.
    #[error("unknown event '{event}'")]
    UnknownEvent { event: String },

    /// The machine owning this event has been dropped; the non-silent path
    /// has nothing to delegate to.
    #[error("the machine owning event '{event}' is gone")]
    MachineGone { event: String },
}
