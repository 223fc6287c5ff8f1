//! Named events and the select-and-trigger protocol.
//!
//! An event owns the ordered list of candidate transitions for one event
//! name. Firing the event selects a transition against the machine's present
//! state and either applies it directly (silent events) or hands it to the
//! owning machine for observed execution with hooks and log recording.
//!
//! Selection is first-match-wins over insertion order. When no candidate is
//! applicable, selection deliberately falls back to the first transition so
//! that a deterministic choice always exists; the resulting applicability
//! failure is reported at execution time, not at selection time. Events
//! built with the `strict` option disable the fallback and report the
//! selection failure instead.

mod error;

pub use error::FireError;

use crate::machine::Machine;
use crate::sync::Synchronized;
use crate::transition::{Callback, Transition};
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, Weak};

/// Sentinel name used when an event is created without one.
pub const DEFAULT_EVENT_NAME: &str = "default";

type ArgsOf<M> = <<M as Machine>::Transition as Transition>::Args;

/// Construction options for an event.
///
/// # Example
///
/// ```rust
/// use impel::EventOptions;
///
/// let options = EventOptions::named("go").silent(true);
/// assert_eq!(options.name.as_deref(), Some("go"));
/// assert!(options.silent);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventOptions {
    /// Event name; defaults to [`DEFAULT_EVENT_NAME`] when absent.
    pub name: Option<String>,
    /// Silent events bypass the machine's observed execution protocol.
    pub silent: bool,
    /// Strict events report a selection failure instead of falling back to
    /// the first transition when nothing is applicable.
    pub strict: bool,
}

impl EventOptions {
    /// Options with the given name and all flags at their defaults.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the silent flag.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Set the strict-selection flag.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// A named trigger bound to an ordered set of candidate transitions.
///
/// `name` and the flags are fixed at construction; the transition list is
/// append-only and guarded by a reentrant shared/exclusive lock. The
/// back-reference to the owning machine is non-owning: machines own their
/// events, not the other way around.
///
/// Two events are equal iff `(name, silent, transitions)` are all equal, and
/// order lexicographically over the same triple.
pub struct Event<M: Machine> {
    name: String,
    silent: bool,
    strict: bool,
    machine: Weak<M>,
    transitions: Synchronized<Vec<M::Transition>>,
}

impl<M: Machine> Event<M> {
    /// Create an event owned by `machine`.
    ///
    /// The machine reference is downgraded; dropping the machine leaves the
    /// event unable to dispatch non-silently.
    pub fn new(machine: &Arc<M>, options: EventOptions) -> Self {
        Self {
            name: options
                .name
                .unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
            silent: options.silent,
            strict: options.strict,
            machine: Arc::downgrade(machine),
            transitions: Synchronized::new(Vec::new()),
        }
    }

    /// The event's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether firing bypasses the machine's observed execution protocol.
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Whether selection refuses to fall back to the first transition.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Append one transition, serialized against all other access.
    pub fn add(&self, transition: M::Transition) {
        self.transitions.exclusive(|list| list.push(transition));
    }

    /// Append several transitions in iteration order, as one exclusive
    /// section.
    pub fn extend(&self, transitions: impl IntoIterator<Item = M::Transition>) {
        self.transitions.exclusive(|list| list.extend(transitions));
    }

    /// Snapshot of the transition list, in insertion order.
    pub fn transitions(&self) -> Vec<M::Transition> {
        self.transitions.shared(Vec::clone)
    }

    /// Select the transition to execute for the machine's present state.
    ///
    /// Returns the first applicable transition in insertion order. When none
    /// is applicable, falls back to the first transition regardless: a
    /// deterministic choice always exists, and the invalid-transition error
    /// surfaces at execution time instead. Strict events skip the fallback.
    ///
    /// `None` only when the list is empty (or, strictly, when nothing
    /// applies).
    pub fn next_transition(&self) -> Option<M::Transition> {
        self.transitions.shared(|list| {
            list.iter()
                .find(|transition| transition.is_current())
                .or_else(|| if self.strict { None } else { list.first() })
                .cloned()
        })
    }

    /// Find the earliest transition that is applicable *and* whose guard
    /// accepts `args`.
    ///
    /// Unlike [`next_transition`](Self::next_transition) there is no
    /// fallback; `None` is a legitimate, non-fatal outcome.
    pub fn find_transition(&self, args: &ArgsOf<M>) -> Option<M::Transition> {
        self.transitions.shared(|list| {
            list.iter()
                .find(|transition| transition.is_current() && transition.check_conditions(args))
                .cloned()
        })
    }

    /// Fire the event.
    ///
    /// Holds the exclusive level for the whole operation, so concurrent
    /// `add` calls and other dispatches serialize against it; the nested
    /// selection read re-enters the same lock from this thread.
    ///
    /// Silent events apply the selected transition directly; the owning
    /// machine is never informed, so no hooks fire and nothing is logged.
    /// Non-silent events delegate to the machine's execution protocol, which
    /// re-validates guards, commits the state, and fires hooks. Failures
    /// from either path propagate unchanged.
    pub fn call(&self, args: &ArgsOf<M>, callback: Option<Callback>) -> Result<(), FireError> {
        self.transitions.entered(|| {
            let Some(transition) = self.next_transition() else {
                if self.transitions.shared(Vec::is_empty) {
                    return Err(FireError::NoTransitions {
                        event: self.name.clone(),
                    });
                }
                return Err(FireError::NoApplicableTransition {
                    event: self.name.clone(),
                });
            };

            tracing::debug!(event = %self.name, silent = self.silent, "dispatching event");

            if self.silent {
                transition.perform(args, callback)
            } else {
                let machine = self.machine.upgrade().ok_or_else(|| FireError::MachineGone {
                    event: self.name.clone(),
                })?;
                machine.execute_transition(&transition, args, callback)
            }
        })
    }
}

impl<M: Machine> PartialEq for Event<M> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.silent == other.silent
            && self.transitions() == other.transitions()
    }
}

impl<M: Machine> PartialOrd for Event<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.name.cmp(&other.name) {
            Ordering::Equal => {}
            unequal => return Some(unequal),
        }
        match self.silent.cmp(&other.silent) {
            Ordering::Equal => {}
            unequal => return Some(unequal),
        }
        self.transitions().partial_cmp(&other.transitions())
    }
}

impl<M: Machine> fmt::Display for Event<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<M: Machine> fmt::Debug for Event<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("silent", &self.silent)
            .field("transitions", &self.transitions())
            .finish()
    }
}
