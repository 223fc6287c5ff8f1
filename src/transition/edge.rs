//! Concrete transition between declared states.

use crate::core::{Guard, State};
use crate::event::FireError;
use crate::sync::Synchronized;
use crate::transition::{Callback, Transition};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A transition from one or more source states to a target state, with an
/// optional guard over the event arguments.
///
/// An edge holds a shared handle to its machine's current-state cell, so
/// applicability can be tested without going back through the machine. An
/// empty source list means the edge applies from any state.
///
/// Edges compare by declared shape only: source and target states, by value.
/// Guards are behavior, not identity, and do not participate in equality or
/// ordering.
pub struct Edge<S: State, A> {
    from: Vec<S>,
    to: S,
    guard: Option<Arc<Guard<A>>>,
    state: Arc<Synchronized<S>>,
}

impl<S: State, A> Edge<S, A> {
    pub(crate) fn new(
        from: Vec<S>,
        to: S,
        guard: Option<Arc<Guard<A>>>,
        state: Arc<Synchronized<S>>,
    ) -> Self {
        Self {
            from,
            to,
            guard,
            state,
        }
    }

    /// Declared source states. Empty means "from any state".
    pub fn sources(&self) -> &[S] {
        &self.from
    }

    /// Declared target state.
    pub fn target(&self) -> &S {
        &self.to
    }

    /// Names of the declared source states, used for ordering and errors.
    fn source_names(&self) -> Vec<&str> {
        self.from.iter().map(State::name).collect()
    }
}

impl<S: State, A: 'static> Transition for Edge<S, A> {
    type Args = A;

    fn is_current(&self) -> bool {
        let current = self.state.get();
        self.from.is_empty() || self.from.contains(&current)
    }

    fn check_conditions(&self, args: &A) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard.check(args))
    }

    fn perform(&self, args: &A, callback: Option<Callback>) -> Result<(), FireError> {
        let current = self.state.get();

        let applicable = self.from.is_empty() || self.from.contains(&current);
        if !applicable {
            return Err(FireError::NotApplicable {
                current: current.name().to_string(),
                to: self.to.name().to_string(),
            });
        }
        if !self.check_conditions(args) {
            return Err(FireError::GuardRejected {
                to: self.to.name().to_string(),
            });
        }

        self.state.set(self.to.clone());
        tracing::trace!(from = current.name(), to = self.to.name(), "state committed");

        if let Some(callback) = callback {
            callback();
        }
        Ok(())
    }
}

impl<S: State, A> Clone for Edge<S, A> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            guard: self.guard.as_ref().map(Arc::clone),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: State, A> PartialEq for Edge<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

// States only expose names for ordering; edges whose shapes carry the same
// names but unequal values are incomparable rather than falsely equal.
impl<S: State, A> PartialOrd for Edge<S, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let lhs = (self.source_names(), self.to.name());
        let rhs = (other.source_names(), other.to.name());
        match lhs.cmp(&rhs) {
            Ordering::Equal => (self == other).then_some(Ordering::Equal),
            unequal => Some(unequal),
        }
    }
}

// Guards are opaque closures; show the declared shape plus whether one is
// present.
impl<S: State, A> fmt::Debug for Edge<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
