//! Machine contract and the reference state machine.
//!
//! Dispatch consumes machines through the single-method [`Machine`] trait:
//! the observed transition-execution entry point. [`StateMachine`] is the
//! reference implementation: it owns named events, the current-state cell,
//! notification hooks, and the transition log.

mod history;

pub use history::{TransitionLog, TransitionRecord};

use crate::core::State;
use crate::event::{Event, EventOptions, FireError};
use crate::sync::Synchronized;
use crate::transition::{Callback, Edge, Transition};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Owner of events and current state, consumed by dispatch.
///
/// Events are privileged callers of this trait: `execute_transition` is the
/// internal protocol between an event and its owning machine, not an API for
/// application code. Fire events through [`Event::call`] or
/// [`StateMachine::fire`] instead.
pub trait Machine: Send + Sync {
    /// The transition type this machine executes.
    type Transition: Transition;

    /// Execute a chosen transition with full observation: re-validate
    /// applicability and guard, fire pre-notification hooks, commit the
    /// state, record the transition, fire post-notification hooks.
    #[doc(hidden)]
    fn execute_transition(
        &self,
        transition: &Self::Transition,
        args: &<Self::Transition as Transition>::Args,
        callback: Option<Callback>,
    ) -> Result<(), FireError>;
}

type Hook<S> = Box<dyn Fn(&S, &S) + Send + Sync>;

/// Reference machine: a current state plus a set of named events.
///
/// `S` is the state type, `A` the argument type passed through event calls
/// to guards and callbacks. The machine is created behind an `Arc` so its
/// events can hold non-owning back-references to it.
///
/// # Example
///
/// ```rust
/// use impel::{EdgeBuilder, EventOptions, StateMachine};
/// use impel::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Power {
///     Off,
///     On,
/// }
///
/// impl State for Power {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let machine = StateMachine::<Power, ()>::new(Power::Off);
///
/// let toggle = machine.add_event(EventOptions::named("toggle"));
/// toggle.add(EdgeBuilder::new().from(Power::Off).to(Power::On).build(&machine)?);
///
/// machine.fire("toggle", &(), None)?;
/// assert_eq!(machine.current_state(), Power::On);
/// # Ok(())
/// # }
/// ```
pub struct StateMachine<S: State + 'static, A: 'static> {
    id: Uuid,
    state: Arc<Synchronized<S>>,
    events: Synchronized<HashMap<String, Arc<Event<StateMachine<S, A>>>>>,
    before: Synchronized<Vec<Hook<S>>>,
    after: Synchronized<Vec<Hook<S>>>,
    log: Synchronized<TransitionLog<S>>,
}

impl<S: State + 'static, A: 'static> StateMachine<S, A> {
    /// Create a machine in the given initial state.
    pub fn new(initial: S) -> Arc<Self> {
        let machine = Arc::new(Self {
            id: Uuid::new_v4(),
            state: Arc::new(Synchronized::new(initial)),
            events: Synchronized::new(HashMap::new()),
            before: Synchronized::new(Vec::new()),
            after: Synchronized::new(Vec::new()),
            log: Synchronized::new(TransitionLog::new()),
        });
        tracing::debug!(machine = %machine.id, "machine created");
        machine
    }

    /// This machine's instance id, carried in tracing output.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A copy of the current state.
    pub fn current_state(&self) -> S {
        self.state.get()
    }

    /// Whether the machine sits in a final state.
    pub fn is_final(&self) -> bool {
        self.state.shared(State::is_final)
    }

    /// Register a new event on this machine, replacing any event of the same
    /// name, and return it for transition setup.
    pub fn add_event(self: &Arc<Self>, options: EventOptions) -> Arc<Event<Self>> {
        let event = Arc::new(Event::new(self, options));
        self.events.exclusive(|events| {
            events.insert(event.name().to_string(), Arc::clone(&event));
        });
        event
    }

    /// Look up an event by name.
    pub fn event(&self, name: &str) -> Option<Arc<Event<Self>>> {
        self.events.shared(|events| events.get(name).cloned())
    }

    /// Fire the named event.
    pub fn fire(&self, name: &str, args: &A, callback: Option<Callback>) -> Result<(), FireError> {
        let event = self.event(name).ok_or_else(|| FireError::UnknownEvent {
            event: name.to_string(),
        })?;
        event.call(args, callback)
    }

    /// Register a hook fired before each observed transition, with the
    /// departing and target states.
    pub fn before_transition(&self, hook: impl Fn(&S, &S) + Send + Sync + 'static) {
        self.before.exclusive(|hooks| hooks.push(Box::new(hook)));
    }

    /// Register a hook fired after each observed transition commits.
    pub fn after_transition(&self, hook: impl Fn(&S, &S) + Send + Sync + 'static) {
        self.after.exclusive(|hooks| hooks.push(Box::new(hook)));
    }

    /// Snapshot of the transition log.
    pub fn log(&self) -> TransitionLog<S> {
        self.log.get()
    }

    /// Shared handle to the current-state cell, for wiring transitions.
    pub(crate) fn state_cell(&self) -> Arc<Synchronized<S>> {
        Arc::clone(&self.state)
    }
}

impl<S: State + 'static, A: 'static> Machine for StateMachine<S, A> {
    type Transition = Edge<S, A>;

    fn execute_transition(
        &self,
        transition: &Edge<S, A>,
        args: &A,
        callback: Option<Callback>,
    ) -> Result<(), FireError> {
        let from = self.state.get();
        let to = transition.target().clone();

        // Re-validate before any hook observes the transition; selection may
        // have fallen back to an inapplicable candidate.
        if !transition.is_current() {
            return Err(FireError::NotApplicable {
                current: from.name().to_string(),
                to: to.name().to_string(),
            });
        }
        if !transition.check_conditions(args) {
            return Err(FireError::GuardRejected {
                to: to.name().to_string(),
            });
        }

        tracing::debug!(
            machine = %self.id,
            from = from.name(),
            to = to.name(),
            "executing transition"
        );

        self.before.shared(|hooks| {
            for hook in hooks {
                hook(&from, &to);
            }
        });

        transition.perform(args, callback)?;

        self.log.exclusive(|log| {
            log.record(TransitionRecord {
                from: from.clone(),
                to: to.clone(),
                timestamp: Utc::now(),
            });
        });

        self.after.shared(|hooks| {
            for hook in hooks {
                hook(&from, &to);
            }
        });

        Ok(())
    }
}
