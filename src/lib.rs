//! Impel: a thread-safe event dispatch core for finite state machines
//!
//! Impel implements the select-and-trigger half of a state machine runtime:
//! a named [`Event`] owns an ordered list of candidate transitions, selects
//! the one applicable to the machine's present state, and either applies it
//! silently or hands it to the owning machine for observed execution with
//! hooks and a transition log.
//!
//! # Core Concepts
//!
//! - **Events**: named triggers with first-match-wins selection over an
//!   append-only transition list
//! - **Transitions**: units of state change with an applicability predicate
//!   and an optional guard over the call arguments
//! - **Machines**: owners of events and the current state, running the
//!   observed execution protocol
//! - **Synchronization**: one reentrant lock per field with shared and
//!   exclusive sections, so a dispatch can read while it serializes
//!
//! # Example
//!
//! ```rust
//! use impel::{EdgeBuilder, EventOptions, StateMachine};
//! use impel::core::State;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! enum Job {
//!     Queued,
//!     Running,
//!     Done,
//! }
//!
//! impl State for Job {
//!     fn name(&self) -> &str {
//!         match self {
//!             Self::Queued => "Queued",
//!             Self::Running => "Running",
//!             Self::Done => "Done",
//!         }
//!     }
//!
//!     fn is_final(&self) -> bool {
//!         matches!(self, Self::Done)
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let machine = StateMachine::<Job, u32>::new(Job::Queued);
//!
//! let start = machine.add_event(EventOptions::named("start"));
//! start.add(
//!     EdgeBuilder::new()
//!         .from(Job::Queued)
//!         .to(Job::Running)
//!         .when(|priority: &u32| *priority > 0)
//!         .build(&machine)?,
//! );
//!
//! let finish = machine.add_event(EventOptions::named("finish"));
//! finish.add(EdgeBuilder::new().from(Job::Running).to(Job::Done).build(&machine)?);
//!
//! machine.fire("start", &5, None)?;
//! machine.fire("finish", &0, None)?;
//!
//! assert!(machine.is_final());
//! assert_eq!(machine.log().records().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod event;
pub mod machine;
pub mod sync;
pub mod transition;

// Re-export commonly used types
pub use builder::{BuildError, EdgeBuilder};
pub use core::{Guard, State};
pub use event::{Event, EventOptions, FireError, DEFAULT_EVENT_NAME};
pub use machine::{Machine, StateMachine, TransitionLog, TransitionRecord};
pub use transition::{Callback, Edge, Transition};
