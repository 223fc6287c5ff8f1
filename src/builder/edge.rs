//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, State};
use crate::machine::StateMachine;
use crate::transition::Edge;
use std::sync::Arc;

/// Builder for transitions with a fluent API.
///
/// Source states accumulate across `from` calls; leaving them empty declares
/// a transition applicable from any state. The target is required.
///
/// # Example
///
/// ```rust
/// use impel::{EdgeBuilder, StateMachine};
/// use impel::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Light {
///     Red,
///     Green,
/// }
///
/// impl State for Light {
///     fn name(&self) -> &str {
///         match self {
///             Self::Red => "Red",
///             Self::Green => "Green",
///         }
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let machine = StateMachine::<Light, u32>::new(Light::Red);
///
/// let edge = EdgeBuilder::new()
///     .from(Light::Red)
///     .to(Light::Green)
///     .when(|delay: &u32| *delay < 100)
///     .build(&machine)?;
/// # Ok(())
/// # }
/// ```
pub struct EdgeBuilder<S: State, A> {
    from: Vec<S>,
    to: Option<S>,
    guard: Option<Arc<Guard<A>>>,
}

impl<S: State + 'static, A: 'static> EdgeBuilder<S, A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            from: Vec::new(),
            to: None,
            guard: None,
        }
    }

    /// Add a source state. Repeated calls accumulate.
    pub fn from(mut self, state: S) -> Self {
        self.from.push(state);
        self
    }

    /// Add several source states at once.
    pub fn from_any_of(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.from.extend(states);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Attach a guard (optional).
    pub fn guard(mut self, guard: Guard<A>) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Attach a guard from a closure (optional).
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Build the transition, wired to `machine`'s current-state cell.
    pub fn build(self, machine: &StateMachine<S, A>) -> Result<Edge<S, A>, BuildError> {
        let to = self.to.ok_or(BuildError::MissingTarget)?;
        Ok(Edge::new(self.from, to, self.guard, machine.state_cell()))
    }
}

impl<S: State + 'static, A: 'static> Default for EdgeBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Transition;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Gear {
        Park,
        Neutral,
        Drive,
    }

    impl State for Gear {
        fn name(&self) -> &str {
            match self {
                Self::Park => "Park",
                Self::Neutral => "Neutral",
                Self::Drive => "Drive",
            }
        }
    }

    #[test]
    fn builder_requires_a_target() {
        let machine = StateMachine::<Gear, ()>::new(Gear::Park);
        let result = EdgeBuilder::new().from(Gear::Park).build(&machine);
        assert!(matches!(result, Err(BuildError::MissingTarget)));
    }

    #[test]
    fn builder_accumulates_source_states() {
        let machine = StateMachine::<Gear, ()>::new(Gear::Park);
        let edge = EdgeBuilder::new()
            .from(Gear::Park)
            .from(Gear::Neutral)
            .to(Gear::Drive)
            .build(&machine)
            .unwrap();

        assert_eq!(edge.sources(), [Gear::Park, Gear::Neutral]);
    }

    #[test]
    fn from_any_of_extends_sources() {
        let machine = StateMachine::<Gear, ()>::new(Gear::Park);
        let edge = EdgeBuilder::new()
            .from_any_of([Gear::Park, Gear::Neutral])
            .to(Gear::Drive)
            .build(&machine)
            .unwrap();

        assert_eq!(edge.sources().len(), 2);
    }

    #[test]
    fn when_attaches_a_guard() {
        let machine = StateMachine::<Gear, u8>::new(Gear::Park);
        let edge = EdgeBuilder::new()
            .from(Gear::Park)
            .to(Gear::Drive)
            .when(|speed: &u8| *speed == 0)
            .build(&machine)
            .unwrap();

        assert!(edge.check_conditions(&0));
        assert!(!edge.check_conditions(&30));
    }

    #[test]
    fn built_edge_tracks_the_machine_state() {
        let machine = StateMachine::<Gear, ()>::new(Gear::Neutral);
        let edge = EdgeBuilder::new()
            .from(Gear::Neutral)
            .to(Gear::Drive)
            .build(&machine)
            .unwrap();

        assert!(edge.is_current());
        edge.perform(&(), None).unwrap();
        assert_eq!(machine.current_state(), Gear::Drive);
        assert!(!edge.is_current());
    }
}
