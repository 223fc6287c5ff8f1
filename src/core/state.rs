//! Core State trait for machine states.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A position in a state machine.
///
/// Dispatch treats states as plain comparable values: a transition is
/// applicable when the machine's present state equals one of its declared
/// sources, and equality is the only question ever asked. States also need
/// a printable name (diagnostics, error messages, ordering of transition
/// shapes) and serde support so transition logs can be serialized.
///
/// # Example
///
/// ```rust
/// use impel::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Valve {
///     Closed,
///     Open,
///     Faulted,
/// }
///
/// impl State for Valve {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open => "Open",
///             Self::Faulted => "Faulted",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Faulted)
///     }
/// }
///
/// assert_eq!(Valve::Open.name(), "Open");
/// assert!(Valve::Faulted.is_final());
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// The state's name for display and logging.
    fn name(&self) -> &str;

    /// Whether this is a terminal state. Defaults to `false`.
    fn is_final(&self) -> bool {
        false
    }
}
