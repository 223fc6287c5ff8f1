//! Build errors for transition construction.

use thiserror::Error;

/// Errors that can occur when building a transition.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition target state not specified. Call .to(state) before .build()")]
    MissingTarget,
}
