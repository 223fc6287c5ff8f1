//! Transition log for observed executions.
//!
//! Only the observed (non-silent) execution protocol records here; silent
//! dispatch bypasses the machine and leaves no trace.

use crate::core::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single observed transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// The state the machine left.
    pub from: S,
    /// The state the machine committed.
    pub to: S,
    /// When the transition was executed.
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of observed transitions.
///
/// # Example
///
/// ```rust
/// use impel::machine::{TransitionLog, TransitionRecord};
/// use impel::core::State;
/// use chrono::Utc;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// let mut log = TransitionLog::new();
/// log.record(TransitionRecord {
///     from: Door::Open,
///     to: Door::Closed,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.path(), vec![&Door::Open, &Door::Closed]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionLog<S: State> {
    records: Vec<TransitionRecord<S>>,
}

impl<S: State> Default for TransitionLog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> TransitionLog<S> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record.
    pub fn record(&mut self, record: TransitionRecord<S>) {
        self.records.push(record);
    }

    /// All records, in execution order.
    pub fn records(&self) -> &[TransitionRecord<S>] {
        &self.records
    }

    /// The path of states traversed: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Elapsed time from first to last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Step {
        One,
        Two,
        Three,
    }

    impl State for Step {
        fn name(&self) -> &str {
            match self {
                Self::One => "One",
                Self::Two => "Two",
                Self::Three => "Three",
            }
        }
    }

    fn record(from: Step, to: Step) -> TransitionRecord<Step> {
        TransitionRecord {
            from,
            to,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log: TransitionLog<Step> = TransitionLog::new();
        assert!(log.records().is_empty());
        assert!(log.path().is_empty());
        assert!(log.duration().is_none());
    }

    #[test]
    fn path_follows_recorded_states() {
        let mut log = TransitionLog::new();
        log.record(record(Step::One, Step::Two));
        log.record(record(Step::Two, Step::Three));

        assert_eq!(log.path(), vec![&Step::One, &Step::Two, &Step::Three]);
    }

    #[test]
    fn records_keep_execution_order() {
        let mut log = TransitionLog::new();
        log.record(record(Step::One, Step::Two));
        log.record(record(Step::Two, Step::One));

        let targets: Vec<&Step> = log.records().iter().map(|r| &r.to).collect();
        assert_eq!(targets, vec![&Step::Two, &Step::One]);
    }

    #[test]
    fn log_serializes_correctly() {
        let mut log = TransitionLog::new();
        log.record(record(Step::One, Step::Two));

        let json = serde_json::to_string(&log).unwrap();
        let deserialized: TransitionLog<Step> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.records().len(), 1);
    }
}
