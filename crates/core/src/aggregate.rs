//! Aggregate root traits for event-sourced domain models.

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// For event-sourced aggregates this is the number of events applied,
    /// persisted and pending alike.
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation for an aggregate stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for idempotent commands, migrations, etc.).
    Any,
    /// Require the stream to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` returns events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Aggregates must not perform IO or side effects.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event.
    ///
    /// Must be total over the event type and bump `version()` by one.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}

/// An aggregate that buffers the events it has produced until they are persisted.
pub trait EventSourced: Aggregate {
    /// Events recorded since the aggregate was loaded (oldest first).
    fn pending_events(&self) -> &[Self::Event];

    /// Drain the pending buffer, typically right after a successful append.
    fn take_pending_events(&mut self) -> Vec<Self::Event>;

    /// Handle a command and record the resulting events.
    ///
    /// Each event is appended to the pending buffer and folded through
    /// `apply`. On error nothing is recorded.
    fn execute(&mut self, command: &Self::Command) -> Result<(), Self::Error> {
        let events = self.handle(command)?;
        for event in events {
            self.record(event);
        }
        Ok(())
    }

    /// Append one event to the pending buffer and apply it.
    fn record(&mut self, event: Self::Event);

    /// Version of the state that has already been persisted.
    fn persisted_version(&self) -> u64 {
        self.version() - self.pending_events().len() as u64
    }

    /// Expectation to hand to an event store when appending the pending events.
    fn expected_version(&self) -> ExpectedVersion {
        ExpectedVersion::Exact(self.persisted_version())
    }
}

/// Rebuild an aggregate by folding historical events (oldest first) into an
/// empty instance.
pub fn rehydrate<A, I>(mut aggregate: A, history: I) -> A
where
    A: Aggregate,
    I: IntoIterator,
    I::Item: core::borrow::Borrow<A::Event>,
{
    for event in history {
        aggregate.apply(core::borrow::Borrow::borrow(&event));
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Counter {
        total: i64,
        version: u64,
        pending: Vec<i64>,
    }

    impl AggregateRoot for Counter {
        type Id = u8;

        fn id(&self) -> &u8 {
            &0
        }

        fn version(&self) -> u64 {
            self.version
        }
    }

    impl Aggregate for Counter {
        type Command = i64;
        type Event = i64;
        type Error = DomainError;

        fn apply(&mut self, event: &i64) {
            self.total += event;
            self.version += 1;
        }

        fn handle(&self, command: &i64) -> DomainResult<Vec<i64>> {
            if *command == 0 {
                return Err(DomainError::invalid_argument("zero"));
            }
            Ok(vec![*command])
        }
    }

    impl EventSourced for Counter {
        fn pending_events(&self) -> &[i64] {
            &self.pending
        }

        fn take_pending_events(&mut self) -> Vec<i64> {
            std::mem::take(&mut self.pending)
        }

        fn record(&mut self, event: i64) {
            self.apply(&event);
            self.pending.push(event);
        }
    }

    fn counter() -> Counter {
        Counter {
            total: 0,
            version: 0,
            pending: Vec::new(),
        }
    }

    #[test]
    fn expected_version_check() {
        assert!(ExpectedVersion::Any.check(7).is_ok());
        assert!(ExpectedVersion::Exact(3).check(3).is_ok());
        assert!(matches!(
            ExpectedVersion::Exact(3).check(4),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn execute_records_and_rejects_atomically() {
        let mut c = rehydrate(counter(), [1i64, 2]);
        assert_eq!(c.version(), 2);

        c.execute(&5).unwrap();
        assert!(c.execute(&0).is_err());

        assert_eq!(c.total, 8);
        assert_eq!(c.pending_events(), &[5]);
        assert_eq!(c.persisted_version(), 2);
        assert_eq!(c.expected_version(), ExpectedVersion::Exact(2));

        assert_eq!(c.take_pending_events(), vec![5]);
        assert_eq!(c.persisted_version(), 3);
    }
}
