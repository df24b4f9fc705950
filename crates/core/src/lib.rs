//! `orderflow-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, EventSourced, ExpectedVersion, rehydrate};
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, IdGenerator, UuidV7Generator};
pub use value_object::ValueObject;
