//! Domain event abstractions shared by aggregates and their persistence boundary.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
