/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - designed to be **append-only**
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable, unique event name (e.g. "OrderCreated").
    ///
    /// Used as the serialization tag and as the dispatch key when reading a log,
    /// so it must never change for an existing event kind.
    fn event_name(&self) -> &'static str;

    /// Schema version for this event kind.
    fn version(&self) -> u32;
}
