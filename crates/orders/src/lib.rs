//! Customer order domain module (event-sourced).
//!
//! Business rules for a single `Order` aggregate, implemented purely as
//! deterministic domain logic (no IO, no storage, no transport). Commands
//! validate against current state and record `OrderEvent`s; events are the only
//! way state changes and the only thing that needs to be persisted.

pub mod event;
pub mod id;
pub mod money;
pub mod order;

pub use event::{OrderConfirmed, OrderCreated, OrderEvent, OrderItemAdded, OrderItemRemoved};
pub use id::{CustomerId, OrderId, ProductId};
pub use money::Money;
pub use order::{
    AGGREGATE_TYPE, AddItem, ConfirmOrder, CreateOrder, LineItem, Order, OrderCommand,
    OrderStatus, RemoveItem,
};
