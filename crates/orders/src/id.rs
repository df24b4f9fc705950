//! Identifiers referenced by orders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orderflow_core::{AggregateId, impl_uuid_newtype};

/// Order identifier (the aggregate id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

/// Customer identifier (foreign reference, not owned by the order).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

/// Product identifier (foreign reference, not owned by the order).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl_uuid_newtype!(OrderId, "OrderId");
impl_uuid_newtype!(CustomerId, "CustomerId");
impl_uuid_newtype!(ProductId, "ProductId");

impl From<OrderId> for AggregateId {
    fn from(value: OrderId) -> Self {
        AggregateId::from_uuid(value.0)
    }
}
