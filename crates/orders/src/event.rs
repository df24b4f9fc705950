//! Order domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_events::Event;

use crate::id::{CustomerId, OrderId, ProductId};

/// Event: OrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
}

/// Event: OrderItemAdded.
///
/// The unit price is flattened into primitives so the event holds no value
/// objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemAdded {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price_minor_units: i64,
    pub currency: String,
    pub quantity: i64,
}

/// Event: OrderItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRemoved {
    pub order_id: OrderId,
    pub product_id: ProductId,
}

/// Event: OrderConfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmed {
    pub order_id: OrderId,
    pub confirmed_at: DateTime<Utc>,
}

/// Every fact an order can record.
///
/// Serialized as `{"event_name": "...", "data": {...}}`; the tag is the
/// variant's `event_name()`, so adding a variant leaves stored logs readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_name", content = "data")]
pub enum OrderEvent {
    OrderCreated(OrderCreated),
    OrderItemAdded(OrderItemAdded),
    OrderItemRemoved(OrderItemRemoved),
    OrderConfirmed(OrderConfirmed),
}

impl OrderEvent {
    /// The order this event belongs to.
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderCreated(e) => e.order_id,
            OrderEvent::OrderItemAdded(e) => e.order_id,
            OrderEvent::OrderItemRemoved(e) => e.order_id,
            OrderEvent::OrderConfirmed(e) => e.order_id,
        }
    }
}

impl Event for OrderEvent {
    fn event_name(&self) -> &'static str {
        match self {
            OrderEvent::OrderCreated(_) => "OrderCreated",
            OrderEvent::OrderItemAdded(_) => "OrderItemAdded",
            OrderEvent::OrderItemRemoved(_) => "OrderItemRemoved",
            OrderEvent::OrderConfirmed(_) => "OrderConfirmed",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_core::UuidV7Generator;

    #[test]
    fn serialized_tag_matches_event_name() {
        let ids = UuidV7Generator;
        let order_id = OrderId::generate(&ids);
        let events = vec![
            OrderEvent::OrderCreated(OrderCreated {
                order_id,
                customer_id: CustomerId::generate(&ids),
                created_at: Utc::now(),
            }),
            OrderEvent::OrderItemAdded(OrderItemAdded {
                order_id,
                product_id: ProductId::generate(&ids),
                name: "Widget".to_string(),
                unit_price_minor_units: 500,
                currency: "BRL".to_string(),
                quantity: 3,
            }),
            OrderEvent::OrderItemRemoved(OrderItemRemoved {
                order_id,
                product_id: ProductId::generate(&ids),
            }),
            OrderEvent::OrderConfirmed(OrderConfirmed {
                order_id,
                confirmed_at: Utc::now(),
            }),
        ];

        for event in &events {
            let json = serde_json::to_value(event).unwrap();
            assert_eq!(json["event_name"], event.event_name());
            assert_eq!(event.order_id(), order_id);

            let back: OrderEvent = serde_json::from_value(json).unwrap();
            assert_eq!(&back, event);
        }
    }

    #[test]
    fn unknown_event_name_is_rejected() {
        let json = serde_json::json!({ "event_name": "OrderShipped", "data": {} });
        assert!(serde_json::from_value::<OrderEvent>(json).is_err());
    }
}
