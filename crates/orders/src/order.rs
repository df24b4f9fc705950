use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use orderflow_core::{
    Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, EventSourced, IdGenerator,
};
use orderflow_events::{Event, EventEnvelope};

use crate::event::{OrderConfirmed, OrderCreated, OrderEvent, OrderItemAdded, OrderItemRemoved};
use crate::id::{CustomerId, OrderId, ProductId};
use crate::money::Money;

/// Stream type written on every envelope produced by an order.
pub const AGGREGATE_TYPE: &str = "ordering.order";

/// Order status lifecycle. `Confirmed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Draft,
    Confirmed,
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OrderStatus::Draft => f.write_str("DRAFT"),
            OrderStatus::Confirmed => f.write_str("CONFIRMED"),
        }
    }
}

/// Order line: product, name, quantity, unit price. Owned by its order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl LineItem {
    /// `unit_price × quantity`.
    pub fn subtotal(&self) -> DomainResult<Money> {
        self.unit_price.times(self.quantity)
    }
}

/// Aggregate root: Order.
///
/// All state changes go through [`Aggregate::apply`]; command methods only
/// validate and record events. Events recorded since load are kept in a pending
/// buffer until the caller persists and drains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<LineItem>,
    status: OrderStatus,
    created_at: Option<DateTime<Utc>>,
    confirmed_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
    pending: Vec<OrderEvent>,
}

impl Order {
    /// Working currency of an order that has no line items yet.
    pub const DEFAULT_CURRENCY: &'static str = "BRL";

    /// The zero-value state every order is folded from.
    pub fn empty() -> Self {
        Self {
            id: OrderId::from_uuid(Uuid::nil()),
            customer_id: CustomerId::from_uuid(Uuid::nil()),
            items: Vec::new(),
            status: OrderStatus::Draft,
            created_at: None,
            confirmed_at: None,
            version: 0,
            created: false,
            pending: Vec::new(),
        }
    }

    /// Create a new draft order. Records `OrderCreated`.
    pub fn create(
        order_id: OrderId,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut order = Self::empty();
        order.run(OrderCommand::CreateOrder(CreateOrder {
            order_id,
            customer_id,
            occurred_at,
        }))?;
        Ok(order)
    }

    /// Create a new draft order with an id drawn from `ids`.
    pub fn open(
        ids: &impl IdGenerator,
        customer_id: CustomerId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::create(OrderId::generate(ids), customer_id, occurred_at)
    }

    /// Rebuild an order from its persisted events (oldest first).
    ///
    /// Each event is checked against the state folded so far, so a stream that
    /// could not have been produced by the commands (a second `OrderCreated`,
    /// changes after confirmation, an invalid price or quantity) is rejected.
    /// The result has an empty pending buffer and `version() == history.len()`.
    pub fn from_history(history: impl IntoIterator<Item = OrderEvent>) -> DomainResult<Self> {
        let history: Vec<OrderEvent> = history.into_iter().collect();

        let order_id = match history.first() {
            None => return Err(DomainError::not_found("order has no events")),
            Some(OrderEvent::OrderCreated(e)) => e.order_id,
            Some(other) => {
                return Err(DomainError::invalid_state(format!(
                    "order history must start with OrderCreated, found {}",
                    other.event_name()
                )));
            }
        };

        if let Some(idx) = history.iter().position(|e| e.order_id() != order_id) {
            return Err(DomainError::invalid_argument(format!(
                "order history contains an event for another order at index {idx}"
            )));
        }

        let mut order = Self::empty();
        for (idx, event) in history.iter().enumerate() {
            order.check_replayable(idx, event)?;
            order.apply(event);
        }
        debug!(order_id = %order.id, version = order.version, "order rehydrated");
        Ok(order)
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, OrderStatus::Draft)
    }

    /// Append a line item. Records `OrderItemAdded`.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> DomainResult<()> {
        self.run(OrderCommand::AddItem(AddItem {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
        }))
    }

    /// Remove the first line item for `product_id`. Records `OrderItemRemoved`.
    pub fn remove_item(&mut self, product_id: ProductId) -> DomainResult<()> {
        self.run(OrderCommand::RemoveItem(RemoveItem { product_id }))
    }

    /// Move the order to `Confirmed`. Records `OrderConfirmed`.
    pub fn confirm(&mut self, occurred_at: DateTime<Utc>) -> DomainResult<()> {
        self.run(OrderCommand::ConfirmOrder(ConfirmOrder { occurred_at }))
    }

    /// Sum of `unit_price × quantity` over all lines.
    ///
    /// The working currency is that of the first line; an empty order totals
    /// zero in [`Order::DEFAULT_CURRENCY`].
    pub fn total_price(&self) -> DomainResult<Money> {
        let currency = self
            .items
            .first()
            .map(|item| item.unit_price.currency())
            .unwrap_or(Self::DEFAULT_CURRENCY);

        let mut total = Money::zero(currency)?;
        for item in &self.items {
            total = total.add(&item.subtotal()?)?;
        }
        Ok(total)
    }

    /// Drop the pending buffer once its events are durably stored.
    pub fn clear_pending_events(&mut self) {
        self.pending.clear();
    }

    /// Drain the pending buffer as envelopes numbered after the persisted version.
    pub fn take_pending_envelopes(
        &mut self,
        ids: &impl IdGenerator,
    ) -> Vec<EventEnvelope<OrderEvent>> {
        let aggregate_id = AggregateId::from(self.id);
        let first_sequence = self.persisted_version() + 1;

        self.take_pending_events()
            .into_iter()
            .zip(first_sequence..)
            .map(|(event, sequence_number)| {
                EventEnvelope::new(
                    ids.next_uuid(),
                    aggregate_id,
                    AGGREGATE_TYPE,
                    sequence_number,
                    event,
                )
            })
            .collect()
    }

    fn run(&mut self, command: OrderCommand) -> DomainResult<()> {
        self.execute(&command).inspect_err(|err| {
            debug!(order_id = %self.id, command = command.name(), error = %err, "command rejected");
        })
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
}

/// Command: ConfirmOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmOrder {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    CreateOrder(CreateOrder),
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    ConfirmOrder(ConfirmOrder),
}

impl OrderCommand {
    pub fn name(&self) -> &'static str {
        match self {
            OrderCommand::CreateOrder(_) => "CreateOrder",
            OrderCommand::AddItem(_) => "AddItem",
            OrderCommand::RemoveItem(_) => "RemoveItem",
            OrderCommand::ConfirmOrder(_) => "ConfirmOrder",
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderCreated(e) => {
                self.id = e.order_id;
                self.customer_id = e.customer_id;
                self.status = OrderStatus::Draft;
                self.created_at = Some(e.created_at);
                self.items.clear();
                self.created = true;
            }
            OrderEvent::OrderItemAdded(e) => {
                self.items.push(LineItem {
                    product_id: e.product_id,
                    name: e.name.clone(),
                    quantity: e.quantity,
                    unit_price: Money::from_recorded(e.unit_price_minor_units, &e.currency),
                });
            }
            OrderEvent::OrderItemRemoved(e) => {
                if let Some(idx) = self.items.iter().position(|i| i.product_id == e.product_id) {
                    self.items.remove(idx);
                }
            }
            OrderEvent::OrderConfirmed(e) => {
                self.status = OrderStatus::Confirmed;
                self.confirmed_at = Some(e.confirmed_at);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::CreateOrder(cmd) => self.handle_create(cmd),
            OrderCommand::AddItem(cmd) => self.handle_add_item(cmd),
            OrderCommand::RemoveItem(cmd) => self.handle_remove_item(cmd),
            OrderCommand::ConfirmOrder(cmd) => self.handle_confirm(cmd),
        }
    }
}

impl EventSourced for Order {
    fn pending_events(&self) -> &[OrderEvent] {
        &self.pending
    }

    fn take_pending_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.pending)
    }

    fn record(&mut self, event: OrderEvent) {
        self.pending.push(event.clone());
        self.apply(&event);
        debug!(
            order_id = %self.id,
            event = event.event_name(),
            version = self.version,
            "event recorded"
        );
    }
}

impl Order {
    fn check_replayable(&self, idx: usize, event: &OrderEvent) -> DomainResult<()> {
        let out_of_order =
            |what: &str| DomainError::invalid_state(format!("{what} at index {idx}"));

        match event {
            OrderEvent::OrderCreated(_) if self.created => {
                Err(out_of_order("order created twice"))
            }
            OrderEvent::OrderCreated(_) => Ok(()),
            _ if self.status == OrderStatus::Confirmed => Err(out_of_order(&format!(
                "{} after OrderConfirmed",
                event.event_name()
            ))),
            OrderEvent::OrderItemAdded(e) => {
                Money::new(e.unit_price_minor_units, e.currency.as_str()).map_err(|err| {
                    DomainError::invalid_argument(format!(
                        "invalid unit price at index {idx}: {err}"
                    ))
                })?;
                if e.quantity <= 0 {
                    return Err(DomainError::invalid_argument(format!(
                        "quantity must be greater than zero at index {idx}"
                    )));
                }
                Ok(())
            }
            OrderEvent::OrderItemRemoved(_) | OrderEvent::OrderConfirmed(_) => Ok(()),
        }
    }

    fn ensure_created(&self) -> DomainResult<()> {
        if !self.created {
            return Err(DomainError::not_found("order has not been created"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateOrder) -> DomainResult<Vec<OrderEvent>> {
        if self.created {
            return Err(DomainError::invalid_state("order already exists"));
        }
        if cmd.order_id.is_nil() {
            return Err(DomainError::invalid_argument("order id is required"));
        }
        if cmd.customer_id.is_nil() {
            return Err(DomainError::invalid_argument("customer id is required"));
        }

        Ok(vec![OrderEvent::OrderCreated(OrderCreated {
            order_id: cmd.order_id,
            customer_id: cmd.customer_id,
            created_at: cmd.occurred_at,
        })])
    }

    fn handle_add_item(&self, cmd: &AddItem) -> DomainResult<Vec<OrderEvent>> {
        self.ensure_created()?;

        if !self.is_modifiable() {
            return Err(DomainError::invalid_state(
                "cannot add items to a confirmed order",
            ));
        }
        if cmd.quantity <= 0 {
            return Err(DomainError::invalid_argument(
                "quantity must be greater than zero",
            ));
        }
        if cmd.product_id.is_nil() {
            return Err(DomainError::invalid_argument("product id is required"));
        }

        Ok(vec![OrderEvent::OrderItemAdded(OrderItemAdded {
            order_id: self.id,
            product_id: cmd.product_id,
            name: cmd.name.clone(),
            unit_price_minor_units: cmd.unit_price.amount_minor_units(),
            currency: cmd.unit_price.currency().to_string(),
            quantity: cmd.quantity,
        })])
    }

    fn handle_remove_item(&self, cmd: &RemoveItem) -> DomainResult<Vec<OrderEvent>> {
        self.ensure_created()?;

        if !self.is_modifiable() {
            return Err(DomainError::invalid_state(
                "cannot remove items from a confirmed order",
            ));
        }
        if !self.items.iter().any(|i| i.product_id == cmd.product_id) {
            return Err(DomainError::not_found(format!(
                "no line item for product {}",
                cmd.product_id
            )));
        }

        Ok(vec![OrderEvent::OrderItemRemoved(OrderItemRemoved {
            order_id: self.id,
            product_id: cmd.product_id,
        })])
    }

    fn handle_confirm(&self, cmd: &ConfirmOrder) -> DomainResult<Vec<OrderEvent>> {
        self.ensure_created()?;

        if self.status != OrderStatus::Draft {
            return Err(DomainError::invalid_state("order is already confirmed"));
        }
        if self.items.is_empty() {
            return Err(DomainError::invalid_argument("cannot confirm an empty order"));
        }

        Ok(vec![OrderEvent::OrderConfirmed(OrderConfirmed {
            order_id: self.id,
            confirmed_at: cmd.occurred_at,
        })])
    }
}
