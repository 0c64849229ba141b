//! Order ledger: creation, lookup and status history.

use std::sync::Arc;

use hyno_store::{keys, Records, Store};
use serde_json::Value;

use crate::clock::Clock;
use crate::ids::{next_time_id, OrderId, TrackingNumber, UserId};
use crate::money::Money;
use crate::offer::Offer;
use crate::order::{
    LineItem, Order, OrderStatus, PaymentMethod, ShipmentEvent, ShippingInfo, TransitionPolicy,
};
use crate::CommerceError;

/// Input for [`OrderLedger::create_order`].
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    /// Discount already computed by the offer engine.
    pub discount: Money,
    pub applied_offer: Option<Offer>,
    pub shipping_fee: Money,
    pub prescription: Option<String>,
}

/// Owns every order and its shipment history.
///
/// The full collection lives in memory and is written back to the store
/// under [`keys::ORDERS`] after each mutation. A failed write leaves the
/// in-memory collection untouched.
///
/// Stored records that cannot be read are kept aside and written back
/// unchanged after the readable orders, so a mutation never drops them.
pub struct OrderLedger {
    store: Store,
    clock: Arc<dyn Clock>,
    policy: TransitionPolicy,
    orders: Vec<Order>,
    unreadable: Vec<Value>,
}

impl OrderLedger {
    /// Load the ledger from `store`. A missing collection, or one the
    /// backend cannot return, starts the ledger empty.
    pub fn open(store: Store, clock: Arc<dyn Clock>, policy: TransitionPolicy) -> Self {
        let records = Self::load(&store);
        tracing::debug!(
            count = records.items.len(),
            unreadable = records.unreadable.len(),
            ?policy,
            "order ledger opened"
        );
        Self {
            store,
            clock,
            policy,
            orders: records.items,
            unreadable: records.unreadable,
        }
    }

    fn load(store: &Store) -> Records<Order> {
        store.get_records(keys::ORDERS).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to read orders; starting empty");
            Records::default()
        })
    }

    /// Re-read the collection, picking up writes made through other handles.
    pub fn reload(&mut self) {
        let records = Self::load(&self.store);
        self.orders = records.items;
        self.unreadable = records.unreadable;
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// All orders in insertion order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Record a new Pending order with its "Order Placed" event.
    pub fn create_order(&mut self, new: NewOrder) -> Result<&Order, CommerceError> {
        let first = new.items.first().ok_or(CommerceError::EmptyCart)?;
        let currency = first.unit_price.currency;

        for item in &new.items {
            item.validate()?;
            if item.unit_price.currency != currency {
                return Err(CommerceError::Validation(
                    "all items must be priced in the same currency".to_string(),
                ));
            }
        }
        new.shipping_info.validate()?;
        for (label, amount) in [("discount", new.discount), ("shipping fee", new.shipping_fee)] {
            if amount.is_negative() {
                return Err(CommerceError::Validation(format!("{label} cannot be negative")));
            }
            if amount.currency != currency {
                return Err(CommerceError::Validation(format!(
                    "{label} must be in {currency}"
                )));
            }
        }

        let subtotal = Order::items_subtotal(&new.items, currency)?;
        let total = Order::compute_total(subtotal, new.discount, new.shipping_fee)?;

        let now = self.clock.now();
        let latest = self.orders.iter().map(|o| o.id.get()).max();
        let id = OrderId::new(next_time_id(now.timestamp_millis(), latest));

        let order = Order {
            id,
            user_id: new.user_id,
            items: new.items,
            shipping_info: new.shipping_info,
            payment_method: new.payment_method,
            subtotal,
            discount: new.discount,
            applied_offer: new.applied_offer,
            shipping_fee: new.shipping_fee,
            total,
            status: OrderStatus::Pending,
            created_at: now,
            tracking_number: TrackingNumber::for_order(id),
            shipment_history: vec![ShipmentEvent::placed(now)],
            prescription: new.prescription,
        };

        let mut next = self.orders.clone();
        next.push(order);
        self.commit(next)?;

        tracing::info!(
            order_id = %id,
            user_id = %new.user_id,
            total = %total,
            "order created"
        );
        let idx = self.orders.len() - 1;
        Ok(&self.orders[idx])
    }

    pub fn get_order(&self, id: OrderId) -> Result<&Order, CommerceError> {
        self.orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CommerceError::order_not_found(id))
    }

    /// Orders owned by `user_id`, oldest first.
    pub fn orders_for_user(&self, user_id: UserId) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.user_id == user_id).collect()
    }

    /// Exact match on the tracking code, ignoring surrounding whitespace.
    pub fn find_by_tracking_number(&self, code: &str) -> Result<&Order, CommerceError> {
        let code = code.trim();
        self.orders
            .iter()
            .find(|o| o.tracking_number.as_str() == code)
            .ok_or_else(|| CommerceError::OrderNotFound(code.to_string()))
    }

    /// Move an order to `status`, appending a shipment event.
    ///
    /// Without a description the event reads "Order status updated to
    /// <status>". Under [`TransitionPolicy::Permissive`] any status may
    /// follow any other.
    pub fn update_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
        description: Option<&str>,
    ) -> Result<&Order, CommerceError> {
        let idx = self.index_of(id)?;
        let from = self.orders[idx].status;
        if !self.policy.allows(from, status) {
            tracing::warn!(order_id = %id, %from, to = %status, "status transition refused");
            return Err(CommerceError::InvalidTransition { from, to: status });
        }

        let event = ShipmentEvent::status_changed(status, self.clock.now(), description);
        let mut next = self.orders.clone();
        next[idx].push_event(event);
        self.commit(next)?;

        tracing::info!(order_id = %id, %from, to = %status, "order status updated");
        Ok(&self.orders[idx])
    }

    /// Cancel an order that has not yet shipped.
    ///
    /// Only Pending and Processing orders can be cancelled; anything else is
    /// refused and left as it was.
    pub fn cancel_order(&mut self, id: OrderId) -> Result<&Order, CommerceError> {
        let idx = self.index_of(id)?;
        let from = self.orders[idx].status;
        if !from.can_cancel() {
            tracing::warn!(order_id = %id, status = %from, "cancellation refused");
            return Err(CommerceError::CancelNotAllowed(from));
        }

        let event = ShipmentEvent::status_changed(
            OrderStatus::Cancelled,
            self.clock.now(),
            Some("Order cancelled by customer"),
        );
        let mut next = self.orders.clone();
        next[idx].push_event(event);
        self.commit(next)?;

        tracing::info!(order_id = %id, %from, "order cancelled");
        Ok(&self.orders[idx])
    }

    fn index_of(&self, id: OrderId) -> Result<usize, CommerceError> {
        self.orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| CommerceError::order_not_found(id))
    }

    fn commit(&mut self, next: Vec<Order>) -> Result<(), CommerceError> {
        if let Err(e) = self.store.set_records(keys::ORDERS, &next, &self.unreadable) {
            tracing::error!(error = %e, "failed to persist orders");
            return Err(e.into());
        }
        self.orders = next;
        Ok(())
    }
}
