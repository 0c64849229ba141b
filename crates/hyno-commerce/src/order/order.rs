//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{OrderId, ProductId, TrackingNumber, UserId};
use crate::money::{Currency, Money};
use crate::offer::Offer;
use crate::order::OrderStatus;
use crate::CommerceError;

/// Label of the event every order starts with.
pub const ORDER_PLACED: &str = "Order Placed";

/// A product line frozen into an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    /// Product name at time of order.
    pub name: String,
    pub quantity: u32,
    /// Unit price at time of order.
    pub unit_price: Money,
}

impl LineItem {
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// `unit_price × quantity`, `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }

    pub(crate) fn validate(&self) -> Result<(), CommerceError> {
        if self.quantity == 0 {
            return Err(CommerceError::Validation(format!(
                "quantity for {} must be at least 1",
                self.name
            )));
        }
        if self.unit_price.is_negative() {
            return Err(CommerceError::Validation(format!(
                "price for {} cannot be negative",
                self.name
            )));
        }
        Ok(())
    }
}

/// Delivery details entered at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShippingInfo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

impl ShippingInfo {
    /// Every field is required; reports all blank ones at once.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let fields = [
            ("name", &self.name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
            ("phone", &self.phone),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::Validation(format!(
                "missing shipping fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Simulated payment choice; no payment is actually taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
}

/// One immutable entry in an order's delivery history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShipmentEvent {
    /// Order status this event moved the order into.
    pub status: OrderStatus,
    /// Customer-facing label ("Order Placed", "Shipped", ...).
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

impl ShipmentEvent {
    pub(crate) fn placed(at: DateTime<Utc>) -> Self {
        Self {
            status: OrderStatus::Pending,
            label: ORDER_PLACED.to_string(),
            timestamp: at,
            description: "Your order has been successfully placed".to_string(),
        }
    }

    pub(crate) fn status_changed(
        status: OrderStatus,
        at: DateTime<Utc>,
        description: Option<&str>,
    ) -> Self {
        let description = match description.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("Order status updated to {status}"),
        };
        Self {
            status,
            label: status.display_name().to_string(),
            timestamp: at,
            description,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "OrderRecord")]
pub struct Order {
    /// Time-derived identifier.
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    /// Sum of line totals.
    pub subtotal: Money,
    pub discount: Money,
    /// Snapshot of the offer as it was when the order was placed.
    pub applied_offer: Option<Offer>,
    pub shipping_fee: Money,
    /// `subtotal - discount + shipping_fee`, never negative.
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub tracking_number: TrackingNumber,
    /// Append-only, time-ordered delivery history.
    pub shipment_history: Vec<ShipmentEvent>,
    /// Name of an uploaded prescription, for prescription-only medicines.
    pub prescription: Option<String>,
}

impl Order {
    /// `max(0, subtotal - discount + shipping)`. Discount and shipping must
    /// be in the subtotal's currency.
    pub fn compute_total(
        subtotal: Money,
        discount: Money,
        shipping: Money,
    ) -> Result<Money, CommerceError> {
        for (label, part) in [("discount", discount), ("shipping fee", shipping)] {
            if part.currency != subtotal.currency {
                return Err(CommerceError::Validation(format!(
                    "{label} must be in {}",
                    subtotal.currency
                )));
            }
        }
        let amount = subtotal
            .amount_minor
            .saturating_sub(discount.amount_minor)
            .saturating_add(shipping.amount_minor)
            .max(0);
        Ok(Money::new(amount, subtotal.currency))
    }

    /// Sum of `unit_price × quantity` over `items`.
    pub fn items_subtotal(
        items: &[LineItem],
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        let mut subtotal = Money::zero(currency);
        for item in items {
            let line = item.line_total().ok_or(CommerceError::Overflow)?;
            subtotal = subtotal.checked_add(&line).ok_or(CommerceError::Overflow)?;
        }
        Ok(subtotal)
    }

    /// Get total item count.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn last_event(&self) -> Option<&ShipmentEvent> {
        self.shipment_history.last()
    }

    /// Append an event, keeping history time-ordered and status in sync.
    pub(crate) fn push_event(&mut self, mut event: ShipmentEvent) {
        if let Some(last) = self.shipment_history.last() {
            if event.timestamp < last.timestamp {
                event.timestamp = last.timestamp;
            }
        }
        self.status = event.status;
        self.shipment_history.push(event);
    }
}

/// Stored shape of an [`Order`], tolerant of records written by older
/// storefront builds: amounts may be missing or not numbers, and optional
/// sections may be absent.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRecord {
    id: OrderId,
    user_id: UserId,
    #[serde(default)]
    items: Vec<LineItem>,
    #[serde(default)]
    shipping_info: ShippingInfo,
    #[serde(default)]
    payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "lenient_money")]
    subtotal: Option<Money>,
    #[serde(default, deserialize_with = "lenient_money")]
    discount: Option<Money>,
    #[serde(default)]
    applied_offer: Option<Offer>,
    #[serde(default, deserialize_with = "lenient_money")]
    shipping_fee: Option<Money>,
    #[serde(default, deserialize_with = "lenient_money")]
    total: Option<Money>,
    #[serde(default)]
    status: OrderStatus,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    tracking_number: Option<TrackingNumber>,
    #[serde(default)]
    shipment_history: Vec<ShipmentEvent>,
    #[serde(default)]
    prescription: Option<String>,
}

/// Accept anything in an amount slot; unreadable values become `None`.
fn lenient_money<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        let currency = record
            .items
            .first()
            .map(|item| item.unit_price.currency)
            .unwrap_or_default();
        let subtotal = record.subtotal.unwrap_or_else(|| {
            Order::items_subtotal(&record.items, currency).unwrap_or(Money::zero(currency))
        });
        let discount = record.discount.unwrap_or(Money::zero(currency));
        let shipping_fee = record.shipping_fee.unwrap_or(Money::zero(currency));
        let total = match record.total {
            Some(total) => total,
            None => Order::compute_total(subtotal, discount, shipping_fee).unwrap_or(subtotal),
        };
        let created_at = record.created_at.unwrap_or_else(|| {
            i64::try_from(record.id.get())
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .unwrap_or_default()
        });
        let tracking_number = record
            .tracking_number
            .unwrap_or_else(|| TrackingNumber::for_order(record.id));

        Order {
            id: record.id,
            user_id: record.user_id,
            items: record.items,
            shipping_info: record.shipping_info,
            payment_method: record.payment_method,
            subtotal,
            discount,
            applied_offer: record.applied_offer,
            shipping_fee,
            total,
            status: record.status,
            created_at,
            tracking_number,
            shipment_history: record.shipment_history,
            prescription: record.prescription,
        }
    }
}
