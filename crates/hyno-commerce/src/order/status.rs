//! Order status and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CommerceError;

/// Order status.
///
/// Serialized with its display label ("Out for Delivery") so stored records
/// read the same way the admin views show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Placed, awaiting processing.
    #[default]
    Pending,
    Processing,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    /// Withdrawn by the customer.
    Cancelled,
    /// Refused by the pharmacy (e.g. prescription not accepted).
    Rejected,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Rejected,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Rejected => "Rejected",
        }
    }

    /// Customers may cancel only before the order leaves the pharmacy.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Whether `next` follows `self` in the fulfilment graph:
    /// Pending → Processing → Shipped → Out for Delivery → Delivered,
    /// with Cancelled/Rejected reachable from Pending or Processing.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Processing)
            | (Processing, Shipped)
            | (Shipped, OutForDelivery)
            | (OutForDelivery, Delivered) => true,
            (Pending | Processing, Cancelled | Rejected) => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    /// Case-insensitive parse of a display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CommerceError::Validation(format!("unknown order status {s:?}")))
    }
}

/// How `update_status` treats the fulfilment graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may follow any other. Admin views rely on this to jump
    /// an order straight to Delivered or back to Pending.
    #[default]
    Permissive,
    /// Only edges accepted by [`OrderStatus::can_transition_to`].
    Strict,
}

impl TransitionPolicy {
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => from.can_transition_to(to),
        }
    }
}
