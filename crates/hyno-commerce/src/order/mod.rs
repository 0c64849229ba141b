//! Order module.
//!
//! Contains order types, the status machine and the ledger that owns them.

mod ledger;
mod order;
mod status;

pub use ledger::{NewOrder, OrderLedger};
pub use order::{LineItem, Order, PaymentMethod, ShipmentEvent, ShippingInfo, ORDER_PLACED};
pub use status::{OrderStatus, TransitionPolicy};
