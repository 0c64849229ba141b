//! Shipping fee rule.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Flat-rate shipping, free above a subtotal threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_above: Money,
    pub flat_fee: Money,
}

impl ShippingPolicy {
    pub fn new(free_above: Money, flat_fee: Money) -> Self {
        Self {
            free_above,
            flat_fee,
        }
    }

    /// Fee for an order of `subtotal`.
    ///
    /// A subtotal in another currency never reaches the threshold and is
    /// charged the flat fee as configured, which the ledger then refuses.
    pub fn fee_for(&self, subtotal: &Money) -> Money {
        match subtotal.partial_cmp(&self.free_above) {
            Some(Ordering::Greater) => Money::zero(subtotal.currency),
            _ => self.flat_fee,
        }
    }

    pub fn is_free(&self, subtotal: &Money) -> bool {
        self.fee_for(subtotal).is_zero()
    }
}
