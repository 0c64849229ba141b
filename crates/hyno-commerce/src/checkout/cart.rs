//! Shopping cart.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use crate::order::LineItem;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// Items picked before checkout. One line per product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    currency: Currency,
}

impl Cart {
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Add `quantity` of a catalog product at its current price.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), CommerceError> {
        self.add_item(product.id, &product.name, quantity, product.price)
    }

    /// Add an item to the cart, merging with an existing line for the same
    /// product.
    ///
    /// Returns an error if:
    /// - Quantity is zero
    /// - The price is in another currency
    /// - Adding would exceed MAX_QUANTITY_PER_ITEM
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: &str,
        quantity: u32,
        unit_price: Money,
    ) -> Result<(), CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }
        if unit_price.currency != self.currency {
            return Err(CommerceError::Validation(format!(
                "cart is priced in {}, got {}",
                self.currency, unit_price.currency
            )));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            check_limit(new_quantity)?;
            existing.quantity = new_quantity;
            return Ok(());
        }

        check_limit(quantity)?;
        self.items
            .push(LineItem::new(product_id, name, quantity, unit_price));
        Ok(())
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns whether a line for `product_id` existed.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<bool, CommerceError> {
        if quantity == 0 {
            return Ok(self.remove(product_id));
        }
        check_limit(quantity)?;

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() < len_before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        crate::order::Order::items_subtotal(&self.items, self.currency)
    }
}

fn check_limit(quantity: u32) -> Result<(), CommerceError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::Validation(format!(
            "quantity {quantity} exceeds limit of {MAX_QUANTITY_PER_ITEM}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inr(minor: i64) -> Money {
        Money::new(minor, Currency::INR)
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new(Currency::INR);
        cart.add_item(ProductId::new(1), "Metformin 500mg", 2, inr(1000)).unwrap();
        cart.add_item(ProductId::new(1), "Metformin 500mg", 3, inr(1000)).unwrap();
        cart.add_item(ProductId::new(3), "Paracetamol 500mg", 1, inr(500)).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.subtotal().unwrap(), inr(5500));
    }

    #[test]
    fn test_add_zero_quantity() {
        let mut cart = Cart::new(Currency::INR);
        assert!(cart.add_item(ProductId::new(1), "x", 0, inr(100)).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::new(Currency::INR);
        cart.add_item(ProductId::new(1), "x", 9000, inr(1)).unwrap();
        assert!(cart.add_item(ProductId::new(1), "x", 1000, inr(1)).is_err());
        assert_eq!(cart.item_count(), 9000);
    }

    #[test]
    fn test_currency_mismatch() {
        let mut cart = Cart::new(Currency::INR);
        let err = cart
            .add_item(ProductId::new(1), "x", 1, Money::new(100, Currency::USD))
            .unwrap_err();
        assert!(matches!(err, CommerceError::Validation(_)));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new(Currency::INR);
        cart.add_item(ProductId::new(1), "x", 2, inr(100)).unwrap();
        assert!(cart.update_quantity(ProductId::new(1), 5).unwrap());
        assert_eq!(cart.item_count(), 5);

        assert!(cart.update_quantity(ProductId::new(1), 0).unwrap());
        assert!(cart.is_empty());
        assert!(!cart.update_quantity(ProductId::new(1), 1).unwrap());
    }

    #[test]
    fn test_empty_subtotal_is_zero() {
        assert_eq!(Cart::new(Currency::INR).subtotal().unwrap(), inr(0));
    }
}
