//! Product types.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::money::{Money, STORE_CURRENCY};
use crate::CommerceError;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Shelf the product is listed under (e.g. "Diabetes").
    pub category: String,
    pub price: Money,
    /// Units on hand.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            price,
            stock: 0,
            description: String::new(),
            image: None,
        }
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check if `quantity` units can be sold from current stock.
    pub fn can_fulfill(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}

/// Admin input for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock: u32,
    pub description: String,
    pub image: Option<String>,
}

impl NewProduct {
    pub(crate) fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price,
            stock: self.stock,
            description: self.description,
            image: self.image,
        }
    }
}

/// Partial admin edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    /// `Some(None)` removes the image.
    pub image: Option<Option<String>>,
}

impl ProductUpdate {
    pub(crate) fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if let Some(category) = self.category {
            product.category = category.trim().to_string();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
    }
}

/// Field checks shared by add and update.
pub(crate) fn validate_product(product: &Product) -> Result<(), CommerceError> {
    if product.name.is_empty() || product.category.is_empty() {
        return Err(CommerceError::Validation(
            "product name and category are required".to_string(),
        ));
    }
    if product.price.is_negative() {
        return Err(CommerceError::Validation(
            "price cannot be negative".to_string(),
        ));
    }
    if product.price.currency != STORE_CURRENCY {
        return Err(CommerceError::Validation(format!(
            "price must be in {STORE_CURRENCY}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_stock_checks() {
        let product = Product::new(
            ProductId::new(1),
            "Metformin 500mg",
            "Diabetes",
            Money::new(132_717, Currency::INR),
        )
        .with_stock(3);

        assert!(product.is_in_stock());
        assert!(product.can_fulfill(3));
        assert!(!product.can_fulfill(4));
    }

    #[test]
    fn test_wire_format() {
        let product = Product::new(
            ProductId::new(7),
            "Folic Acid 400mcg",
            "Women Care",
            Money::zero(Currency::INR),
        );
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["category"], "Women Care");
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_validate_product() {
        let product = |name: &str, price: Money| {
            Product::new(ProductId::new(1), name, "Fever", price)
        };
        assert!(validate_product(&product("Dolo 650", Money::new(3_000, Currency::INR))).is_ok());
        assert!(validate_product(&product("", Money::new(3_000, Currency::INR))).is_err());
        assert!(validate_product(&product("Dolo 650", Money::new(-1, Currency::INR))).is_err());
        assert!(validate_product(&product("Dolo 650", Money::new(399, Currency::USD))).is_err());
    }
}
