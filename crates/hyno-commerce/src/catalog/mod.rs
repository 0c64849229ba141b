//! Product catalog module.
//!
//! Products, their stock levels, admin edits and the built-in pharmacy
//! range.

mod product;
mod seed;

pub use product::{NewProduct, Product, ProductUpdate};

use hyno_store::{keys, Records, Store};
use serde_json::Value;

use crate::ids::ProductId;
use crate::order::LineItem;
use crate::CommerceError;
use product::validate_product;

/// Product listing persisted under [`keys::PRODUCTS`].
///
/// Stored products that cannot be read are kept aside and written back
/// unchanged on every save.
pub struct Catalog {
    store: Store,
    products: Vec<Product>,
    unreadable: Vec<Value>,
}

impl Catalog {
    /// Load products from `store`. When nothing is stored and `seed` is
    /// set, the built-in range is priced from its USD list prices at
    /// `usd_rate` and persisted.
    pub fn open(store: Store, usd_rate: f64, seed: bool) -> Self {
        let mut records = Self::load(&store);
        if seed && records.items.is_empty() && records.unreadable.is_empty() {
            records.items = seed::default_products(usd_rate);
            if let Err(e) = store.set(keys::PRODUCTS, &records.items) {
                tracing::error!(error = %e, "failed to persist seed products");
            }
        }
        tracing::debug!(
            count = records.items.len(),
            unreadable = records.unreadable.len(),
            "catalog opened"
        );
        Self {
            store,
            products: records.items,
            unreadable: records.unreadable,
        }
    }

    fn load(store: &Store) -> Records<Product> {
        store.get_records(keys::PRODUCTS).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to read products");
            Records::default()
        })
    }

    pub fn reload(&mut self) {
        let records = Self::load(&self.store);
        self.products = records.items;
        self.unreadable = records.unreadable;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products on the given shelf, matched case-insensitively.
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct categories in listing order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Take ordered quantities out of stock.
    ///
    /// Stock never goes below zero; a shortfall is logged and the level
    /// clamps. Lines for unknown products are skipped.
    pub fn reserve_stock(&mut self, items: &[LineItem]) -> Result<(), CommerceError> {
        let mut next = self.products.clone();
        for item in items {
            let Some(product) = next.iter_mut().find(|p| p.id == item.product_id) else {
                tracing::warn!(product_id = %item.product_id, "ordered product not in catalog");
                continue;
            };
            if !product.can_fulfill(item.quantity) {
                tracing::warn!(
                    product_id = %product.id,
                    stock = product.stock,
                    requested = item.quantity,
                    "stock shortfall; clamping to zero"
                );
            }
            product.stock = product.stock.saturating_sub(item.quantity);
        }

        self.commit(next)
    }

    /// Add a product under the next free id.
    pub fn add_product(&mut self, new: NewProduct) -> Result<&Product, CommerceError> {
        let latest = self.products.iter().map(|p| p.id.get()).max().unwrap_or(0);
        let id = ProductId::new(latest + 1);
        let product = new.into_product(id);
        validate_product(&product)?;

        let mut next = self.products.clone();
        next.push(product);
        self.commit(next)?;

        tracing::info!(product_id = %id, "product added");
        let idx = self.products.len() - 1;
        Ok(&self.products[idx])
    }

    pub fn update_product(
        &mut self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<&Product, CommerceError> {
        let idx = self.index_of(id)?;
        let mut product = self.products[idx].clone();
        update.apply_to(&mut product);
        validate_product(&product)?;

        let mut next = self.products.clone();
        next[idx] = product;
        self.commit(next)?;

        tracing::info!(product_id = %id, "product updated");
        Ok(&self.products[idx])
    }

    /// Remove a product. Orders that contain it keep their line items.
    pub fn delete_product(&mut self, id: ProductId) -> Result<Product, CommerceError> {
        let idx = self.index_of(id)?;
        let mut next = self.products.clone();
        let removed = next.remove(idx);
        self.commit(next)?;

        tracing::info!(product_id = %id, name = %removed.name, "product deleted");
        Ok(removed)
    }

    fn index_of(&self, id: ProductId) -> Result<usize, CommerceError> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CommerceError::ProductNotFound(id))
    }

    fn commit(&mut self, next: Vec<Product>) -> Result<(), CommerceError> {
        if let Err(e) = self.store.set_records(keys::PRODUCTS, &next, &self.unreadable) {
            tracing::error!(error = %e, "failed to persist products");
            return Err(e.into());
        }
        self.products = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use crate::testing::QuotaBackend;

    fn catalog() -> Catalog {
        Catalog::open(Store::in_memory(), 83.0, true)
    }

    fn line(id: u64, quantity: u32) -> LineItem {
        LineItem::new(ProductId::new(id), "item", quantity, Money::new(100, Currency::INR))
    }

    fn dolo() -> NewProduct {
        NewProduct {
            name: " Dolo 650 ".into(),
            category: "Fever".into(),
            price: Money::new(3_050, Currency::INR),
            stock: 200,
            description: "Paracetamol 650mg tablets.".into(),
            image: None,
        }
    }

    #[test]
    fn test_seed_prices_converted() {
        let catalog = catalog();
        assert_eq!(catalog.products().len(), 7);
        let metformin = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(metformin.price, Money::new(132_717, Currency::INR));
        assert_eq!(metformin.stock, 50);
    }

    #[test]
    fn test_categories_and_filter() {
        let catalog = catalog();
        assert_eq!(catalog.categories().len(), 6);
        assert_eq!(catalog.by_category("diabetes").len(), 2);
    }

    #[test]
    fn test_reserve_stock_persists() {
        let store = Store::in_memory();
        let mut catalog = Catalog::open(store.clone(), 83.0, true);
        catalog.reserve_stock(&[line(1, 5), line(3, 10)]).unwrap();
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().stock, 45);

        let reopened = Catalog::open(store, 83.0, true);
        assert_eq!(reopened.get(ProductId::new(3)).unwrap().stock, 90);
    }

    #[test]
    fn test_reserve_stock_saturates() {
        let mut catalog = catalog();
        catalog.reserve_stock(&[line(2, 31), line(999, 1)]).unwrap();
        assert_eq!(catalog.get(ProductId::new(2)).unwrap().stock, 0);
    }

    #[test]
    fn test_no_seed_when_disabled() {
        let catalog = Catalog::open(Store::in_memory(), 83.0, false);
        assert!(catalog.products().is_empty());
    }

    #[test]
    fn test_failed_stock_write_keeps_levels() {
        let backend = QuotaBackend::new();
        let mut catalog = Catalog::open(backend.store(), 83.0, true);
        backend.fill();

        let err = catalog.reserve_stock(&[line(1, 5)]).unwrap_err();
        assert!(matches!(err, CommerceError::Persistence(_)));
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().stock, 50);

        let stored: Vec<Product> = backend.store().get(keys::PRODUCTS).unwrap().unwrap();
        assert_eq!(stored[0].stock, 50);
    }

    #[test]
    fn test_add_update_delete_product() {
        let store = Store::in_memory();
        let mut catalog = Catalog::open(store.clone(), 83.0, true);

        let added = catalog.add_product(dolo()).unwrap();
        assert_eq!(added.id, ProductId::new(8));
        assert_eq!(added.name, "Dolo 650");

        let updated = catalog
            .update_product(
                ProductId::new(8),
                ProductUpdate {
                    stock: Some(150),
                    price: Some(Money::new(3_200, Currency::INR)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.stock, 150);
        assert_eq!(updated.category, "Fever");

        let removed = catalog.delete_product(ProductId::new(3)).unwrap();
        assert_eq!(removed.name, "Paracetamol 500mg");
        assert_eq!(catalog.by_category("fever").len(), 1);

        let reopened = Catalog::open(store, 83.0, true);
        assert_eq!(reopened.products().len(), 7);
        assert_eq!(reopened.get(ProductId::new(8)).unwrap().price.amount_minor, 3_200);
    }

    #[test]
    fn test_product_edits_are_validated() {
        let mut catalog = catalog();
        let mut nameless = dolo();
        nameless.name = "   ".into();
        assert!(matches!(catalog.add_product(nameless), Err(CommerceError::Validation(_))));

        let err = catalog
            .update_product(
                ProductId::new(1),
                ProductUpdate {
                    price: Some(Money::new(-100, Currency::INR)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CommerceError::Validation(_)));
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().price.amount_minor, 132_717);

        assert!(matches!(
            catalog.delete_product(ProductId::new(99)),
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_unreadable_product_survives_stock_update() {
        let store = Store::in_memory();
        let mut catalog = Catalog::open(store.clone(), 83.0, true);
        let mut raw: Vec<Value> = store.get(keys::PRODUCTS).unwrap().unwrap();
        let legacy = serde_json::json!({"id": 42, "name": "Cough Syrup", "price": 4.5});
        raw.push(legacy.clone());
        store.set(keys::PRODUCTS, &raw).unwrap();

        catalog.reload();
        assert_eq!(catalog.products().len(), 7);
        catalog.reserve_stock(&[line(1, 1)]).unwrap();

        let raw: Vec<Value> = store.get(keys::PRODUCTS).unwrap().unwrap();
        assert_eq!(raw.len(), 8);
        assert_eq!(raw[7], legacy);
    }
}
