//! Products installed when the store has none.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::{Currency, Money, STORE_CURRENCY};

/// (name, category, USD list price, stock, description)
const PRODUCTS: &[(&str, &str, f64, u32, &str)] = &[
    (
        "Metformin 500mg",
        "Diabetes",
        15.99,
        50,
        "Oral diabetes medicine that helps control blood sugar levels.",
    ),
    (
        "Insulin Glargine",
        "Diabetes",
        89.99,
        30,
        "Long-acting insulin used to control high blood sugar in adults and children.",
    ),
    ("Paracetamol 500mg", "Fever", 8.99, 100, "Pain reliever and fever reducer."),
    (
        "Ibuprofen 200mg",
        "Painkillers",
        12.99,
        75,
        "Nonsteroidal anti-inflammatory drug (NSAID) used for pain relief.",
    ),
    (
        "Vitamin D3 1000IU",
        "Vitamins & Supplements",
        19.99,
        60,
        "Essential vitamin for bone health and immune function.",
    ),
    ("Baby Shampoo 200ml", "Baby Care", 9.99, 40, "Gentle shampoo for babies and toddlers."),
    (
        "Folic Acid 400mcg",
        "Women Care",
        14.99,
        80,
        "Important for women planning pregnancy and during early pregnancy.",
    ),
];

/// Seed products in the store currency, converting USD list prices at
/// `usd_rate` rupees per dollar.
pub(crate) fn default_products(usd_rate: f64) -> Vec<Product> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, &(name, category, usd, stock, description))| {
            let price = Money::from_decimal(usd, Currency::USD).convert(STORE_CURRENCY, usd_rate);
            Product::new(ProductId::new(i as u64 + 1), name, category, price)
                .with_stock(stock)
                .with_description(description)
        })
        .collect()
}
