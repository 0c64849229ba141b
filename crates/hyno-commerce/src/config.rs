//! Storefront configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::checkout::ShippingPolicy;
use crate::money::{Money, STORE_CURRENCY};
use crate::order::TransitionPolicy;
use crate::CommerceError;

/// Rate used to convert the catalogue's USD list prices.
pub const DEFAULT_USD_TO_INR: f64 = 83.0;

/// Storefront configuration file.
///
/// Every amount is in rupees; there is no currency setting. Unknown keys
/// are rejected so a stale option fails loudly instead of being ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommerceConfig {
    /// INR per USD, applied to seed catalogue prices.
    #[serde(default = "default_rate")]
    pub usd_to_inr_rate: f64,

    #[serde(default)]
    pub shipping: ShippingConfig,

    /// Which status changes the ledger accepts.
    #[serde(default)]
    pub transitions: TransitionPolicy,

    /// Install the built-in products when the store has none.
    #[serde(default = "default_true")]
    pub seed_catalog: bool,

    /// Install the built-in coupons when the store has none.
    #[serde(default = "default_true")]
    pub seed_offers: bool,

    /// Install the demo accounts when the store has none.
    #[serde(default = "default_true")]
    pub seed_users: bool,
}

fn default_rate() -> f64 {
    DEFAULT_USD_TO_INR
}

fn default_true() -> bool {
    true
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            usd_to_inr_rate: default_rate(),
            shipping: ShippingConfig::default(),
            transitions: TransitionPolicy::default(),
            seed_catalog: true,
            seed_offers: true,
            seed_users: true,
        }
    }
}

impl CommerceConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            let config: Self = serde_json::from_str(&content).map_err(|e| {
                CommerceError::Config(format!(
                    "failed to parse JSON config {}: {e}",
                    path.display()
                ))
            })?;
            config.validate()?;
            config
        } else {
            Self::from_toml_str(&content)?
        };
        tracing::debug!(path = %path.display(), "loaded storefront config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CommerceError::Config(format!("failed to parse TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CommerceError> {
        if !(self.usd_to_inr_rate.is_finite() && self.usd_to_inr_rate > 0.0) {
            return Err(CommerceError::Config(format!(
                "usd_to_inr_rate must be positive, got {}",
                self.usd_to_inr_rate
            )));
        }
        self.shipping.validate()
    }

    /// Shipping rule in rupees.
    pub fn shipping_policy(&self) -> ShippingPolicy {
        self.shipping.policy()
    }
}

/// Shipping thresholds in rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShippingConfig {
    /// Orders with a subtotal strictly above this ship free.
    #[serde(default = "default_free_above")]
    pub free_above: f64,

    /// Flat fee charged otherwise.
    #[serde(default = "default_flat_fee")]
    pub flat_fee: f64,
}

fn default_free_above() -> f64 {
    50.0 * DEFAULT_USD_TO_INR
}

fn default_flat_fee() -> f64 {
    5.99 * DEFAULT_USD_TO_INR
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            free_above: default_free_above(),
            flat_fee: default_flat_fee(),
        }
    }
}

impl ShippingConfig {
    fn validate(&self) -> Result<(), CommerceError> {
        for (name, value) in [("free_above", self.free_above), ("flat_fee", self.flat_fee)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CommerceError::Config(format!(
                    "shipping.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn policy(&self) -> ShippingPolicy {
        ShippingPolicy::new(
            Money::from_decimal(self.free_above, STORE_CURRENCY),
            Money::from_decimal(self.flat_fee, STORE_CURRENCY),
        )
    }
}
