//! Newtype IDs for type-safe identifiers.
//!
//! Storefront records are keyed by numeric, time-derived identifiers
//! (milliseconds since the Unix epoch at creation). The newtypes keep an
//! `OrderId` from being passed where an `OfferId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identifies an order; doubles as its creation time in epoch millis.
    OrderId
);
define_id!(OfferId);
define_id!(ProductId);
define_id!(UserId);

/// Pick the next time-derived id.
///
/// Uses `now_millis` unless an id at or after that instant was already
/// issued, in which case it steps one past the latest. Keeps ids strictly
/// increasing even when two records are created within the same millisecond.
pub(crate) fn next_time_id(now_millis: i64, latest: Option<u64>) -> u64 {
    let now = u64::try_from(now_millis).unwrap_or(0);
    match latest {
        Some(latest) if latest >= now => latest + 1,
        _ => now,
    }
}

/// Customer-facing shipment tracking code, e.g. `TRK1718000000000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    const PREFIX: &'static str = "TRK";

    /// Tracking number correlated 1:1 with an order.
    pub fn for_order(id: OrderId) -> Self {
        Self(format!("{}{}", Self::PREFIX, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackingNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_time_id_uses_clock() {
        assert_eq!(next_time_id(1_700_000_000_000, None), 1_700_000_000_000);
        assert_eq!(next_time_id(1_700_000_000_500, Some(1_700_000_000_000)), 1_700_000_000_500);
    }

    #[test]
    fn test_next_time_id_same_millisecond() {
        assert_eq!(next_time_id(1_000, Some(1_000)), 1_001);
        assert_eq!(next_time_id(1_000, Some(1_005)), 1_006);
    }

    #[test]
    fn test_tracking_number_format() {
        let tracking = TrackingNumber::for_order(OrderId::new(1718000000000));
        assert_eq!(tracking.as_str(), "TRK1718000000000");
    }

    #[test]
    fn test_id_serializes_as_number() {
        let json = serde_json::to_string(&OrderId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
