//! Offer engine: coupon validation, application and usage accounting.

use std::cmp::Ordering;
use std::sync::Arc;

use hyno_store::{keys, Records, Store};
use serde_json::Value;

use crate::clock::Clock;
use crate::error::OfferRejection;
use crate::ids::{next_time_id, OfferId};
use crate::money::Money;
use crate::offer::offer::validate_offer;
use crate::offer::{seed, NewOffer, Offer, OfferUpdate};
use crate::CommerceError;

/// Owns the offer catalogue and the coupon applied to the current checkout.
///
/// Stored offers that cannot be read are kept aside and written back
/// unchanged on every save.
pub struct OfferEngine {
    store: Store,
    clock: Arc<dyn Clock>,
    offers: Vec<Offer>,
    unreadable: Vec<Value>,
    applied: Option<Offer>,
}

impl OfferEngine {
    /// Load offers from `store`. When nothing is stored and `seed` is set,
    /// the built-in offers are installed and persisted.
    pub fn open(store: Store, clock: Arc<dyn Clock>, seed: bool) -> Self {
        let mut records = Self::load(&store);
        if seed && records.items.is_empty() && records.unreadable.is_empty() {
            records.items = seed::default_offers();
            if let Err(e) = store.set(keys::OFFERS, &records.items) {
                tracing::error!(error = %e, "failed to persist seed offers");
            }
        }
        tracing::debug!(
            count = records.items.len(),
            unreadable = records.unreadable.len(),
            "offer engine opened"
        );
        Self {
            store,
            clock,
            offers: records.items,
            unreadable: records.unreadable,
            applied: None,
        }
    }

    fn load(store: &Store) -> Records<Offer> {
        store.get_records(keys::OFFERS).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to read offers");
            Records::default()
        })
    }

    /// Re-read the catalogue from the store. The applied offer is kept.
    pub fn reload(&mut self) {
        let records = Self::load(&self.store);
        self.offers = records.items;
        self.unreadable = records.unreadable;
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn get(&self, id: OfferId) -> Result<&Offer, CommerceError> {
        self.offers
            .iter()
            .find(|o| o.id == id)
            .ok_or(CommerceError::OfferNotFound(id))
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Offer> {
        self.offers.iter().find(|o| o.matches_code(code))
    }

    /// Check whether `code` can be used on an order of `subtotal`.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// existence, active flag, expiry, minimum order, usage limit. A
    /// subtotal in a different currency from the offer's minimum never
    /// meets it.
    pub fn validate(&self, code: &str, subtotal: &Money) -> Result<&Offer, OfferRejection> {
        let offer = self.find_by_code(code).ok_or(OfferRejection::NotFound)?;
        if !offer.active {
            return Err(OfferRejection::Inactive);
        }
        if offer.is_expired(self.clock.now()) {
            return Err(OfferRejection::Expired);
        }
        if !matches!(
            subtotal.partial_cmp(&offer.min_order),
            Some(Ordering::Greater | Ordering::Equal)
        ) {
            return Err(OfferRejection::BelowMinimum {
                minimum: offer.min_order,
            });
        }
        if offer.is_exhausted() {
            return Err(OfferRejection::UsageExceeded);
        }
        Ok(offer)
    }

    /// Validate `code` and remember it as the applied offer for this
    /// checkout. Usage is not counted until the order is placed.
    pub fn apply(&mut self, code: &str, subtotal: &Money) -> Result<&Offer, OfferRejection> {
        let offer = match self.validate(code, subtotal) {
            Ok(offer) => offer.clone(),
            Err(rejection) => {
                tracing::info!(code, reason = %rejection, "coupon rejected");
                return Err(rejection);
            }
        };
        tracing::info!(code = %offer.code, "coupon applied");
        Ok(self.applied.insert(offer))
    }

    pub fn applied_offer(&self) -> Option<&Offer> {
        self.applied.as_ref()
    }

    pub fn clear_applied(&mut self) {
        self.applied = None;
    }

    /// Discount granted by `offer` on `subtotal`; zero when `offer` is `None`.
    pub fn calculate_discount(&self, offer: Option<&Offer>, subtotal: &Money) -> Money {
        crate::offer::calculate_discount(offer, subtotal)
    }

    /// Count one placed order against the offer's usage limit.
    ///
    /// Call exactly once per order that used the offer, at placement time.
    pub fn commit_usage(&mut self, id: OfferId) -> Result<&Offer, CommerceError> {
        let idx = self.index_of(id)?;
        let mut next = self.offers.clone();
        next[idx].usage_count = next[idx].usage_count.saturating_add(1);
        self.commit(next)?;

        let offer = &self.offers[idx];
        tracing::info!(
            offer_id = %id,
            code = %offer.code,
            usage = offer.usage_count,
            limit = offer.max_usage,
            "offer usage committed"
        );
        Ok(offer)
    }

    /// Create an offer. Codes must be unique ignoring case.
    pub fn add_offer(&mut self, new: NewOffer) -> Result<&Offer, CommerceError> {
        let latest = self.offers.iter().map(|o| o.id.get()).max();
        let id = OfferId::new(next_time_id(self.clock.now().timestamp_millis(), latest));
        let offer = new.into_offer(id);
        validate_offer(&offer)?;
        self.ensure_code_free(&offer.code, None)?;

        let mut next = self.offers.clone();
        next.push(offer);
        self.commit(next)?;

        tracing::info!(offer_id = %id, "offer created");
        let idx = self.offers.len() - 1;
        Ok(&self.offers[idx])
    }

    pub fn update_offer(
        &mut self,
        id: OfferId,
        update: OfferUpdate,
    ) -> Result<&Offer, CommerceError> {
        let idx = self.index_of(id)?;
        let mut offer = self.offers[idx].clone();
        update.apply_to(&mut offer);
        validate_offer(&offer)?;
        self.ensure_code_free(&offer.code, Some(id))?;

        let mut next = self.offers.clone();
        next[idx] = offer;
        self.commit(next)?;

        tracing::info!(offer_id = %id, "offer updated");
        Ok(&self.offers[idx])
    }

    /// Remove an offer. Orders that used it keep their snapshot.
    pub fn delete_offer(&mut self, id: OfferId) -> Result<Offer, CommerceError> {
        let idx = self.index_of(id)?;
        let mut next = self.offers.clone();
        let removed = next.remove(idx);
        self.commit(next)?;

        if self.applied.as_ref().is_some_and(|o| o.id == id) {
            self.applied = None;
        }
        tracing::info!(offer_id = %id, code = %removed.code, "offer deleted");
        Ok(removed)
    }

    fn ensure_code_free(&self, code: &str, except: Option<OfferId>) -> Result<(), CommerceError> {
        let taken = self
            .offers
            .iter()
            .any(|o| Some(o.id) != except && o.matches_code(code));
        if taken {
            return Err(CommerceError::Validation(format!(
                "coupon code {code} already exists"
            )));
        }
        Ok(())
    }

    fn index_of(&self, id: OfferId) -> Result<usize, CommerceError> {
        self.offers
            .iter()
            .position(|o| o.id == id)
            .ok_or(CommerceError::OfferNotFound(id))
    }

    fn commit(&mut self, next: Vec<Offer>) -> Result<(), CommerceError> {
        if let Err(e) = self.store.set_records(keys::OFFERS, &next, &self.unreadable) {
            tracing::error!(error = %e, "failed to persist offers");
            return Err(e.into());
        }
        self.offers = next;
        Ok(())
    }
}
