//! Checkout orchestration over the ledger, offers and catalog.

use std::sync::Arc;

use hyno_store::{Session, Store};

use crate::catalog::Catalog;
use crate::checkout::{Cart, Customer, ShippingPolicy};
use crate::clock::Clock;
use crate::config::CommerceConfig;
use crate::error::OfferRejection;
use crate::ids::OrderId;
use crate::money::{Money, STORE_CURRENCY};
use crate::offer::{calculate_discount, Offer, OfferEngine};
use crate::order::{NewOrder, Order, OrderLedger, PaymentMethod, ShippingInfo};
use crate::users::{ProfileUpdate, Registration, UserDirectory};
use crate::CommerceError;

/// Price breakdown shown on the cart and checkout pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping_fee: Money,
    pub total: Money,
    /// Code of the applied offer that produced `discount`.
    pub offer_code: Option<String>,
    /// Why the applied offer no longer qualifies, if it doesn't.
    pub offer_rejection: Option<OfferRejection>,
}

/// What the customer fills in on the checkout form.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetails {
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    /// Uploaded prescription file name.
    pub prescription: Option<String>,
}

/// The storefront core: the order ledger, offer engine, catalog and user
/// directory over a shared store.
pub struct Storefront {
    config: CommerceConfig,
    shipping: ShippingPolicy,
    session: Session,
    ledger: OrderLedger,
    offers: OfferEngine,
    catalog: Catalog,
    users: UserDirectory,
}

impl Storefront {
    pub fn open(store: Store, config: CommerceConfig, clock: Arc<dyn Clock>) -> Self {
        let ledger = OrderLedger::open(store.clone(), clock.clone(), config.transitions);
        let offers = OfferEngine::open(store.clone(), clock, config.seed_offers);
        let catalog = Catalog::open(store.clone(), config.usd_to_inr_rate, config.seed_catalog);
        let users = UserDirectory::open(store.clone(), config.seed_users);
        tracing::info!(transitions = ?config.transitions, "storefront opened");
        Self {
            shipping: config.shipping_policy(),
            config,
            session: Session::new(store),
            ledger,
            offers,
            catalog,
            users,
        }
    }

    pub fn config(&self) -> &CommerceConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    /// Admin access to status updates.
    pub fn ledger_mut(&mut self) -> &mut OrderLedger {
        &mut self.ledger
    }

    pub fn offers(&self) -> &OfferEngine {
        &self.offers
    }

    /// Admin access to offer management.
    pub fn offers_mut(&mut self) -> &mut OfferEngine {
        &mut self.offers
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Admin access to product management.
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Admin access to account management.
    pub fn users_mut(&mut self) -> &mut UserDirectory {
        &mut self.users
    }

    /// An empty cart in the store currency.
    pub fn new_cart(&self) -> Cart {
        Cart::new(STORE_CURRENCY)
    }

    /// Create an account and sign it in.
    pub fn sign_up(&mut self, form: Registration) -> Result<Customer, CommerceError> {
        let profile = self.users.register(form)?.profile();
        self.session.sign_in(&profile)?;
        Ok(profile)
    }

    /// Check credentials and sign the account in.
    pub fn log_in(&mut self, email: &str, password: &str) -> Result<Customer, CommerceError> {
        let profile = self.users.login(email, password)?.profile();
        self.session.sign_in(&profile)?;
        Ok(profile)
    }

    pub fn log_out(&self) -> Result<(), CommerceError> {
        self.session.sign_out()?;
        Ok(())
    }

    /// Edit the signed-in customer's profile, keeping the session copy in
    /// step with the account.
    pub fn update_my_profile(&mut self, update: ProfileUpdate) -> Result<Customer, CommerceError> {
        let customer = self.current_customer()?;
        let profile = self.users.update_profile(customer.id, update)?.profile();
        self.session.sign_in(&profile)?;
        Ok(profile)
    }

    fn current_customer(&self) -> Result<Customer, CommerceError> {
        self.session
            .current_user::<Customer>()?
            .ok_or_else(|| CommerceError::Validation("sign in to continue".to_string()))
    }

    /// Price `cart` with the applied offer and shipping rule.
    ///
    /// An applied offer that no longer qualifies (for example after items
    /// were removed) contributes no discount and is reported in
    /// `offer_rejection`.
    pub fn quote(&self, cart: &Cart) -> Result<Quote, CommerceError> {
        let subtotal = cart.subtotal()?;
        let (offer, rejection) = match self.offers.applied_offer() {
            Some(applied) => match self.offers.validate(&applied.code, &subtotal) {
                Ok(offer) => (Some(offer), None),
                Err(rejection) => (None, Some(rejection)),
            },
            None => (None, None),
        };
        self.price(subtotal, offer, rejection)
    }

    fn price(
        &self,
        subtotal: Money,
        offer: Option<&Offer>,
        rejection: Option<OfferRejection>,
    ) -> Result<Quote, CommerceError> {
        let discount = calculate_discount(offer, &subtotal);
        let shipping_fee = self.shipping.fee_for(&subtotal);
        Ok(Quote {
            subtotal,
            discount,
            shipping_fee,
            total: Order::compute_total(subtotal, discount, shipping_fee)?,
            offer_code: offer.map(|o| o.code.clone()),
            offer_rejection: rejection,
        })
    }

    /// Apply a coupon code to the current checkout and re-price `cart`.
    pub fn apply_coupon(&mut self, code: &str, cart: &Cart) -> Result<Quote, CommerceError> {
        let subtotal = cart.subtotal()?;
        self.offers.apply(code, &subtotal)?;
        self.quote(cart)
    }

    pub fn remove_coupon(&mut self) {
        self.offers.clear_applied();
    }

    /// Place an order for the signed-in customer.
    ///
    /// The applied offer is re-validated against the final subtotal and its
    /// usage is counted exactly once. On success the applied offer is
    /// cleared, stock is taken and `cart` is emptied. On failure nothing
    /// changes.
    pub fn place_order(
        &mut self,
        cart: &mut Cart,
        details: CheckoutDetails,
    ) -> Result<Order, CommerceError> {
        let customer = self.current_customer()?;
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let subtotal = cart.subtotal()?;

        let offer = match self.offers.applied_offer() {
            Some(applied) => {
                let code = applied.code.clone();
                match self.offers.validate(&code, &subtotal) {
                    Ok(offer) => Some(offer.clone()),
                    Err(rejection) => {
                        tracing::warn!(
                            code = %code,
                            reason = %rejection,
                            "applied coupon no longer valid"
                        );
                        return Err(rejection.into());
                    }
                }
            }
            None => None,
        };

        let quote = self.price(subtotal, offer.as_ref(), None)?;
        let order = self
            .ledger
            .create_order(NewOrder {
                user_id: customer.id,
                items: cart.items().to_vec(),
                shipping_info: details.shipping_info,
                payment_method: details.payment_method,
                discount: quote.discount,
                applied_offer: offer.clone(),
                shipping_fee: quote.shipping_fee,
                prescription: details.prescription,
            })?
            .clone();

        if let Some(offer) = &offer {
            if let Err(e) = self.offers.commit_usage(offer.id) {
                tracing::error!(
                    order_id = %order.id,
                    offer_id = %offer.id,
                    error = %e,
                    "order placed but offer usage was not recorded"
                );
            }
        }
        self.offers.clear_applied();

        if let Err(e) = self.catalog.reserve_stock(&order.items) {
            tracing::error!(
                order_id = %order.id,
                error = %e,
                "order placed but stock was not updated"
            );
        }
        cart.clear();

        tracing::info!(
            order_id = %order.id,
            tracking = %order.tracking_number,
            total = %order.total,
            "checkout complete"
        );
        Ok(order)
    }

    /// Orders of the signed-in customer, oldest first.
    pub fn my_orders(&self) -> Result<Vec<&Order>, CommerceError> {
        let customer = self.current_customer()?;
        Ok(self.ledger.orders_for_user(customer.id))
    }

    /// Cancel one of the signed-in customer's orders.
    pub fn cancel_my_order(&mut self, id: OrderId) -> Result<&Order, CommerceError> {
        let customer = self.current_customer()?;
        let order = self.ledger.get_order(id)?;
        if order.user_id != customer.id {
            return Err(CommerceError::order_not_found(id));
        }
        self.ledger.cancel_order(id)
    }

    /// Public order tracking by tracking number.
    pub fn track(&self, tracking_number: &str) -> Result<&Order, CommerceError> {
        self.ledger.find_by_tracking_number(tracking_number)
    }
}
