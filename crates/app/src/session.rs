//! Staff session
//!
//! One session per terminal. It owns the cart being rung up and only exists
//! once the shared staff password has been given.

use jiff::Timestamp;
use petshop::{
    cart::{Cart, CartError, LineKey},
    payments::Settlement,
    pricing::AddOnSelection,
    products::{Product, Variation},
};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::info;
use zeroize::Zeroizing;

use crate::sales::{SaleCustomer, SaleError, SaleOutcome, SalesService};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no staff password is configured")]
    NotConfigured,

    #[error("incorrect staff password")]
    WrongPassword,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Sale(#[from] SaleError),
}

/// The shared staff password.
pub struct StaffGate {
    password: Zeroizing<String>,
}

impl std::fmt::Debug for StaffGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffGate").finish_non_exhaustive()
    }
}

impl StaffGate {
    pub fn new(password: Zeroizing<String>) -> Self {
        Self { password }
    }

    /// Opens a session when `attempt` matches the staff password.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotConfigured`]: the configured password is blank.
    /// - [`SessionError::WrongPassword`]: `attempt` doesn't match.
    pub fn unlock(&self, attempt: &str) -> Result<Session, SessionError> {
        if self.password.is_empty() {
            return Err(SessionError::NotConfigured);
        }

        if !bool::from(self.password.as_bytes().ct_eq(attempt.as_bytes())) {
            return Err(SessionError::WrongPassword);
        }

        info!("staff session opened");

        Ok(Session::default())
    }
}

/// An unlocked staff session and its cart.
#[derive(Debug, Default)]
pub struct Session {
    cart: Cart,
}

impl Session {
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// # Errors
    ///
    /// See [`Cart::add`].
    pub fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        variation: Option<&Variation>,
        add_ons: &[AddOnSelection],
        now: Timestamp,
    ) -> Result<LineKey, SessionError> {
        Ok(self.cart.add(product, quantity, variation, add_ons, now)?)
    }

    /// # Errors
    ///
    /// See [`Cart::update_quantity`].
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> Result<(), SessionError> {
        Ok(self.cart.update_quantity(key, quantity)?)
    }

    pub fn remove(&mut self, key: &LineKey) -> bool {
        self.cart.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.cart.clear();
    }

    /// Rings up the cart. The cart is emptied only when the sale goes through.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Sale`] and leaves the cart untouched.
    pub async fn checkout(
        &mut self,
        sales: &SalesService,
        settlement: &Settlement,
        customer: SaleCustomer,
        now: Timestamp,
    ) -> Result<SaleOutcome, SessionError> {
        let outcome = sales
            .complete_sale(self.cart.lines(), settlement, customer, now)
            .await?;

        self.cart.clear();

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use petshop::{
        payments::{PaymentMethod, Tender},
        prices::pesos,
    };
    use testresult::TestResult;

    use crate::test::{
        TestContext,
        helpers::{now, stocked_product},
        store::Trigger,
    };

    use super::*;

    fn gate(password: &str) -> StaffGate {
        StaffGate::new(Zeroizing::new(password.to_string()))
    }

    #[test]
    fn gate_checks_the_password() {
        assert!(gate("hunter2").unlock("hunter2").is_ok());
        assert!(matches!(gate("hunter2").unlock("hunter"), Err(SessionError::WrongPassword)));
        assert!(matches!(gate("").unlock(""), Err(SessionError::NotConfigured)));
    }

    #[tokio::test(start_paused = true)]
    async fn checkout_clears_the_cart_only_on_success() -> TestResult {
        let ctx = TestContext::new(Trigger::Exact);
        let kibble = stocked_product(&ctx.store, "Kibble", pesos(100), 10);
        let mut session = gate("hunter2").unlock("hunter2")?;

        session.add(&kibble, 2, None, &[], now())?;

        let short = Settlement::PayNow(vec![Tender::new(PaymentMethod::Cash, pesos(100))]);
        let result = session
            .checkout(&ctx.sales, &short, SaleCustomer::walk_in("Ana"), now())
            .await;

        assert!(matches!(result, Err(SessionError::Sale(SaleError::Settlement(_)))));
        assert_eq!(session.cart().total_items(), 2);

        let exact = Settlement::PayNow(vec![Tender::new(PaymentMethod::Cash, pesos(200))]);
        let outcome = session
            .checkout(&ctx.sales, &exact, SaleCustomer::walk_in("Ana"), now())
            .await?;

        assert_eq!(outcome.order.total, pesos(200));
        assert!(session.cart().is_empty());

        Ok(())
    }

    #[test]
    fn cart_ceiling_applies_in_the_session() -> TestResult {
        let store = crate::test::store::MemoryStore::new(Trigger::Exact);
        let kibble = stocked_product(&store, "Kibble", pesos(100), 2);
        let mut session = Session::default();

        session.add(&kibble, 2, None, &[], now())?;

        assert!(matches!(
            session.add(&kibble, 1, None, &[], now()),
            Err(SessionError::Cart(CartError::InsufficientStock { .. }))
        ));
        assert_eq!(session.cart().total_items(), 2);

        Ok(())
    }
}
