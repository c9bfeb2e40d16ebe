//! # Cart State
//!
//! The bundle's one cart, shared by every command.
//!
//! ## Single-Writer Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  checkout #1 ── begin_checkout() ── flag: false → true ── lock ──┐      │
//! │                                                                   │      │
//! │  checkout #2 ── begin_checkout() ── flag already true ──► CheckoutInProgress
//! │                                                                   │      │
//! │  add_item ──── mutate() ─────────── flag true ──────────► CheckoutInProgress
//! │                                                                   │      │
//! │                          inventory.await (lock still held) ◄──────┘      │
//! │                          commit / reject                                 │
//! │                          guard dropped: flag → false, lock released     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart lives in a tokio `Mutex` because checkout keeps it locked across
//! the inventory lookup; a std mutex guard can't be held over an `.await`.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

use mango_core::{Cart, CoreError, CoreResult};
use tokio::sync::{Mutex, MutexGuard};

/// Shared cart plus the checkout-in-flight flag.
#[derive(Debug, Default)]
pub struct CartState {
    cart: Mutex<Cart>,
    checkout_in_flight: AtomicBool,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Runs `f` with write access to the cart.
    ///
    /// Fails fast with `CheckoutInProgress` while a checkout holds the cart.
    pub async fn mutate<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut Cart) -> CoreResult<R>,
    {
        if self.is_checkout_in_flight() {
            return Err(CoreError::CheckoutInProgress);
        }
        let mut cart = self.cart.lock().await;
        f(&mut cart)
    }

    /// Runs `f` with read access to the cart.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Deep copy of the current cart.
    #[cfg(test)]
    pub async fn snapshot(&self) -> Cart {
        self.read(Cart::clone).await
    }

    /// Claims the cart for a checkout.
    ///
    /// The returned guard keeps the cart locked and the in-flight flag set
    /// until it's dropped.
    pub async fn begin_checkout(&self) -> CoreResult<CheckoutGuard<'_>> {
        if self
            .checkout_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CoreError::CheckoutInProgress);
        }

        // Clears the flag even if this future is dropped while waiting.
        let in_flight = InFlight(&self.checkout_in_flight);
        let cart = self.cart.lock().await;
        Ok(CheckoutGuard {
            cart,
            _in_flight: in_flight,
        })
    }

    pub fn is_checkout_in_flight(&self) -> bool {
        self.checkout_in_flight.load(Ordering::Acquire)
    }
}

/// Exclusive access to the cart for the duration of one checkout.
#[derive(Debug)]
pub struct CheckoutGuard<'a> {
    cart: MutexGuard<'a, Cart>,
    _in_flight: InFlight<'a>,
}

/// Resets the checkout-in-flight flag on drop.
#[derive(Debug)]
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Deref for CheckoutGuard<'_> {
    type Target = Cart;

    fn deref(&self) -> &Cart {
        &self.cart
    }
}

impl DerefMut for CheckoutGuard<'_> {
    fn deref_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mango_core::ProductCatalog;
    use std::time::Duration;

    fn catalog() -> ProductCatalog {
        ProductCatalog::from_json(
            r#"[{"id":"A","name":"Alphonso","priceCents":500,"stockQuantity":2}]"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_mutate_and_read() {
        let catalog = catalog();
        let state = CartState::new();

        state
            .mutate(|cart| cart.add_item(&catalog, "A", 2))
            .await
            .unwrap();

        assert_eq!(state.read(|cart| cart.quantity_of("A")).await, 2);
    }

    #[tokio::test]
    async fn test_second_checkout_rejected_while_first_in_flight() {
        let state = CartState::new();

        let guard = state.begin_checkout().await.unwrap();
        assert!(state.is_checkout_in_flight());
        assert!(matches!(
            state.begin_checkout().await,
            Err(CoreError::CheckoutInProgress)
        ));

        drop(guard);
        assert!(!state.is_checkout_in_flight());
        assert!(state.begin_checkout().await.is_ok());
    }

    #[tokio::test]
    async fn test_abandoned_checkout_releases_flag() {
        let state = CartState::new();
        let held = state.cart.lock().await;

        let waiting = tokio::time::timeout(Duration::from_millis(20), state.begin_checkout()).await;
        assert!(waiting.is_err());
        assert!(!state.is_checkout_in_flight());

        drop(held);
        assert!(state.begin_checkout().await.is_ok());
    }

    #[tokio::test]
    async fn test_mutation_rejected_during_checkout() {
        let catalog = catalog();
        let state = CartState::new();
        state
            .mutate(|cart| cart.add_item(&catalog, "A", 1))
            .await
            .unwrap();

        let guard = state.begin_checkout().await.unwrap();
        let result = state.mutate(|cart| cart.add_item(&catalog, "A", 1)).await;
        assert_eq!(result, Err(CoreError::CheckoutInProgress));
        drop(guard);

        assert_eq!(state.snapshot().await.quantity_of("A"), 1);
    }
}
