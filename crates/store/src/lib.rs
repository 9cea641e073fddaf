//! Session cart storage.
//!
//! [`CartStore`] is the seam between the dispatcher and wherever carts live.
//! The in-process [`InMemoryCartStore`] keeps carts for the lifetime of the
//! process; a durable store (for example a key-value cache with a TTL) can be
//! swapped in behind the same trait without touching the cart engine.

use std::sync::Arc;

use async_trait::async_trait;
use orderdesk_core::{ApplicationError, Cart, SessionId};
use thiserror::Error;
use tokio::sync::Mutex;

pub mod memory;

pub use memory::InMemoryCartStore;

/// Shared cart slot. Holding the lock serializes every read-modify-write on one session.
pub type CartHandle = Arc<Mutex<Cart>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cart store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ApplicationError {
    fn from(value: StoreError) -> Self {
        ApplicationError::Storage(value.to_string())
    }
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Creates an empty cart on first reference to `session_id`.
    async fn get_or_create(&self, session_id: &SessionId) -> Result<CartHandle, StoreError>;

    /// Empties the session's cart. The session itself stays in the store.
    async fn reset(&self, session_id: &SessionId) -> Result<(), StoreError>;

    async fn session_count(&self) -> Result<usize, StoreError>;
}

#[async_trait]
impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    async fn get_or_create(&self, session_id: &SessionId) -> Result<CartHandle, StoreError> {
        (**self).get_or_create(session_id).await
    }

    async fn reset(&self, session_id: &SessionId) -> Result<(), StoreError> {
        (**self).reset(session_id).await
    }

    async fn session_count(&self) -> Result<usize, StoreError> {
        (**self).session_count().await
    }
}
