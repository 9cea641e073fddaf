use std::collections::HashMap;
use std::sync::Arc;

use orderdesk_core::cart::clear_cart;
use orderdesk_core::{Cart, SessionId};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::{CartHandle, CartStore, StoreError};

/// Process-wide cart map. The outer lock is only held to find or insert a
/// slot; per-session work happens under that session's own mutex.
#[derive(Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<SessionId, CartHandle>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CartStore for InMemoryCartStore {
    async fn get_or_create(&self, session_id: &SessionId) -> Result<CartHandle, StoreError> {
        if let Some(handle) = self.carts.read().await.get(session_id) {
            return Ok(Arc::clone(handle));
        }

        let mut carts = self.carts.write().await;
        let handle = carts.entry(session_id.clone()).or_insert_with(|| {
            debug!(
                event_name = "store.cart.created",
                session_id = %session_id,
                "created empty cart for new session"
            );
            Arc::new(Mutex::new(Cart::new(session_id.clone())))
        });
        Ok(Arc::clone(handle))
    }

    async fn reset(&self, session_id: &SessionId) -> Result<(), StoreError> {
        let handle = self.get_or_create(session_id).await?;
        let mut cart = handle.lock().await;
        clear_cart(&mut cart);
        Ok(())
    }

    async fn session_count(&self) -> Result<usize, StoreError> {
        Ok(self.carts.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use orderdesk_core::cart::add_item;
    use orderdesk_core::{Catalog, ItemKey, SessionId};
    use rust_decimal::Decimal;

    use crate::{CartStore, InMemoryCartStore};

    fn session(raw: &str) -> SessionId {
        SessionId(raw.to_string())
    }

    #[tokio::test]
    async fn carts_are_created_lazily_and_reused() {
        let store = InMemoryCartStore::new();
        assert_eq!(store.session_count().await.expect("count"), 0);

        let first = store.get_or_create(&session("A")).await.expect("create");
        let second = store.get_or_create(&session("A")).await.expect("reuse");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.session_count().await.expect("count"), 1);
        assert!(first.lock().await.is_empty());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemoryCartStore::new();
        let catalog = Catalog::with_default_menu();

        let cart_a = store.get_or_create(&session("A")).await.expect("cart A");
        add_item(&mut *cart_a.lock().await, &catalog, &ItemKey("pizza".to_string()), 2)
            .expect("add to A");

        let cart_b = store.get_or_create(&session("B")).await.expect("cart B");
        assert!(cart_b.lock().await.is_empty());
        assert_eq!(cart_a.lock().await.subtotal(), Decimal::new(2198, 2));
    }

    #[tokio::test]
    async fn reset_empties_cart_but_keeps_session() {
        let store = InMemoryCartStore::new();
        let catalog = Catalog::with_default_menu();
        let handle = store.get_or_create(&session("A")).await.expect("cart");
        add_item(&mut *handle.lock().await, &catalog, &ItemKey("soda".to_string()), 1)
            .expect("add");

        store.reset(&session("A")).await.expect("reset");

        assert!(handle.lock().await.is_empty());
        assert_eq!(handle.lock().await.subtotal(), Decimal::ZERO);
        assert_eq!(store.session_count().await.expect("count"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_on_one_session_are_serialized() {
        let store = Arc::new(InMemoryCartStore::new());
        let catalog = Arc::new(Catalog::with_default_menu());

        let tasks = (0..64)
            .map(|_| {
                let store = Arc::clone(&store);
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    let handle = store.get_or_create(&session("shared")).await.expect("cart");
                    let mut cart = handle.lock().await;
                    add_item(&mut cart, &catalog, &ItemKey("fries".to_string()), 1).expect("add");
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.expect("task");
        }

        let handle = store.get_or_create(&session("shared")).await.expect("cart");
        let cart = handle.lock().await;
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 64);
        assert_eq!(cart.subtotal(), Decimal::new(349 * 64, 2));
        assert_eq!(store.session_count().await.expect("count"), 1);
    }
}
