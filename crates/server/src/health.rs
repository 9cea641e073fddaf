use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use orderdesk_store::CartStore;
use serde::Serialize;

use crate::app::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub store: HealthCheck,
    pub sessions: Option<usize>,
    pub catalog_items: usize,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (store, sessions) = match state.dispatcher.store().session_count().await {
        Ok(count) => (
            HealthCheck { status: "ready", detail: "cart store reachable".to_string() },
            Some(count),
        ),
        Err(error) => (
            HealthCheck { status: "degraded", detail: format!("cart store failed: {error}") },
            None,
        ),
    };
    let ready = store.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "orderdesk-server runtime initialized".to_string(),
        },
        store,
        sessions,
        catalog_items: state.dispatcher.catalog().len(),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{extract::State, http::StatusCode, Json};
    use orderdesk_core::{Catalog, SessionId};
    use orderdesk_store::{CartHandle, CartStore, InMemoryCartStore, StoreError};
    use orderdesk_webhook::{ParameterNormalizer, ReplyFormatter};
    use rust_decimal::Decimal;

    use crate::app::{AppState, SharedStore};
    use crate::health::health;

    struct UnreachableStore;

    #[async_trait]
    impl CartStore for UnreachableStore {
        async fn get_or_create(&self, _session_id: &SessionId) -> Result<CartHandle, StoreError> {
            Err(StoreError::Unavailable("timeout".to_owned()))
        }

        async fn reset(&self, _session_id: &SessionId) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("timeout".to_owned()))
        }

        async fn session_count(&self) -> Result<usize, StoreError> {
            Err(StoreError::Unavailable("timeout".to_owned()))
        }
    }

    fn state_with(store: SharedStore) -> AppState {
        AppState::new(
            store,
            Arc::new(Catalog::with_default_menu()),
            ParameterNormalizer::default(),
            Decimal::new(5, 2),
            ReplyFormatter::default(),
        )
    }

    #[tokio::test]
    async fn health_reports_sessions_and_catalog_size() {
        let store = Arc::new(InMemoryCartStore::new());
        store.get_or_create(&SessionId("s1".to_owned())).await.expect("cart should be created");

        let (status, Json(payload)) = health(State(state_with(store))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.store.status, "ready");
        assert_eq!(payload.sessions, Some(1));
        assert_eq!(payload.catalog_items, 5);
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_store_fails() {
        let (status, Json(payload)) = health(State(state_with(Arc::new(UnreachableStore)))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.store.status, "degraded");
        assert_eq!(payload.service.status, "ready");
        assert_eq!(payload.sessions, None);
    }
}
