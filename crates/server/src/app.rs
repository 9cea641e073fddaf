use std::any::Any;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use orderdesk_core::Catalog;
use orderdesk_store::CartStore;
use orderdesk_webhook::{IntentDispatcher, ParameterNormalizer, ReplyFormatter, WebhookReply};
use rust_decimal::Decimal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::{health, webhook};

pub type SharedStore = Arc<dyn CartStore>;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<IntentDispatcher<SharedStore>>,
    pub formatter: Arc<ReplyFormatter>,
}

impl AppState {
    pub fn new(
        store: SharedStore,
        catalog: Arc<Catalog>,
        parameters: ParameterNormalizer,
        tax_rate: Decimal,
        formatter: ReplyFormatter,
    ) -> Self {
        Self {
            dispatcher: Arc::new(IntentDispatcher::new(store, catalog, parameters, tax_rate)),
            formatter: Arc::new(formatter),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(webhook::fulfill))
        .route("/webhook", post(webhook::fulfill))
        .route("/health", get(health::health))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_reply))
        .layer(TraceLayer::new_for_http())
}

/// A panic while handling a request still answers with the apology envelope.
pub fn panic_reply(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else {
        "unknown panic payload".to_owned()
    };

    error!(
        event_name = "webhook.request.panicked",
        error_kind = "panic",
        detail = %detail,
        "request handler panicked"
    );
    (StatusCode::OK, Json(WebhookReply::apology())).into_response()
}
