use axum::{body::Bytes, extract::State, Json};
use orderdesk_webhook::{parse_request, WebhookReply};
use tracing::{error, info_span, warn, Instrument};
use uuid::Uuid;

use crate::app::AppState;

/// Fulfillment entry point. Every reply is a 200 with the text envelope;
/// failures are logged and answered with the generic apology.
pub async fn fulfill(State(state): State<AppState>, body: Bytes) -> Json<WebhookReply> {
    let correlation_id = Uuid::new_v4().to_string();
    let span = info_span!("webhook.request", correlation_id = %correlation_id);
    Json(reply_for(&state, &body, &correlation_id).instrument(span).await)
}

async fn reply_for(state: &AppState, body: &[u8], correlation_id: &str) -> WebhookReply {
    let request = match parse_request(body) {
        Ok(request) => request,
        Err(error) => {
            warn!(
                event_name = "webhook.request.malformed",
                correlation_id,
                error_kind = error.kind(),
                error = %error,
                body_bytes = body.len(),
                "rejected malformed webhook body"
            );
            return WebhookReply::apology();
        }
    };

    match state.dispatcher.dispatch(&request).await {
        Ok(outcome) => state.formatter.render(&outcome),
        Err(error) => {
            error!(
                event_name = "webhook.request.failed",
                correlation_id,
                session_id = %request.session_id,
                intent_name = %request.intent_name,
                error_kind = error.kind(),
                error = %error,
                "webhook request failed"
            );
            WebhookReply::text(error.user_message())
        }
    }
}
