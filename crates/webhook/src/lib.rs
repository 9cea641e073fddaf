//! Conversational webhook layer for orderdesk.
//!
//! This crate turns an NLU fulfillment request into a cart operation and the
//! operation's outcome back into a single plain-text reply:
//! - **Requests** (`request`) - session and intent extraction from the inbound JSON
//! - **Parameters** (`params`) - loose NLU parameters to a typed item selection
//! - **Intents** (`intents`) - alias table and the per-session dispatcher
//! - **Replies** (`reply`) - response envelope and message wording
//! - **Currency** (`currency`) - locale-aware amount rendering
//!
//! # Architecture
//!
//! ```text
//! JSON body → IntentRequest → IntentDispatcher → cart engine
//!                                   ↓
//!                 WebhookReply ← ReplyFormatter ← HandlerOutcome
//! ```

pub mod currency;
pub mod intents;
pub mod params;
pub mod reply;
pub mod request;

pub use currency::CurrencyFormatter;
pub use intents::{resolve_intent, HandlerOutcome, IntentDispatcher, IntentKind, IntentRoute};
pub use params::{ItemSelection, ParameterNormalizer};
pub use reply::{ReplyFormatter, WebhookReply};
pub use request::{parse_request, IntentRequest, WebhookRequest};
