use std::sync::Arc;

use orderdesk_core::cart::{self, AddedLine, CartView, CheckoutReceipt, RemovedLine};
use orderdesk_core::{ApplicationError, CartError, Catalog, CatalogEntry};
use orderdesk_store::CartStore;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::params::{ParameterNormalizer, ADD_DEFAULT_QUANTITY, REMOVE_DEFAULT_QUANTITY};
use crate::request::IntentRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Welcome,
    ShowMenu,
    AddItem,
    ShowCart,
    RemoveItem,
    ClearCart,
    Checkout,
    CheckOrderStatus,
}

/// Intent display names accepted from the NLU agent. Matching ignores
/// surrounding whitespace and ASCII case.
const INTENT_ALIASES: &[(&str, IntentKind)] = &[
    ("Default Welcome Intent", IntentKind::Welcome),
    ("Welcome", IntentKind::Welcome),
    ("greeting", IntentKind::Welcome),
    ("ShowMenu", IntentKind::ShowMenu),
    ("Menu", IntentKind::ShowMenu),
    ("menu.show", IntentKind::ShowMenu),
    ("AddItem", IntentKind::AddItem),
    ("AddToCart", IntentKind::AddItem),
    ("order.add", IntentKind::AddItem),
    ("ShowCart", IntentKind::ShowCart),
    ("ViewCart", IntentKind::ShowCart),
    ("cart.show", IntentKind::ShowCart),
    ("RemoveItem", IntentKind::RemoveItem),
    ("RemoveFromCart", IntentKind::RemoveItem),
    ("order.remove", IntentKind::RemoveItem),
    ("ClearCart", IntentKind::ClearCart),
    ("EmptyCart", IntentKind::ClearCart),
    ("cart.clear", IntentKind::ClearCart),
    ("Checkout", IntentKind::Checkout),
    ("PlaceOrder", IntentKind::Checkout),
    ("order.checkout", IntentKind::Checkout),
    ("CheckOrderStatus", IntentKind::CheckOrderStatus),
    ("OrderStatus", IntentKind::CheckOrderStatus),
    ("order.status", IntentKind::CheckOrderStatus),
];

impl IntentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::ShowMenu => "show_menu",
            Self::AddItem => "add_item",
            Self::ShowCart => "show_cart",
            Self::RemoveItem => "remove_item",
            Self::ClearCart => "clear_cart",
            Self::Checkout => "checkout",
            Self::CheckOrderStatus => "check_order_status",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentRoute {
    Handler(IntentKind),
    Fallback { intent_name: String },
}

pub fn resolve_intent(intent_name: &str) -> IntentRoute {
    let wanted = intent_name.trim();
    INTENT_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(wanted))
        .map(|(_, kind)| IntentRoute::Handler(*kind))
        .unwrap_or_else(|| IntentRoute::Fallback { intent_name: wanted.to_owned() })
}

/// What a handler did, before any wording is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerOutcome {
    Welcome,
    Menu { entries: Vec<CatalogEntry> },
    ItemAdded(AddedLine),
    Cart(CartView),
    ItemRemoved { line: RemovedLine, display_name: String },
    CartCleared,
    CheckedOut(CheckoutReceipt),
    OrderStatus { order_id: Option<String> },
    /// Expected cart-level outcome, e.g. an unknown item.
    Rejected(CartError),
    Unrecognized { intent_name: String },
}

impl HandlerOutcome {
    /// Stable label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Menu { .. } => "menu",
            Self::ItemAdded(_) => "item_added",
            Self::Cart(_) => "cart",
            Self::ItemRemoved { .. } => "item_removed",
            Self::CartCleared => "cart_cleared",
            Self::CheckedOut(_) => "checked_out",
            Self::OrderStatus { .. } => "order_status",
            Self::Rejected(_) => "rejected",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// Routes intents to cart operations. A session's cart stays locked for the
/// whole handler, so concurrent requests on one session apply in turn.
pub struct IntentDispatcher<S> {
    store: S,
    catalog: Arc<Catalog>,
    parameters: ParameterNormalizer,
    tax_rate: Decimal,
}

impl<S> IntentDispatcher<S>
where
    S: CartStore,
{
    pub fn new(
        store: S,
        catalog: Arc<Catalog>,
        parameters: ParameterNormalizer,
        tax_rate: Decimal,
    ) -> Self {
        Self { store, catalog, parameters, tax_rate }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn dispatch(
        &self,
        request: &IntentRequest,
    ) -> Result<HandlerOutcome, ApplicationError> {
        let outcome = match resolve_intent(&request.intent_name) {
            IntentRoute::Handler(kind) => {
                debug!(
                    event_name = "webhook.intent.resolved",
                    session_id = %request.session_id,
                    intent = kind.as_str(),
                    "intent resolved to handler"
                );
                self.handle(kind, request).await?
            }
            IntentRoute::Fallback { intent_name } => HandlerOutcome::Unrecognized { intent_name },
        };

        info!(
            event_name = "webhook.intent.handled",
            session_id = %request.session_id,
            intent_name = %request.intent_name,
            outcome = outcome.label(),
            "intent handled"
        );
        Ok(outcome)
    }

    async fn handle(
        &self,
        kind: IntentKind,
        request: &IntentRequest,
    ) -> Result<HandlerOutcome, ApplicationError> {
        match kind {
            IntentKind::Welcome => Ok(HandlerOutcome::Welcome),
            IntentKind::ShowMenu => {
                Ok(HandlerOutcome::Menu { entries: self.catalog.entries().to_vec() })
            }
            IntentKind::AddItem => self.add_item(request).await,
            IntentKind::ShowCart => self.show_cart(request).await,
            IntentKind::RemoveItem => self.remove_item(request).await,
            IntentKind::ClearCart => {
                self.store.reset(&request.session_id).await?;
                Ok(HandlerOutcome::CartCleared)
            }
            IntentKind::Checkout => self.checkout(request).await,
            IntentKind::CheckOrderStatus => Ok(HandlerOutcome::OrderStatus {
                order_id: self.parameters.order_id(&request.parameters),
            }),
        }
    }

    async fn add_item(&self, request: &IntentRequest) -> Result<HandlerOutcome, ApplicationError> {
        let selection = self.parameters.item_selection(&request.parameters, ADD_DEFAULT_QUANTITY);
        let item_key = match selection.item() {
            Ok(item_key) => item_key,
            Err(error) => return Ok(HandlerOutcome::Rejected(error)),
        };

        let handle = self.store.get_or_create(&request.session_id).await?;
        let mut guard = handle.lock().await;
        Ok(match cart::add_item(&mut guard, &self.catalog, item_key, selection.quantity) {
            Ok(added) => HandlerOutcome::ItemAdded(added),
            Err(error) => HandlerOutcome::Rejected(error),
        })
    }

    async fn show_cart(&self, request: &IntentRequest) -> Result<HandlerOutcome, ApplicationError> {
        let handle = self.store.get_or_create(&request.session_id).await?;
        let guard = handle.lock().await;
        Ok(match cart::show_cart(&guard, &self.catalog) {
            Ok(view) => HandlerOutcome::Cart(view),
            Err(error) => HandlerOutcome::Rejected(error),
        })
    }

    async fn remove_item(
        &self,
        request: &IntentRequest,
    ) -> Result<HandlerOutcome, ApplicationError> {
        let selection =
            self.parameters.item_selection(&request.parameters, REMOVE_DEFAULT_QUANTITY);
        let item_key = match selection.item() {
            Ok(item_key) => item_key,
            Err(error) => return Ok(HandlerOutcome::Rejected(error)),
        };

        let handle = self.store.get_or_create(&request.session_id).await?;
        let mut guard = handle.lock().await;
        Ok(match cart::remove_item(&mut guard, item_key, selection.quantity) {
            Ok(line) => {
                let display_name = self.catalog.display_name(&line.item_key).to_owned();
                HandlerOutcome::ItemRemoved { line, display_name }
            }
            Err(error) => HandlerOutcome::Rejected(error),
        })
    }

    async fn checkout(&self, request: &IntentRequest) -> Result<HandlerOutcome, ApplicationError> {
        let handle = self.store.get_or_create(&request.session_id).await?;
        let mut guard = handle.lock().await;
        Ok(match cart::checkout(&mut guard, self.tax_rate) {
            Ok(receipt) => {
                info!(
                    event_name = "webhook.checkout.completed",
                    session_id = %request.session_id,
                    item_count = receipt.item_count,
                    total = %receipt.totals.total,
                    "order placed"
                );
                HandlerOutcome::CheckedOut(receipt)
            }
            Err(error) => HandlerOutcome::Rejected(error),
        })
    }
}
