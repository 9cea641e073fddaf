use orderdesk_core::{CartError, GENERIC_APOLOGY};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyFormatter;
use crate::intents::HandlerOutcome;

/// Fulfillment response: `{"fulfillmentMessages":[{"text":{"text":["..."]}}]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookReply {
    pub fulfillment_messages: Vec<FulfillmentMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentMessage {
    pub text: TextMessage,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: Vec<String>,
}

impl WebhookReply {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            fulfillment_messages: vec![FulfillmentMessage {
                text: TextMessage { text: vec![message.into()] },
            }],
        }
    }

    pub fn apology() -> Self {
        Self::text(GENERIC_APOLOGY)
    }

    pub fn message(&self) -> Option<&str> {
        self.fulfillment_messages
            .first()
            .and_then(|message| message.text.text.first())
            .map(String::as_str)
    }
}

/// Chooses the wording for every handler outcome.
#[derive(Clone, Debug, Default)]
pub struct ReplyFormatter {
    currency: CurrencyFormatter,
}

impl ReplyFormatter {
    pub fn new(currency: CurrencyFormatter) -> Self {
        Self { currency }
    }

    pub fn render(&self, outcome: &HandlerOutcome) -> WebhookReply {
        WebhookReply::text(self.message(outcome))
    }

    pub fn message(&self, outcome: &HandlerOutcome) -> String {
        match outcome {
            HandlerOutcome::Welcome => "Hi! Welcome to our kitchen. Say \"show menu\" to see what \
                                        we have, or tell me what you'd like to order."
                .to_owned(),
            HandlerOutcome::Menu { entries } => {
                let items = entries
                    .iter()
                    .map(|entry| {
                        format!("{} ({})", entry.display_name, self.money(entry.unit_price))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Here's our menu: {items}. What would you like?")
            }
            HandlerOutcome::ItemAdded(added) => format!(
                "Added {} x {} to your cart. You now have {} {}. Cart subtotal: {}.",
                added.added,
                added.display_name,
                added.line_quantity,
                added.display_name,
                self.money(added.subtotal)
            ),
            HandlerOutcome::Cart(view) => {
                let lines = view
                    .lines
                    .iter()
                    .map(|line| {
                        format!(
                            "{} x {} ({})",
                            line.quantity,
                            line.display_name,
                            self.money(line.line_total)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Your cart: {lines}. Subtotal: {}.", self.money(view.subtotal))
            }
            HandlerOutcome::ItemRemoved { line, display_name } => {
                if line.remaining == 0 {
                    format!(
                        "Removed {display_name} from your cart. Cart subtotal: {}.",
                        self.money(line.subtotal)
                    )
                } else {
                    format!(
                        "Removed {} x {display_name}. You have {} left. Cart subtotal: {}.",
                        line.removed,
                        line.remaining,
                        self.money(line.subtotal)
                    )
                }
            }
            HandlerOutcome::CartCleared => "Your cart is now empty.".to_owned(),
            HandlerOutcome::CheckedOut(receipt) => format!(
                "Order placed! Subtotal {}, tax ({}%) {}, total {}. Thanks for ordering!",
                self.money(receipt.totals.subtotal),
                (receipt.tax_rate * Decimal::ONE_HUNDRED).normalize(),
                self.money(receipt.totals.tax),
                self.money(receipt.totals.total)
            ),
            HandlerOutcome::OrderStatus { order_id: Some(order_id) } => {
                format!("Order {order_id} is being prepared and will be ready soon.")
            }
            HandlerOutcome::OrderStatus { order_id: None } => {
                "Sure, what's your order number?".to_owned()
            }
            HandlerOutcome::Rejected(error) => rejection_message(error),
            HandlerOutcome::Unrecognized { intent_name } if intent_name.is_empty() => {
                "Sorry, I didn't catch what you wanted to do. Say \"show menu\" to see what we \
                 have."
                    .to_owned()
            }
            HandlerOutcome::Unrecognized { intent_name } => {
                format!("Sorry, I don't know how to handle the intent \"{intent_name}\" yet.")
            }
        }
    }

    fn money(&self, amount: Decimal) -> String {
        self.currency.format(amount)
    }
}

fn rejection_message(error: &CartError) -> String {
    match error {
        CartError::MissingItem => {
            "Which item would you like? Say \"show menu\" to hear the options.".to_owned()
        }
        CartError::UnknownItem { item_key } => {
            format!("Sorry, we don't have \"{item_key}\" on the menu.")
        }
        CartError::InvalidQuantity { quantity: 0 } => {
            "Please choose a quantity of at least 1.".to_owned()
        }
        CartError::InvalidQuantity { .. } => {
            "That's more than we can fit on one order. Please choose a smaller quantity."
                .to_owned()
        }
        CartError::ItemNotInCart { item_key } => format!("There's no {item_key} in your cart."),
        CartError::EmptyCart => {
            "Your cart is empty. Add something from the menu first.".to_owned()
        }
    }
}
