//! Loose NLU parameters to typed selections.
//!
//! Parameter bags arrive with inconsistent field names and value shapes. The
//! normalizer is total: every input produces a selection, and a field that is
//! absent or unusable simply counts as not supplied.

use orderdesk_core::config::{
    ParametersConfig, DEFAULT_ITEM_FIELDS, DEFAULT_ORDER_ID_FIELDS, DEFAULT_QUANTITY_FIELDS,
};
use orderdesk_core::{CartError, ItemKey, REMOVE_ALL};
use serde_json::{Number, Value};

pub const ADD_DEFAULT_QUANTITY: u32 = 1;
pub const REMOVE_DEFAULT_QUANTITY: u32 = REMOVE_ALL;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemSelection {
    /// `None` when no candidate field carried a usable item.
    pub item_key: Option<ItemKey>,
    pub quantity: u32,
}

impl ItemSelection {
    pub fn item(&self) -> Result<&ItemKey, CartError> {
        self.item_key.as_ref().ok_or(CartError::MissingItem)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterNormalizer {
    item_fields: Vec<String>,
    quantity_fields: Vec<String>,
    order_id_fields: Vec<String>,
}

impl Default for ParameterNormalizer {
    fn default() -> Self {
        Self {
            item_fields: owned(&DEFAULT_ITEM_FIELDS),
            quantity_fields: owned(&DEFAULT_QUANTITY_FIELDS),
            order_id_fields: owned(&DEFAULT_ORDER_ID_FIELDS),
        }
    }
}

impl From<&ParametersConfig> for ParameterNormalizer {
    fn from(config: &ParametersConfig) -> Self {
        Self {
            item_fields: config.item_fields.clone(),
            quantity_fields: config.quantity_fields.clone(),
            order_id_fields: config.order_id_fields.clone(),
        }
    }
}

impl ParameterNormalizer {
    /// The first candidate field that is present and non-null decides the value.
    /// `default_quantity` applies when no quantity is given or it is not a positive number.
    pub fn item_selection(&self, parameters: &Value, default_quantity: u32) -> ItemSelection {
        let item_key = first_present(parameters, &self.item_fields)
            .and_then(coerce_text)
            .and_then(|raw| ItemKey::normalize(&raw));
        let quantity = first_present(parameters, &self.quantity_fields)
            .and_then(coerce_quantity)
            .unwrap_or(default_quantity);

        ItemSelection { item_key, quantity }
    }

    pub fn order_id(&self, parameters: &Value) -> Option<String> {
        first_present(parameters, &self.order_id_fields)
            .and_then(coerce_text)
            .filter(|id| !id.is_empty())
    }
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| (*field).to_owned()).collect()
}

fn first_present<'a>(parameters: &'a Value, candidates: &[String]) -> Option<&'a Value> {
    let object = parameters.as_object()?;
    candidates
        .iter()
        .find_map(|name| object.get(name.as_str()).filter(|value| !value.is_null()))
}

/// Lists contribute their first element.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number_text(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(values) => values.first().and_then(coerce_text),
        Value::Null | Value::Object(_) => None,
    }
}

fn coerce_quantity(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Array(values) => return values.first().and_then(coerce_quantity),
        _ => return None,
    };
    if !number.is_finite() || number <= 0.0 {
        return None;
    }

    // Float-to-int `as` saturates, so huge counts clamp to u32::MAX.
    Some(number.trunc() as u32)
}

/// NLU number entities arrive as floats; `12345.0` should read as `12345`.
fn number_text(number: &Number) -> String {
    if number.is_f64() {
        if let Some(value) = number.as_f64() {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                return format!("{}", value as i64);
            }
        }
    }
    number.to_string()
}

#[cfg(test)]
mod tests {
    use orderdesk_core::config::ParametersConfig;
    use orderdesk_core::{CartError, ItemKey};
    use serde_json::json;

    use super::{ParameterNormalizer, ADD_DEFAULT_QUANTITY, REMOVE_DEFAULT_QUANTITY};

    fn key(raw: &str) -> Option<ItemKey> {
        Some(ItemKey(raw.to_owned()))
    }

    #[test]
    fn reads_first_present_candidate_fields() {
        let normalizer = ParameterNormalizer::default();
        let selection = normalizer.item_selection(
            &json!({ "food_item": "  Pizza ", "menu_item": "burger", "qty": "3" }),
            ADD_DEFAULT_QUANTITY,
        );

        assert_eq!(selection.item_key, key("pizza"));
        assert_eq!(selection.quantity, 3);
    }

    #[test]
    fn null_candidates_are_skipped() {
        let normalizer = ParameterNormalizer::default();
        let selection = normalizer
            .item_selection(&json!({ "item": null, "product": "fries" }), ADD_DEFAULT_QUANTITY);

        assert_eq!(selection.item_key, key("fries"));
        assert_eq!(selection.quantity, ADD_DEFAULT_QUANTITY);
    }

    #[test]
    fn list_values_contribute_their_first_element() {
        let normalizer = ParameterNormalizer::default();
        let selection = normalizer.item_selection(
            &json!({ "item": ["Soda", "salad"], "number": [2.0, 5] }),
            ADD_DEFAULT_QUANTITY,
        );

        assert_eq!(selection.item_key, key("soda"));
        assert_eq!(selection.quantity, 2);
    }

    #[test]
    fn unusable_quantities_fall_back_to_the_default() {
        let normalizer = ParameterNormalizer::default();
        for quantity in [json!("two"), json!(-3), json!(0), json!({}), json!(true), json!([])] {
            let selection = normalizer
                .item_selection(&json!({ "item": "pizza", "quantity": quantity }), 7);
            assert_eq!(selection.quantity, 7, "quantity {quantity} should use the default");
        }
    }

    #[test]
    fn quantities_truncate_and_saturate() {
        let normalizer = ParameterNormalizer::default();
        let truncated =
            normalizer.item_selection(&json!({ "item": "pizza", "quantity": 2.9 }), 1);
        let below_one =
            normalizer.item_selection(&json!({ "item": "pizza", "quantity": 0.5 }), 1);
        let huge = normalizer.item_selection(&json!({ "item": "pizza", "quantity": 1e12 }), 1);

        assert_eq!(truncated.quantity, 2);
        assert_eq!(below_one.quantity, 0);
        assert_eq!(huge.quantity, u32::MAX);
    }

    #[test]
    fn missing_or_blank_item_is_reported_as_missing() {
        let normalizer = ParameterNormalizer::default();
        let bags = [json!({}), json!({ "item": "   " }), json!({ "item": {} }), json!("pizza")];
        for parameters in bags {
            let selection = normalizer.item_selection(&parameters, REMOVE_DEFAULT_QUANTITY);
            assert_eq!(selection.item_key, None);
            assert_eq!(selection.item(), Err(CartError::MissingItem));
            assert_eq!(selection.quantity, REMOVE_DEFAULT_QUANTITY);
        }
    }

    #[test]
    fn numeric_item_values_are_stringified() {
        let normalizer = ParameterNormalizer::default();
        let selection = normalizer.item_selection(&json!({ "item": 7 }), 1);

        assert_eq!(selection.item_key, key("7"));
    }

    #[test]
    fn order_ids_accept_strings_and_numbers() {
        let normalizer = ParameterNormalizer::default();

        assert_eq!(normalizer.order_id(&json!({ "orderId": " A-17 " })), Some("A-17".to_owned()));
        assert_eq!(normalizer.order_id(&json!({ "number": 12345.0 })), Some("12345".to_owned()));
        assert_eq!(normalizer.order_id(&json!({ "order_id": "" })), None);
        assert_eq!(normalizer.order_id(&json!(null)), None);
    }

    #[test]
    fn configured_field_names_take_priority() {
        let config = ParametersConfig {
            item_fields: vec!["dish".to_owned()],
            quantity_fields: vec!["count".to_owned()],
            order_id_fields: vec!["ticket".to_owned()],
        };
        let normalizer = ParameterNormalizer::from(&config);
        let selection =
            normalizer.item_selection(&json!({ "item": "pizza", "dish": "salad", "count": 4 }), 1);

        assert_eq!(selection.item_key, key("salad"));
        assert_eq!(selection.quantity, 4);
        assert_eq!(normalizer.order_id(&json!({ "ticket": "T9" })), Some("T9".to_owned()));
    }
}
