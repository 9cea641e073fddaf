use thiserror::Error;

/// Reply text for any failure that is not an expected cart outcome.
pub const GENERIC_APOLOGY: &str =
    "Sorry, something went wrong on our side. Please try that again in a moment.";

/// Expected, user-facing outcomes of cart operations. None of these are system failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("no item was named in the request")]
    MissingItem,
    #[error("item `{item_key}` is not on the menu")]
    UnknownItem { item_key: String },
    #[error("quantity {quantity} is not valid for this operation")]
    InvalidQuantity { quantity: u32 },
    #[error("item `{item_key}` is not in the cart")]
    ItemNotInCart { item_key: String },
    #[error("the cart is empty")]
    EmptyCart,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog entry `{display_name}` has an empty key")]
    EmptyKey { display_name: String },
    #[error("catalog entry `{key}` has no display name")]
    MissingDisplayName { key: String },
    #[error("catalog entry `{key}` has a negative unit price")]
    NegativePrice { key: String },
    #[error("catalog key `{key}` is defined more than once")]
    DuplicateKey { key: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("cart storage failure: {0}")]
    Storage(String),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl ApplicationError {
    pub fn user_message(&self) -> &'static str {
        GENERIC_APOLOGY
    }

    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Storage(_) => "storage",
            Self::MalformedRequest(_) => "malformed_request",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, CartError, CatalogError, GENERIC_APOLOGY};

    #[test]
    fn system_failures_share_the_generic_apology() {
        for error in [
            ApplicationError::Storage("lock poisoned".to_owned()),
            ApplicationError::MalformedRequest("expected object".to_owned()),
        ] {
            assert_eq!(error.user_message(), GENERIC_APOLOGY);
        }
    }

    #[test]
    fn system_failures_carry_stable_log_labels() {
        assert_eq!(ApplicationError::Storage("offline".to_owned()).kind(), "storage");
        assert_eq!(
            ApplicationError::MalformedRequest("eof".to_owned()).kind(),
            "malformed_request"
        );
    }

    #[test]
    fn catalog_errors_name_the_offending_key() {
        let error = CatalogError::DuplicateKey { key: "pizza".to_owned() };
        assert_eq!(error.to_string(), "catalog key `pizza` is defined more than once");
    }

    #[test]
    fn cart_errors_describe_the_offending_item() {
        let error = CartError::UnknownItem { item_key: "sushi".to_owned() };
        assert_eq!(error.to_string(), "item `sushi` is not on the menu");
    }
}
