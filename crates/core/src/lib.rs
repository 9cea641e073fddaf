//! Orderdesk core: menu catalog, per-session cart state machine, checkout
//! pricing, and runtime configuration.
//!
//! Nothing in this crate performs I/O beyond reading the config file; carts are
//! plain values mutated through the functions in [`cart`].

pub mod cart;
pub mod config;
pub mod domain;
pub mod errors;

pub use cart::catalog::Catalog;
pub use cart::pricing::{round_currency, CheckoutTotals};
pub use cart::{AddedLine, CartLineView, CartView, CheckoutReceipt, RemovedLine, REMOVE_ALL};
pub use domain::cart::{Cart, CartLine, SessionId, ANONYMOUS_SESSION_ID};
pub use domain::menu::{CatalogEntry, ItemKey};
pub use errors::{ApplicationError, CartError, CatalogError, GENERIC_APOLOGY};
