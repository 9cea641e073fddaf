//! Cart engine: the per-session ordering state machine.
//!
//! Every mutating operation recomputes `Cart::subtotal` before it returns, so
//! callers never observe a subtotal that disagrees with the current lines.

pub mod catalog;
pub mod pricing;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::{Cart, CartLine};
use crate::domain::menu::ItemKey;
use crate::errors::CartError;

use self::catalog::Catalog;
use self::pricing::{checkout_totals, CheckoutTotals};

/// Passing this to [`remove_item`] drops the whole line.
pub const REMOVE_ALL: u32 = 0;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedLine {
    pub item_key: ItemKey,
    pub display_name: String,
    pub added: u32,
    pub line_quantity: u32,
    pub subtotal: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineView {
    pub item_key: ItemKey,
    pub display_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedLine {
    pub item_key: ItemKey,
    pub removed: u32,
    /// Zero when the line was dropped from the cart.
    pub remaining: u32,
    pub subtotal: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub totals: CheckoutTotals,
    pub tax_rate: Decimal,
    pub item_count: u32,
}

pub fn add_item(
    cart: &mut Cart,
    catalog: &Catalog,
    item_key: &ItemKey,
    quantity: u32,
) -> Result<AddedLine, CartError> {
    if quantity < 1 {
        return Err(CartError::InvalidQuantity { quantity });
    }
    let entry = catalog
        .lookup(item_key)
        .ok_or_else(|| CartError::UnknownItem { item_key: item_key.0.clone() })?;

    let line_quantity = match cart.line_mut(item_key) {
        Some(line) => {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or(CartError::InvalidQuantity { quantity })?;
            line.quantity
        }
        None => {
            cart.lines.push(CartLine {
                item_key: item_key.clone(),
                quantity,
                unit_price: entry.unit_price,
            });
            quantity
        }
    };
    let subtotal = cart.recompute_subtotal();

    Ok(AddedLine {
        item_key: item_key.clone(),
        display_name: entry.display_name.clone(),
        added: quantity,
        line_quantity,
        subtotal,
    })
}

pub fn show_cart(cart: &Cart, catalog: &Catalog) -> Result<CartView, CartError> {
    if cart.is_empty() {
        return Err(CartError::EmptyCart);
    }

    let lines = cart
        .lines()
        .iter()
        .map(|line| CartLineView {
            item_key: line.item_key.clone(),
            display_name: catalog.display_name(&line.item_key).to_owned(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total(),
        })
        .collect();

    Ok(CartView { lines, subtotal: cart.subtotal() })
}

/// `quantity == REMOVE_ALL` drops the line regardless of how many are in the cart.
pub fn remove_item(
    cart: &mut Cart,
    item_key: &ItemKey,
    quantity: u32,
) -> Result<RemovedLine, CartError> {
    let position = cart
        .lines
        .iter()
        .position(|line| &line.item_key == item_key)
        .ok_or_else(|| CartError::ItemNotInCart { item_key: item_key.0.clone() })?;

    let current = cart.lines[position].quantity;
    let (removed, remaining) = if quantity == REMOVE_ALL || quantity >= current {
        cart.lines.remove(position);
        (current, 0)
    } else {
        cart.lines[position].quantity = current - quantity;
        (quantity, current - quantity)
    };
    let subtotal = cart.recompute_subtotal();

    Ok(RemovedLine { item_key: item_key.clone(), removed, remaining, subtotal })
}

pub fn clear_cart(cart: &mut Cart) -> Decimal {
    cart.lines.clear();
    cart.recompute_subtotal()
}

/// Consumes the cart: on success it is reset exactly like [`clear_cart`].
pub fn checkout(cart: &mut Cart, tax_rate: Decimal) -> Result<CheckoutReceipt, CartError> {
    if cart.is_empty() {
        return Err(CartError::EmptyCart);
    }

    let subtotal = cart.recompute_subtotal();
    let receipt = CheckoutReceipt {
        totals: checkout_totals(subtotal, tax_rate),
        tax_rate,
        item_count: cart.item_count(),
    };
    clear_cart(cart);

    Ok(receipt)
}
