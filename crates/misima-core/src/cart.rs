//! Cart view projection and the mutation payloads the `/cart` endpoint accepts.
//!
//! The commerce platform owns the cart; this module only shapes what it
//! returns into render-ready state and prepares mutation inputs. No I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blend::collection_slug;
use crate::money::Money;
use crate::product::Image;
use crate::variant::{variant_url, SelectedOption};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub checkout_url: Option<String>,
    pub total_quantity: u32,
    pub lines: Vec<CartLine>,
    pub subtotal: Option<Money>,
    pub total: Option<Money>,
    pub discount_codes: Vec<DiscountCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: String,
    pub applicable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: u32,
    pub merchandise: Merchandise,
    /// Absent when the platform returned no cost data for the line.
    pub cost: Option<CartLineCost>,
}

/// The purchasable variant a line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchandise {
    pub id: String,
    pub title: String,
    pub product_title: String,
    pub product_handle: String,
    pub image: Option<Image>,
    pub selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineCost {
    pub amount_per_quantity: Option<Money>,
    pub total_amount: Option<Money>,
    pub compare_at_amount_per_quantity: Option<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceType {
    Regular,
    CompareAt,
}

impl CartLine {
    #[must_use]
    pub fn decrease_target(&self) -> u32 {
        self.quantity.saturating_sub(1)
    }

    #[must_use]
    pub fn increase_target(&self) -> u32 {
        self.quantity.saturating_add(1)
    }

    /// Going below one is only possible through an explicit removal.
    #[must_use]
    pub fn decrease_disabled(&self) -> bool {
        self.quantity <= 1
    }

    /// `LinesUpdate` for the decrease control, `None` while it is disabled.
    #[must_use]
    pub fn decrease_mutation(&self) -> Option<CartMutation> {
        if self.decrease_disabled() {
            return None;
        }
        Some(CartMutation::update_one(&self.id, self.decrease_target()))
    }

    #[must_use]
    pub fn increase_mutation(&self) -> CartMutation {
        CartMutation::update_one(&self.id, self.increase_target())
    }

    #[must_use]
    pub fn remove_mutation(&self) -> CartMutation {
        CartMutation::LinesRemove {
            line_ids: vec![self.id.clone()],
        }
    }

    /// Regular price is the line total; compare-at is per unit.
    ///
    /// Nothing is shown unless the line carries both per-unit and total cost.
    #[must_use]
    pub fn price(&self, price_type: PriceType) -> Option<&Money> {
        let cost = self.cost.as_ref()?;
        cost.amount_per_quantity.as_ref()?;
        let total = cost.total_amount.as_ref()?;
        match price_type {
            PriceType::Regular => Some(total),
            PriceType::CompareAt => cost.compare_at_amount_per_quantity.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineUpdateInput {
    pub id: String,
    pub quantity: u32,
}

/// A cart mutation as submitted to the `/cart` endpoint.
///
/// Wire shape: `{"action": "LinesUpdate", "inputs": {"lines": [...]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "inputs")]
pub enum CartMutation {
    LinesAdd {
        lines: Vec<CartLineInput>,
    },
    LinesUpdate {
        lines: Vec<CartLineUpdateInput>,
    },
    LinesRemove {
        #[serde(rename = "lineIds")]
        line_ids: Vec<String>,
    },
    DiscountCodesUpdate {
        #[serde(rename = "discountCodes", default)]
        discount_codes: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartMutationError {
    #[error("{action} requires at least one entry")]
    Empty { action: &'static str },

    #[error("quantity for {target} must be at least 1; use LinesRemove to drop a line")]
    ZeroQuantity { target: String },

    #[error("{action} requires an existing cart")]
    MissingCart { action: &'static str },
}

impl CartMutation {
    fn update_one(line_id: &str, quantity: u32) -> Self {
        CartMutation::LinesUpdate {
            lines: vec![CartLineUpdateInput {
                id: line_id.to_owned(),
                quantity,
            }],
        }
    }

    /// One unit of a variant, as the product cards' quick-add button submits.
    #[must_use]
    pub fn add_one(merchandise_id: &str) -> Self {
        CartMutation::LinesAdd {
            lines: vec![CartLineInput {
                merchandise_id: merchandise_id.to_owned(),
                quantity: 1,
            }],
        }
    }

    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            CartMutation::LinesAdd { .. } => "LinesAdd",
            CartMutation::LinesUpdate { .. } => "LinesUpdate",
            CartMutation::LinesRemove { .. } => "LinesRemove",
            CartMutation::DiscountCodesUpdate { .. } => "DiscountCodesUpdate",
        }
    }

    /// Whether the mutation may run without a cart (one is created for it).
    #[must_use]
    pub fn creates_cart(&self) -> bool {
        matches!(self, CartMutation::LinesAdd { .. })
    }

    /// Prepends the free-text code typed into the discount form, if any.
    #[must_use]
    pub fn with_form_discount_code(self, code: Option<&str>) -> Self {
        match (self, code.map(str::trim).filter(|c| !c.is_empty())) {
            (CartMutation::DiscountCodesUpdate { discount_codes }, Some(code)) => {
                let mut codes = Vec::with_capacity(discount_codes.len() + 1);
                codes.push(code.to_owned());
                codes.extend(discount_codes.into_iter().filter(|c| c != code));
                CartMutation::DiscountCodesUpdate {
                    discount_codes: codes,
                }
            }
            (other, _) => other,
        }
    }

    /// Rejects inputs the storefront never produces itself.
    ///
    /// # Errors
    ///
    /// - [`CartMutationError::Empty`] for line mutations with no entries.
    /// - [`CartMutationError::ZeroQuantity`] for adds or updates to zero.
    pub fn validate(&self) -> Result<(), CartMutationError> {
        let action = self.action();
        match self {
            CartMutation::LinesAdd { lines } => {
                if lines.is_empty() {
                    return Err(CartMutationError::Empty { action });
                }
                if let Some(line) = lines.iter().find(|l| l.quantity == 0) {
                    return Err(CartMutationError::ZeroQuantity {
                        target: line.merchandise_id.clone(),
                    });
                }
            }
            CartMutation::LinesUpdate { lines } => {
                if lines.is_empty() {
                    return Err(CartMutationError::Empty { action });
                }
                if let Some(line) = lines.iter().find(|l| l.quantity == 0) {
                    return Err(CartMutationError::ZeroQuantity {
                        target: line.id.clone(),
                    });
                }
            }
            CartMutation::LinesRemove { line_ids } => {
                if line_ids.is_empty() {
                    return Err(CartMutationError::Empty { action });
                }
            }
            // An empty list clears all codes.
            CartMutation::DiscountCodesUpdate { .. } => {}
        }
        Ok(())
    }
}

/// Render-ready state for one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub line_id: String,
    pub product_title: String,
    pub variant_title: String,
    pub product_handle: String,
    /// Border style suffix, first five characters of the handle.
    pub handle_slug: String,
    /// Button style suffix, the product title up to the first `'`, lower-cased.
    pub button_slug: String,
    pub variant_url: String,
    pub image: Option<Image>,
    pub quantity: u32,
    pub decrease_target: u32,
    pub increase_target: u32,
    pub decrease_disabled: bool,
    pub regular_price: Option<Money>,
    pub compare_at_price: Option<Money>,
    pub decrease: Option<CartMutation>,
    pub increase: CartMutation,
    pub remove: CartMutation,
}

#[must_use]
pub fn project_line(line: &CartLine) -> CartLineView {
    let merchandise = &line.merchandise;
    let button_slug = merchandise
        .product_title
        .split('\'')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    CartLineView {
        line_id: line.id.clone(),
        product_title: merchandise.product_title.clone(),
        variant_title: merchandise.title.clone(),
        product_handle: merchandise.product_handle.clone(),
        handle_slug: collection_slug(&merchandise.product_handle),
        button_slug,
        variant_url: variant_url(&merchandise.product_handle, &merchandise.selected_options),
        image: merchandise.image.clone(),
        quantity: line.quantity,
        decrease_target: line.decrease_target(),
        increase_target: line.increase_target(),
        decrease_disabled: line.decrease_disabled(),
        regular_price: line.price(PriceType::Regular).cloned(),
        compare_at_price: line.price(PriceType::CompareAt).cloned(),
        decrease: line.decrease_mutation(),
        increase: line.increase_mutation(),
        remove: line.remove_mutation(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub id: Option<String>,
    pub has_items: bool,
    pub total_quantity: u32,
    pub lines: Vec<CartLineView>,
    pub subtotal: Option<Money>,
    pub checkout_url: Option<String>,
    pub applicable_discount_codes: Vec<String>,
    pub with_discount: bool,
}

impl CartView {
    /// State shown before a cart exists.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: None,
            has_items: false,
            total_quantity: 0,
            lines: Vec::new(),
            subtotal: None,
            checkout_url: None,
            applicable_discount_codes: Vec::new(),
            with_discount: false,
        }
    }
}

#[must_use]
pub fn project_cart(cart: &Cart) -> CartView {
    let applicable_discount_codes: Vec<String> = cart
        .discount_codes
        .iter()
        .filter(|d| d.applicable)
        .map(|d| d.code.clone())
        .collect();

    CartView {
        id: Some(cart.id.clone()),
        has_items: cart.total_quantity > 0,
        total_quantity: cart.total_quantity,
        lines: cart.lines.iter().map(project_line).collect(),
        subtotal: cart.subtotal.clone(),
        checkout_url: cart.checkout_url.clone().filter(|u| !u.is_empty()),
        with_discount: !applicable_discount_codes.is_empty(),
        applicable_discount_codes,
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
