//! Conversion from Storefront API shapes into `misima_core` types.

use std::str::FromStr;

use misima_core::{
    Cart, CartLine, CartLineCost, DiscountCode, Image, Merchandise, Money, Product,
    ProductOption, ProductSummary, ProductVariant, SelectedOption,
};
use rust_decimal::Decimal;

use crate::error::StorefrontError;
use crate::types::{
    MoneyV2, WireCart, WireCartLine, WireImage, WireProduct, WireProductItem,
    WireSelectedOption, WireVariant,
};

/// Parses a platform decimal string.
///
/// # Errors
///
/// Returns [`StorefrontError::Normalization`] if `amount` is not a decimal.
pub fn normalize_money(money: MoneyV2, context: &str) -> Result<Money, StorefrontError> {
    let amount = Decimal::from_str(money.amount.trim()).map_err(|e| {
        StorefrontError::Normalization {
            context: context.to_owned(),
            reason: format!("invalid amount \"{}\": {e}", money.amount),
        }
    })?;
    Ok(Money::new(amount, money.currency_code))
}

fn normalize_optional_money(
    money: Option<MoneyV2>,
    context: &str,
) -> Result<Option<Money>, StorefrontError> {
    money.map(|m| normalize_money(m, context)).transpose()
}

fn normalize_image(image: WireImage) -> Image {
    Image {
        id: image.id,
        url: image.url,
        alt_text: image.alt_text.filter(|a| !a.is_empty()),
        width: image.width,
        height: image.height,
    }
}

fn normalize_options(options: Vec<WireSelectedOption>) -> Vec<SelectedOption> {
    options
        .into_iter()
        .map(|o| SelectedOption::new(o.name, o.value))
        .collect()
}

/// # Errors
///
/// Returns [`StorefrontError::Normalization`] for an unparseable price.
pub fn normalize_variant(variant: WireVariant) -> Result<ProductVariant, StorefrontError> {
    let context = format!("variant {}", variant.id);
    Ok(ProductVariant {
        price: normalize_money(variant.price, &context)?,
        compare_at_price: normalize_optional_money(variant.compare_at_price, &context)?,
        id: variant.id,
        title: variant.title,
        sku: variant.sku.filter(|s| !s.is_empty()),
        available_for_sale: variant.available_for_sale,
        image: variant.image.map(normalize_image),
        selected_options: normalize_options(variant.selected_options),
    })
}

/// # Errors
///
/// Returns [`StorefrontError::Normalization`] if any variant price does not
/// parse.
pub fn normalize_product(product: WireProduct) -> Result<Product, StorefrontError> {
    let variants = product
        .variants
        .nodes
        .into_iter()
        .map(normalize_variant)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Product {
        id: product.id,
        title: product.title,
        handle: product.handle,
        vendor: product.vendor.filter(|v| !v.is_empty()),
        description: product.description,
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.values,
            })
            .collect(),
        selected_variant: product.selected_variant.map(normalize_variant).transpose()?,
        variants,
    })
}

/// # Errors
///
/// Returns [`StorefrontError::Normalization`] if the minimum price does not
/// parse.
pub fn normalize_product_item(item: WireProductItem) -> Result<ProductSummary, StorefrontError> {
    let context = format!("product {}", item.handle);
    let min_price = normalize_optional_money(
        item.price_range.map(|r| r.min_variant_price),
        &context,
    )?;
    let (first_variant_id, first_variant_options) = match item.variants.nodes.into_iter().next() {
        Some(v) => (Some(v.id), normalize_options(v.selected_options)),
        None => (None, Vec::new()),
    };

    Ok(ProductSummary {
        id: item.id,
        handle: item.handle,
        title: item.title,
        description: item.description,
        featured_image: item.featured_image.map(normalize_image),
        min_price,
        first_variant_id,
        first_variant_options,
    })
}

fn normalize_cart_line(line: WireCartLine) -> Result<CartLine, StorefrontError> {
    let context = format!("cart line {}", line.id);
    let cost = match line.cost {
        Some(c) => Some(CartLineCost {
            amount_per_quantity: normalize_optional_money(c.amount_per_quantity, &context)?,
            total_amount: normalize_optional_money(c.total_amount, &context)?,
            compare_at_amount_per_quantity: normalize_optional_money(
                c.compare_at_amount_per_quantity,
                &context,
            )?,
        }),
        None => None,
    };
    let m = line.merchandise;

    Ok(CartLine {
        id: line.id,
        quantity: line.quantity,
        merchandise: Merchandise {
            id: m.id,
            title: m.title,
            product_title: m.product.title,
            product_handle: m.product.handle,
            image: m.image.map(normalize_image),
            selected_options: normalize_options(m.selected_options),
        },
        cost,
    })
}

/// # Errors
///
/// Returns [`StorefrontError::Normalization`] if any amount does not parse.
pub fn normalize_cart(cart: WireCart) -> Result<Cart, StorefrontError> {
    let context = format!("cart {}", cart.id);
    let (subtotal, total) = match cart.cost {
        Some(cost) => (
            normalize_optional_money(cost.subtotal_amount, &context)?,
            normalize_optional_money(cost.total_amount, &context)?,
        ),
        None => (None, None),
    };

    Ok(Cart {
        id: cart.id,
        checkout_url: cart.checkout_url.filter(|u| !u.is_empty()),
        total_quantity: cart.total_quantity,
        lines: cart
            .lines
            .nodes
            .into_iter()
            .map(normalize_cart_line)
            .collect::<Result<Vec<_>, _>>()?,
        subtotal,
        total,
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|d| DiscountCode {
                code: d.code,
                applicable: d.applicable,
            })
            .collect(),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
