//! Cart query and mutations.

use misima_core::{Cart, CartLineInput, CartLineUpdateInput, CartMutation};
use serde_json::{json, Value};

use crate::error::StorefrontError;
use crate::normalize::normalize_cart;
use crate::queries::{
    CART_CREATE_MUTATION, CART_DISCOUNT_CODES_UPDATE_MUTATION, CART_LINES_ADD_MUTATION,
    CART_LINES_REMOVE_MUTATION, CART_LINES_UPDATE_MUTATION, CART_QUERY,
};
use crate::types::{CartData, CartMutationData};

use super::StorefrontClient;

impl StorefrontClient {
    /// The cart with `cart_id`, or `Ok(None)` if it no longer exists.
    ///
    /// # Errors
    ///
    /// Propagates transport, GraphQL and normalization errors.
    pub async fn cart(&self, cart_id: &str) -> Result<Option<Cart>, StorefrontError> {
        let data: CartData = self
            .graphql("CartQuery", CART_QUERY, json!({ "cartId": cart_id }))
            .await?;
        data.cart.map(normalize_cart).transpose()
    }

    /// # Errors
    ///
    /// [`StorefrontError::UserErrors`] when the platform rejects the lines.
    pub async fn create_cart(&self, lines: &[CartLineInput]) -> Result<Cart, StorefrontError> {
        self.cart_mutation(
            "cartCreate",
            CART_CREATE_MUTATION,
            json!({ "input": { "lines": lines } }),
        )
        .await
    }

    /// # Errors
    ///
    /// [`StorefrontError::UserErrors`] when the platform rejects the lines.
    pub async fn add_lines(
        &self,
        cart_id: &str,
        lines: &[CartLineInput],
    ) -> Result<Cart, StorefrontError> {
        self.cart_mutation(
            "cartLinesAdd",
            CART_LINES_ADD_MUTATION,
            json!({ "cartId": cart_id, "lines": lines }),
        )
        .await
    }

    /// # Errors
    ///
    /// [`StorefrontError::UserErrors`] when the platform rejects the update.
    pub async fn update_lines(
        &self,
        cart_id: &str,
        lines: &[CartLineUpdateInput],
    ) -> Result<Cart, StorefrontError> {
        self.cart_mutation(
            "cartLinesUpdate",
            CART_LINES_UPDATE_MUTATION,
            json!({ "cartId": cart_id, "lines": lines }),
        )
        .await
    }

    /// # Errors
    ///
    /// [`StorefrontError::UserErrors`] when a line id is unknown.
    pub async fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: &[String],
    ) -> Result<Cart, StorefrontError> {
        self.cart_mutation(
            "cartLinesRemove",
            CART_LINES_REMOVE_MUTATION,
            json!({ "cartId": cart_id, "lineIds": line_ids }),
        )
        .await
    }

    /// Replaces the cart's discount codes; an empty list clears them.
    ///
    /// # Errors
    ///
    /// [`StorefrontError::UserErrors`] when the platform rejects the codes.
    pub async fn update_discount_codes(
        &self,
        cart_id: &str,
        codes: &[String],
    ) -> Result<Cart, StorefrontError> {
        self.cart_mutation(
            "cartDiscountCodesUpdate",
            CART_DISCOUNT_CODES_UPDATE_MUTATION,
            json!({ "cartId": cart_id, "discountCodes": codes }),
        )
        .await
    }

    /// Runs a validated `/cart` mutation against `cart_id`.
    ///
    /// Without a cart, `LinesAdd` creates one; every other action is refused.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::InvalidMutation`] for inputs that fail validation
    ///   or need a cart that does not exist.
    /// - Anything the underlying mutation returns.
    pub async fn apply_mutation(
        &self,
        cart_id: Option<&str>,
        mutation: &CartMutation,
    ) -> Result<Cart, StorefrontError> {
        mutation.validate()?;

        let Some(cart_id) = cart_id else {
            return match mutation {
                CartMutation::LinesAdd { lines } => self.create_cart(lines).await,
                other => Err(misima_core::CartMutationError::MissingCart {
                    action: other.action(),
                }
                .into()),
            };
        };

        match mutation {
            CartMutation::LinesAdd { lines } => self.add_lines(cart_id, lines).await,
            CartMutation::LinesUpdate { lines } => self.update_lines(cart_id, lines).await,
            CartMutation::LinesRemove { line_ids } => self.remove_lines(cart_id, line_ids).await,
            CartMutation::DiscountCodesUpdate { discount_codes } => {
                self.update_discount_codes(cart_id, discount_codes).await
            }
        }
    }

    async fn cart_mutation(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: Value,
    ) -> Result<Cart, StorefrontError> {
        let data: CartMutationData = self
            .graphql_mutation(operation, query, variables)
            .await?;
        let payload = data.payload;

        if !payload.user_errors.is_empty() {
            tracing::info!(
                operation,
                errors = payload.user_errors.len(),
                "cart mutation returned user errors"
            );
            return Err(StorefrontError::UserErrors(
                payload.user_errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        payload
            .cart
            .map(normalize_cart)
            .transpose()?
            .ok_or(StorefrontError::MissingData(operation))
    }
}
