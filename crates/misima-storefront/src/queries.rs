//! GraphQL documents sent to the Storefront API.
//!
//! Fragments are plain string constants concatenated into each document with
//! `concat!`, so every query is a single `&'static str`.

macro_rules! money {
    () => {
        "amount currencyCode"
    };
}

macro_rules! image {
    () => {
        "id url altText width height"
    };
}

macro_rules! product_variant_fragment {
    () => {
        concat!(
            "fragment ProductVariant on ProductVariant {\n",
            "  availableForSale\n",
            "  compareAtPrice { ", money!(), " }\n",
            "  id\n",
            "  image { ", image!(), " }\n",
            "  price { ", money!(), " }\n",
            "  product { title handle }\n",
            "  selectedOptions { name value }\n",
            "  sku\n",
            "  title\n",
            "}\n"
        )
    };
}

macro_rules! product_item_fragment {
    () => {
        concat!(
            "fragment ProductItem on Product {\n",
            "  id\n",
            "  handle\n",
            "  title\n",
            "  description\n",
            "  featuredImage { ", image!(), " }\n",
            "  priceRange { minVariantPrice { ", money!(), " } }\n",
            "  variants(first: 1) { nodes { id selectedOptions { name value } } }\n",
            "}\n"
        )
    };
}

macro_rules! cart_fragment {
    () => {
        concat!(
            "fragment CartApiQuery on Cart {\n",
            "  id\n",
            "  checkoutUrl\n",
            "  totalQuantity\n",
            "  discountCodes { code applicable }\n",
            "  cost {\n",
            "    subtotalAmount { ", money!(), " }\n",
            "    totalAmount { ", money!(), " }\n",
            "  }\n",
            "  lines(first: 100) {\n",
            "    nodes {\n",
            "      id\n",
            "      quantity\n",
            "      cost {\n",
            "        amountPerQuantity { ", money!(), " }\n",
            "        totalAmount { ", money!(), " }\n",
            "        compareAtAmountPerQuantity { ", money!(), " }\n",
            "      }\n",
            "      merchandise {\n",
            "        ... on ProductVariant {\n",
            "          id\n",
            "          title\n",
            "          image { ", image!(), " }\n",
            "          product { title handle }\n",
            "          selectedOptions { name value }\n",
            "        }\n",
            "      }\n",
            "    }\n",
            "  }\n",
            "}\n"
        )
    };
}

macro_rules! cart_mutation {
    ($name:literal, $field:literal, $args:literal, $call:literal) => {
        concat!(
            "mutation ", $name, "(", $args, ") {\n",
            "  ", $field, "(", $call, ") {\n",
            "    cart { ...CartApiQuery }\n",
            "    userErrors { field message code }\n",
            "  }\n",
            "}\n",
            cart_fragment!()
        )
    };
}

/// Product by handle with the variant matching the requested options and
/// the first variant.
pub const PRODUCT_QUERY: &str = concat!(
    "query Product($handle: String!, $selectedOptions: [SelectedOptionInput!]!) {\n",
    "  product(handle: $handle) {\n",
    "    id\n",
    "    title\n",
    "    vendor\n",
    "    handle\n",
    "    description\n",
    "    options { name values }\n",
    "    selectedVariant: variantBySelectedOptions(selectedOptions: $selectedOptions) { ...ProductVariant }\n",
    "    variants(first: 1) { nodes { ...ProductVariant } }\n",
    "  }\n",
    "}\n",
    product_variant_fragment!()
);

/// Every variant of a product, for option availability.
pub const VARIANTS_QUERY: &str = concat!(
    "query ProductVariants($handle: String!) {\n",
    "  product(handle: $handle) {\n",
    "    variants(first: 250) { nodes { ...ProductVariant } }\n",
    "  }\n",
    "}\n",
    product_variant_fragment!()
);

pub const COLLECTION_QUERY: &str = concat!(
    "query Collection($handle: String!, $first: Int, $last: Int, $startCursor: String, $endCursor: String) {\n",
    "  collection(handle: $handle) {\n",
    "    id\n",
    "    handle\n",
    "    title\n",
    "    description\n",
    "    products(first: $first, last: $last, before: $startCursor, after: $endCursor) {\n",
    "      nodes { ...ProductItem }\n",
    "      pageInfo { hasPreviousPage hasNextPage startCursor endCursor }\n",
    "    }\n",
    "  }\n",
    "}\n",
    product_item_fragment!()
);

pub const RECOMMENDED_PRODUCTS_QUERY: &str = concat!(
    "query RecommendedProducts($first: Int!) {\n",
    "  products(first: $first, sortKey: RELEVANCE, reverse: true) {\n",
    "    nodes { ...ProductItem }\n",
    "  }\n",
    "}\n",
    product_item_fragment!()
);

pub const CART_QUERY: &str = concat!(
    "query CartQuery($cartId: ID!) {\n",
    "  cart(id: $cartId) { ...CartApiQuery }\n",
    "}\n",
    cart_fragment!()
);

pub const CART_CREATE_MUTATION: &str = cart_mutation!(
    "cartCreate",
    "cartCreate",
    "$input: CartInput!",
    "input: $input"
);

pub const CART_LINES_ADD_MUTATION: &str = cart_mutation!(
    "cartLinesAdd",
    "cartLinesAdd",
    "$cartId: ID!, $lines: [CartLineInput!]!",
    "cartId: $cartId, lines: $lines"
);

pub const CART_LINES_UPDATE_MUTATION: &str = cart_mutation!(
    "cartLinesUpdate",
    "cartLinesUpdate",
    "$cartId: ID!, $lines: [CartLineUpdateInput!]!",
    "cartId: $cartId, lines: $lines"
);

pub const CART_LINES_REMOVE_MUTATION: &str = cart_mutation!(
    "cartLinesRemove",
    "cartLinesRemove",
    "$cartId: ID!, $lineIds: [ID!]!",
    "cartId: $cartId, lineIds: $lineIds"
);

pub const CART_DISCOUNT_CODES_UPDATE_MUTATION: &str = cart_mutation!(
    "cartDiscountCodesUpdate",
    "cartDiscountCodesUpdate",
    "$cartId: ID!, $discountCodes: [String!]",
    "cartId: $cartId, discountCodes: $discountCodes"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_query_includes_variant_fragment_once() {
        assert_eq!(PRODUCT_QUERY.matches("fragment ProductVariant").count(), 1);
        assert!(PRODUCT_QUERY.contains("variantBySelectedOptions"));
    }

    #[test]
    fn variants_query_fetches_first_250() {
        assert!(VARIANTS_QUERY.contains("variants(first: 250)"));
    }

    #[test]
    fn recommended_products_are_relevance_reversed() {
        assert!(RECOMMENDED_PRODUCTS_QUERY.contains("sortKey: RELEVANCE, reverse: true"));
    }

    #[test]
    fn cart_mutations_select_user_errors_and_cart() {
        for doc in [
            CART_CREATE_MUTATION,
            CART_LINES_ADD_MUTATION,
            CART_LINES_UPDATE_MUTATION,
            CART_LINES_REMOVE_MUTATION,
            CART_DISCOUNT_CODES_UPDATE_MUTATION,
        ] {
            assert!(doc.contains("userErrors { field message code }"), "{doc}");
            assert!(doc.contains("fragment CartApiQuery on Cart"), "{doc}");
        }
    }
}
