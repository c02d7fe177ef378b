//! Integration tests for `StorefrontClient` against a `wiremock` Storefront
//! API. Each test mounts only the GraphQL operations it expects.

use misima_core::{CartLineInput, CartMutation, CartMutationError, SelectedOption};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use misima_storefront::{PageDirection, PageRequest, StorefrontClient, StorefrontError};

const GRAPHQL_PATH: &str = "/api/2024-01/graphql.json";

fn test_client(server: &MockServer) -> StorefrontClient {
    test_client_with_retries(server, 0)
}

fn test_client_with_retries(server: &MockServer, max_retries: u32) -> StorefrontClient {
    StorefrontClient::new(
        &format!("{}{GRAPHQL_PATH}", server.uri()),
        "test-token",
        5,
        "misima-test/0.1",
        max_retries,
        0,
    )
    .expect("failed to build test StorefrontClient")
}

fn variant_json(id: &str, size: &str, available: bool) -> Value {
    json!({
        "id": id,
        "title": size,
        "availableForSale": available,
        "price": {"amount": "120.0", "currencyCode": "CHF"},
        "compareAtPrice": null,
        "image": null,
        "product": {"title": "Maria Robusto", "handle": "maria-robusto"},
        "selectedOptions": [{"name": "Size", "value": size}],
        "sku": "MR-10"
    })
}

fn product_item_json(handle: &str, collection: &str) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{handle}"),
        "handle": handle,
        "title": handle,
        "description": format!("Collection- {collection}, Format- Robusto, Length- 5in, Diameter- 50, Weight- 20g, Per Box- 20"),
        "featuredImage": null,
        "priceRange": {"minVariantPrice": {"amount": "95.0", "currencyCode": "CHF"}},
        "variants": {"nodes": [{"id": format!("{handle}-v1"), "selectedOptions": [{"name": "Title", "value": "Default Title"}]}]}
    })
}

fn collection_json(nodes: Vec<Value>, has_next: bool, end_cursor: &str) -> Value {
    json!({"data": {"collection": {
        "id": "gid://shopify/Collection/1",
        "handle": "all",
        "title": "All",
        "description": "",
        "products": {
            "nodes": nodes,
            "pageInfo": {"hasPreviousPage": false, "hasNextPage": has_next, "startCursor": "s", "endCursor": end_cursor}
        }
    }}})
}

fn cart_json(total_quantity: u32) -> Value {
    json!({
        "id": "gid://shopify/Cart/c1",
        "checkoutUrl": "https://misima.myshopify.com/cart/c/c1",
        "totalQuantity": total_quantity,
        "discountCodes": [],
        "cost": {
            "subtotalAmount": {"amount": "120.0", "currencyCode": "CHF"},
            "totalAmount": {"amount": "120.0", "currencyCode": "CHF"}
        },
        "lines": {"nodes": []}
    })
}

// ---------------------------------------------------------------------------
// Product detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn product_detail_fetches_product_and_variants() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Storefront-Access-Token", "test-token"))
        .and(body_string_contains("query Product("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"product": {
            "id": "gid://shopify/Product/1",
            "title": "Maria Robusto",
            "vendor": "Don Misima",
            "handle": "maria-robusto",
            "description": "Collection- Maria, Format- Robusto, Length- 5in, Diameter- 50, Weight- 20g, Per Box- 20",
            "options": [{"name": "Size", "values": ["Box of 10", "Box of 20"]}],
            "selectedVariant": variant_json("v10", "Box of 10", true),
            "variants": {"nodes": [variant_json("v10", "Box of 10", true)]}
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query ProductVariants("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"product": {
            "variants": {"nodes": [
                variant_json("v10", "Box of 10", true),
                variant_json("v20", "Box of 20", false)
            ]}
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    let detail = test_client(&server)
        .product_detail("maria-robusto", &[SelectedOption::new("Size", "Box of 10")])
        .await
        .expect("product_detail failed")
        .expect("product should exist");

    assert_eq!(detail.product.handle, "maria-robusto");
    assert_eq!(detail.product.selected_variant.unwrap().id, "v10");
    assert_eq!(detail.variants.len(), 2);
    assert!(!detail.variants[1].available_for_sale);
}

#[tokio::test]
async fn product_detail_returns_none_for_unknown_handle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"product": null}})))
        .mount(&server)
        .await;

    let detail = test_client(&server)
        .product_detail("nope", &[])
        .await
        .expect("product_detail failed");
    assert!(detail.is_none());
}

#[tokio::test]
async fn product_detail_survives_failing_variants_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query Product("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"product": {
            "id": "gid://shopify/Product/1",
            "title": "Maria Robusto",
            "vendor": null,
            "handle": "maria-robusto",
            "description": "",
            "options": [],
            "selectedVariant": null,
            "variants": {"nodes": [variant_json("v10", "Box of 10", true)]}
        }}})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("query ProductVariants("))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let detail = test_client(&server)
        .product_detail("maria-robusto", &[])
        .await
        .expect("product_detail failed")
        .expect("product should exist");
    assert!(detail.variants.is_empty());
}

// ---------------------------------------------------------------------------
// Error mapping and retries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn graphql_errors_are_returned_as_graphql_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Field 'bogus' doesn't exist on type 'Product'"}]
        })))
        .mount(&server)
        .await;

    let result = test_client(&server).product("x", &[]).await;
    match result {
        Err(StorefrontError::GraphQl(messages)) => {
            assert_eq!(messages.len(), 1);
            assert!(messages[0].contains("bogus"));
        }
        other => panic!("expected GraphQl error, got: {other:?}"),
    }
}

#[tokio::test]
async fn http_429_maps_to_rate_limited_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
        .mount(&server)
        .await;

    let result = test_client(&server).recommended_products(6).await;
    assert!(
        matches!(result, Err(StorefrontError::RateLimited { retry_after_secs: 17 })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn throttled_graphql_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Throttled", "extensions": {"code": "THROTTLED"}}]
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"products": {
            "nodes": [product_item_json("pablo-corona", "Pablo")]
        }}})))
        .mount(&server)
        .await;

    let products = test_client_with_retries(&server, 2)
        .recommended_products(6)
        .await
        .expect("should succeed after retry");
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn server_error_maps_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client_with_retries(&server, 3).cart("c1").await;
    assert!(
        matches!(result, Err(StorefrontError::UnexpectedStatus { status: 503, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).cart("c1").await;
    assert!(matches!(result, Err(StorefrontError::Deserialize { .. })), "got: {result:?}");
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collection_page_sends_backward_cursor_variables() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains(r#""last":100"#))
        .and(body_string_contains(r#""startCursor":"c9""#))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(collection_json(vec![product_item_json("a", "Maria")], true, "e")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = test_client(&server)
        .collection_page(
            "all",
            &PageRequest {
                page_size: 100,
                cursor: Some("c9".into()),
                direction: PageDirection::Previous,
            },
        )
        .await
        .expect("collection_page failed")
        .expect("collection should exist");
    assert_eq!(page.products.len(), 1);
    assert!(page.page_info.has_next_page);
}

#[tokio::test]
async fn fetch_all_collection_products_follows_cursors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains(r#""endCursor":"c1""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection_json(
            vec![product_item_json("diego-toro", "Diego")],
            false,
            "c2",
        )))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection_json(
            vec![
                product_item_json("pablo-corona", "Pablo"),
                product_item_json("maria-robusto", "Maria"),
            ],
            true,
            "c1",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let products = test_client(&server)
        .fetch_all_collection_products("all", 2)
        .await
        .expect("fetch_all failed");
    let handles: Vec<&str> = products.iter().map(|p| p.handle.as_str()).collect();
    assert_eq!(handles, ["pablo-corona", "maria-robusto", "diego-toro"]);
}

#[tokio::test]
async fn fetch_all_collection_products_reports_unknown_collection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"collection": null}})))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_all_collection_products("missing", 100)
        .await;
    assert!(matches!(result, Err(StorefrontError::NotFound(_))), "got: {result:?}");
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lines_add_without_cart_creates_one() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("mutation cartCreate"))
        .and(body_string_contains(r#""merchandiseId":"v10""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"cartCreate": {
            "cart": cart_json(1),
            "userErrors": []
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    let cart = test_client(&server)
        .apply_mutation(None, &CartMutation::add_one("v10"))
        .await
        .expect("cart create failed");
    assert_eq!(cart.id, "gid://shopify/Cart/c1");
    assert_eq!(cart.total_quantity, 1);
}

#[tokio::test]
async fn lines_remove_without_cart_is_refused_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .apply_mutation(
            None,
            &CartMutation::LinesRemove {
                line_ids: vec!["l1".into()],
            },
        )
        .await;
    assert!(
        matches!(
            result,
            Err(StorefrontError::InvalidMutation(CartMutationError::MissingCart { action: "LinesRemove" }))
        ),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn update_to_zero_is_refused_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mutation = CartMutation::LinesUpdate {
        lines: vec![misima_core::CartLineUpdateInput {
            id: "l1".into(),
            quantity: 0,
        }],
    };
    let result = test_client(&server).apply_mutation(Some("c1"), &mutation).await;
    assert!(
        matches!(result, Err(StorefrontError::InvalidMutation(CartMutationError::ZeroQuantity { .. }))),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn user_errors_surface_as_user_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("mutation cartLinesAdd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"cartLinesAdd": {
            "cart": null,
            "userErrors": [{"field": ["lines", "0", "merchandiseId"], "message": "The merchandise with id v404 does not exist.", "code": "INVALID"}]
        }}})))
        .mount(&server)
        .await;

    let lines = [CartLineInput {
        merchandise_id: "v404".into(),
        quantity: 1,
    }];
    let result = test_client(&server).add_lines("c1", &lines).await;
    match result {
        Err(StorefrontError::UserErrors(messages)) => {
            assert_eq!(messages, ["The merchandise with id v404 does not exist."]);
        }
        other => panic!("expected UserErrors, got: {other:?}"),
    }
}

#[tokio::test]
async fn discount_codes_update_sends_codes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("mutation cartDiscountCodesUpdate"))
        .and(body_string_contains(r#""discountCodes":["WELCOME","OLD"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"cartDiscountCodesUpdate": {
            "cart": cart_json(1),
            "userErrors": []
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    let mutation = CartMutation::DiscountCodesUpdate {
        discount_codes: vec!["OLD".into()],
    }
    .with_form_discount_code(Some("WELCOME"));
    test_client(&server)
        .apply_mutation(Some("gid://shopify/Cart/c1"), &mutation)
        .await
        .expect("discount update failed");
}

#[tokio::test]
async fn cart_returns_none_when_expired() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query CartQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"cart": null}})))
        .mount(&server)
        .await;

    let cart = test_client(&server).cart("gone").await.expect("cart query failed");
    assert!(cart.is_none());
}

#[tokio::test]
async fn timed_out_lines_add_is_not_sent_again() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("mutation cartLinesAdd"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"cartLinesAdd": {
                    "cart": cart_json(1),
                    "userErrors": []
                }}}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = StorefrontClient::new(
        &format!("{}{GRAPHQL_PATH}", server.uri()),
        "test-token",
        1,
        "misima-test/0.1",
        2,
        0,
    )
    .expect("client");
    let result = client
        .apply_mutation(Some("gid://shopify/Cart/c1"), &CartMutation::add_one("v1"))
        .await;

    assert!(matches!(result, Err(StorefrontError::Http(_))), "got: {result:?}");
    let sent = server
        .received_requests()
        .await
        .expect("request recording enabled")
        .len();
    assert_eq!(sent, 1);
}

#[tokio::test]
async fn throttled_lines_add_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("mutation cartLinesAdd"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("mutation cartLinesAdd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"cartLinesAdd": {
            "cart": cart_json(2),
            "userErrors": []
        }}})))
        .expect(1)
        .with_priority(2)
        .mount(&server)
        .await;

    let cart = test_client_with_retries(&server, 2)
        .apply_mutation(Some("gid://shopify/Cart/c1"), &CartMutation::add_one("v1"))
        .await
        .expect("lines add failed");
    assert_eq!(cart.total_quantity, 2);
}
