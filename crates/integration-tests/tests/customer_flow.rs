//! Customer menu, cart and orders.

use foodio_integration_tests::{TestApp, location, menu_item, order};
use reqwest::{Method, StatusCode};
use serde_json::json;

async fn customer_app() -> TestApp {
    let app = TestApp::spawn().await;
    app.backend.data().menu = vec![
        menu_item(1, "Cheese Burger", "299", "Main", true),
        menu_item(2, "Lemonade", "45.5", "Drinks", true),
        menu_item(3, "Sold Out Pie", "120", "Desserts", false),
    ];
    app.sign_in_customer().await;
    app
}

#[tokio::test]
async fn test_menu_shows_available_items_with_tabs() {
    let app = customer_app().await;

    let response = app.get("/customer/menu").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Cheese Burger"));
    assert!(body.contains("Lemonade"));
    assert!(!body.contains("Sold Out Pie"));
    assert!(body.contains(r#"href="/customer/menu?category=Drinks""#));
    assert!(body.contains("/static/images/placeholder-dish.svg"));
}

#[tokio::test]
async fn test_menu_category_filter() {
    let app = customer_app().await;

    let response = app.get("/customer/menu?category=drinks").await;
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Lemonade"));
    assert!(!body.contains("Cheese Burger"));
}

#[tokio::test]
async fn test_add_to_cart_returns_badge_for_htmx() {
    let app = customer_app().await;

    let response = app
        .htmx_post_form("/customer/cart/add", &[("item_id", "1"), ("quantity", "2")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("HX-Trigger").and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains(">2</span>"));

    let response = app.get("/customer/cart").await;
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Cheese Burger"));
    assert!(body.contains("৳598.00"));
}

#[tokio::test]
async fn test_unavailable_item_cannot_be_added() {
    let app = customer_app().await;

    let response = app
        .post_form("/customer/cart/add", &[("item_id", "3")])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_quantity_update_and_remove() {
    let app = customer_app().await;
    app.post_form("/customer/cart/add", &[("item_id", "1")]).await;
    app.post_form("/customer/cart/add", &[("item_id", "2")]).await;

    let response = app
        .post_form("/customer/cart/update", &[("item_id", "2"), ("quantity", "3")])
        .await;
    assert_eq!(location(&response), Some("/customer/cart"));
    let body = app.get("/customer/cart").await.text().await.expect("Failed to read body");
    assert!(body.contains("৳136.50"));

    app.post_form("/customer/cart/remove", &[("item_id", "1")]).await;
    let body = app.get("/customer/cart").await.text().await.expect("Failed to read body");
    assert!(!body.contains("Cheese Burger"));
    assert!(body.contains("Lemonade"));
}

#[tokio::test]
async fn test_empty_cart_order_never_reaches_backend() {
    let app = customer_app().await;

    let response = app
        .post_form("/customer/order", &[("delivery_address", "")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Your cart is empty"));
    assert!(app.backend.mutations().is_empty());
}

#[tokio::test]
async fn test_place_order_sends_lines_and_clears_cart() {
    let app = customer_app().await;
    app.post_form("/customer/cart/add", &[("item_id", "1"), ("quantity", "2")])
        .await;
    app.backend.clear_calls();

    let response = app
        .post_form("/customer/order", &[("delivery_address", " 12 Lake Road ")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/customer/orders?placed=1"));

    let calls = app.backend.calls_to(&Method::POST, "/user/placeorder");
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].json(),
        json!({
            "items": [{ "menuItemId": 1, "quantity": 2 }],
            "deliveryAddress": "12 Lake Road",
        })
    );

    let body = app.get("/customer/cart").await.text().await.expect("Failed to read body");
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_orders_history_and_filter() {
    let app = customer_app().await;
    app.backend.data().orders = vec![order(7, "PENDING"), order(8, "READY")];

    let body = app.get("/customer/orders").await.text().await.expect("Failed to read body");
    assert!(body.contains("Order #7"));
    assert!(body.contains("Order #8"));
    assert!(body.contains("December 12, 2025"));
    assert!(body.contains("4:33 PM"));

    let body = app
        .get("/customer/orders?status=READY")
        .await
        .text()
        .await
        .expect("Failed to read body");
    assert!(!body.contains("Order #7"));
    assert!(body.contains("Order #8"));

    let body = app
        .get("/customer/orders?status=COMPLETED")
        .await
        .text()
        .await
        .expect("Failed to read body");
    assert!(body.contains("No orders found with status: COMPLETED"));
}

#[tokio::test]
async fn test_no_orders_message() {
    let app = customer_app().await;

    let body = app.get("/customer/orders").await.text().await.expect("Failed to read body");
    assert!(body.contains("placed any orders yet"));
}
