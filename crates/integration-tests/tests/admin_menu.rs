//! Back-office menu items and categories.

use foodio_integration_tests::{TestApp, location, menu_item};
use reqwest::{Method, StatusCode, multipart::Form, multipart::Part};
use serde_json::json;

fn item_form(name: &str, price: &str) -> Form {
    Form::new()
        .text("name", name.to_string())
        .text("price", price.to_string())
        .text("category", "Main")
        .text("description", "Grilled and stacked")
}

async fn admin_app() -> TestApp {
    let app = TestApp::spawn().await;
    app.backend.data().categories = vec![json!({ "id": 1, "name": "Main" })];
    app.sign_in_admin().await;
    app
}

#[tokio::test]
async fn test_items_tab_lists_formatted_rows() {
    let app = admin_app().await;
    app.backend.data().menu = vec![
        menu_item(1, "Cheese Burger", "299", "Main", true),
        menu_item(2, "Lemonade", "45.5", "Drinks", false),
    ];

    let response = app.get("/admin/menu").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Cheese Burger"));
    assert!(body.contains("৳299.00"));
    assert!(body.contains("৳45.50"));
    assert!(body.contains("Unavailable"));

    let calls = app.backend.calls_to(&Method::GET, "/admin/menu");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer token-1"));
    assert!(app.backend.calls_to(&Method::GET, "/admin/categories").is_empty());
}

#[tokio::test]
async fn test_categories_tab_fetches_categories_only() {
    let app = admin_app().await;

    let response = app.get("/admin/menu?tab=categories").await;
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Main"));
    assert!(app.backend.calls_to(&Method::GET, "/admin/menu").is_empty());
    assert_eq!(app.backend.calls_to(&Method::GET, "/admin/categories").len(), 1);
}

#[tokio::test]
async fn test_empty_name_is_rejected_without_backend_call() {
    let app = admin_app().await;

    let response = app.post_multipart("/admin/menu/items", item_form("  ", "120")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Name is required"));
    assert!(body.contains("Grilled and stacked"));
    assert!(app.backend.mutations().is_empty());
}

#[tokio::test]
async fn test_negative_price_is_rejected_without_backend_call() {
    let app = admin_app().await;

    let response = app.post_multipart("/admin/menu/items", item_form("Soup", "-5")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Price must be a positive number"));
    assert!(app.backend.mutations().is_empty());
}

#[tokio::test]
async fn test_unsupported_image_type_is_rejected() {
    let app = admin_app().await;

    let image = Part::bytes(b"GIF89a".to_vec())
        .file_name("dish.gif")
        .mime_str("image/gif")
        .expect("Valid mime type");
    let form = item_form("Soup", "120").part("image", image);

    let response = app.post_multipart("/admin/menu/items", form).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Only PNG and JPEG formats are supported"));
    assert!(app.backend.mutations().is_empty());
}

#[tokio::test]
async fn test_oversized_image_is_rejected() {
    let app = admin_app().await;

    let image = Part::bytes(vec![0_u8; foodio_core::validation::MAX_IMAGE_BYTES + 1])
        .file_name("dish.png")
        .mime_str("image/png")
        .expect("Valid mime type");
    let form = item_form("Soup", "120").part("image", image);

    let response = app.post_multipart("/admin/menu/items", form).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Image size must be maximum 2MB"));
    assert!(app.backend.mutations().is_empty());
}

#[tokio::test]
async fn test_valid_item_is_created() {
    let app = admin_app().await;

    let image = Part::bytes(b"\x89PNG\r\n".to_vec())
        .file_name("burger.png")
        .mime_str("image/png")
        .expect("Valid mime type");
    let form = item_form("Cheese Burger", "299").part("image", image);

    let response = app.post_multipart("/admin/menu/items", form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some("/admin/menu?tab=items&notice=item_created")
    );

    let calls = app.backend.calls_to(&Method::POST, "/admin/menu");
    assert_eq!(calls.len(), 1);
    let content_type = calls[0].content_type.clone().unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = calls[0].body_text();
    assert!(body.contains("name=\"categoryName\""));
    assert!(body.contains("Cheese Burger"));
    assert!(body.contains("filename=\"burger.png\""));
}

#[tokio::test]
async fn test_create_failure_shows_backend_message() {
    let app = admin_app().await;
    app.backend.data().fail_mutations = true;

    let response = app
        .post_multipart("/admin/menu/items", item_form("Cheese Burger", "299"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Database unavailable"));
    assert!(body.contains("Cheese Burger"));
}

#[tokio::test]
async fn test_rejected_token_on_submit_keeps_form() {
    let app = admin_app().await;
    app.backend.data().reject_tokens = true;

    let response = app
        .post_multipart("/admin/menu/items", item_form("Cheese Burger", "299"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Unauthorized. Please login as admin."));
}

#[tokio::test]
async fn test_edit_form_prefills_item() {
    let app = admin_app().await;
    app.backend.data().menu = vec![menu_item(4, "Cheese Burger", "299", "Main", false)];

    let response = app.get("/admin/menu/items/4/edit").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("value=\"Cheese Burger\""));
    assert!(body.contains("value=\"299\""));
    assert!(body.contains("action=\"/admin/menu/items/4\""));

    let response = app.get("/admin/menu/items/99/edit").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_sends_availability() {
    let app = admin_app().await;

    let form = item_form("Cheese Burger", "310").text("availableForOrder", "true");
    let response = app.post_multipart("/admin/menu/items/4", form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let calls = app
        .backend
        .calls_to(&Method::PATCH, "/admin/updatemenuitem/4");
    assert_eq!(calls.len(), 1);
    let body = calls[0].body_text();
    assert!(body.contains("name=\"availableForOrder\""));
    assert!(body.contains("310"));
}

#[tokio::test]
async fn test_delete_failure_returns_notice() {
    let app = admin_app().await;
    app.backend.data().fail_mutations = true;

    let response = app.post_form("/admin/menu/items/4/delete", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some("/admin/menu?tab=items&notice=delete_item_failed")
    );
    assert_eq!(app.backend.calls_to(&Method::DELETE, "/admin/menuitem/4").len(), 1);

    let response = app.get("/admin/menu?tab=items&notice=delete_item_failed").await;
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Failed to delete item"));
}

#[tokio::test]
async fn test_category_create_and_validation() {
    let app = admin_app().await;

    let response = app.post_form("/admin/categories", &[("name", " ")]).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.backend.mutations().is_empty());

    let response = app.post_form("/admin/categories", &[("name", "  Desserts ")]).await;
    assert_eq!(
        location(&response),
        Some("/admin/menu?tab=categories&notice=category_created")
    );
    let calls = app.backend.calls_to(&Method::POST, "/admin/categories");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].json(), json!({ "name": "Desserts" }));
}

#[tokio::test]
async fn test_category_delete() {
    let app = admin_app().await;

    let response = app.post_form("/admin/categories/3/delete", &[]).await;
    assert_eq!(
        location(&response),
        Some("/admin/menu?tab=categories&notice=category_deleted")
    );
    assert_eq!(
        app.backend
            .calls_to(&Method::DELETE, "/admin/deletecategory/3")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_rejected_token_on_list_signs_out_once() {
    let app = admin_app().await;
    app.backend.data().reject_tokens = true;

    let response = app.get("/admin/menu").await;
    assert_eq!(response.status(), StatusCode::OK);
    let refresh: Vec<_> = response.headers().get_all("refresh").iter().collect();
    assert_eq!(refresh.len(), 1);
    assert_eq!(refresh[0], "2; url=/auth");
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Authentication failed. Please login again."));

    let response = app.get("/admin/menu").await;
    assert_eq!(location(&response), Some("/auth"));
}
