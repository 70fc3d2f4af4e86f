//! Sign-in, sign-out and the role gate in front of each section.

use foodio_integration_tests::{TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_login() {
    let app = TestApp::spawn().await;

    for path in ["/customer/menu", "/customer/orders", "/admin/menu", "/admin/orders"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), Some("/auth"), "{path}");
    }
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_customer_is_kept_out_of_back_office() {
    let app = TestApp::spawn().await;
    app.sign_in_customer().await;

    let response = app.get("/admin/orders").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/customer/menu"));
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_admin_is_sent_to_back_office() {
    let app = TestApp::spawn().await;
    app.sign_in_admin().await;

    let response = app.get("/customer/menu").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/menu"));
}

#[tokio::test]
async fn test_login_redirects_to_role_home() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/auth/login",
            &[("email", "admin@foodio.test"), ("password", "secret123")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/menu"));

    let login = app
        .backend
        .calls_to(&reqwest::Method::POST, "/auth/login");
    assert_eq!(login.len(), 1);
    assert_eq!(login[0].json()["email"], "admin@foodio.test");

    // Signed-in visitors skip the login page.
    let response = app.get("/auth").await;
    assert_eq!(location(&response), Some("/admin/menu"));
}

#[tokio::test]
async fn test_invalid_login_form_never_reaches_backend() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/auth/login", &[("email", "not-an-email"), ("password", "")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("not-an-email"));
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_credentials_show_message() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/auth/login",
            &[("email", "chris@example.com"), ("password", "wrong")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Invalid email or password"));

    let response = app.get("/customer/menu").await;
    assert_eq!(location(&response), Some("/auth"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::spawn().await;
    app.sign_in_customer().await;

    let response = app.post_form("/auth/logout", &[]).await;
    assert_eq!(location(&response), Some("/auth"));

    let response = app.get("/customer/cart").await;
    assert_eq!(location(&response), Some("/auth"));
}

#[tokio::test]
async fn test_registration_sends_account_and_returns_to_login() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/auth/register",
            &[
                ("fullName", "Chris Customer"),
                ("email", "chris@example.com"),
                ("address", "12 Lake Road"),
                ("password", "secret123"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth?success=registered"));

    let calls = app
        .backend
        .calls_to(&reqwest::Method::POST, "/auth/register");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].json()["name"], "Chris Customer");
    assert_eq!(calls[0].json()["address"], "12 Lake Road");
}

#[tokio::test]
async fn test_short_password_blocks_registration() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/auth/register",
            &[
                ("fullName", "Chris Customer"),
                ("email", "chris@example.com"),
                ("address", "12 Lake Road"),
                ("password", "123"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_landing_page_features_first_five_items() {
    let app = TestApp::spawn().await;
    app.backend.data().menu = (1..=7)
        .map(|id| foodio_integration_tests::menu_item(id, &format!("Dish {id}"), "100", "Main", true))
        .collect();

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Dish 5"));
    assert!(!body.contains("Dish 6"));

    let calls = app.backend.calls_to(&reqwest::Method::GET, "/user/menu");
    assert_eq!(calls.len(), 1);
    assert!(calls[0].authorization.is_none());
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::spawn().await;
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("Failed to read body"), "ok");
}
