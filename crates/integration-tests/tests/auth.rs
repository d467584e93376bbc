//! Sign-in, signup and session expiry.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use greencart_client::forms::{LoginForm, SignupForm};
use greencart_client::hooks::{AuthContext, CartHook};
use greencart_client::types::ProfileUpdate;
use greencart_client::{ApiError, Navigation, Session};
use greencart_core::{Role, UserId};
use greencart_integration_tests::{FakeBackend, cart_line, customer_session};
use secrecy::ExposeSecret;
use serde_json::json;

fn signup_form(role: Role) -> SignupForm {
    SignupForm {
        username: "fern".into(),
        email: "fern@example.com".into(),
        password: "hunter22".into(),
        confirm_password: "hunter22".into(),
        first_name: "Fern".into(),
        last_name: "Gully".into(),
        phone: "555-0100".into(),
        address: "12 Fern Lane".into(),
        role,
        secret_key: String::new(),
    }
}

#[tokio::test]
async fn test_login_signs_the_session_in() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "POST",
        "accounts/login/",
        200,
        json!({
            "success": true,
            "token": "abc123",
            "user": {"user_id": 9, "username": "fern", "email": "fern@example.com", "role_name": "seller"}
        }),
    );

    let session = Session::in_memory();
    let auth = AuthContext::mount(&backend.api(session.clone()));
    let user = auth
        .login(&LoginForm {
            email: "fern@example.com".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.role, Role::Seller);
    assert_eq!(session.user_id(), Some(UserId::new(9)));
    assert_eq!(session.token().unwrap().expose_secret(), "abc123");
    assert_eq!(auth.state().user, Some(user));

    let request = &backend.requests_to("POST", "accounts/login/")[0];
    assert_eq!(
        request.body,
        json!({"email": "fern@example.com", "password": "hunter22"})
    );
}

#[tokio::test]
async fn test_login_without_token_uses_user_id() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "POST",
        "accounts/login/",
        200,
        json!({"user": {"user_id": 4, "email": "a@example.com", "role_name": "customer"}}),
    );

    let session = Session::in_memory();
    AuthContext::mount(&backend.api(session.clone()))
        .login(&LoginForm {
            email: "a@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    assert_eq!(session.token().unwrap().expose_secret(), "4");
}

#[tokio::test]
async fn test_rejected_login_keeps_session_empty() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "POST",
        "accounts/login/",
        400,
        json!({"success": false, "error": "Invalid credentials"}),
    );

    let session = Session::in_memory();
    let auth = AuthContext::mount(&backend.api(session.clone()));
    let err = auth
        .login(&LoginForm {
            email: "a@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!session.is_authenticated());
    assert_eq!(auth.state().error.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_signup_password_mismatch_sends_nothing() {
    let backend = FakeBackend::start().await;
    let auth = AuthContext::mount(&backend.api(Session::in_memory()));

    let mut form = signup_form(Role::Customer);
    form.confirm_password = "hunter23".into();
    let err = auth.signup(&form).await.unwrap_err();

    assert_eq!(err.user_message(), "Passwords do not match");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_privileged_signup_requires_secret_key() {
    let backend = FakeBackend::start().await;
    let auth = AuthContext::mount(&backend.api(Session::in_memory()));

    let err = auth.signup(&signup_form(Role::Admin)).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.user_message(), "Secret key is required for this role");
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_signup_posts_role_name() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "POST",
        "accounts/signup/",
        201,
        json!({"success": true, "message": "Account created"}),
    );
    let auth = AuthContext::mount(&backend.api(Session::in_memory()));

    let mut form = signup_form(Role::DeliveryAgent);
    form.secret_key = "s3cret".into();
    let outcome = auth.signup(&form).await.unwrap();

    assert_eq!(outcome.message.as_deref(), Some("Account created"));
    let body = &backend.requests_to("POST", "accounts/signup/")[0].body;
    assert_eq!(body["role_name"], "delivery_agent");
    assert_eq!(body["secret_key"], "s3cret");
}

#[tokio::test]
async fn test_requests_carry_token_and_request_id() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "cart/5/", 200, json!({"cart_items": []}));

    let _cart = CartHook::mount(&backend.api(customer_session(5))).await;

    let request = &backend.requests_to("GET", "cart/5/")[0];
    assert_eq!(request.authorization.as_deref(), Some("Token token-5"));
    assert!(request.request_id.as_deref().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_unauthorized_response_expires_the_session() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "cart/5/", 401, json!({"detail": "Invalid token"}));

    let session = customer_session(5);
    let mut navigation = session.navigation();
    let cart = CartHook::mount(&backend.api(session.clone())).await;

    assert!(!session.is_authenticated());
    assert_eq!(session.user(), None);
    assert_eq!(session.pending_navigation(), Navigation::Login);
    assert!(navigation.has_changed().unwrap());
    assert_eq!(
        cart.state().cart_items.error.as_deref(),
        Some("Authentication failed. Please login again.")
    );
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let backend = FakeBackend::start().await;
    let session = customer_session(5);
    let auth = AuthContext::mount(&backend.api(session.clone()));
    assert!(auth.user().is_some());

    auth.logout().unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(auth.state().user, None);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_profile_update_refreshes_cached_user() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "POST",
        "user/update/5/5/",
        200,
        json!({"success": true, "message": "Profile updated"}),
    );
    let session = customer_session(5);
    let auth = AuthContext::mount(&backend.api(session.clone()));

    let update = ProfileUpdate {
        address: Some("3 Palm Court".into()),
        ..ProfileUpdate::default()
    };
    auth.update_profile(&update, None).await.unwrap();

    let body = &backend.requests_to("POST", "user/update/5/5/")[0].body;
    assert_eq!(body, &json!({"address": "3 Palm Court"}));
    assert_eq!(
        session.user().unwrap().address.as_deref(),
        Some("3 Palm Court")
    );
    assert_eq!(auth.user(), session.user());
}

#[tokio::test]
async fn test_deleting_the_account_signs_out() {
    let backend = FakeBackend::start().await;
    backend.respond("POST", "user/delete/5/5/", 200, json!({"success": true}));
    let session = customer_session(5);
    let auth = AuthContext::mount(&backend.api(session.clone()));

    auth.delete_account().await.unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(auth.user(), None);
}

#[tokio::test]
async fn test_header_counts_follow_cart_and_open_orders() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "cart/5/",
        200,
        json!({"cart_items": [
            cart_line(1, 7, "Small", 1, "9.00"),
            cart_line(2, 8, "Large", 3, "30.00")
        ]}),
    );
    backend.respond(
        "GET",
        "order/orders/5/",
        200,
        json!({"orders": [
            {"order_id": 1, "order_status": "Delivered"},
            {"order_id": 2, "order_status": "Shipped"},
            {"order_id": 3, "order_status": "Pending"}
        ]}),
    );
    let auth = AuthContext::mount(&backend.api(customer_session(5)));

    auth.refresh_counts().await;

    let state = auth.state();
    assert_eq!(state.cart_count, 2);
    assert_eq!(state.pending_orders, 2);
}

#[tokio::test]
async fn test_unauthorized_elsewhere_signs_the_context_out() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "cart/5/", 401, json!({"detail": "Invalid token"}));
    let api = backend.api(customer_session(5));
    let auth = AuthContext::mount(&api);
    let mut updates = auth.subscribe();
    assert!(updates.borrow_and_update().user.is_some());

    let _cart = CartHook::mount(&api).await;

    tokio::time::timeout(Duration::from_secs(2), updates.wait_for(|s| s.user.is_none()))
        .await
        .unwrap()
        .unwrap();
    let state = auth.state();
    assert_eq!(state.user, None);
    assert_eq!(state.cart_count, 0);
    assert_eq!(auth.user(), None);
}
