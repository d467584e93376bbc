//! Hooks stop writing state once cancelled or dropped.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::{Duration, Instant};

use greencart_client::hooks::{CartHook, HomeHook};
use greencart_integration_tests::{FakeBackend, cart_line, customer_session};
use serde_json::json;

#[tokio::test]
async fn test_cancel_abandons_in_flight_fetch() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "cart/5/",
        200,
        json!({"cart_items": [cart_line(1, 7, "Small", 1, "9.00")]}),
    );
    let hook = CartHook::mount(&backend.api(customer_session(5))).await;

    backend.respond_slowly("GET", "cart/5/", Duration::from_secs(5), json!({"cart_items": []}));
    let token = hook.cancel_token().clone();
    let started = Instant::now();
    tokio::join!(hook.refresh(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    assert!(started.elapsed() < Duration::from_secs(4));
    let state = hook.state();
    assert_eq!(state.cart_items.data.len(), 1);
    assert_eq!(state.cart_items.error, None);
}

#[tokio::test]
async fn test_dropping_hook_cancels_and_closes_state() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "home/top-categories/", 200, json!([]));
    backend.respond("GET", "home/top-plants/", 200, json!({"plants": []}));
    backend.respond("GET", "home/top-sellers/", 200, json!({"sellers": []}));

    let hook = HomeHook::mount(&backend.api(customer_session(5))).await;
    let token = hook.cancel_token().clone();
    let mut updates = hook.subscribe();
    assert!(!token.is_cancelled());

    drop(hook);

    assert!(token.is_cancelled());
    assert!(updates.changed().await.is_err());
}

#[tokio::test]
async fn test_hooks_do_not_share_cancellation() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "cart/5/", 200, json!({"cart_items": []}));
    let api = backend.api(customer_session(5));

    let first = CartHook::mount(&api).await;
    let second = CartHook::mount(&api).await;
    drop(first);

    second.refresh().await;
    assert!(!second.cancel_token().is_cancelled());
    assert_eq!(backend.requests_to("GET", "cart/5/").len(), 3);
    assert_eq!(second.state().cart_items.error, None);
}
