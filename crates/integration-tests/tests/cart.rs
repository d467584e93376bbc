//! Cart hook against the fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use greencart_client::forms::AddToCartForm;
use greencart_client::hooks::{CartHook, PlantDetailHook};
use greencart_core::{CartItemId, Money, PlantId};
use greencart_integration_tests::{FakeBackend, cart_line, customer_session};
use serde_json::json;

#[tokio::test]
async fn test_cart_loads_items() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "cart/5/",
        200,
        json!({"cart_items": [cart_line(1, 7, "Medium", 2, "12.50")]}),
    );

    let hook = CartHook::mount(&backend.api(customer_session(5))).await;
    let state = hook.state();

    assert!(!state.cart_items.loading);
    assert_eq!(state.cart_items.error, None);
    assert_eq!(state.cart_items.data.len(), 1);
    assert_eq!(state.cart_items.data[0].size.as_deref(), Some("Medium"));
    assert_eq!(hook.selected_subtotal(), Money::from_cents(2500));
}

#[tokio::test]
async fn test_missing_cart_items_is_an_empty_cart() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "cart/5/", 200, json!({"success": true}));

    let hook = CartHook::mount(&backend.api(customer_session(5))).await;
    let state = hook.state();

    assert!(state.cart_items.data.is_empty());
    assert_eq!(state.cart_items.error, None);
    assert!(!state.cart_items.loading);
}

#[tokio::test]
async fn test_failed_fetch_clears_cart_and_reports_error() {
    let backend = FakeBackend::start().await;
    backend.respond_in_turn(
        "GET",
        "cart/5/",
        vec![
            json!({"cart_items": [cart_line(1, 7, "Small", 1, "9.00")]}),
            json!({"success": false, "error": "Cart unavailable"}),
        ],
    );

    let hook = CartHook::mount(&backend.api(customer_session(5))).await;
    assert_eq!(hook.state().cart_items.data.len(), 1);

    hook.refresh().await;
    let state = hook.state();
    assert!(state.cart_items.data.is_empty());
    assert_eq!(state.cart_items.error.as_deref(), Some("Cart unavailable"));
}

#[tokio::test]
async fn test_mutations_refetch_the_cart() {
    let backend = FakeBackend::start().await;
    backend.respond_in_turn(
        "GET",
        "cart/5/",
        vec![
            json!({"cart_items": [cart_line(1, 7, "Small", 1, "9.00")]}),
            json!({"cart_items": [cart_line(1, 7, "Small", 3, "9.00")]}),
            json!({"cart_items": []}),
        ],
    );
    backend.respond("POST", "cart/update_quantity/", 200, json!({"success": true}));
    backend.respond("POST", "cart/delete/", 200, json!({"success": true, "message": "Removed"}));

    let hook = CartHook::mount(&backend.api(customer_session(5))).await;

    hook.update_quantity(CartItemId::new(1), 3).await.unwrap();
    let state = hook.state();
    assert_eq!(state.cart_items.data[0].quantity, 3);
    assert!(!state.cart_items.loading);
    assert_eq!(state.cart_items.error, None);

    let body = &backend.requests_to("POST", "cart/update_quantity/")[0].body;
    assert_eq!(body, &json!({"cart_id": 1, "user_id": 5, "quantity": 3}));

    let outcome = hook.remove(CartItemId::new(1)).await.unwrap();
    assert_eq!(outcome.message_or("Removed from cart"), "Removed");
    assert!(hook.state().cart_items.data.is_empty());
    assert_eq!(backend.requests_to("GET", "cart/5/").len(), 3);
}

#[tokio::test]
async fn test_toggle_refetches_the_cart() {
    let backend = FakeBackend::start().await;
    let mut unselected = cart_line(1, 7, "Small", 1, "9.00");
    unselected["selected"] = json!(false);
    backend.respond_in_turn(
        "GET",
        "cart/5/",
        vec![
            json!({"cart_items": [unselected]}),
            json!({"cart_items": [cart_line(1, 7, "Small", 1, "9.00")]}),
        ],
    );
    backend.respond("POST", "cart/toggle/", 200, json!({"success": true}));

    let hook = CartHook::mount(&backend.api(customer_session(5))).await;
    assert!(!hook.state().cart_items.data[0].selected);

    hook.toggle_item(CartItemId::new(1)).await.unwrap();

    let body = &backend.requests_to("POST", "cart/toggle/")[0].body;
    assert_eq!(body, &json!({"cart_id": 1, "user_id": 5}));
    assert_eq!(backend.requests_to("GET", "cart/5/").len(), 2);
    let state = hook.state();
    assert!(state.cart_items.data[0].selected);
    assert!(!state.cart_items.loading);
    assert_eq!(state.cart_items.error, None);
}

#[tokio::test]
async fn test_zero_quantity_is_rejected_locally() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "cart/5/", 200, json!({"cart_items": []}));

    let hook = CartHook::mount(&backend.api(customer_session(5))).await;
    let err = hook.update_quantity(CartItemId::new(1), 0).await.unwrap_err();

    assert_eq!(err.user_message(), "Quantity must be at least 1");
    assert!(backend.requests_to("POST", "cart/update_quantity/").is_empty());
}

#[tokio::test]
async fn test_add_to_cart_from_plant_page_reaches_the_cart() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "plant_detail/plant/7/",
        200,
        json!({"plant": {
            "plant_id": 7,
            "name": "Monstera",
            "base_price": "20.00",
            "stock_quantity": 4,
            "sizes": [
                {"size_id": 1, "size_name": "Small", "price_adjustment": "0"},
                {"size_id": 2, "size_name": "Medium", "price_adjustment": "5.00"}
            ],
            "reviews": []
        }}),
    );
    backend.respond("GET", "plant_detail/reviews/7/", 200, json!({"reviews": []}));
    backend.respond("POST", "cart/add/", 200, json!({"success": true}));
    backend.respond_in_turn(
        "GET",
        "cart/5/",
        vec![
            json!({"cart_items": []}),
            json!({"cart_items": [cart_line(11, 7, "Medium", 2, "25.00")]}),
        ],
    );

    let api = backend.api(customer_session(5));
    let plant = PlantDetailHook::mount(&api, PlantId::new(7)).await;
    let detail = plant.state().plant.data.unwrap();
    assert!(detail.size_named("Medium").is_some());

    let cart = CartHook::mount(&api).await;
    cart.add_to_cart(&AddToCartForm {
        plant_id: PlantId::new(7),
        size: Some("Medium".into()),
        quantity: 2,
    })
    .await
    .unwrap();

    let add = backend.requests_to("POST", "cart/add/");
    assert_eq!(add.len(), 1);
    assert_eq!(
        add[0].body,
        json!({"user_id": 5, "plant_id": 7, "size": "Medium", "quantity": 2})
    );

    let items = cart.state().cart_items.data;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].plant_id, Some(PlantId::new(7)));
    assert_eq!(items[0].size.as_deref(), Some("Medium"));
    assert_eq!(items[0].quantity, 2);
}
