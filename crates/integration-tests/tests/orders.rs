//! Customer orders and checkout.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use greencart_client::forms::CheckoutForm;
use greencart_client::hooks::{CartHook, CustomerOrdersHook};
use greencart_core::{DeliveryMethodId, OrderId, OrderStatus};
use greencart_integration_tests::{FakeBackend, cart_line, customer_session};
use serde_json::{Value, json};

fn order(order_id: i64, status: &str) -> Value {
    json!({
        "order_id": order_id,
        "order_number": format!("GC-{order_id}"),
        "order_status": status,
        "total_amount": "30.00"
    })
}

fn script_orders(backend: &FakeBackend) {
    backend.respond(
        "GET",
        "order/orders/5/",
        200,
        json!({"orders": [order(1, "Delivered"), order(2, "Processing")]}),
    );
    backend.respond(
        "GET",
        "order/pending-confirmation/5/",
        200,
        json!({"orders": [order(1, "Delivered")]}),
    );
    backend.respond("GET", "order/completed-for-review/5/", 200, json!({"orders": []}));
    backend.respond(
        "GET",
        "order/stats/5/",
        200,
        json!({"stats": {"total_orders": 2, "pending_orders": 1, "delivered_orders": 1, "total_spent": "60.00"}}),
    );
}

#[tokio::test]
async fn test_orders_page_loads_all_slices() {
    let backend = FakeBackend::start().await;
    script_orders(&backend);

    let hook = CustomerOrdersHook::mount(&backend.api(customer_session(5))).await;
    let state = hook.state();

    assert_eq!(state.all_orders.data.len(), 2);
    assert_eq!(state.pending_confirmation.data[0].order_status, OrderStatus::Delivered);
    assert!(state.completed_for_review.data.is_empty());
    assert_eq!(state.stats.data.total_orders, 2);
    assert_eq!(hook.open_orders().len(), 1);
}

#[tokio::test]
async fn test_confirming_delivery_refetches_pending() {
    let backend = FakeBackend::start().await;
    script_orders(&backend);
    backend.respond("POST", "order/confirm-delivery/", 200, json!({"success": true}));

    let hook = CustomerOrdersHook::mount(&backend.api(customer_session(5))).await;
    backend.respond("GET", "order/pending-confirmation/5/", 200, json!({"orders": []}));

    hook.confirm_delivery(OrderId::new(1)).await.unwrap();

    let body = &backend.requests_to("POST", "order/confirm-delivery/")[0].body;
    assert_eq!(body, &json!({"order_id": 1, "user_id": 5}));
    assert!(hook.state().pending_confirmation.data.is_empty());
}

#[tokio::test]
async fn test_checkout_orders_selected_lines_only() {
    let backend = FakeBackend::start().await;
    script_orders(&backend);
    let mut unselected = cart_line(12, 8, "Large", 1, "40.00");
    unselected["selected"] = json!(false);
    backend.respond(
        "GET",
        "cart/5/",
        200,
        json!({"cart_items": [
            cart_line(11, 7, "Medium", 2, "25.00"),
            unselected,
            cart_line(13, 9, "Small", 1, "8.00")
        ]}),
    );
    backend.respond(
        "POST",
        "order/create-order/",
        200,
        json!({"success": true, "order_id": 30, "order_number": "GC-30", "total_amount": "58.00"}),
    );

    let api = backend.api(customer_session(5));
    let cart = CartHook::mount(&api).await;
    let orders = CustomerOrdersHook::mount(&api).await;

    let form = CheckoutForm {
        delivery_method_id: Some(DeliveryMethodId::new(2)),
        delivery_address: " 12 Fern Lane ".into(),
        delivery_notes: String::new(),
    };
    let created = orders
        .place_order(&form, &cart.state().cart_items.data)
        .await
        .unwrap();

    assert_eq!(created.order_id, OrderId::new(30));
    let body = &backend.requests_to("POST", "order/create-order/")[0].body;
    assert_eq!(body["cart_ids"], "11,13");
    assert_eq!(body["delivery_address"], "12 Fern Lane");
    assert_eq!(body["delivery_method_id"], 2);
}

#[tokio::test]
async fn test_checkout_without_method_is_rejected_locally() {
    let backend = FakeBackend::start().await;
    script_orders(&backend);
    backend.respond(
        "GET",
        "cart/5/",
        200,
        json!({"cart_items": [cart_line(11, 7, "Medium", 2, "25.00")]}),
    );

    let api = backend.api(customer_session(5));
    let cart = CartHook::mount(&api).await;
    let orders = CustomerOrdersHook::mount(&api).await;

    let form = CheckoutForm {
        delivery_method_id: None,
        delivery_address: "12 Fern Lane".into(),
        delivery_notes: String::new(),
    };
    let err = orders
        .place_order(&form, &cart.state().cart_items.data)
        .await
        .unwrap_err();

    assert!(!err.user_message().is_empty());
    assert!(backend.requests_to("POST", "order/create-order/").is_empty());
}
