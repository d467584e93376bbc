//! Delivery agent dashboard.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use greencart_client::hooks::DeliveryAgentHook;
use greencart_core::{DeliveryConfirmation, Money, OrderId, OrderStatus, Role};
use greencart_integration_tests::{FakeBackend, session_as};
use serde_json::json;

fn script_dashboard(backend: &FakeBackend) {
    backend.respond(
        "GET",
        "delivery_agent/dashboard/8/",
        200,
        json!({"success": true, "data": {
            "stats": {"total_assignments": 3, "pending_assignments": 1, "completed_assignments": 2,
                      "total_earnings": 45.0},
            "pending_orders": [{"order_id": 10, "order_status": "Out for Delivery"}],
            "completed_orders": []
        }}),
    );
    backend.respond(
        "GET",
        "delivery_agent/monthly-earnings/8/",
        200,
        json!({"success": true, "data": [{"month": "March", "year": 2026, "delivery_count": 2, "earnings": 30.0}]}),
    );
    backend.respond(
        "GET",
        "delivery_agent/assignment-count/8/",
        200,
        json!({"assignment_count": 3}),
    );
}

#[tokio::test]
async fn test_dashboard_loads_every_slice() {
    let backend = FakeBackend::start().await;
    script_dashboard(&backend);

    let hook = DeliveryAgentHook::mount(&backend.api(session_as(8, Role::DeliveryAgent))).await;
    let state = hook.state();

    assert_eq!(state.dashboard.data.stats.pending_assignments, 1);
    assert_eq!(
        state.dashboard.data.pending_orders[0].order_status,
        OrderStatus::OutForDelivery
    );
    assert_eq!(state.monthly_earnings.data[0].earnings, Money::from_cents(3000));
    assert_eq!(state.assignment_count.data.assignment_count, 3);
}

#[tokio::test]
async fn test_earnings_for_a_given_year() {
    let backend = FakeBackend::start().await;
    script_dashboard(&backend);

    let hook = DeliveryAgentHook::mount(&backend.api(session_as(8, Role::DeliveryAgent))).await;
    hook.load_earnings(Some(2025)).await;

    let requests = backend.requests_to("GET", "delivery_agent/monthly-earnings/8/");
    assert_eq!(requests[0].query, None);
    assert_eq!(requests[1].query.as_deref(), Some("year=2025"));
}

#[tokio::test]
async fn test_confirmation_refetches_the_dashboard() {
    let backend = FakeBackend::start().await;
    script_dashboard(&backend);
    backend.respond(
        "POST",
        "delivery_agent/confirm-delivery/",
        200,
        json!({"success": true, "message": "Delivery confirmed"}),
    );

    let hook = DeliveryAgentHook::mount(&backend.api(session_as(8, Role::DeliveryAgent))).await;
    let outcome = hook
        .confirm_delivery(OrderId::new(10), "Left at door", DeliveryConfirmation::Delivered)
        .await
        .unwrap();

    assert_eq!(outcome.message.as_deref(), Some("Delivery confirmed"));
    let body = &backend.requests_to("POST", "delivery_agent/confirm-delivery/")[0].body;
    assert_eq!(
        body,
        &json!({"order_id": 10, "agent_id": 8, "notes": "Left at door", "type": "delivered"})
    );
    assert_eq!(backend.requests_to("GET", "delivery_agent/dashboard/8/").len(), 2);
}

#[tokio::test]
async fn test_status_update_posts_agent_and_status() {
    let backend = FakeBackend::start().await;
    script_dashboard(&backend);
    backend.respond("POST", "delivery_agent/update-status/", 200, json!({"success": true}));

    let hook = DeliveryAgentHook::mount(&backend.api(session_as(8, Role::DeliveryAgent))).await;
    hook.update_status(OrderId::new(10), "Shipped", "").await.unwrap();

    let body = &backend.requests_to("POST", "delivery_agent/update-status/")[0].body;
    assert_eq!(
        body,
        &json!({"order_id": 10, "agent_id": 8, "status": "Shipped", "notes": ""})
    );
}

#[tokio::test]
async fn test_rejected_confirmation_surfaces_server_message() {
    let backend = FakeBackend::start().await;
    script_dashboard(&backend);
    backend.respond(
        "POST",
        "delivery_agent/mark-delivered/",
        200,
        json!({"success": false, "error": "Order is not assigned to you"}),
    );

    let hook = DeliveryAgentHook::mount(&backend.api(session_as(8, Role::DeliveryAgent))).await;
    let err = hook.mark_delivered(OrderId::new(99), "").await.unwrap_err();

    assert_eq!(err.user_message(), "Order is not assigned to you");
    assert_eq!(backend.requests_to("GET", "delivery_agent/dashboard/8/").len(), 1);
}
