//! Home page, plant collections and the plant page.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use greencart_client::hooks::{HomeHook, PlantCollectionHook, PlantDetailHook};
use greencart_client::{ApiError, Session};
use greencart_core::{OrderId, PlantId};
use greencart_integration_tests::{FakeBackend, customer_session};
use serde_json::{Value, json};

fn monstera(reviews: &Value) -> Value {
    json!({"plant": {
        "plant_id": 7,
        "name": "Monstera",
        "base_price": "20.00",
        "stock_quantity": 4,
        "sizes": [{"size_id": 2, "size_name": "Medium", "price_adjustment": "5.00"}],
        "reviews": reviews
    }})
}

fn review(review_id: i64) -> Value {
    json!({"review_id": review_id, "rating": 4, "review_text": "Thriving"})
}

#[tokio::test]
async fn test_home_loads_every_section() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "home/top-categories/",
        200,
        json!([{"category_id": 1, "name": "Ferns"}]),
    );
    backend.respond(
        "GET",
        "home/top-plants/",
        200,
        json!({"plants": [{"plant_id": 7, "name": "Monstera", "base_price": "20.00"}]}),
    );
    backend.respond(
        "GET",
        "home/top-sellers/",
        200,
        json!({"sellers": [{"seller_id": 8, "name": "Leafy Co"}]}),
    );

    let hook = HomeHook::mount(&backend.api(Session::in_memory())).await;
    let state = hook.state();

    assert_eq!(state.top_categories.data[0].name, "Ferns");
    assert_eq!(state.top_plants.data[0].plant_id, PlantId::new(7));
    assert_eq!(state.top_sellers.data[0].name, "Leafy Co");
    assert!(backend.requests().iter().all(|r| r.authorization.is_none()));
}

#[tokio::test]
async fn test_collection_without_category_searches_everything() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "plant_collection/search/",
        200,
        json!({"plants": [{"plant_id": 7, "name": "Monstera"}]}),
    );
    backend.respond(
        "GET",
        "plant_collection/categories/",
        200,
        json!({"categories": [{"category_id": 1, "name": "Ferns"}]}),
    );

    let hook = PlantCollectionHook::mount(&backend.api(Session::in_memory()), None).await;
    let state = hook.state();

    assert_eq!(state.plants.data.len(), 1);
    assert_eq!(state.all_categories.data[0].name, "Ferns");
    let search = &backend.requests_to("GET", "plant_collection/search/")[0];
    assert_eq!(search.query.as_deref(), Some("q="));
}

#[tokio::test]
async fn test_collection_switches_between_category_and_search() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "plant_collection/category/ferns/",
        200,
        json!([{"plant_id": 3, "name": "Boston Fern"}]),
    );
    backend.respond("GET", "plant_collection/categories/", 200, json!([]));
    backend.respond(
        "GET",
        "plant_collection/search/",
        200,
        json!({"plants": [{"plant_id": 7, "name": "Monstera"}]}),
    );

    let hook = PlantCollectionHook::mount(&backend.api(Session::in_memory()), Some("ferns")).await;
    assert_eq!(hook.state().plants.data[0].name, "Boston Fern");

    hook.search("  monstera ").await;
    let state = hook.state();
    assert_eq!(state.category, None);
    assert_eq!(state.query, "monstera");
    assert_eq!(state.plants.data[0].plant_id, PlantId::new(7));
    let search = &backend.requests_to("GET", "plant_collection/search/")[0];
    assert_eq!(search.query.as_deref(), Some("q=monstera"));
}

#[tokio::test]
async fn test_unknown_category_reports_not_found() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "plant_collection/categories/", 200, json!([]));

    let hook = PlantCollectionHook::mount(&backend.api(Session::in_memory()), Some("cacti")).await;
    let plants = hook.state().plants;

    assert!(plants.data.is_empty());
    assert_eq!(
        plants.error.as_deref(),
        Some("The requested resource was not found.")
    );
}

#[tokio::test]
async fn test_plant_page_uses_embedded_reviews() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "plant_detail/plant/7/", 200, monstera(&json!([review(1)])));

    let hook = PlantDetailHook::mount(&backend.api(Session::in_memory()), PlantId::new(7)).await;

    assert_eq!(hook.state().reviews.data.len(), 1);
    assert!(backend.requests_to("GET", "plant_detail/reviews/7/").is_empty());
}

#[tokio::test]
async fn test_more_reviews_are_appended() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "plant_detail/plant/7/", 200, monstera(&json!([])));
    backend.respond_in_turn(
        "GET",
        "plant_detail/reviews/7/",
        vec![
            json!({"reviews": [review(1), review(2)]}),
            json!({"reviews": [review(3)]}),
        ],
    );

    let hook = PlantDetailHook::mount(&backend.api(Session::in_memory()), PlantId::new(7)).await;
    hook.load_more_reviews().await;

    assert_eq!(hook.state().reviews.data.len(), 3);
    let pages = backend.requests_to("GET", "plant_detail/reviews/7/");
    assert_eq!(pages[1].query.as_deref(), Some("limit=10&offset=2"));
}

#[tokio::test]
async fn test_plant_page_adds_to_cart_by_size_id() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "plant_detail/plant/7/", 200, monstera(&json!([review(1)])));
    backend.respond("POST", "plant_detail/add-to-cart/", 200, json!({"success": true}));

    let hook = PlantDetailHook::mount(&backend.api(customer_session(5)), PlantId::new(7)).await;

    assert!(hook.add_to_cart("Large", 1).await.is_err());
    hook.add_to_cart("Medium", 2).await.unwrap();

    let add = backend.requests_to("POST", "plant_detail/add-to-cart/");
    assert_eq!(add.len(), 1);
    assert_eq!(
        add[0].body,
        json!({"user_id": 5, "plant_id": 7, "size_id": 2, "quantity": 2})
    );
}

#[tokio::test]
async fn test_anonymous_add_to_cart_asks_for_login() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "plant_detail/plant/7/", 200, monstera(&json!([review(1)])));

    let hook = PlantDetailHook::mount(&backend.api(Session::in_memory()), PlantId::new(7)).await;
    let err = hook.add_to_cart("Medium", 1).await.unwrap_err();

    assert_eq!(err.user_message(), "Please log in to continue");
    assert!(backend.requests_to("POST", "plant_detail/add-to-cart/").is_empty());
}

#[tokio::test]
async fn test_review_is_validated_then_posted() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "plant_detail/plant/7/", 200, monstera(&json!([review(1)])));
    backend.respond(
        "POST",
        "plant_detail/add-review/7/",
        200,
        json!({"success": true, "message": "Review added"}),
    );

    let hook = PlantDetailHook::mount(&backend.api(customer_session(5)), PlantId::new(7)).await;

    assert!(hook.add_review(OrderId::new(30), 6, "Great").await.is_err());
    let outcome = hook
        .add_review(OrderId::new(30), 5, " Great plant ")
        .await
        .unwrap();

    assert_eq!(outcome.message.as_deref(), Some("Review added"));
    let body = &backend.requests_to("POST", "plant_detail/add-review/7/")[0].body;
    assert_eq!(
        body,
        &json!({"user_id": 5, "order_id": 30, "rating": 5, "review_text": "Great plant"})
    );
    assert_eq!(backend.requests_to("GET", "plant_detail/plant/7/").len(), 2);
}

#[tokio::test]
async fn test_add_to_cart_without_a_loaded_plant_is_not_found() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "plant_detail/reviews/7/", 200, json!({"reviews": []}));

    let hook = PlantDetailHook::mount(&backend.api(customer_session(5)), PlantId::new(7)).await;
    assert_eq!(hook.state().plant.data, None);

    let err = hook.add_to_cart("Medium", 1).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound));
    assert!(backend.requests_to("POST", "plant_detail/add-to-cart/").is_empty());
}
