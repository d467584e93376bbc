//! Browsing, cart and checkout.

use greencart_client::forms::{AddToCartForm, CheckoutForm};
use greencart_client::hooks::{
    CartHook, CustomerOrdersHook, HomeHook, PlantCollectionHook, PlantDetailHook,
};
use greencart_client::{ApiClient, Route};
use greencart_core::{CartItemId, DeliveryMethodId, PlantId};

use super::enter;
use crate::CartAction;
use crate::error::{self, Result};
use crate::render;

pub async fn home(api: &ApiClient) -> Result<()> {
    let hook = HomeHook::mount(api).await;
    render::home(&hook.state());
    Ok(())
}

pub async fn plants(
    api: &ApiClient,
    category: Option<&str>,
    search: Option<&str>,
    list_categories: bool,
) -> Result<()> {
    let hook = PlantCollectionHook::mount(api, category).await;
    if let Some(query) = search {
        hook.search(query).await;
    }

    let state = hook.state();
    if list_categories {
        render::categories(&state.all_categories.data);
        return Ok(());
    }
    if let Some(error) = &state.plants.error {
        render::error(error);
    }
    render::plants(&state.plants.data);
    Ok(())
}

pub async fn plant(api: &ApiClient, plant_id: PlantId, pages: u32) -> Result<()> {
    let hook = PlantDetailHook::mount(api, plant_id).await;
    for _ in 1..pages {
        hook.load_more_reviews().await;
    }

    let state = hook.state();
    match (&state.plant.data, &state.plant.error) {
        (Some(plant), _) => render::plant(plant, &state.reviews.data),
        (None, Some(error)) => render::error(error),
        (None, None) => render::error("Plant not found"),
    }
    Ok(())
}

pub async fn cart(api: &ApiClient, action: CartAction) -> Result<()> {
    if !enter(api, Route::Cart) {
        return Ok(());
    }
    let hook = CartHook::mount(api).await;

    let outcome = match action {
        CartAction::Show => None,
        CartAction::Add {
            plant,
            size,
            quantity,
        } => {
            error::add_breadcrumb("cart", "Add to cart", &[("size", size.as_str())]);
            let form = AddToCartForm {
                plant_id: plant,
                size: Some(size),
                quantity,
            };
            Some((hook.add_to_cart(&form).await?, "Added to cart."))
        }
        CartAction::Toggle { line } => Some((
            hook.toggle_item(CartItemId::new(line)).await?,
            "Selection updated.",
        )),
        CartAction::Qty { line, quantity } => Some((
            hook.update_quantity(CartItemId::new(line), quantity).await?,
            "Quantity updated.",
        )),
        CartAction::Remove { line } => Some((
            hook.remove(CartItemId::new(line)).await?,
            "Removed from cart.",
        )),
    };
    if let Some((outcome, fallback)) = outcome {
        render::outcome(&outcome, fallback);
        render::message("");
    }

    let state = hook.state();
    render::cart(
        &state.cart_items.data,
        state.cart_items.error.as_ref(),
        hook.selected_subtotal(),
    );
    Ok(())
}

pub async fn checkout(
    api: &ApiClient,
    method: Option<i64>,
    address: String,
    notes: String,
) -> Result<()> {
    if !enter(api, Route::Checkout) {
        return Ok(());
    }
    let (cart, orders) = tokio::join!(CartHook::mount(api), CustomerOrdersHook::mount(api));

    let Some(method) = method else {
        orders.load_delivery_methods().await;
        let state = cart.state();
        render::cart(
            &state.cart_items.data,
            state.cart_items.error.as_ref(),
            cart.selected_subtotal(),
        );
        render::message("");
        render::message("Delivery methods (pass one with --method):");
        render::delivery_methods(&orders.state().delivery_methods.data);
        return Ok(());
    };

    let form = CheckoutForm {
        delivery_method_id: Some(DeliveryMethodId::new(method)),
        delivery_address: address,
        delivery_notes: notes,
    };
    let created = orders
        .place_order(&form, &cart.state().cart_items.data)
        .await?;
    error::add_breadcrumb("checkout", "Order placed", &[]);
    render::created_order(&created);
    render::message(&format!("Continue at {}", Route::OrderConfirmation));
    Ok(())
}
