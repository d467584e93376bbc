//! Customer order history.

use greencart_client::forms::ReviewForm;
use greencart_client::hooks::CustomerOrdersHook;
use greencart_client::{ApiClient, Route};

use super::enter;
use crate::OrdersAction;
use crate::error::Result;
use crate::render;

pub async fn run(api: &ApiClient, action: OrdersAction) -> Result<()> {
    let route = match &action {
        OrdersAction::Show { id } => Route::Order(*id),
        _ => Route::Orders,
    };
    if !enter(api, route) {
        return Ok(());
    }
    let hook = CustomerOrdersHook::mount(api).await;

    match action {
        OrdersAction::All => render::orders_page(&hook.state(), "all"),
        OrdersAction::Pending => render::orders_page(&hook.state(), "pending"),
        OrdersAction::Delivered => render::orders_page(&hook.state(), "delivered"),
        OrdersAction::Stats => {
            let state = hook.state();
            if let Some(error) = &state.stats.error {
                render::error(error);
            }
            render::order_stats(&state.stats.data);
        }
        OrdersAction::Show { id } => {
            let order = hook.order_details(id).await?;
            render::order_detail(&order);
        }
        OrdersAction::Confirm { id } => {
            let outcome = hook.confirm_delivery(id).await?;
            render::outcome(&outcome, "Thanks for confirming your delivery.");
            render::orders_page(&hook.state(), "pending");
        }
        OrdersAction::Review {
            order,
            plant,
            rating,
            text,
        } => {
            let form = ReviewForm {
                plant_id: plant,
                order_id: order,
                rating,
                review_text: text,
            };
            let outcome = hook.add_review(&form).await?;
            render::outcome(&outcome, "Review submitted.");
        }
    }
    Ok(())
}
