//! Delivery agent commands.

use greencart_client::hooks::DeliveryAgentHook;
use greencart_client::routes::DeliveryPage;
use greencart_client::{ApiClient, Route};

use super::enter;
use crate::DeliveryAction;
use crate::error::{self, Result};
use crate::render;

const fn page_of(action: &DeliveryAction) -> DeliveryPage {
    match action {
        DeliveryAction::Dashboard => DeliveryPage::Dashboard,
        DeliveryAction::Assigned => DeliveryPage::Assigned,
        DeliveryAction::Pending
        | DeliveryAction::Confirm { .. }
        | DeliveryAction::Status { .. }
        | DeliveryAction::Delivered { .. } => DeliveryPage::Pending,
        DeliveryAction::Completed => DeliveryPage::Completed,
        DeliveryAction::Earnings { .. } => DeliveryPage::Earnings,
    }
}

pub async fn run(api: &ApiClient, action: DeliveryAction) -> Result<()> {
    if !enter(api, Route::Delivery(page_of(&action))) {
        return Ok(());
    }
    let hook = DeliveryAgentHook::mount(api).await;

    match action {
        DeliveryAction::Dashboard => render::delivery_dashboard(&hook.state()),
        DeliveryAction::Assigned => render::assignments(&hook.assigned_orders().await?),
        DeliveryAction::Pending => render::assignments(&hook.pending_orders().await?),
        DeliveryAction::Completed => render::assignments(&hook.completed_orders().await?),
        DeliveryAction::Earnings { year } => {
            if year.is_some() {
                hook.load_earnings(year).await;
            }
            let state = hook.state();
            render::earnings(
                &state.monthly_earnings.data,
                state.monthly_earnings.error.as_ref(),
            );
        }
        DeliveryAction::Confirm {
            order,
            outcome,
            notes,
        } => {
            let kind = outcome.to_string();
            let result = hook.confirm_delivery(order, &notes, outcome).await?;
            error::add_breadcrumb("delivery", "Delivery confirmed", &[("kind", kind.as_str())]);
            render::outcome(&result, "Delivery confirmed.");
        }
        DeliveryAction::Status {
            order,
            status,
            notes,
        } => {
            let result = hook.update_status(order, &status, &notes).await?;
            render::outcome(&result, "Status updated.");
        }
        DeliveryAction::Delivered { order, notes } => {
            let result = hook.mark_delivered(order, &notes).await?;
            render::outcome(&result, "Marked as delivered.");
        }
    }
    Ok(())
}
