//! Admin dashboard commands.
//!
//! # Usage
//!
//! ```bash
//! # Orders, and assigning one to a delivery agent
//! greencart admin orders
//! greencart admin assign 42 7
//!
//! # Users by role (`customer`, `seller`/`sales`, `delivery`)
//! greencart admin users delivery
//!
//! # Discount on a category for one week
//! greencart admin discount --type 1 --value 15 --percentage \
//!     --start 2026-06-01T00:00 --end 2026-06-08T00:00 --category 3
//! ```

use greencart_client::forms::DiscountForm;
use greencart_client::hooks::AdminDashboardHook;
use greencart_client::routes::AdminPage;
use greencart_client::types::ActivityQuery;
use greencart_client::{ApiClient, Route};
use greencart_core::{CategoryId, DiscountTypeId, PlantId, Role};

use super::enter;
use crate::AdminAction;
use crate::error::{self, Result};
use crate::render;

const fn page_of(action: &AdminAction) -> AdminPage {
    match action {
        AdminAction::Dashboard => AdminPage::Dashboard,
        AdminAction::Orders { .. } | AdminAction::Assign { .. } => AdminPage::Orders,
        AdminAction::Sales | AdminAction::Discounts { .. } | AdminAction::Discount { .. } => {
            AdminPage::Sales
        }
        AdminAction::Users { .. } | AdminAction::DeleteCustomer { .. } => AdminPage::Customers,
        AdminAction::Reports { .. } => AdminPage::Reports,
        AdminAction::Delivery => AdminPage::Delivery,
    }
}

pub async fn run(api: &ApiClient, action: AdminAction) -> Result<()> {
    if !enter(api, Route::Admin(page_of(&action))) {
        return Ok(());
    }
    let hook = AdminDashboardHook::mount(api).await;

    match action {
        AdminAction::Dashboard => render::admin_dashboard(&hook.state()),
        AdminAction::Orders { id: None } => {
            let state = hook.state();
            if let Some(error) = &state.orders.error {
                render::error(error);
            }
            render::admin_orders(&state.orders.data);
        }
        AdminAction::Orders { id: Some(id) } => {
            let order = hook.order_details(id).await?;
            render::order_detail(&order);
        }
        AdminAction::Assign { order, agent } => {
            let outcome = hook.assign_delivery_agent(order, agent).await?;
            render::outcome(&outcome, "Delivery agent assigned.");
        }
        AdminAction::Sales => {
            let (overview, discounts) = tokio::join!(hook.order_overview(), hook.discounts(true));
            render::overview(&overview?);
            render::message("");
            render::message("Active discounts:");
            render::discounts(&discounts?);
        }
        AdminAction::Users { role } => {
            let state = hook.state();
            match role {
                Role::Customer => {
                    render::users(&state.customers.data, state.customers.error.as_ref());
                }
                Role::Seller => render::users(&state.sellers.data, state.sellers.error.as_ref()),
                Role::DeliveryAgent => render::users(
                    &state.delivery_agents.data,
                    state.delivery_agents.error.as_ref(),
                ),
                Role::Admin => render::users(&api.user_list(Role::Admin).await?, None),
            }
        }
        AdminAction::DeleteCustomer { id } => {
            let outcome = hook.delete_customer(id).await?;
            let customer_id = id.to_string();
            error::add_breadcrumb(
                "admin",
                "Customer deleted",
                &[("customer_id", customer_id.as_str())],
            );
            render::outcome(&outcome, "Customer deleted.");
        }
        AdminAction::Reports {
            resolved,
            details,
            activity_type,
        } => {
            if details {
                render::low_stock_details(&hook.low_stock_details().await?);
            } else if resolved {
                render::alerts(&hook.resolved_alerts().await?);
            } else {
                render::alerts(&hook.state().low_stock_alerts.data);
            }
            render::message("");
            render::performance(&hook.agent_performance().await?);
            render::message("");
            let query = ActivityQuery {
                activity_type,
                start_date: None,
                end_date: None,
            };
            render::activity(&hook.activity_log(&query).await?);
        }
        AdminAction::Delivery => {
            let state = hook.state();
            render::users(
                &state.delivery_agents.data,
                state.delivery_agents.error.as_ref(),
            );
            render::message("");
            render::available_agents(&hook.available_agents().await?);
        }
        AdminAction::Discounts { active, types } => {
            if types {
                render::discount_types(&hook.discount_types().await?);
            } else {
                render::discounts(&hook.discounts(active).await?);
            }
        }
        AdminAction::Discount {
            type_id,
            value,
            percentage,
            start,
            end,
            category,
            plant,
        } => {
            let form = DiscountForm {
                discount_type_id: Some(DiscountTypeId::new(type_id)),
                discount_value: value,
                is_percentage: percentage,
                start_date: start,
                end_date: end,
                category_id: category.map(CategoryId::new),
                plant_id: plant.map(PlantId::new),
            };
            let outcome = hook.apply_discount(&form).await?;
            render::outcome(&outcome, "Discount applied.");
        }
    }
    Ok(())
}
