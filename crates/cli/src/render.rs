//! Plain-text rendering of pages.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use greencart_client::Route;
use greencart_client::hooks::{AdminState, DeliveryState, HomeState, OrdersState, SellerState};
use greencart_client::types::{
    ActivityEntry, AdminOrder, AgentPerformance, Assignment, AvailableAgent, CartItem, Category,
    CreatedOrder, DeliveryMethod, Discount, DiscountType, LowStockAlert, LowStockDetail,
    MonthlyEarning, OrderDetail, OrderOverview, OrderStats, OrderSummary, Outcome, PlantDetail,
    PlantSummary, Profile, Review, SaleRecord, SellerPlant, SellerPlantDetail, UploadedImage, User,
    UserListEntry,
};
use greencart_core::Money;

fn opt(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn money(value: Option<Money>) -> String {
    value.map_or_else(|| "-".to_string(), |m| m.to_string())
}

/// Print rows under headers with columns padded to the widest cell.
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(headers.to_vec()));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
    if rows.is_empty() {
        println!("(none)");
    }
}

fn heading(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "=".repeat(title.chars().count()));
}

/// A slice that failed to load.
fn slice_error(error: Option<&String>) {
    if let Some(error) = error {
        println!("! {error}");
    }
}

pub fn message(text: &str) {
    println!("{text}");
}

pub fn error(text: &str) {
    eprintln!("Error: {text}");
}

pub fn outcome(outcome: &Outcome, fallback: &str) {
    println!("{}", outcome.message_or(fallback));
}

pub fn redirect(route: &Route) {
    eprintln!("Redirecting to {route}");
}

pub fn route(requested: &Route, landed: &Route) {
    if requested == landed {
        println!("{landed}");
    } else {
        println!("{requested} -> {landed}");
    }
}

pub fn user(user: &User) {
    println!("{} <{}>", user.display_name(), user.email);
    println!("  id:    {}", user.user_id);
    println!("  role:  {}", user.role);
    if let Some(phone) = &user.phone {
        println!("  phone: {phone}");
    }
}

pub fn profile(profile: &Profile) {
    println!("{}", opt(profile.name.as_deref()));
    println!("  id:      {}", profile.user_id);
    println!("  email:   {}", opt(profile.email.as_deref()));
    println!("  phone:   {}", opt(profile.phone.as_deref()));
    println!("  address: {}", opt(profile.address.as_deref()));
}

// =============================================================================
// Shopping
// =============================================================================

pub fn home(state: &HomeState) {
    heading("Top categories");
    slice_error(state.top_categories.error.as_ref());
    categories(&state.top_categories.data);

    heading("Top plants");
    slice_error(state.top_plants.error.as_ref());
    plants(&state.top_plants.data);

    heading("Top sellers");
    slice_error(state.top_sellers.error.as_ref());
    table(
        &["ID", "Seller", "Sales", "Rating"],
        &state
            .top_sellers
            .data
            .iter()
            .map(|s| {
                vec![
                    s.seller_id.to_string(),
                    s.name.clone(),
                    s.total_sales.map_or_else(|| "-".into(), |n| n.to_string()),
                    s.rating.map_or_else(|| "-".into(), |r| format!("{r:.1}")),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn categories(categories: &[Category]) {
    table(
        &["ID", "Category", "Slug"],
        &categories
            .iter()
            .map(|c| vec![c.category_id.to_string(), c.name.clone(), c.slug_or_derived()])
            .collect::<Vec<_>>(),
    );
}

pub fn plants(plants: &[PlantSummary]) {
    table(
        &["ID", "Plant", "Price", "Rating", "Stock"],
        &plants
            .iter()
            .map(|p| {
                vec![
                    p.plant_id.to_string(),
                    p.name.clone(),
                    money(p.price),
                    p.avg_rating.map_or_else(|| "-".into(), |r| format!("{r:.1}")),
                    p.stock_quantity.map_or_else(|| "-".into(), |s| s.to_string()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn plant(plant: &PlantDetail, reviews: &[Review]) {
    heading(&plant.name);
    if let Some(description) = &plant.description {
        println!("{description}");
    }
    println!(
        "Rating {:.1} ({} reviews), {} in stock",
        plant.avg_rating, plant.review_count, plant.stock_quantity
    );
    if let Some(discount) = &plant.discount {
        println!(
            "Discount: {}",
            discount.name.as_deref().unwrap_or("active")
        );
    }

    heading("Sizes");
    table(
        &["Size", "Price", "Your price"],
        &plant
            .sizes
            .iter()
            .map(|s| {
                vec![
                    s.size_name.clone(),
                    plant.price_for(s).to_string(),
                    plant.discounted_price_for(s).to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );

    if !plant.features.is_empty() {
        heading("Features");
        for feature in &plant.features {
            println!("- {feature}");
        }
    }
    if !plant.care_tips.is_empty() {
        heading("Care");
        for tip in &plant.care_tips {
            println!("- {tip}");
        }
    }

    heading("Reviews");
    table(
        &["Rating", "By", "Review"],
        &reviews
            .iter()
            .map(|r| {
                vec![
                    format!("{:.1}", r.rating),
                    opt(r.author.as_deref()),
                    opt(r.review_text.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn cart(items: &[CartItem], error: Option<&String>, subtotal: Money) {
    slice_error(error);
    table(
        &["Line", "Plant", "Size", "Qty", "Price", "Total", "Selected"],
        &items
            .iter()
            .map(|i| {
                vec![
                    i.cart_id.to_string(),
                    i.name.clone(),
                    opt(i.size.as_deref()),
                    i.quantity.to_string(),
                    i.price.to_string(),
                    i.line_total().to_string(),
                    if i.selected { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
    println!();
    println!("Selected subtotal: {subtotal}");
}

pub fn delivery_methods(methods: &[DeliveryMethod]) {
    table(
        &["ID", "Method", "Price", "Time"],
        &methods
            .iter()
            .map(|m| {
                vec![
                    m.id.to_string(),
                    m.name.clone(),
                    m.price.to_string(),
                    opt(m.time.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn created_order(order: &CreatedOrder) {
    println!(
        "Order {} placed, total {}",
        order
            .order_number
            .clone()
            .unwrap_or_else(|| format!("#{}", order.order_id)),
        order.total_amount
    );
}

// =============================================================================
// Orders
// =============================================================================

pub fn orders(orders: &[OrderSummary]) {
    table(
        &["Order", "Date", "Status", "Total", "Items"],
        &orders
            .iter()
            .map(|o| {
                vec![
                    o.reference(),
                    opt(o.order_date.as_deref()),
                    o.order_status.to_string(),
                    o.total_amount.to_string(),
                    opt(o.items_summary.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn order_stats(stats: &OrderStats) {
    println!("Orders:    {}", stats.total_orders);
    println!("Pending:   {}", stats.pending_orders);
    println!("Delivered: {}", stats.delivered_orders);
    println!("Spent:     {}", stats.total_spent);
}

pub fn orders_page(state: &OrdersState, tab: &str) {
    let (title, slice) = match tab {
        "pending" => ("Awaiting your confirmation", &state.pending_confirmation),
        "delivered" => ("Delivered", &state.completed_for_review),
        _ => ("All orders", &state.all_orders),
    };
    heading(title);
    slice_error(slice.error.as_ref());
    orders(&slice.data);
}

pub fn order_detail(order: &OrderDetail) {
    heading(&format!(
        "Order {}",
        order
            .order_number
            .clone()
            .unwrap_or_else(|| format!("#{}", order.order_id))
    ));
    println!("Status:   {}", order.order_status);
    println!("Date:     {}", opt(order.order_date.as_deref()));
    println!("Delivery: {}", opt(order.delivery_method.as_deref()));
    println!("Address:  {}", opt(order.delivery_address.as_deref()));
    if let Some(agent) = &order.agent_name {
        println!("Agent:    {agent}");
    }
    println!();
    table(
        &["Plant", "Size", "Qty", "Unit", "Total"],
        &order
            .items
            .iter()
            .map(|i| {
                vec![
                    i.plant_name.clone(),
                    opt(i.size_name.as_deref()),
                    i.quantity.to_string(),
                    i.unit_price.to_string(),
                    i.item_total.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
    println!();
    println!("Total: {}", order.total_amount);
}

// =============================================================================
// Seller
// =============================================================================

pub fn seller_dashboard(state: &SellerState) {
    heading("Seller dashboard");
    slice_error(state.stats.error.as_ref());
    let stats = &state.stats.data;
    println!("Plants:    {}", stats.total_plants);
    println!("Sold:      {}", stats.total_sold);
    println!("Earnings:  {}", stats.total_earnings);
    println!("Low stock: {}", stats.low_stock_count);

    heading("Recent sales");
    slice_error(state.recent_sales.error.as_ref());
    sales(&state.recent_sales.data);

    heading("Low stock");
    slice_error(state.low_stock.error.as_ref());
    table(
        &["ID", "Plant", "Stock"],
        &state
            .low_stock
            .data
            .iter()
            .map(|p| vec![p.plant_id.to_string(), p.name.clone(), p.stock_quantity.to_string()])
            .collect::<Vec<_>>(),
    );
}

pub fn seller_plants(plants: &[SellerPlant], error: Option<&String>) {
    slice_error(error);
    table(
        &["ID", "Plant", "Price", "Stock", "Categories"],
        &plants
            .iter()
            .map(|p| {
                vec![
                    p.plant_id.to_string(),
                    p.name.clone(),
                    p.base_price.to_string(),
                    p.stock_quantity.to_string(),
                    p.category_names().join(", "),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn sales(sales: &[SaleRecord]) {
    table(
        &["Order", "Date", "Plant", "Qty", "Amount"],
        &sales
            .iter()
            .map(|s| {
                vec![
                    s.order_number
                        .clone()
                        .unwrap_or_else(|| format!("#{}", s.order_id)),
                    opt(s.order_date.as_deref()),
                    s.plant_name.clone(),
                    s.quantity.to_string(),
                    s.total_amount.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn seller_plant(plant: &SellerPlantDetail) {
    println!("Name:        {}", opt(plant.name.as_deref()));
    println!("Description: {}", opt(plant.description.as_deref()));
    println!("Price:       {}", money(plant.base_price));
    println!(
        "Stock:       {}",
        plant.stock_quantity.map_or_else(|| "-".into(), |s| s.to_string())
    );
    println!("Categories:  {}", opt(plant.category_ids.as_deref()));
    println!("Sizes:       {}", opt(plant.sizes.as_deref()));
    println!("Features:    {}", opt(plant.features.as_deref()));
    println!("Care tips:   {}", opt(plant.care_tips.as_deref()));
    println!("Images:      {}", opt(plant.images.as_deref()));
}

pub fn uploaded(images: &[UploadedImage]) {
    for image in images {
        println!("{}", image.url);
    }
}

// =============================================================================
// Admin
// =============================================================================

pub fn admin_dashboard(state: &AdminState) {
    heading("Admin dashboard");
    slice_error(state.stats.error.as_ref());
    let stats = &state.stats.data;
    println!("Customers:         {}", stats.total_customers);
    println!("Orders:            {}", stats.total_orders);
    println!("Sellers:           {}", stats.total_sales_reps);
    println!("Delivery agents:   {}", stats.total_delivery_agents);
    println!("Monthly revenue:   {}", stats.monthly_revenue);
    println!("Active deliveries: {}", stats.active_deliveries);

    heading("Recent orders");
    slice_error(state.orders.error.as_ref());
    admin_orders(&state.orders.data);

    heading("Low-stock alerts");
    slice_error(state.low_stock_alerts.error.as_ref());
    alerts(&state.low_stock_alerts.data);
}

pub fn users(users: &[UserListEntry], error: Option<&String>) {
    slice_error(error);
    table(
        &["ID", "Name", "Email", "Phone"],
        &users
            .iter()
            .map(|u| {
                vec![
                    u.user_id.to_string(),
                    opt(u.name.as_deref()),
                    opt(u.email.as_deref()),
                    opt(u.phone.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn admin_orders(orders: &[AdminOrder]) {
    table(
        &["Order", "Customer", "Date", "Status", "Total", "Agent"],
        &orders
            .iter()
            .map(|o| {
                vec![
                    o.order_number
                        .clone()
                        .unwrap_or_else(|| format!("#{}", o.order_id)),
                    opt(o.customer_name.as_deref()),
                    opt(o.order_date.as_deref()),
                    o.order_status.to_string(),
                    o.total_amount.to_string(),
                    opt(o.agent_name.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn alerts(alerts: &[LowStockAlert]) {
    table(
        &["Plant", "Category", "Stock", "Since"],
        &alerts
            .iter()
            .map(|a| {
                vec![
                    a.plant_name.clone(),
                    opt(a.category.as_deref()),
                    a.stock_level.to_string(),
                    opt(a.alert_date.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn low_stock_details(rows: &[LowStockDetail]) {
    table(
        &["ID", "Plant", "Stock", "Seller", "Category"],
        &rows
            .iter()
            .map(|r| {
                vec![
                    r.plant_id.to_string(),
                    r.plant_name.clone(),
                    r.stock_quantity.to_string(),
                    opt(r.seller_name.as_deref()),
                    opt(r.category.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn overview(rows: &[OrderOverview]) {
    table(
        &["Status", "Orders", "Amount"],
        &rows
            .iter()
            .map(|r| {
                vec![
                    r.order_status.to_string(),
                    r.order_count.to_string(),
                    r.total_amount.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn performance(rows: &[AgentPerformance]) {
    table(
        &["Agent", "Deliveries", "Completed", "Avg hours", "Earnings"],
        &rows
            .iter()
            .map(|r| {
                vec![
                    r.agent_name
                        .clone()
                        .unwrap_or_else(|| r.agent_id.to_string()),
                    r.total_deliveries.to_string(),
                    r.completed_deliveries.to_string(),
                    r.avg_delivery_time
                        .map_or_else(|| "-".into(), |h| format!("{h:.1}")),
                    r.total_earnings.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn available_agents(agents: &[AvailableAgent]) {
    table(
        &["ID", "Agent", "Phone", "Active"],
        &agents
            .iter()
            .map(|a| {
                vec![
                    a.agent_id.to_string(),
                    opt(a.agent_name.as_deref()),
                    opt(a.phone.as_deref()),
                    a.active_assignments.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn discount_types(types: &[DiscountType]) {
    table(
        &["ID", "Type", "Description"],
        &types
            .iter()
            .map(|t| {
                vec![
                    t.discount_type_id.to_string(),
                    t.name.clone(),
                    opt(t.description.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn discounts(discounts: &[Discount]) {
    table(
        &["ID", "Name", "Value", "Applies to", "From", "To", "Active"],
        &discounts
            .iter()
            .map(|d| {
                let value = if d.is_percentage {
                    format!("{}%", d.discount_value.amount())
                } else {
                    d.discount_value.to_string()
                };
                vec![
                    d.discount_id.to_string(),
                    opt(d.name.as_deref()),
                    value,
                    opt(d.plant_name.as_deref().or(d.category_name.as_deref())),
                    opt(d.start_date.as_deref()),
                    opt(d.end_date.as_deref()),
                    if d.is_active { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn activity(entries: &[ActivityEntry]) {
    table(
        &["When", "Who", "Type", "Details"],
        &entries
            .iter()
            .map(|e| {
                vec![
                    opt(e.timestamp.as_deref()),
                    opt(e.username.as_deref()),
                    opt(e.activity_type.as_deref()),
                    opt(e.description.as_deref()),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

// =============================================================================
// Delivery
// =============================================================================

pub fn delivery_dashboard(state: &DeliveryState) {
    heading("Delivery dashboard");
    slice_error(state.dashboard.error.as_ref());
    let stats = &state.dashboard.data.stats;
    println!("Assignments: {}", stats.total_assignments);
    println!("Pending:     {}", stats.pending_assignments);
    println!("Completed:   {}", stats.completed_assignments);
    println!("Earnings:    {}", stats.total_earnings);
    println!("Avg hours:   {:.1}", stats.avg_delivery_time);

    heading("Pending");
    assignments(&state.dashboard.data.pending_orders);
}

pub fn assignments(assignments: &[Assignment]) {
    table(
        &["Order", "Customer", "Address", "Status", "Total"],
        &assignments
            .iter()
            .map(|a| {
                vec![
                    a.order_number
                        .clone()
                        .unwrap_or_else(|| format!("#{}", a.order_id)),
                    opt(a.customer_name.as_deref()),
                    opt(a.delivery_address.as_deref()),
                    a.order_status.to_string(),
                    a.total_amount.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub fn earnings(earnings: &[MonthlyEarning], error: Option<&String>) {
    slice_error(error);
    table(
        &["Month", "Deliveries", "Earnings"],
        &earnings
            .iter()
            .map(|e| {
                vec![
                    match (&e.month, e.year) {
                        (Some(month), Some(year)) => format!("{month} {year}"),
                        (Some(month), None) => month.clone(),
                        _ => "-".into(),
                    },
                    e.delivery_count.to_string(),
                    e.earnings.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    );
}
