//! Route table of the application shell.
//!
//! [`Route::parse`] maps a path to a page and [`Route::path`] renders it
//! back; `Route::parse(&route.path()) == route` for every route.
//! [`guard`] applies the role checks of the protected sections.

use std::fmt;

use greencart_core::{OrderId, PlantId, Role};

use crate::session::Session;

/// Pages under `/seller`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SellerPage {
    Dashboard,
    Plants,
    AddPlant,
    EditPlant(PlantId),
    Sales,
    RecordSale,
}

/// Pages under `/admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminPage {
    Dashboard,
    Orders,
    Sales,
    Customers,
    Reports,
    Delivery,
}

/// Pages under `/delivery`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryPage {
    Dashboard,
    Assigned,
    Pending,
    Completed,
    Earnings,
}

/// A page of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    /// All plants, or one category when a slug is given.
    Plants(Option<String>),
    Plant(PlantId),
    Cart,
    Checkout,
    OrderConfirmation,
    /// Customer dashboard.
    Orders,
    Order(OrderId),
    Seller(SellerPage),
    Admin(AdminPage),
    Delivery(DeliveryPage),
    Unauthorized,
    NotFound(String),
}

impl Route {
    /// Resolve a path. Query strings, fragments and trailing slashes are
    /// ignored; anything unknown is [`Route::NotFound`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let not_found = || Self::NotFound(path.to_string());

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["plants"] => Self::Plants(None),
            ["plants", category] => Self::Plants(Some((*category).to_string())),
            ["plant", id] => id.parse().map_or_else(|_| not_found(), Self::Plant),
            ["cart"] => Self::Cart,
            ["order"] => Self::Checkout,
            ["order-confirmation"] => Self::OrderConfirmation,
            ["orders"] => Self::Orders,
            ["orders", id] => id.parse().map_or_else(|_| not_found(), Self::Order),
            ["seller", rest @ ..] => parse_seller(rest).map_or_else(not_found, Self::Seller),
            ["admin", rest @ ..] => parse_admin(rest).map_or_else(not_found, Self::Admin),
            ["delivery", rest @ ..] => parse_delivery(rest).map_or_else(not_found, Self::Delivery),
            ["unauthorized"] => Self::Unauthorized,
            _ => not_found(),
        }
    }

    /// Canonical path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login => "/login".into(),
            Self::Signup => "/signup".into(),
            Self::Plants(None) => "/plants".into(),
            Self::Plants(Some(category)) => format!("/plants/{category}"),
            Self::Plant(id) => format!("/plant/{id}"),
            Self::Cart => "/cart".into(),
            Self::Checkout => "/order".into(),
            Self::OrderConfirmation => "/order-confirmation".into(),
            Self::Orders => "/orders".into(),
            Self::Order(id) => format!("/orders/{id}"),
            Self::Seller(page) => match page {
                SellerPage::Dashboard => "/seller/dashboard".into(),
                SellerPage::Plants => "/seller/plants".into(),
                SellerPage::AddPlant => "/seller/add-plant".into(),
                SellerPage::EditPlant(id) => format!("/seller/edit-plant/{id}"),
                SellerPage::Sales => "/seller/sales".into(),
                SellerPage::RecordSale => "/seller/record-sale".into(),
            },
            Self::Admin(page) => format!(
                "/admin/{}",
                match page {
                    AdminPage::Dashboard => "dashboard",
                    AdminPage::Orders => "orders",
                    AdminPage::Sales => "sales",
                    AdminPage::Customers => "customers",
                    AdminPage::Reports => "reports",
                    AdminPage::Delivery => "delivery",
                }
            ),
            Self::Delivery(page) => format!(
                "/delivery/{}",
                match page {
                    DeliveryPage::Dashboard => "dashboard",
                    DeliveryPage::Assigned => "assigned",
                    DeliveryPage::Pending => "pending",
                    DeliveryPage::Completed => "completed",
                    DeliveryPage::Earnings => "earnings",
                }
            ),
            Self::Unauthorized => "/unauthorized".into(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Role a session must hold to open this route.
    ///
    /// `Some(Customer)` here only means "signed in": customer pages are
    /// open to every role.
    #[must_use]
    pub const fn required_role(&self) -> Option<Role> {
        match self {
            Self::Cart | Self::Checkout | Self::OrderConfirmation | Self::Orders | Self::Order(_) => {
                Some(Role::Customer)
            }
            Self::Seller(_) => Some(Role::Seller),
            Self::Admin(_) => Some(Role::Admin),
            Self::Delivery(_) => Some(Role::DeliveryAgent),
            _ => None,
        }
    }

    /// Dashboard a role lands on after login.
    #[must_use]
    pub fn dashboard_for(role: Role) -> Self {
        Self::parse(role.dashboard_path())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn parse_seller(rest: &[&str]) -> Option<SellerPage> {
    Some(match rest {
        [] | ["dashboard"] => SellerPage::Dashboard,
        ["plants"] => SellerPage::Plants,
        ["add-plant"] => SellerPage::AddPlant,
        ["edit-plant", id] => SellerPage::EditPlant(id.parse().ok()?),
        ["sales"] => SellerPage::Sales,
        ["record-sale"] => SellerPage::RecordSale,
        _ => return None,
    })
}

fn parse_admin(rest: &[&str]) -> Option<AdminPage> {
    Some(match rest {
        [] | ["dashboard"] => AdminPage::Dashboard,
        ["orders"] => AdminPage::Orders,
        ["sales"] => AdminPage::Sales,
        ["customers"] => AdminPage::Customers,
        ["reports"] => AdminPage::Reports,
        ["delivery"] => AdminPage::Delivery,
        _ => return None,
    })
}

fn parse_delivery(rest: &[&str]) -> Option<DeliveryPage> {
    Some(match rest {
        [] | ["dashboard"] => DeliveryPage::Dashboard,
        ["assigned"] => DeliveryPage::Assigned,
        ["pending"] => DeliveryPage::Pending,
        ["completed"] => DeliveryPage::Completed,
        ["earnings"] => DeliveryPage::Earnings,
        _ => return None,
    })
}

/// Where a navigation to `route` actually lands for this session.
///
/// Protected routes send anonymous sessions to `/login` and sessions with
/// the wrong role to `/unauthorized`.
#[must_use]
pub fn guard(route: Route, session: &Session) -> Route {
    let Some(required) = route.required_role() else {
        return route;
    };
    match session.role() {
        None => Route::Login,
        Some(_) if required == Role::Customer => route,
        Some(role) if role == required => route,
        Some(_) => Route::Unauthorized,
    }
}
