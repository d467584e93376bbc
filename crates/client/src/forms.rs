//! Client-side form validation.
//!
//! Each form validates its input and produces the request body for its
//! endpoint. A form that fails validation never reaches the network; hooks
//! surface the failure as [`ApiError::Validation`](crate::ApiError::Validation).

use chrono::{NaiveDate, NaiveDateTime};
use greencart_core::{
    CategoryId, DeliveryMethodId, DiscountTypeId, Email, EmailError, Money, OrderId, PlantId,
    Role, UserId,
};
use serde::Serialize;
use thiserror::Error;

use crate::types::{
    AddToCartRequest, CartItem, CreateOrderRequest, DISCOUNT_DATE_FORMAT, DiscountRequest,
    OrderReviewRequest, PlantPayload, RecordSaleRequest, SignupRequest,
};

/// Validation failures, worded for display.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Secret key is required for this role")]
    SecretKeyRequired,
    #[error("Please log in to continue")]
    NotSignedIn,
    #[error("Please select a size")]
    SizeRequired,
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("Rating must be between 1 and 5")]
    InvalidRating,
    #[error("Price must be greater than zero")]
    InvalidPrice,
    #[error("Stock quantity cannot be negative")]
    InvalidStock,
    #[error("Discount value must be greater than zero")]
    InvalidDiscount,
    #[error("Percentage discount cannot exceed 100")]
    PercentageTooHigh,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("End date must be after start date")]
    InvalidDateRange,
    #[error("Please select at least one item")]
    NoItemsSelected,
    #[error("Please select a delivery method")]
    DeliveryMethodRequired,
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Signup page input.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
    pub secret_key: String,
}

impl SignupForm {
    /// Validate and build the signup body.
    ///
    /// # Errors
    ///
    /// Returns the first failing check: required fields, email format,
    /// password confirmation, then the secret key for privileged roles.
    pub fn validate(&self) -> Result<SignupRequest, FormError> {
        let username = required(&self.username, "Username")?;
        let email = Email::parse(&self.email)?;
        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        let secret_key = if self.role.requires_secret_key() {
            Some(required(&self.secret_key, "Secret key").map_err(|_| FormError::SecretKeyRequired)?)
        } else {
            None
        };

        Ok(SignupRequest {
            username,
            email: email.as_str().to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            role_name: self.role,
            secret_key,
        })
    }
}

/// Body of `accounts/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login page input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Validate and build the login body.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is missing or malformed or the
    /// password is empty.
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        let email = Email::parse(&self.email)?;
        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }
        Ok(LoginRequest {
            email: email.as_str().to_string(),
            password: self.password.clone(),
        })
    }
}

// =============================================================================
// Shopping
// =============================================================================

/// "Add to cart" on the plant page.
#[derive(Debug, Clone)]
pub struct AddToCartForm {
    pub plant_id: PlantId,
    pub size: Option<String>,
    pub quantity: u32,
}

impl AddToCartForm {
    /// Validate and build the `cart/add/` body.
    ///
    /// # Errors
    ///
    /// Returns an error if no size is chosen or the quantity is zero.
    pub fn validate(&self, user_id: UserId) -> Result<AddToCartRequest, FormError> {
        let size = self
            .size
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(FormError::SizeRequired)?;
        if self.quantity < 1 {
            return Err(FormError::InvalidQuantity);
        }
        Ok(AddToCartRequest {
            user_id,
            plant_id: self.plant_id,
            size: size.to_string(),
            quantity: self.quantity,
        })
    }
}

/// Review of a delivered plant.
#[derive(Debug, Clone)]
pub struct ReviewForm {
    pub plant_id: PlantId,
    pub order_id: OrderId,
    pub rating: u8,
    pub review_text: String,
}

impl ReviewForm {
    /// Validate and build the `order/add-review/` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the rating is outside `1..=5`.
    pub fn validate(&self, user_id: UserId) -> Result<OrderReviewRequest, FormError> {
        if !(1..=5).contains(&self.rating) {
            return Err(FormError::InvalidRating);
        }
        Ok(OrderReviewRequest {
            user_id,
            plant_id: self.plant_id,
            order_id: self.order_id,
            rating: self.rating,
            review_text: self.review_text.trim().to_string(),
        })
    }
}

/// Checkout page input.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub delivery_method_id: Option<DeliveryMethodId>,
    pub delivery_address: String,
    pub delivery_notes: String,
}

impl CheckoutForm {
    /// Validate against the cart and build the `order/create-order/` body
    /// from the selected items.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is selected, the address is empty or no
    /// delivery method is chosen.
    pub fn validate(
        &self,
        user_id: UserId,
        cart: &[CartItem],
    ) -> Result<CreateOrderRequest, FormError> {
        let cart_ids: Vec<_> = cart.iter().filter(|i| i.selected).map(|i| i.cart_id).collect();
        if cart_ids.is_empty() {
            return Err(FormError::NoItemsSelected);
        }
        let delivery_address = required(&self.delivery_address, "Delivery address")?;
        let delivery_method_id = self
            .delivery_method_id
            .ok_or(FormError::DeliveryMethodRequired)?;
        Ok(CreateOrderRequest {
            user_id,
            delivery_method_id,
            delivery_address,
            delivery_notes: self.delivery_notes.trim().to_string(),
            cart_ids,
        })
    }
}

// =============================================================================
// Seller
// =============================================================================

/// Add/edit plant page input.
#[derive(Debug, Clone, Default)]
pub struct PlantForm {
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub stock_quantity: i64,
    pub category_ids: Vec<CategoryId>,
    pub features: Vec<String>,
    pub care_tips: Vec<String>,
    pub sizes: Vec<String>,
    /// Image URLs already uploaded via `seller/upload-images/`.
    pub images: Vec<String>,
}

impl PlantForm {
    /// Validate and build the body for `seller/plants/add/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the price is not positive or
    /// the stock is negative.
    pub fn validate_new(&self, seller_id: UserId) -> Result<PlantPayload, FormError> {
        let mut payload = self.validate()?;
        payload.seller_id = Some(seller_id);
        Ok(payload)
    }

    /// Validate and build the body for `seller/plants/:id/update/`.
    ///
    /// # Errors
    ///
    /// Same checks as [`validate_new`](Self::validate_new).
    pub fn validate_update(&self, requestor_id: UserId) -> Result<PlantPayload, FormError> {
        let mut payload = self.validate()?;
        payload.requestor_id = Some(requestor_id);
        Ok(payload)
    }

    fn validate(&self) -> Result<PlantPayload, FormError> {
        let name = required(&self.name, "Plant name")?;
        if !self.base_price.is_positive() {
            return Err(FormError::InvalidPrice);
        }
        let stock_quantity =
            u32::try_from(self.stock_quantity).map_err(|_| FormError::InvalidStock)?;
        Ok(PlantPayload {
            seller_id: None,
            requestor_id: None,
            name,
            description: self.description.trim().to_string(),
            base_price: self.base_price,
            stock_quantity,
            category_ids: self.category_ids.clone(),
            features: join_list(&self.features),
            care_tips: join_list(&self.care_tips),
            sizes: join_list(&self.sizes),
            images: join_list(&self.images),
        })
    }
}

fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Manual sale entry.
#[derive(Debug, Clone, Default)]
pub struct RecordSaleForm {
    pub plant_id: Option<PlantId>,
    pub quantity: u32,
    pub customer_email: String,
    pub sale_price: Money,
}

impl RecordSaleForm {
    /// Validate and build the `seller/record-sale/` body.
    ///
    /// # Errors
    ///
    /// Returns an error if no plant is chosen, the quantity is zero, the
    /// email is malformed or the price is not positive.
    pub fn validate(&self, seller_id: UserId) -> Result<RecordSaleRequest, FormError> {
        let plant_id = self.plant_id.ok_or(FormError::Required("Plant"))?;
        if self.quantity < 1 {
            return Err(FormError::InvalidQuantity);
        }
        let email = Email::parse(&self.customer_email)?;
        if !self.sale_price.is_positive() {
            return Err(FormError::InvalidPrice);
        }
        Ok(RecordSaleRequest {
            seller_id,
            plant_id,
            quantity: self.quantity,
            customer_email: email.as_str().to_string(),
            sale_price: self.sale_price,
        })
    }
}

// =============================================================================
// Admin
// =============================================================================

/// Apply-discount dialog input. Dates are free text as typed.
#[derive(Debug, Clone, Default)]
pub struct DiscountForm {
    pub discount_type_id: Option<DiscountTypeId>,
    pub discount_value: Money,
    pub is_percentage: bool,
    pub start_date: String,
    pub end_date: String,
    pub category_id: Option<CategoryId>,
    pub plant_id: Option<PlantId>,
}

impl DiscountForm {
    /// Validate and build the `admin_dashboard/apply-discount/` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is missing, the value is not positive,
    /// a percentage exceeds 100, a date does not parse or the end date is
    /// not after the start date.
    pub fn validate(&self) -> Result<DiscountRequest, FormError> {
        let discount_type_id = self
            .discount_type_id
            .ok_or(FormError::Required("Discount type"))?;
        if !self.discount_value.is_positive() {
            return Err(FormError::InvalidDiscount);
        }
        if self.is_percentage && self.discount_value > Money::from_cents(10_000) {
            return Err(FormError::PercentageTooHigh);
        }
        let start_date = parse_date_time(&self.start_date, "Start date")?;
        let end_date = parse_date_time(&self.end_date, "End date")?;
        if end_date <= start_date {
            return Err(FormError::InvalidDateRange);
        }
        Ok(DiscountRequest {
            discount_type_id,
            discount_value: self.discount_value,
            is_percentage: self.is_percentage,
            start_date,
            end_date,
            category_id: self.category_id,
            plant_id: self.plant_id,
        })
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM[:SS]` and `YYYY-MM-DD`.
fn parse_date_time(raw: &str, field: &'static str) -> Result<NaiveDateTime, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormError::Required(field));
    }
    [DISCOUNT_DATE_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| FormError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use greencart_core::CartItemId;
    use serde_json::json;

    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            username: "fern".into(),
            email: "fern@greencart.test".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
            ..SignupForm::default()
        }
    }

    #[test]
    fn test_signup_password_mismatch() {
        let form = SignupForm {
            confirm_password: "hunter23".into(),
            ..signup()
        };
        assert_eq!(form.validate(), Err(FormError::PasswordMismatch));
        assert_eq!(FormError::PasswordMismatch.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_signup_secret_key_for_privileged_roles() {
        for role in [Role::Seller, Role::DeliveryAgent, Role::Admin] {
            let form = SignupForm {
                role,
                secret_key: "  ".into(),
                ..signup()
            };
            assert_eq!(form.validate(), Err(FormError::SecretKeyRequired));
        }
        let form = SignupForm {
            role: Role::Seller,
            secret_key: "sprout".into(),
            ..signup()
        };
        assert_eq!(form.validate().unwrap().secret_key.as_deref(), Some("sprout"));
    }

    #[test]
    fn test_signup_customer_omits_secret_key() {
        let form = SignupForm {
            secret_key: "ignored".into(),
            ..signup()
        };
        let body = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert!(body.get("secret_key").is_none());
        assert_eq!(body["role_name"], json!("customer"));
    }

    #[test]
    fn test_signup_required_and_email() {
        let form = SignupForm {
            username: " ".into(),
            ..signup()
        };
        assert_eq!(form.validate(), Err(FormError::Required("Username")));
        let form = SignupForm {
            email: "fern".into(),
            ..signup()
        };
        assert_eq!(form.validate(), Err(FormError::Email(EmailError::Malformed)));
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm {
            email: "fern@greencart.test".into(),
            password: String::new(),
        };
        assert_eq!(form.validate(), Err(FormError::Required("Password")));
    }

    #[test]
    fn test_add_to_cart_form() {
        let mut form = AddToCartForm {
            plant_id: PlantId::new(7),
            size: Some("Medium".into()),
            quantity: 2,
        };
        let body = serde_json::to_value(form.validate(UserId::new(1)).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"user_id": 1, "plant_id": 7, "size": "Medium", "quantity": 2})
        );

        form.quantity = 0;
        assert_eq!(form.validate(UserId::new(1)), Err(FormError::InvalidQuantity));
        form.size = None;
        assert_eq!(form.validate(UserId::new(1)), Err(FormError::SizeRequired));
    }

    #[test]
    fn test_review_rating_bounds() {
        let mut form = ReviewForm {
            plant_id: PlantId::new(7),
            order_id: OrderId::new(2),
            rating: 6,
            review_text: String::new(),
        };
        assert_eq!(form.validate(UserId::new(1)), Err(FormError::InvalidRating));
        form.rating = 0;
        assert_eq!(form.validate(UserId::new(1)), Err(FormError::InvalidRating));
        form.rating = 5;
        assert!(form.validate(UserId::new(1)).is_ok());
    }

    #[test]
    fn test_plant_form_checks() {
        let form = PlantForm {
            name: "Aloe".into(),
            base_price: Money::ZERO,
            ..PlantForm::default()
        };
        assert_eq!(form.validate_new(UserId::new(2)), Err(FormError::InvalidPrice));

        let form = PlantForm {
            name: "Aloe".into(),
            base_price: Money::from_cents(950),
            stock_quantity: -1,
            ..PlantForm::default()
        };
        assert_eq!(form.validate_new(UserId::new(2)), Err(FormError::InvalidStock));

        let form = PlantForm {
            name: "Aloe".into(),
            base_price: Money::from_cents(950),
            stock_quantity: 4,
            features: vec!["Hardy".into(), " ".into(), "Low water".into()],
            ..PlantForm::default()
        };
        let payload = form.validate_update(UserId::new(2)).unwrap();
        assert_eq!(payload.features, "Hardy,Low water");
        assert_eq!(payload.requestor_id, Some(UserId::new(2)));
        assert_eq!(payload.seller_id, None);
    }

    #[test]
    fn test_discount_form() {
        let form = DiscountForm {
            discount_type_id: Some(DiscountTypeId::new(1)),
            discount_value: Money::from_cents(15_000),
            is_percentage: true,
            start_date: "2024-06-01".into(),
            end_date: "2024-06-30T23:59".into(),
            ..DiscountForm::default()
        };
        assert_eq!(form.validate(), Err(FormError::PercentageTooHigh));

        let form = DiscountForm {
            discount_value: Money::from_cents(1_500),
            ..form
        };
        let body = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(body["start_date"], json!("2024-06-01 00:00:00"));
        assert_eq!(body["end_date"], json!("2024-06-30 23:59:00"));

        let form = DiscountForm {
            end_date: "2024-05-01 00:00:00".into(),
            ..form
        };
        assert_eq!(form.validate(), Err(FormError::InvalidDateRange));
    }

    #[test]
    fn test_checkout_uses_selected_items() {
        let cart: Vec<CartItem> = serde_json::from_value(json!([
            {"cart_id": 1, "name": "Monstera", "price": 25, "quantity": 1, "selected": true},
            {"cart_id": 2, "name": "Fern", "price": 8, "quantity": 1, "selected": false}
        ]))
        .unwrap();
        let form = CheckoutForm {
            delivery_method_id: Some(DeliveryMethodId::new(1)),
            delivery_address: "12 Fern Lane".into(),
            delivery_notes: String::new(),
        };
        let order = form.validate(UserId::new(3), &cart).unwrap();
        assert_eq!(order.cart_ids, vec![CartItemId::new(1)]);

        let none_selected: Vec<CartItem> = cart.into_iter().filter(|i| !i.selected).collect();
        assert_eq!(
            form.validate(UserId::new(3), &none_selected),
            Err(FormError::NoItemsSelected)
        );
        let form = CheckoutForm {
            delivery_method_id: None,
            ..form
        };
        assert!(matches!(
            form.validate(UserId::new(3), &[]),
            Err(FormError::NoItemsSelected)
        ));
    }
}
