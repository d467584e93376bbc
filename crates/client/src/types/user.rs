use greencart_core::{Role, UserId};
use serde::{Deserialize, Serialize};

use super::de;

/// The logged-in user, as returned by `accounts/login/` and cached in the
/// session's `userData` blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "id")]
    pub user_id: UserId,
    #[serde(default, deserialize_with = "de::null_default")]
    pub username: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(alias = "role_name", default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl User {
    /// "First Last", falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

/// Profile as served by `user/profile/:id/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(alias = "id")]
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Fields a user may change on their profile. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ProfileUpdate {
    /// Apply the changed fields to a cached user.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(v) = &self.username {
            user.username.clone_from(v);
        }
        if let Some(v) = &self.email {
            user.email.clone_from(v);
        }
        if self.first_name.is_some() {
            user.first_name.clone_from(&self.first_name);
        }
        if self.last_name.is_some() {
            user.last_name.clone_from(&self.last_name);
        }
        if self.phone.is_some() {
            user.phone.clone_from(&self.phone);
        }
        if self.address.is_some() {
            user.address.clone_from(&self.address);
        }
    }

    /// Text fields as `(name, value)` pairs for a multipart body.
    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("username", &self.username),
            ("email", &self.email),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone", &self.phone),
            ("address", &self.address),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
        .collect()
    }
}

/// Body of `accounts/signup/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub role_name: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    #[serde(default, alias = "auth_token", alias = "access")]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_from_login_payload() {
        let user: User = serde_json::from_value(json!({
            "user_id": 4,
            "username": "ivy",
            "email": "ivy@greencart.test",
            "first_name": "Ivy",
            "last_name": null,
            "role": "Delivery Agent",
            "phone": "",
            "address": ""
        }))
        .unwrap();
        assert_eq!(user.role, Role::DeliveryAgent);
        assert_eq!(user.display_name(), "Ivy");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user: User =
            serde_json::from_value(json!({"id": 1, "username": "moss", "role_name": "seller"}))
                .unwrap();
        assert_eq!(user.display_name(), "moss");
        assert_eq!(user.role, Role::Seller);
    }

    #[test]
    fn test_profile_update_applies_only_changed_fields() {
        let mut user: User = serde_json::from_value(json!({
            "user_id": 1, "username": "moss", "email": "moss@greencart.test", "phone": "123"
        }))
        .unwrap();
        let update = ProfileUpdate {
            address: Some("12 Fern Lane".into()),
            ..ProfileUpdate::default()
        };
        update.apply_to(&mut user);
        assert_eq!(user.address.as_deref(), Some("12 Fern Lane"));
        assert_eq!(user.phone.as_deref(), Some("123"));
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"address": "12 Fern Lane"})
        );
    }
}
