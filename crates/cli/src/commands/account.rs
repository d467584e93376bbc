//! Sign-in, signup and profile commands.

use greencart_client::forms::{LoginForm, SignupForm};
use greencart_client::hooks::AuthContext;
use greencart_client::types::ProfileUpdate;
use greencart_client::{ApiClient, Route};

use super::{read_image, signed_in};
use crate::ProfileAction;
use crate::error::{self, Result};
use crate::render;

pub async fn login(api: &ApiClient, email: String, password: String) -> Result<()> {
    let auth = AuthContext::mount(api);
    let user = auth.login(&LoginForm { email, password }).await?;

    error::set_sentry_user(&user.user_id, Some(user.email.as_str()));
    error::add_breadcrumb("auth", "Signed in", &[("role", user.role.as_str())]);

    render::message(&format!("Welcome back, {}!", user.display_name()));
    render::message(&format!("Continue at {}", Route::dashboard_for(user.role)));
    Ok(())
}

pub async fn signup(api: &ApiClient, form: &SignupForm) -> Result<()> {
    let auth = AuthContext::mount(api);
    let outcome = auth.signup(form).await?;
    render::outcome(&outcome, "Account created. You can now sign in.");
    Ok(())
}

pub fn logout(api: &ApiClient) -> Result<()> {
    AuthContext::mount(api).logout()?;
    error::clear_sentry_user();
    render::message("Signed out.");
    Ok(())
}

pub async fn whoami(api: &ApiClient) -> Result<()> {
    let auth = AuthContext::mount(api);
    let Some(user) = auth.user() else {
        render::message("Not signed in.");
        return Ok(());
    };
    render::user(&user);

    auth.refresh_counts().await;
    let state = auth.state();
    render::message(&format!(
        "  cart:  {} line(s), {} open order(s)",
        state.cart_count, state.pending_orders
    ));
    Ok(())
}

pub async fn profile(api: &ApiClient, action: ProfileAction) -> Result<()> {
    let user_id = signed_in(api)?;
    match action {
        ProfileAction::Show => {
            let profile = api.profile(user_id).await?;
            render::profile(&profile);
        }
        ProfileAction::Update {
            username,
            email,
            first_name,
            last_name,
            phone,
            address,
            picture,
        } => {
            let update = ProfileUpdate {
                username,
                email,
                first_name,
                last_name,
                phone,
                address,
            };
            let picture = match picture {
                Some(path) => Some(read_image(&path).await?),
                None => None,
            };
            let outcome = AuthContext::mount(api)
                .update_profile(&update, picture.as_ref())
                .await?;
            render::outcome(&outcome, "Profile updated.");
        }
        ProfileAction::Delete { yes } => {
            if !yes {
                render::message("This permanently deletes your account. Re-run with --yes.");
                return Ok(());
            }
            let outcome = AuthContext::mount(api).delete_account().await?;
            error::clear_sentry_user();
            render::outcome(&outcome, "Account deleted.");
        }
    }
    Ok(())
}
