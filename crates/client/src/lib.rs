//! GreenCart client - typed access to the GreenCart REST API.
//!
//! # Architecture
//!
//! - The backend is the source of truth: no local sync, no response cache
//! - One [`Session`] handle is injected into the [`ApiClient`] and every hook,
//!   replacing ad hoc reads of persisted auth state
//! - Both backend envelope styles are normalised at the client boundary, so
//!   callers only ever see `Result<T, ApiError>`
//! - Hooks expose `{data, loading, error}` slices through a `tokio::sync::watch`
//!   channel and cancel their in-flight requests when dropped
//!
//! # Example
//!
//! ```rust,no_run
//! use greencart_client::{ApiClient, ClientConfig, Session};
//! use greencart_client::hooks::CartHook;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let session = Session::restore(config.storage()?)?;
//! let api = ApiClient::new(&config, session.clone())?;
//!
//! let cart = CartHook::mount(&api).await;
//! for item in cart.state().cart_items.data {
//!     println!("{} x{}", item.name, item.quantity);
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cancel;
pub mod config;
pub mod error;
pub mod forms;
pub mod hooks;
pub mod routes;
pub mod session;
pub mod types;

pub use api::ApiClient;
pub use cancel::CancelToken;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Result};
pub use forms::FormError;
pub use routes::Route;
pub use session::{Navigation, Session, SessionError};
