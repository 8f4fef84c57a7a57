//! `leydeudo-client`: typed access to the LeyDeudo backend.
//!
//! The REST API itself lives elsewhere; this crate owns its contract (paths,
//! bodies, error shape), the environment-driven client configuration and the
//! bookkeeping behind the users listing.

pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod table;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use dto::{CreateUser, CreateUserResponse, ResetPassword, TokenValidation, UpdateUser, UserRecord};
pub use error::ApiError;
pub use table::{Order, TableState, UserRow, user_rows};
