//! `leydeudo-core`: shared domain primitives.
//!
//! Identifiers issued by the backend and the domain error model. No IO here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{RoleId, SettingId, UserId};
