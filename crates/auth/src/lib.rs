//! `leydeudo-auth`: authorization for the LeyDeudo administration console.
//!
//! Pure evaluation over an explicitly passed [`AuthorizationSnapshot`]; the
//! only IO is through the [`store::KeyValueStore`] surface supplied by the
//! caller. Decoupled from HTTP and rendering.

pub mod authorize;
mod de;
pub mod guard;
pub mod nav;
pub mod permissions;
pub mod roles;
pub mod route;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod store;

pub use authorize::{
    ACCESS_RULES, AccessExplanation, ClauseRule, DenialKind, can_access_route,
    explain_route_access,
};
pub use guard::{RouteDecision, guard_permission, guard_protected};
pub use nav::{NavItem, can_access_path, filter_nav_items};
pub use permissions::{Permission, PermissionGroup, Permissions};
pub use roles::{Role, SUPER_ADMIN};
pub use route::{ClauseKind, Quantifier, RoutePermissionConfig};
pub use session::{LoginResponse, Session, UserData};
pub use settings::Setting;
pub use snapshot::AuthorizationSnapshot;
pub use store::{KeyValueStore, MemoryStore, SnapshotStore, StoreError};
