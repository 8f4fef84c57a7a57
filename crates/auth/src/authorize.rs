use serde::Serialize;

use crate::AuthorizationSnapshot;
use crate::route::{Clause, ClauseKind, Quantifier, RoutePermissionConfig};

/// Evaluation rule for one clause kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseRule {
    pub kind: ClauseKind,
    /// Whether a failing clause of this kind is forgiven for super admins.
    pub super_admin_bypass: bool,
}

/// Clause kinds in evaluation order, with their bypass eligibility.
///
/// Settings and permissions model entitlements that hold even for
/// administrators; only role gates are forgiven. Keep this the single place
/// that encodes the asymmetry.
pub const ACCESS_RULES: [ClauseRule; 3] = [
    ClauseRule {
        kind: ClauseKind::Setting,
        super_admin_bypass: false,
    },
    ClauseRule {
        kind: ClauseKind::Permission,
        super_admin_bypass: false,
    },
    ClauseRule {
        kind: ClauseKind::Role,
        super_admin_bypass: true,
    },
];

/// Decide whether the snapshot satisfies a route requirement.
///
/// - No IO
/// - No panics
/// - Short-circuits on the first failing clause that is not forgiven
pub fn can_access_route(snapshot: &AuthorizationSnapshot, config: &RoutePermissionConfig) -> bool {
    if config.is_public {
        return true;
    }

    for rule in ACCESS_RULES {
        for clause in config.clauses(rule.kind) {
            if clause.evaluate(|name| snapshot.holds(rule.kind, name)) {
                continue;
            }
            if rule.super_admin_bypass && snapshot.is_super_admin() {
                continue;
            }
            tracing::debug!(
                kind = ?clause.kind,
                quantifier = ?clause.quantifier,
                required = ?clause.required,
                "route access denied"
            );
            return false;
        }
    }

    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of a route access decision.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    /// Whether access was granted. Always equal to [`can_access_route`].
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Outcome of every specified clause, in evaluation order.
    pub clauses: Vec<ClauseOutcome>,

    /// Details about the snapshot the decision was made against.
    pub snapshot: SnapshotState,

    /// If denied, the first clause that failed without being forgiven.
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClauseOutcome {
    pub kind: ClauseKind,
    pub quantifier: Quantifier,
    pub required: Vec<String>,
    pub satisfied: bool,
    /// Failed, but forgiven by the super-admin bypass.
    pub forgiven: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotState {
    pub roles: Vec<String>,
    pub active_settings: Vec<String>,
    pub effective_permissions: Vec<String>,
    pub is_super_admin: bool,
}

impl SnapshotState {
    pub fn of(snapshot: &AuthorizationSnapshot) -> Self {
        Self {
            roles: snapshot.role_slugs(),
            active_settings: snapshot.active_setting_slugs(),
            effective_permissions: snapshot.effective_permissions(),
            is_super_admin: snapshot.is_super_admin(),
        }
    }
}

/// Why access was denied.
#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    MissingSetting,
    MissingPermission,
    MissingRole,
}

impl From<ClauseKind> for DenialKind {
    fn from(kind: ClauseKind) -> Self {
        match kind {
            ClauseKind::Setting => DenialKind::MissingSetting,
            ClauseKind::Permission => DenialKind::MissingPermission,
            ClauseKind::Role => DenialKind::MissingRole,
        }
    }
}

/// Explain why a route is (or would be) accessible.
///
/// Unlike [`can_access_route`] every clause is evaluated so the outcome list
/// is complete; the decision itself follows the same rule table.
pub fn explain_route_access(
    snapshot: &AuthorizationSnapshot,
    config: &RoutePermissionConfig,
) -> AccessExplanation {
    let state = SnapshotState::of(snapshot);

    if config.is_public {
        return AccessExplanation {
            granted: true,
            reason: "Route is public".to_string(),
            clauses: Vec::new(),
            snapshot: state,
            denial_reason: None,
        };
    }

    let mut clauses = Vec::new();
    let mut denial: Option<DenialReason> = None;

    for rule in ACCESS_RULES {
        for clause in config.clauses(rule.kind) {
            let satisfied = clause.evaluate(|name| snapshot.holds(rule.kind, name));
            let forgiven = !satisfied && rule.super_admin_bypass && state.is_super_admin;

            if !satisfied && !forgiven && denial.is_none() {
                denial = Some(denial_for(snapshot, &clause));
            }

            clauses.push(ClauseOutcome {
                kind: clause.kind,
                quantifier: clause.quantifier,
                required: clause.required.to_vec(),
                satisfied,
                forgiven,
            });
        }
    }

    let reason = match &denial {
        Some(denial) => denial.message.clone(),
        None if clauses.is_empty() => "Route has no requirements".to_string(),
        None if clauses.iter().any(|c| c.forgiven) => {
            "All requirements met (role requirements forgiven for super admin)".to_string()
        }
        None => "All requirements met".to_string(),
    };

    AccessExplanation {
        granted: denial.is_none(),
        reason,
        clauses,
        snapshot: state,
        denial_reason: denial,
    }
}

fn denial_for(snapshot: &AuthorizationSnapshot, clause: &Clause<'_>) -> DenialReason {
    let noun = match clause.kind {
        ClauseKind::Setting => "setting",
        ClauseKind::Permission => "permission",
        ClauseKind::Role => "role",
    };

    let missing: Vec<&str> = clause
        .required
        .iter()
        .map(String::as_str)
        .filter(|name| !snapshot.holds(clause.kind, name))
        .collect();

    let message = match clause.quantifier {
        Quantifier::One => format!("Missing required {noun} '{}'", missing.join("")),
        Quantifier::Any if clause.required.is_empty() => {
            format!("Requires any {noun} from an empty list")
        }
        Quantifier::Any => format!("Requires any {noun} of {:?}; none held", clause.required),
        Quantifier::All => format!("Requires all {noun}s of {:?}; missing {:?}", clause.required, missing),
    };

    let mut suggestions = Vec::new();
    match clause.kind {
        ClauseKind::Setting => {
            suggestions.push("Activate the setting for this user".to_string());
            if missing
                .iter()
                .any(|slug| snapshot.settings.iter().any(|s| s.slug == *slug))
            {
                suggestions.insert(
                    0,
                    "The setting is assigned but inactive; super admins are not exempt".to_string(),
                );
            }
        }
        ClauseKind::Permission => {
            suggestions.push(format!(
                "Grant the {noun} under one of the user's settings (super admins are not exempt)"
            ));
        }
        ClauseKind::Role => {
            suggestions.push(format!("Assign the required {noun} to the user"));
            suggestions.push("Super admins bypass role requirements".to_string());
        }
    }

    DenialReason {
        kind: clause.kind.into(),
        message,
        suggestions,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Debug helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Log the snapshot at debug level.
pub fn log_authorization(snapshot: &AuthorizationSnapshot) {
    let state = SnapshotState::of(snapshot);
    tracing::debug!(
        roles = ?state.roles,
        active_settings = ?state.active_settings,
        permissions = ?state.effective_permissions,
        is_super_admin = state.is_super_admin,
        "user authorization"
    );
}

/// Evaluate `config` and log the labelled result at debug level.
pub fn trace_route_check(
    snapshot: &AuthorizationSnapshot,
    config: &RoutePermissionConfig,
    label: &str,
) -> bool {
    let explanation = explain_route_access(snapshot, config);
    tracing::debug!(
        label,
        granted = explanation.granted,
        reason = %explanation.reason,
        "route permission check"
    );
    explanation.granted
}
