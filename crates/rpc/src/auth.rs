//! Role-based capability checks
//!
//! Four roles cover the desk split: operations handles custody intake
//! and receipts, finance handles invoices and money movement,
//! compliance handles client standing and risk. `admin` passes every
//! check. Receipt verification is deliberately role-free: anyone
//! holding a receipt number may ask about it.

use strum_macros::{Display, EnumString};
use thiserror::Error;

/// A capability role held by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    Operations,
    Finance,
    Compliance,
}

/// Roles allowed to manage clients, assets and custody receipts.
pub const OPERATIONS: &[Role] = &[Role::Admin, Role::Operations];

/// Roles allowed to manage invoices, payments and credit memos.
pub const FINANCE: &[Role] = &[Role::Admin, Role::Finance];

/// Roles allowed to change client standing and accept risk assessments.
pub const COMPLIANCE: &[Role] = &[Role::Admin, Role::Compliance];

/// The user performing an operation. The id is recorded on issued
/// receipts and in every audit record.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn new(id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            id: id.into(),
            roles,
        }
    }

    /// Shorthand for an all-capability actor.
    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(id, vec![Role::Admin])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Actor '{actor}' holds none of the required roles {required:?}")]
    MissingRole {
        actor: String,
        required: &'static [Role],
    },
}

/// Require the actor to hold at least one of the allowed roles.
pub fn require_role(actor: &Actor, allowed: &'static [Role]) -> Result<(), AuthError> {
    if actor.roles.iter().any(|role| allowed.contains(role)) {
        Ok(())
    } else {
        Err(AuthError::MissingRole {
            actor: actor.id.clone(),
            required: allowed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_admin_passes_every_check() {
        let actor = Actor::admin("root");
        assert!(require_role(&actor, OPERATIONS).is_ok());
        assert!(require_role(&actor, FINANCE).is_ok());
        assert!(require_role(&actor, COMPLIANCE).is_ok());
    }

    #[test]
    fn test_single_role_is_scoped_to_its_desk() {
        let actor = Actor::new("fin.marco", vec![Role::Finance]);
        assert!(require_role(&actor, FINANCE).is_ok());

        let err = require_role(&actor, OPERATIONS).unwrap_err();
        let AuthError::MissingRole { actor, required } = err;
        assert_eq!(actor, "fin.marco");
        assert_eq!(required, OPERATIONS);
    }

    #[test]
    fn test_multiple_roles_union_their_capabilities() {
        let actor = Actor::new("dual", vec![Role::Operations, Role::Compliance]);
        assert!(require_role(&actor, OPERATIONS).is_ok());
        assert!(require_role(&actor, COMPLIANCE).is_ok());
        assert!(require_role(&actor, FINANCE).is_err());
    }

    #[test]
    fn test_role_parses_from_snake_case() {
        assert_eq!(Role::from_str("operations").unwrap(), Role::Operations);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert!(Role::from_str("superuser").is_err());
        assert_eq!(Role::Compliance.to_string(), "compliance");
    }

    #[test]
    fn test_denial_names_the_actor() {
        let actor = Actor::new("ops.lena", vec![Role::Operations]);
        let err = require_role(&actor, FINANCE).unwrap_err();
        assert!(err.to_string().contains("ops.lena"));
    }
}
