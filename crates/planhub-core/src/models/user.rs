use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role for authorization.
///
/// Stored as the Postgres enum `user_role`; serialized over the wire with the
/// same spellings (`ORGADMIN`, `PROJECTMANAGER`, `EMPLOYEE`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    OrgAdmin,
    ProjectManager,
    Employee,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Role::OrgAdmin => write!(f, "ORGADMIN"),
            Role::ProjectManager => write!(f, "PROJECTMANAGER"),
            Role::Employee => write!(f, "EMPLOYEE"),
        }
    }
}

/// User entity. The password hash never leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The user shape embedded in project membership and task assignee lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// The actor resolved from a verified session token.
///
/// This is the identity-gateway contract: a verified token yields exactly
/// these fields, an invalid or expired one yields nothing.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub organization_id: Uuid,
}

/// Dev-only unconditional role overwrite
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRoleRequest {
    pub user_id: Uuid,
    pub role: Role,
}

/// Admin request to promote a same-organization user to PROJECTMANAGER
#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoteRequest {
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::OrgAdmin).unwrap(), "\"ORGADMIN\"");
        assert_eq!(
            serde_json::to_string(&Role::ProjectManager).unwrap(),
            "\"PROJECTMANAGER\""
        );
        assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"EMPLOYEE\"");
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::OrgAdmin, Role::ProjectManager, Role::Employee] {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(role, back);
        }
    }

    #[test]
    fn test_role_display_matches_wire_format() {
        for role in [Role::OrgAdmin, Role::ProjectManager, Role::Employee] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role));
        }
    }
}
