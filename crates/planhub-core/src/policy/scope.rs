//! Tenant scope guard.
//!
//! Every entity lookup is additionally scoped by `organization_id` in SQL;
//! this guard covers the cases where both sides are already in memory (for
//! example, checking a promotion target against the admin's organization).
//! Denial is always surfaced as "not found" so a caller cannot probe for the
//! existence of another tenant's resources.

use uuid::Uuid;

use crate::error::AppError;

/// Pure equality check between the acting user's organization and the
/// resource's organization.
pub fn same_tenant(actor_org_id: Uuid, resource_org_id: Uuid) -> bool {
    actor_org_id == resource_org_id
}

/// Guard form of [`same_tenant`]: cross-tenant access reads as a missing
/// entity, never as a permission error.
pub fn ensure_same_tenant(
    actor_org_id: Uuid,
    resource_org_id: Uuid,
    entity: &str,
) -> Result<(), AppError> {
    if same_tenant(actor_org_id, resource_org_id) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "{} not found or does not belong to this organization",
            entity
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorMetadata;

    #[test]
    fn test_same_tenant_allows() {
        let org = Uuid::new_v4();
        assert!(same_tenant(org, org));
        assert!(ensure_same_tenant(org, org, "Project").is_ok());
    }

    #[test]
    fn test_cross_tenant_reads_as_not_found() {
        let err = ensure_same_tenant(Uuid::new_v4(), Uuid::new_v4(), "Project").unwrap_err();
        // Must be NotFound (404), never Forbidden - no information leak
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
