use std::collections::HashSet;

use grantdesk_core::ids::{PermissionId, RoleId};
use sqlx::PgConnection;

use crate::QueryResult;



pub struct Mutation;

impl Mutation {
    /// Replaces the role's entire grant set with the given permission IDs.
    ///
    /// The previous grants are deleted and the submitted set is inserted;
    /// submitted IDs that match no existing permission row are skipped
    /// silently. Run this inside a transaction -- the two statements must
    /// apply atomically or not at all (replace-all semantics).
    ///
    /// Returns the set of permission IDs that were actually granted.
    pub async fn replace_grants_for_role(
        connection: &mut PgConnection,
        role_id: RoleId,
        permission_ids_to_grant: &[PermissionId],
    ) -> QueryResult<HashSet<PermissionId>> {
        sqlx::query("DELETE FROM grantdesk.role_permission WHERE role_id = $1")
            .bind(role_id.into_inner())
            .execute(&mut *connection)
            .await?;


        let raw_permission_ids = permission_ids_to_grant
            .iter()
            .map(|permission_id| permission_id.into_inner())
            .collect::<Vec<_>>();

        let granted_permission_ids = sqlx::query_scalar::<_, i32>(
            "INSERT INTO grantdesk.role_permission (role_id, permission_id) \
                SELECT $1, permission.id \
                FROM grantdesk.permission \
                WHERE permission.id = ANY($2) \
                RETURNING permission_id",
        )
        .bind(role_id.into_inner())
        .bind(raw_permission_ids)
        .fetch_all(connection)
        .await?;


        Ok(granted_permission_ids
            .into_iter()
            .map(PermissionId::new)
            .collect())
    }
}
