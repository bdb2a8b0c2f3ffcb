use std::collections::HashSet;

use grantdesk_core::ids::{PermissionId, RoleId};
use sqlx::PgConnection;

use crate::QueryResult;



pub struct Query;

impl Query {
    /// Returns the set of permission IDs the role currently holds.
    pub async fn granted_permission_ids(
        connection: &mut PgConnection,
        role_id: RoleId,
    ) -> QueryResult<HashSet<PermissionId>> {
        let raw_permission_ids = sqlx::query_scalar::<_, i32>(
            "SELECT DISTINCT permission_id \
                FROM grantdesk.role_permission \
                WHERE role_id = $1",
        )
        .bind(role_id.into_inner())
        .fetch_all(connection)
        .await?;

        Ok(raw_permission_ids
            .into_iter()
            .map(PermissionId::new)
            .collect())
    }
}
