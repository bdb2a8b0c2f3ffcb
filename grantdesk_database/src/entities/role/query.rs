use grantdesk_core::ids::RoleId;
use sqlx::PgConnection;

use crate::{IntoModel, QueryError, QueryResult};



pub struct Query;

impl Query {
    pub async fn get_role_by_id(
        connection: &mut PgConnection,
        role_id: RoleId,
    ) -> QueryResult<Option<super::Model>> {
        let optional_intermediate_model = sqlx::query_as::<_, super::IntermediateModel>(
            "SELECT id, name, code, description, created_at, updated_at \
                FROM grantdesk.role \
                WHERE id = $1",
        )
        .bind(role_id.into_inner())
        .fetch_optional(connection)
        .await?;

        Ok(optional_intermediate_model.map(super::IntermediateModel::into_model))
    }

    pub async fn exists_by_id(connection: &mut PgConnection, role_id: RoleId) -> QueryResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM grantdesk.role WHERE id = $1)",
        )
        .bind(role_id.into_inner())
        .fetch_one(connection)
        .await
        .map_err(|error| QueryError::SqlxError { error })
    }
}
