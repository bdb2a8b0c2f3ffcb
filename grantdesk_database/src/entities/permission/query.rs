use sqlx::PgConnection;

use crate::{QueryResult, TryIntoModel};



pub struct Query;

impl Query {
    /// Fetches every permission row, in display order
    /// (stable ID order; siblings were seeded in display order).
    pub async fn get_all_ordered(connection: &mut PgConnection) -> QueryResult<Vec<super::Model>> {
        let intermediate_models = sqlx::query_as::<_, super::IntermediateModel>(
            "SELECT id, code, name, kind, menu_id, button_id, parent_id, created_at, updated_at \
                FROM grantdesk.permission \
                ORDER BY id",
        )
        .fetch_all(connection)
        .await?;

        intermediate_models
            .into_iter()
            .map(super::IntermediateModel::try_into_model)
            .collect()
    }
}
