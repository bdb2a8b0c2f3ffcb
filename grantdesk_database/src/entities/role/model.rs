use chrono::{DateTime, Utc};
use grantdesk_core::ids::RoleId;

use crate::IntoModel;



pub struct Model {
    pub id: RoleId,

    pub name: String,

    /// Unique role code (e.g. `ROLE_ADMIN`).
    pub code: String,

    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}


#[derive(sqlx::FromRow)]
pub(super) struct IntermediateModel {
    pub id: i32,

    pub name: String,

    pub code: String,

    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl IntoModel for IntermediateModel {
    type Model = Model;

    fn into_model(self) -> Self::Model {
        Self::Model {
            id: RoleId::new(self.id),
            name: self.name,
            code: self.code,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
