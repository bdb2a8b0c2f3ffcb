use chrono::{DateTime, Utc};
use grantdesk_core::{ids::PermissionId, permission_tree::FlatPermission};

use crate::{QueryError, TryIntoModel};


/// What a permission entry guards:
/// an entire menu, or a single button inside one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PermissionKind {
    Menu,
    Button,
}

impl PermissionKind {
    /// Attempt to parse a [`PermissionKind`] from its database representation.
    pub fn from_database_value(value: &str) -> Option<Self> {
        match value {
            "menu" => Some(Self::Menu),
            "button" => Some(Self::Button),
            _ => None,
        }
    }

    pub fn database_value(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Button => "button",
        }
    }
}


pub struct Model {
    /// Internal ID of the permission; unique across the entire table.
    pub id: PermissionId,

    /// Unique permission code (e.g. `user:create`).
    pub code: String,

    pub name: String,

    pub kind: PermissionKind,

    /// The menu this permission guards, if it is a menu permission.
    pub menu_id: Option<i32>,

    /// The button this permission guards, if it is a button permission.
    pub button_id: Option<i32>,

    /// Parent permission in the hierarchy;
    /// `None` (or a legacy zero) marks a top-level permission.
    pub parent_id: Option<PermissionId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Reduces the permission row to the flat tree entry
    /// the permission tree is assembled from.
    pub fn into_flat_permission(self) -> FlatPermission {
        FlatPermission {
            id: self.id,
            name: self.name,
            // The permission table carries no display icon;
            // the field exists on the wire and stays unset here.
            icon: None,
            parent_id: self.parent_id,
        }
    }
}


#[derive(sqlx::FromRow)]
pub(super) struct IntermediateModel {
    pub id: i32,

    pub code: String,

    pub name: String,

    pub kind: String,

    pub menu_id: Option<i32>,

    pub button_id: Option<i32>,

    pub parent_id: Option<i32>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl TryIntoModel for IntermediateModel {
    type Model = Model;
    type Error = QueryError;

    fn try_into_model(self) -> Result<Self::Model, Self::Error> {
        let Some(kind) = PermissionKind::from_database_value(&self.kind) else {
            return Err(QueryError::model_error(format!(
                "unexpected permission kind: {}",
                self.kind
            )));
        };

        Ok(Self::Model {
            id: PermissionId::new(self.id),
            code: self.code,
            name: self.name,
            kind,
            menu_id: self.menu_id,
            button_id: self.button_id,
            parent_id: self.parent_id.map(PermissionId::new),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
