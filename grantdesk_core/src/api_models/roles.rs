use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ids::PermissionId;
use crate::permission_tree::PermissionTreeNode;


/// A role's full permission tree, annotated with its current grants.
///
/// Serialized transparently as the bare array of top-level nodes,
/// which is the shape the administrative console consumes.
#[derive(Serialize, PartialEq, Eq, Clone, Debug, ToSchema)]
#[cfg_attr(
    feature = "serde_impls_for_client_on_models",
    derive(Deserialize)
)]
#[serde(transparent)]
pub struct RolePermissionTreeResponse {
    /// Top-level permission nodes (with their descendants).
    #[schema(value_type = Vec<PermissionTreeNode>)]
    pub permissions: Vec<PermissionTreeNode>,
}


/// Request to replace a role's entire grant set.
///
/// The listed permission IDs become the role's *complete* new grant set;
/// any previously granted permission that is absent from the list is
/// revoked (replace-all semantics).
#[derive(Deserialize, PartialEq, Eq, Clone, Debug, ToSchema)]
#[cfg_attr(
    feature = "serde_impls_for_client_on_models",
    derive(Serialize)
)]
#[schema(
    example = json!({
        "permissions": [1, 2, 3]
    })
)]
pub struct RoleGrantsReplacementRequest {
    /// The full set of permission IDs the role should hold.
    pub permissions: Vec<PermissionId>,
}


/// Acknowledgement of a successful grant replacement.
#[derive(Serialize, PartialEq, Eq, Debug, ToSchema)]
#[cfg_attr(
    feature = "serde_impls_for_client_on_models",
    derive(Deserialize)
)]
#[schema(example = json!({ "ok": true }))]
pub struct RoleGrantsReplacedResponse {
    pub ok: bool,
}
