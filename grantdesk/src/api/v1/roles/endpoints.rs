use actix_web::{get, post, web};
use grantdesk_core::{
    api_models::{
        RoleGrantsReplacedResponse,
        RoleGrantsReplacementRequest,
        RolePermissionTreeResponse,
        RolesErrorReason,
    },
    ids::RoleId,
    permission_tree::PermissionTree,
};
use grantdesk_database::entities;
use sqlx::Acquire;
use tracing::info;

use crate::{
    api::errors::{EndpointResponseBuilder, EndpointResult},
    state::ApplicationState,
};




/// Get a role's permission tree
///
/// Returns the *entire* permission hierarchy, with each node's `enable`
/// flag indicating whether the given role currently holds that permission.
/// This is the tree an operator edits in the grant assignment dialog.
#[utoipa::path(
    get,
    path = "/roles/{role_id}/permissions",
    tag = "roles",
    params(
        (
            "role_id" = i32,
            Path,
            description = "ID of the role to get the permission tree for."
        )
    ),
    responses(
        (
            status = 200,
            description = "The full permission tree, annotated with the role's current grants.",
            body = RolePermissionTreeResponse,
            example = json!([
                {
                    "id": 1,
                    "name": "System",
                    "enable": false,
                    "children": [
                        { "id": 2, "name": "Users", "enable": true, "children": [] }
                    ]
                }
            ])
        ),
        (
            status = 404,
            description = "The specified role does not exist."
        ),
        (
            status = 500,
            description = "Internal server error."
        )
    )
)]
#[get("/{role_id}/permissions")]
pub async fn get_role_permission_tree(
    state: ApplicationState,
    path_info: web::Path<(i32,)>,
) -> EndpointResult {
    let mut database_connection = state.database_pool.acquire().await?;

    let target_role_id = RoleId::new(path_info.into_inner().0);


    let target_role_exists =
        entities::RoleQuery::exists_by_id(&mut database_connection, target_role_id).await?;

    if !target_role_exists {
        return EndpointResponseBuilder::not_found()
            .with_error_reason(RolesErrorReason::role_not_found())
            .build();
    }


    let all_permissions =
        entities::PermissionQuery::get_all_ordered(&mut database_connection).await?;

    let granted_permission_ids = entities::RolePermissionQuery::granted_permission_ids(
        &mut database_connection,
        target_role_id,
    )
    .await?;


    let flat_permissions = all_permissions
        .into_iter()
        .map(entities::permission::Model::into_flat_permission)
        .collect();

    let permission_tree = PermissionTree::assemble(flat_permissions, &granted_permission_ids);


    EndpointResponseBuilder::ok()
        .with_json_body(RolePermissionTreeResponse {
            permissions: permission_tree.into_roots(),
        })
        .build()
}




/// Replace a role's grants
///
/// Atomically replaces the role's *entire* grant set with the submitted
/// permission ID list: every listed permission becomes granted and every
/// previously granted permission that is absent from the list is revoked.
/// Submitted IDs that match no existing permission are skipped silently.
#[utoipa::path(
    post,
    path = "/roles/{role_id}/permissions",
    tag = "roles",
    params(
        (
            "role_id" = i32,
            Path,
            description = "ID of the role whose grants to replace."
        )
    ),
    request_body(
        content = RoleGrantsReplacementRequest
    ),
    responses(
        (
            status = 200,
            description = "The role's grants were replaced.",
            body = RoleGrantsReplacedResponse,
            example = json!({ "ok": true })
        ),
        (
            status = 404,
            description = "The specified role does not exist."
        ),
        (
            status = 400,
            description = "Missing or invalid JSON body."
        ),
        (
            status = 500,
            description = "Internal server error."
        )
    )
)]
#[post("/{role_id}/permissions")]
pub async fn replace_role_grants(
    state: ApplicationState,
    path_info: web::Path<(i32,)>,
    request_data: web::Json<RoleGrantsReplacementRequest>,
) -> EndpointResult {
    let mut database_connection = state.database_pool.acquire().await?;
    let mut transaction = database_connection.begin().await?;

    let target_role_id = RoleId::new(path_info.into_inner().0);
    let request_data = request_data.into_inner();


    let target_role =
        entities::RoleQuery::get_role_by_id(&mut transaction, target_role_id).await?;

    let Some(target_role) = target_role else {
        return EndpointResponseBuilder::not_found()
            .with_error_reason(RolesErrorReason::role_not_found())
            .build();
    };


    // Delete-then-insert runs inside the transaction: on any error the role
    // keeps its previous grant set, never a partial one.
    let updated_grant_set = entities::RolePermissionMutation::replace_grants_for_role(
        &mut transaction,
        target_role_id,
        &request_data.permissions,
    )
    .await?;


    transaction.commit().await?;

    info!(
        role_id = %target_role_id,
        role_code = %target_role.code,
        submitted_permission_count = request_data.permissions.len(),
        granted_permission_count = updated_grant_set.len(),
        "Replaced a role's permission grants."
    );


    EndpointResponseBuilder::ok()
        .with_json_body(RoleGrantsReplacedResponse { ok: true })
        .build()
}
