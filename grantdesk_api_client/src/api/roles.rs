use grantdesk_core::{
    api_models::{
        RoleGrantsReplacedResponse,
        RoleGrantsReplacementRequest,
        RolePermissionTreeResponse,
        RolesErrorReason,
    },
    ids::{PermissionId, RoleId},
    permission_tree::PermissionTree,
};
use reqwest::StatusCode;
use thiserror::Error;

use crate::{
    assignment::GrantStore,
    clients::HttpClient,
    errors::{ClientError, ClientResult},
    urls::build_request_url,
};



#[derive(Debug, Error)]
pub enum RolesApiError {
    #[error("no role exists with ID {}", .role_id)]
    RoleNotFound { role_id: RoleId },

    #[error("client error")]
    ClientError {
        #[from]
        #[source]
        error: ClientError,
    },
}



/// Role grant management endpoints.
pub struct RolesApi<'c, C>
where
    C: HttpClient,
{
    client: &'c C,
}

impl<'c, C> RolesApi<'c, C>
where
    C: HttpClient,
{
    pub fn new(client: &'c C) -> Self {
        Self { client }
    }

    /// Fetches the full permission tree for the given role,
    /// with each node's enabled flag reflecting the role's current grants
    /// (`GET /roles/{role_id}/permissions`).
    pub async fn role_permission_tree(
        &self,
        role_id: RoleId,
    ) -> ClientResult<PermissionTree, RolesApiError> {
        let request_url = build_request_url(
            self.client.server(),
            &format!("/roles/{}/permissions", role_id),
        )
        .map_err(ClientError::from)?;

        let response = self.client.get(request_url).await?;

        match response.status() {
            StatusCode::OK => {
                let response_body: RolePermissionTreeResponse = response.json().await?;

                Ok(PermissionTree::from_roots(response_body.permissions))
            }
            StatusCode::NOT_FOUND => match response.roles_error_reason().await? {
                RolesErrorReason::RoleNotFound => Err(RolesApiError::RoleNotFound { role_id }),
                unexpected_reason => Err(ClientError::unexpected_error_reason(
                    unexpected_reason.into(),
                    StatusCode::NOT_FOUND,
                )
                .into()),
            },
            StatusCode::INTERNAL_SERVER_ERROR => {
                Err(ClientError::internal_server_error().into())
            }
            unexpected_status_code => {
                Err(ClientError::unexpected_status_code(unexpected_status_code).into())
            }
        }
    }

    /// Replaces the role's entire grant set with the given permission IDs
    /// (`POST /roles/{role_id}/permissions`).
    pub async fn replace_role_grants(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> ClientResult<(), RolesApiError> {
        let request_url = build_request_url(
            self.client.server(),
            &format!("/roles/{}/permissions", role_id),
        )
        .map_err(ClientError::from)?;

        let request_body = RoleGrantsReplacementRequest {
            permissions: permission_ids,
        };

        let response = self.client.post(request_url, Some(&request_body)).await?;

        match response.status() {
            StatusCode::OK => {
                let _acknowledgement: RoleGrantsReplacedResponse = response.json().await?;

                Ok(())
            }
            StatusCode::NOT_FOUND => match response.roles_error_reason().await? {
                RolesErrorReason::RoleNotFound => Err(RolesApiError::RoleNotFound { role_id }),
                unexpected_reason => Err(ClientError::unexpected_error_reason(
                    unexpected_reason.into(),
                    StatusCode::NOT_FOUND,
                )
                .into()),
            },
            StatusCode::INTERNAL_SERVER_ERROR => {
                Err(ClientError::internal_server_error().into())
            }
            unexpected_status_code => {
                Err(ClientError::unexpected_status_code(unexpected_status_code).into())
            }
        }
    }
}


impl<'c, C> GrantStore for RolesApi<'c, C>
where
    C: HttpClient,
{
    type Error = RolesApiError;

    async fn load_role_grants(&self, role_id: RoleId) -> Result<PermissionTree, Self::Error> {
        self.role_permission_tree(role_id).await
    }

    async fn replace_role_grants(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> Result<(), Self::Error> {
        RolesApi::replace_role_grants(self, role_id, permission_ids).await
    }
}
