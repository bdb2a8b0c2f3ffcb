use grantdesk_core::api_models::{ErrorReason, ResponseWithErrorReason, RolesErrorReason};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::errors::{ClientError, ClientResult};

pub struct ServerResponse {
    http_response: reqwest::Response,
}

impl ServerResponse {
    pub(crate) fn from_reqwest_response(response: reqwest::Response) -> Self {
        Self {
            http_response: response,
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.http_response.status()
    }

    pub(crate) async fn json<V>(self) -> ClientResult<V>
    where
        V: DeserializeOwned,
    {
        let body_data = self
            .http_response
            .bytes()
            .await
            .map_err(|error| ClientError::RequestExecutionError { error })?;

        serde_json::from_slice(&body_data)
            .map_err(|error| ClientError::ResponseJsonBodyError { error })
    }

    pub(crate) async fn error_reason(self) -> ClientResult<ErrorReason> {
        let response_with_error_reason = self.json::<ResponseWithErrorReason>().await?;

        Ok(response_with_error_reason.reason)
    }

    pub(crate) async fn roles_error_reason(self) -> ClientResult<RolesErrorReason> {
        let response_status = self.status();
        let error_reason = self.error_reason().await?;

        let ErrorReason::Roles(roles_error_reason) = error_reason else {
            return Err(ClientError::unexpected_error_reason(
                error_reason,
                response_status,
            ));
        };

        Ok(roles_error_reason)
    }
}
