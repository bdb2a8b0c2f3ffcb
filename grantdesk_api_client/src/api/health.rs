use grantdesk_core::api_models::PingResponse;
use reqwest::StatusCode;

use crate::{
    clients::HttpClient,
    errors::{ClientError, ClientResult},
    urls::build_request_url,
};

pub struct HealthApi<'c, C>
where
    C: HttpClient,
{
    client: &'c C,
}

impl<'c, C> HealthApi<'c, C>
where
    C: HttpClient,
{
    pub fn new(client: &'c C) -> Self {
        Self { client }
    }

    pub async fn ping(&self) -> ClientResult<bool> {
        let request_url = build_request_url(self.client.server(), "/ping")?;

        let response = self.client.get(request_url).await?;

        match response.status() {
            StatusCode::OK => {
                let response_body: PingResponse = response.json().await?;

                Ok(response_body.ok)
            }
            StatusCode::INTERNAL_SERVER_ERROR => Err(ClientError::internal_server_error()),
            unexpected_status_code => {
                Err(ClientError::unexpected_status_code(unexpected_status_code))
            }
        }
    }
}
