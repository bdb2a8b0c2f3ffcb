/// An access token for the Grantdesk API.
///
/// How the token is obtained is outside this crate's scope -- the login
/// flow lives in the authentication service. The client only carries the
/// token as an opaque string and attaches it as a bearer credential.
pub struct AccessToken {
    access_token: String,
}

impl AccessToken {
    #[inline]
    pub fn from_raw_token(raw_access_token: String) -> Self {
        Self {
            access_token: raw_access_token,
        }
    }

    pub(crate) fn access_token(&self) -> &str {
        &self.access_token
    }
}
