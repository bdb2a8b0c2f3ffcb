use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;



/// An [`ErrorReason`]-related trait providing a quick static description for a given error reason.
pub trait ErrorReasonName {
    fn reason_description(&self) -> &'static str;
}


/// Pertains to all endpoints under `/roles`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, ToSchema)]
#[serde(tag = "roles-error-type")]
#[non_exhaustive]
pub enum RolesErrorReason {
    #[serde(rename = "role-not-found")]
    RoleNotFound,
}

impl RolesErrorReason {
    /// Encountered when a role cannot be found by its ID.
    pub const fn role_not_found() -> Self {
        Self::RoleNotFound
    }
}

impl ErrorReasonName for RolesErrorReason {
    fn reason_description(&self) -> &'static str {
        match self {
            Self::RoleNotFound => "role not found",
        }
    }
}



#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, ToSchema)]
pub enum InvalidJsonBodyReason {
    /// Indicates that the provided JSON data was invalid,
    /// possibly due to an IO / syntax / EOF error while parsing.
    #[serde(rename = "not-json")]
    NotJson,

    /// Indicates that the provided JSON data was valid,
    /// but its data did not match the expected scheme / format
    /// (deserialization error).
    #[serde(rename = "invalid-data")]
    InvalidData,

    /// Indicates that the provided JSON data was too large.
    #[serde(rename = "too-large")]
    TooLarge,
}



#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, ToSchema)]
#[serde(tag = "type", content = "data")]
pub enum ErrorReason {
    /// Indicates that the request is missing a JSON body.
    #[serde(rename = "missing-json-body")]
    MissingJsonBody,

    /// Indicates that the request has an invalid JSON body (see [`InvalidJsonBodyReason`]).
    #[serde(rename = "invalid-json-body")]
    InvalidJsonBody {
        /// Describes why the JSON body is invalid.
        #[schema(value_type = String)]
        reason: InvalidJsonBodyReason,
    },

    /// Pertains to all endpoints under:
    /// - `/roles`
    #[serde(rename = "roles")]
    Roles(RolesErrorReason),

    #[serde(rename = "other")]
    Other { reason: Cow<'static, str> },
}

impl ErrorReason {
    pub const fn missing_json_body() -> Self {
        Self::MissingJsonBody
    }

    pub const fn invalid_json_body(reason: InvalidJsonBodyReason) -> Self {
        Self::InvalidJsonBody { reason }
    }
}

impl ErrorReasonName for ErrorReason {
    fn reason_description(&self) -> &'static str {
        match self {
            Self::MissingJsonBody => "missing JSON body",
            Self::InvalidJsonBody { .. } => "invalid JSON body",
            Self::Roles(roles_error_reason) => roles_error_reason.reason_description(),
            Self::Other { .. } => "other reason",
        }
    }
}

impl From<RolesErrorReason> for ErrorReason {
    fn from(value: RolesErrorReason) -> Self {
        Self::Roles(value)
    }
}




/// A JSON-serializable model containing a single field named `reason` ([`ErrorReason`]).
///
/// This type is used when responding with strongly-typed error reasons;
/// endpoint code should go through its response builder instead of
/// constructing this directly.
#[derive(Serialize, PartialEq, Eq, Clone, Debug, ToSchema)]
#[cfg_attr(
    feature = "serde_impls_for_client_on_models",
    derive(serde::Deserialize)
)]
pub struct ResponseWithErrorReason {
    pub reason: ErrorReason,
}

impl ResponseWithErrorReason {
    #[inline]
    pub fn new(reason: ErrorReason) -> Self {
        Self { reason }
    }
}
