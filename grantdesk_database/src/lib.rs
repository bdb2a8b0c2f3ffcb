use std::borrow::Cow;

use thiserror::Error;

pub mod entities;



#[derive(Debug, Error)]
pub enum QueryError {
    #[error("sqlx error")]
    SqlxError {
        #[from]
        #[source]
        error: sqlx::Error,
    },

    #[error("model error: {}", .reason)]
    ModelError { reason: Cow<'static, str> },

    #[error("database inconsistency: {}", .problem)]
    DatabaseInconsistencyError { problem: Cow<'static, str> },
}

impl QueryError {
    pub fn model_error<R>(reason: R) -> Self
    where
        R: Into<Cow<'static, str>>,
    {
        Self::ModelError {
            reason: reason.into(),
        }
    }

    pub fn database_inconsistency<R>(problem: R) -> Self
    where
        R: Into<Cow<'static, str>>,
    {
        Self::DatabaseInconsistencyError {
            problem: problem.into(),
        }
    }
}



pub type QueryResult<R, E = QueryError> = Result<R, E>;


/// Conversion from a raw (as-selected) row struct
/// into the strongly-typed public model of an entity.
pub trait IntoModel {
    type Model;

    fn into_model(self) -> Self::Model;
}

/// Fallible variant of [`IntoModel`], for rows whose raw representation
/// permits values the strongly-typed model does not.
pub trait TryIntoModel {
    type Model;
    type Error;

    fn try_into_model(self) -> Result<Self::Model, Self::Error>;
}
