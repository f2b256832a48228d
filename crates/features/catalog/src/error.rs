use crate::models::ValidationErrors;
use std::borrow::Cow;

/// Catalog slice error type.
#[encore_derive::encore_error]
pub enum CatalogError {
    /// Field-level constraint violations.
    #[error("Validation failed{}: {errors}", format_context(.context))]
    Validation { errors: ValidationErrors, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The admin site has no model registered under the requested key.
    #[error("Unknown model{}: {message}", format_context(.context))]
    UnknownModel { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("Database error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: encore_database::DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    /// Malformed JSON payloads and entity (de)serialization failures.
    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CatalogError {
    pub(crate) fn not_found(table: &str, id: &str) -> Self {
        Self::NotFound { message: format!("{table}:{id}").into(), context: None }
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation { errors, context: None }
    }
}
