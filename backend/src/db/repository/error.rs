//! Failures reported by employee storage.
//!
//! A [`RepositoryError`] names what went wrong (the variant), says it in
//! words (`message`) and records where it happened ([`ErrorContext`]). The
//! HTTP layer picks a status code from the variant alone.

use std::fmt;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a storage failure happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Repository or service call, e.g. `save` or `create_employee`
    pub operation: Option<String>,
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    /// Backend specific detail such as a constraint name
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    pub fn with_entity(self, entity: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            ..self
        }
    }

    pub fn with_entity_id(self, id: impl ToString) -> Self {
        Self {
            entity_id: Some(id.to_string()),
            ..self
        }
    }

    pub fn with_details(self, details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..self
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labelled = [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("id", &self.entity_id),
            ("details", &self.details),
        ];
        let rendered: Vec<String> = labelled
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}={}", label, v)))
            .collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The backend could not be reached (pool exhausted, database down,
    /// local store switched off).
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// The backend rejected or failed a statement.
    #[error("Query error: {message} {context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// No employee with the requested id.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Another employee already uses the email.
    #[error("Already exists: {message} {context}")]
    AlreadyExists {
        message: String,
        context: ErrorContext,
    },

    /// The caller handed over an employee that cannot be used for the call.
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// Backend selection or connection settings are unusable.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

/// Generates `name(message)` and `name_with_context(message, context)`
/// constructors for each variant.
macro_rules! constructors {
    ($($variant:ident => $plain:ident / $with_context:ident),* $(,)?) => {
        $(
            pub fn $plain(message: impl Into<String>) -> Self {
                Self::$with_context(message, ErrorContext::default())
            }

            pub fn $with_context(message: impl Into<String>, context: ErrorContext) -> Self {
                Self::$variant {
                    message: message.into(),
                    context,
                }
            }
        )*
    };
}

impl RepositoryError {
    constructors! {
        ConnectionError => connection / connection_with_context,
        QueryError => query / query_with_context,
        NotFound => not_found / not_found_with_context,
        AlreadyExists => already_exists / already_exists_with_context,
        ValidationError => validation / validation_with_context,
        ConfigurationError => configuration / configuration_with_context,
        InternalError => internal / internal_with_context,
    }

    fn parts(&self) -> (&String, &ErrorContext) {
        use RepositoryError::*;
        match self {
            ConnectionError { message, context }
            | QueryError { message, context }
            | NotFound { message, context }
            | AlreadyExists { message, context }
            | ValidationError { message, context }
            | ConfigurationError { message, context }
            | InternalError { message, context } => (message, context),
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        use RepositoryError::*;
        match self {
            ConnectionError { context, .. }
            | QueryError { context, .. }
            | NotFound { context, .. }
            | AlreadyExists { context, .. }
            | ValidationError { context, .. }
            | ConfigurationError { context, .. }
            | InternalError { context, .. } => context,
        }
    }

    /// The message without the context suffix.
    pub fn message(&self) -> &str {
        self.parts().0
    }

    pub fn context(&self) -> &ErrorContext {
        self.parts().1
    }

    /// Re-label the failure with the caller's operation name.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }
}

impl From<String> for RepositoryError {
    fn from(message: String) -> Self {
        Self::internal(message)
    }
}

impl From<&str> for RepositoryError {
    fn from(message: &str) -> Self {
        Self::internal(message)
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => Self::not_found("No employee row matched"),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                let context = ErrorContext::default().with_entity("employee");
                let context = match info.constraint_name() {
                    Some(constraint) => context.with_details(format!("constraint={}", constraint)),
                    None => context,
                };
                Self::already_exists_with_context(info.message(), context)
            }
            Error::DatabaseError(kind, info) => Self::query_with_context(
                info.message(),
                ErrorContext::default().with_details(format!("{:?}", kind)),
            ),
            Error::DeserializationError(e) => {
                Self::internal(format!("Unreadable employee row: {}", e))
            }
            other => Self::query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::connection_with_context(
            err.to_string(),
            ErrorContext::default().with_details("no pooled connection available"),
        )
    }
}
