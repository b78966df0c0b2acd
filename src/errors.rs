use sea_orm::error::DbErr;
use validator::ValidationErrors;

/// Message returned for any database failure. Transport-level details stay
/// in the logs and never reach callers.
const DATABASE_FAILURE_MESSAGE: &str = "unexpected database error, please try again";

/// Failure taxonomy for the business-rule services.
///
/// Structural validation problems carry one message per violated field
/// constraint; business-rule violations carry a single descriptive message
/// each; database errors are wrapped and reported generically.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("cannot change status from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    /// Flattens this error into the message list carried by the result
    /// envelope. Database failures collapse to one generic message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Database(_) => vec![DATABASE_FAILURE_MESSAGE.to_string()],
            Self::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(validation_messages(&errors))
    }
}

/// Collects every field violation into a stable, per-field message list.
/// Fields are sorted so callers (and tests) see a deterministic order.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |violation| match &violation.message {
                Some(message) => message.to_string(),
                None => format!("{}: {}", field, violation.code),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, max = 5, message = "name must be between 1 and 5 characters"))]
        name: String,
        #[validate(email(message = "contact email is not a valid address"))]
        email: Option<String>,
    }

    #[test]
    fn every_field_violation_is_reported() {
        let payload = Payload {
            name: String::new(),
            email: Some("not-an-email".to_string()),
        };

        let error: ServiceError = payload.validate().unwrap_err().into();
        let messages = assert_matches!(error, ServiceError::Validation(m) => m);
        assert_eq!(
            messages,
            vec![
                "contact email is not a valid address".to_string(),
                "name must be between 1 and 5 characters".to_string(),
            ]
        );
    }

    #[test]
    fn database_errors_surface_a_generic_message() {
        let error = ServiceError::Database(DbErr::Custom("connection reset by peer".into()));
        assert_eq!(error.messages(), vec![DATABASE_FAILURE_MESSAGE.to_string()]);
    }

    #[test]
    fn business_rule_errors_keep_their_message() {
        let error = ServiceError::conflict("a purchase order with number 'OC-202505-001' already exists");
        assert_eq!(
            error.messages(),
            vec!["a purchase order with number 'OC-202505-001' already exists".to_string()]
        );
    }

    #[test]
    fn transitions_render_both_states() {
        let error = ServiceError::InvalidTransition {
            from: "cancelada".to_string(),
            to: "enviada".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "cannot change status from 'cancelada' to 'enviada'"
        );
    }
}
