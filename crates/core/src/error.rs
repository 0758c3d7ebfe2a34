use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// The human-readable message without the variant prefix, suitable for
    /// showing inline next to a form.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::NotFound { entity, id } => format!("{entity} with id {id} not found"),
            CoreError::Validation(msg)
            | CoreError::Conflict(msg)
            | CoreError::Forbidden(msg) => msg.clone(),
        }
    }
}
