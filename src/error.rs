use sea_orm::DbErr;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("database error: {0}")]
  Db(#[from] DbErr),
  #[error(transparent)]
  Validation(#[from] Validation),
  #[error("Promotion with id '{0}' was not found")]
  NotFound(i64),
  #[error("Promotion named '{0}' already exists")]
  Conflict(String),
  #[error("invalid query: {0}")]
  InvalidQuery(String),
}

/// Reasons a wire record is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Validation {
  #[error("Invalid Promotion: missing {0}")]
  MissingField(&'static str),
  #[error("Invalid Promotion: {field} must be {expected}")]
  InvalidType { field: &'static str, expected: &'static str },
  #[error("Invalid Promotion: body of request contained bad or no data")]
  MalformedPayload,
  #[error("Invalid Promotion: {field} {reason}")]
  InvalidValue { field: &'static str, reason: String },
}
