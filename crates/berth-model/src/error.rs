use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("invalid label expression: {0:?} (expected `key` or `key=value`)")]
    InvalidLabelExpr(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
