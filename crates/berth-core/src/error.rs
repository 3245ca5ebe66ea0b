use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no engine registered under name '{0}'")]
    NoEngine(String),

    #[error("duplicate engine name: engine '{name}' is already registered")]
    DuplicateEngine { name: String },
}
