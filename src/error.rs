use thiserror::Error;

#[derive(Error, Debug)]
pub enum SafeRouteError {
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SafeRouteError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => crate::exit_code::INVALID_INPUT,
            Self::NotFound(_) => crate::exit_code::NOT_FOUND,
            _ => crate::exit_code::RUNTIME_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, SafeRouteError>;
