use std::fmt::Display;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AlreadyInitialized,
    NotInitialized,
    ParseFailure,
    TaskNotFound,
    InvalidEnum,
    ValidationError,
    IdGeneration,
    Io,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::ParseFailure => "PARSE_FAILURE",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::InvalidEnum => "INVALID_ENUM",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::IdGeneration => "ID_GENERATION",
            Self::Io => "IO_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn already_initialized(path: &Path) -> Self {
        Self::new(
            ErrorCode::AlreadyInitialized,
            format!("task directory already exists: {}", path.display()),
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "task store is not initialized. Run `task init` first.",
        )
    }

    pub fn parse(detail: impl Display) -> Self {
        Self::new(
            ErrorCode::ParseFailure,
            format!("parsing task file: {detail}"),
        )
    }

    pub fn task_not_found(id: &str) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("task not found: {id}"))
    }

    pub fn invalid_status(value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidEnum,
            format!("invalid status: {value} (valid: todo, progress, blocked, abandon, done)"),
        )
    }

    pub fn invalid_type(value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidEnum,
            format!("invalid type: {value} (valid: task, bug, feature)"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn id_generation(detail: impl Display) -> Self {
        Self::new(ErrorCode::IdGeneration, format!("generating id: {detail}"))
    }

    pub fn io(context: &str, err: std::io::Error) -> Self {
        Self::new(ErrorCode::Io, format!("{context}: {err}"))
    }
}
