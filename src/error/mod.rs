mod app_error;

pub use app_error::AppError;

/// Crate-wide result type; every fallible path surfaces an [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
