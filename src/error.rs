use thiserror::Error;

use finans_config::ConfigError;
use finans_core::CoreError;
use finans_storage_json::StorageError;

pub type AppResult<T> = Result<T, AppError>;

/// Failures surfaced by [`crate::FinansApp`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("No member selected")]
    NoMemberSelected,
}
