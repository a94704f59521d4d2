//! When cache setup goes wrong

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CacheConfigError>;

/// Bad cache configuration, from code or from the environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheConfigError {
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),

    #[error("{var}={value:?} is not a positive integer")]
    InvalidEnvValue { var: &'static str, value: String },
}
