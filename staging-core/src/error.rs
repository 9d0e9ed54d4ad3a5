use crate::config::ConfigError;
use std::fmt::Debug;

/// A specialized Result type for staging components.
///
/// This type is broadly used across the staging crates for any phase which may produce an error.
pub type Result<T, E> = std::result::Result<T, Error<E>>;

/// An error that occurred during a component lifecycle phase.
#[derive(thiserror::Error, Debug)]
pub enum Error<E> {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Component error: {0:?}")]
    Component(E),
}
