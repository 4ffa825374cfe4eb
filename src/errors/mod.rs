//! Centralized error handling for the listing service.
//!
//! Storage errors are wrapped with the originating operation's name before
//! they cross a component boundary, so the underlying cause survives for
//! diagnostics. A missing image file is not an error at all: the image
//! store recovers locally by substituting the default image.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Convenience type alias for Image Store Results
pub type ImageStoreResult<T> = Result<T, ImageStoreError>;
