//! Storage for annotated marker photographs.

use crate::registry::domain::MarkerId;
use image::RgbImage;
use std::sync::Arc;
use thiserror::Error;

/// Result type for photo store operations.
pub type PhotoStoreResult<T> = Result<T, PhotoStoreError>;

/// Persists one annotated image per marker.
pub trait PhotoStore: Send + Sync {
    /// Saves `image` as the photograph of `marker`, replacing any earlier
    /// one, and returns the name it was stored under.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoStoreError::Encode`] when the image cannot be encoded
    /// and [`PhotoStoreError::Io`] when it cannot be written.
    fn save(&self, marker: MarkerId, image: &RgbImage) -> PhotoStoreResult<String>;
}

/// Errors returned by photo store implementations.
#[derive(Debug, Clone, Error)]
pub enum PhotoStoreError {
    /// Image encoding failed.
    #[error("photo encoding failed: {0}")]
    Encode(Arc<dyn std::error::Error + Send + Sync>),

    /// Writing the encoded image failed.
    #[error("photo write failed: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl PhotoStoreError {
    /// Wraps an encoding error.
    pub fn encode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Encode(Arc::new(err))
    }

    /// Wraps an I/O error.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
