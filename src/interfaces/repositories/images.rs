use async_trait::async_trait;

use crate::{
    entities::{form::ImageFile, project::HostedImage},
    errors::AppError,
};

/// Gateway to the external image-hosting service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Uploads a single image file, returning its hosted URL and the opaque
    /// identifier later used to request deletion.
    async fn upload(&self, file: &ImageFile) -> Result<HostedImage, AppError>;

    async fn delete(&self, public_id: &str) -> Result<(), AppError>;
}
