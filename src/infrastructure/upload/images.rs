use async_trait::async_trait;
use reqwest::multipart;

use crate::{
    entities::{form::ImageFile, project::HostedImage},
    errors::AppError,
    repositories::images::ImageStore,
};

/// `ImageStore` backed by the external image-hosting service.
///
/// Upload: `POST {base}/image-upload`, multipart body with field `image`,
/// response `{ url, public_id }`.
/// Delete: `DELETE {base}/image-upload/delete`, JSON body `{ public_id }`.
#[derive(Clone)]
pub struct HttpImageStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpImageStore {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        HttpImageStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload(&self, file: &ImageFile) -> Result<HostedImage, AppError> {
        let mut part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.content_type {
            part = part
                .mime_str(mime)
                .map_err(|e| AppError::InvalidInput(format!("Invalid image content type: {}", e)))?;
        }
        let form = multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(format!("{}/image-upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UploadFailed(format!(
                "Image host returned {}",
                status
            )));
        }

        Ok(response.json().await?)
    }

    async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(format!("{}/image-upload/delete", self.base_url))
            .json(&serde_json::json!({ "public_id": public_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ServiceError(format!(
                "Image host returned {} on delete",
                status
            )));
        }

        Ok(())
    }
}
