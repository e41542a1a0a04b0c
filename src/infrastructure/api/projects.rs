use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectPayload},
    errors::AppError,
    repositories::projects::ProjectRepository,
};

/// `ProjectRepository` backed by the backend REST API. All persistence and
/// authorization decisions happen on the other side of these calls.
#[derive(Clone)]
pub struct RestProjectRepo {
    client: reqwest::Client,
    base_url: String,
}

impl RestProjectRepo {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        RestProjectRepo {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ProjectRepository for RestProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        let response = self.client.get(self.url("/api/project")).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::ServiceError(format!(
                "Project API returned {}",
                response.status()
            )))
        }
    }

    async fn create_project(&self, payload: &ProjectPayload) -> Result<Project, AppError> {
        let response = self
            .client
            .post(self.url("/api/project"))
            .json(payload)
            .send()
            .await?;

        read_project(response).await
    }

    async fn update_project(&self, id: &Uuid, payload: &ProjectPayload) -> Result<Project, AppError> {
        let response = self
            .client
            .put(self.url(&format!("/api/project/{}", id)))
            .json(payload)
            .send()
            .await?;

        read_project(response).await
    }

    async fn get_challenge(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        let response = self
            .client
            .get(self.url(&format!("/api/project/{}", id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::ServiceError(format!(
                "Project API returned {}",
                response.status()
            )));
        }

        Ok(Some(response.json().await?))
    }

    async fn list_challenges(&self) -> Result<Vec<Project>, AppError> {
        let response = self.client.get(self.url("/api/project")).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ServiceError(format!(
                "Project API returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

async fn read_project(response: reqwest::Response) -> Result<Project, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::ServiceError(format!(
            "Project API returned {}: {}",
            status, body
        )));
    }

    Ok(response.json().await?)
}
