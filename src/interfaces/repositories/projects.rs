use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectPayload},
    errors::AppError,
};

/// Gateway to the backend REST API that owns project persistence. This
/// service never talks to a database directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_project(&self, payload: &ProjectPayload) -> Result<Project, AppError>;
    async fn update_project(&self, id: &Uuid, payload: &ProjectPayload) -> Result<Project, AppError>;
    async fn get_challenge(&self, id: &Uuid) -> Result<Option<Project>, AppError>;
    async fn list_challenges(&self) -> Result<Vec<Project>, AppError>;
}
