use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user as resolved by the external auth provider. This
/// service only reads it; issuing and refreshing sessions is not our job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub role: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub projects: Vec<Uuid>,
    #[serde(default)]
    pub favorites: Vec<Uuid>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn owns_project(&self, project_id: &Uuid) -> bool {
        self.projects.contains(project_id)
    }
}
