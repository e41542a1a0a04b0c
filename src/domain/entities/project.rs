use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A challenge record as returned by the backend project API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub brief: String,
    pub description: String,
    pub image: String,
    pub image_id: String,
    pub figma_url: String,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub technologies: Vec<Technology>,
    pub user_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn hosted_image(&self) -> HostedImage {
        HostedImage {
            url: self.image.clone(),
            public_id: self.image_id.clone(),
        }
    }
}

/// Name-only level descriptor (Iniciante, Intermediário, Avançado).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    pub name: String,
}

/// Name-only tag, many-to-many with projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
}

/// Hosted image reference returned by the upload service. The `public_id`
/// is the opaque key later used to request deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedImage {
    pub url: String,
    pub public_id: String,
}

/// Body sent to the project create/update endpoints: the validated form
/// fields merged with the resolved hosted image. Technologies stay as the
/// raw space-separated string; the backend owns tokenization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub title: String,
    pub technologies: String,
    pub difficulty: String,
    pub figma_url: String,
    pub brief: String,
    pub description: String,
    pub image: String,
    pub image_id: String,
}

impl ProjectPayload {
    pub fn new(fields: ProjectFields, image: HostedImage) -> Self {
        ProjectPayload {
            title: fields.title,
            technologies: fields.technologies,
            difficulty: fields.difficulty,
            figma_url: fields.figma_url,
            brief: fields.brief,
            description: fields.description,
            image: image.url,
            image_id: image.public_id,
        }
    }
}

/// The scalar form fields shared by the create and update schemas, after
/// validation has passed.
#[derive(Debug, Clone)]
pub struct ProjectFields {
    pub title: String,
    pub technologies: String,
    pub difficulty: String,
    pub figma_url: String,
    pub brief: String,
    pub description: String,
}
