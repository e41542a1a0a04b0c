use serde::Serialize;
use uuid::Uuid;

use crate::constants::{FIGMA_EMBED_HOST, FIGMA_EMBED_URL};
use crate::entities::project::Project;
use crate::errors::AppError;
use crate::repositories::projects::ProjectRepository;
use crate::utils::markdown::safe_markdown_to_html;

/// Read side of the challenge pages: detail lookup and the listing the
/// detail page redirects to when a challenge does not exist.
pub struct ChallengeHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

/// View model for the challenge detail page. The requirements text is also
/// rendered to sanitized HTML so the page can show rich formatting without
/// trusting the stored string.
#[derive(Debug, Serialize)]
pub struct ChallengeDetailView {
    pub id: Uuid,
    pub title: String,
    pub brief: String,
    pub description: String,
    pub requirements_html: String,
    pub difficulty: Option<String>,
    pub technologies: Vec<String>,
    pub image: String,
    pub figma_url: String,
    pub figma_embed_url: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengeCard {
    pub id: Uuid,
    pub title: String,
    pub brief: String,
    pub image: String,
    pub difficulty: Option<String>,
    pub technologies: Vec<String>,
}

impl<R> ChallengeHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ChallengeHandler { project_repo }
    }

    /// Resolves a challenge by its raw path id. `None` means the caller
    /// should redirect to the listing; a malformed id is treated the same
    /// as an unknown one, not as an error.
    pub async fn get_challenge(&self, id: &str) -> Result<Option<ChallengeDetailView>, AppError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        match self.project_repo.get_challenge(&uuid).await? {
            Some(project) => Ok(Some(ChallengeDetailView::from(project))),
            None => Ok(None),
        }
    }

    pub async fn list_challenges(&self) -> Result<Vec<ChallengeCard>, AppError> {
        let projects = self.project_repo.list_challenges().await?;
        Ok(projects.into_iter().map(ChallengeCard::from).collect())
    }
}

impl From<Project> for ChallengeDetailView {
    fn from(project: Project) -> Self {
        let requirements_html = safe_markdown_to_html(&project.description);
        let figma_embed_url = figma_embed_url(&project.figma_url);

        ChallengeDetailView {
            id: project.id,
            title: project.title,
            brief: project.brief,
            description: project.description,
            requirements_html,
            difficulty: project.difficulty.map(|d| d.name),
            technologies: project.technologies.into_iter().map(|t| t.name).collect(),
            image: project.image,
            figma_url: project.figma_url,
            figma_embed_url,
        }
    }
}

impl From<Project> for ChallengeCard {
    fn from(project: Project) -> Self {
        ChallengeCard {
            id: project.id,
            title: project.title,
            brief: project.brief,
            image: project.image,
            difficulty: project.difficulty.map(|d| d.name),
            technologies: project.technologies.into_iter().map(|t| t.name).collect(),
        }
    }
}

/// Builds the embeddable design preview URL by templating the stored Figma
/// URL into the embed host.
pub fn figma_embed_url(figma_url: &str) -> String {
    format!(
        "{}?embed_host={}&url={}",
        FIGMA_EMBED_URL,
        FIGMA_EMBED_HOST,
        urlencoding::encode(figma_url)
    )
}
