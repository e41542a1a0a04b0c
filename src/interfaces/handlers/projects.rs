use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::form::{ImageFile, ProjectCreateForm, ProjectUpdateForm},
    errors::AppError,
    repositories::projects::ProjectRepository,
    use_cases::submission::{SubmissionOutcome, SubmissionStatus},
    AppState,
};

/// Multipart body of the create/update forms. `form_id` identifies the form
/// instance for the in-flight submission guard; browsers that omit it get a
/// fresh one per request.
#[derive(Debug, MultipartForm)]
pub struct ProjectMultipart {
    pub title: Text<String>,
    pub technologies: Text<String>,
    pub difficulty: Text<String>,
    #[multipart(limit = "5MB")]
    pub image: Option<TempFile>,
    pub figma_url: Text<String>,
    pub brief: Text<String>,
    pub description: Text<String>,
    pub form_id: Option<Text<Uuid>>,
}

#[instrument(skip_all)]
pub async fn create_project(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<ProjectMultipart>,
) -> Result<impl Responder, AppError> {
    let form_id = form.form_id.as_ref().map(|t| t.0).unwrap_or_else(Uuid::new_v4);
    let image = read_image(form.image).await?;

    let create_form = ProjectCreateForm {
        title: form.title.into_inner(),
        technologies: form.technologies.into_inner(),
        difficulty: form.difficulty.into_inner(),
        image,
        figma_url: form.figma_url.into_inner(),
        brief: form.brief.into_inner(),
        description: form.description.into_inner(),
    };

    let outcome = state.submissions.create(form_id, create_form).await?;
    Ok(respond(outcome))
}

#[instrument(skip_all, fields(project_id = %id))]
pub async fn update_project(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    MultipartForm(form): MultipartForm<ProjectMultipart>,
) -> Result<impl Responder, AppError> {
    let project_id = id.into_inner();

    let current = state
        .submissions
        .project_repo
        .get_challenge(&project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Projeto não encontrado".to_string()))?;

    let form_id = form.form_id.as_ref().map(|t| t.0).unwrap_or_else(Uuid::new_v4);
    let image = read_image(form.image).await?;

    let update_form = ProjectUpdateForm {
        title: form.title.into_inner(),
        technologies: form.technologies.into_inner(),
        difficulty: form.difficulty.into_inner(),
        image,
        figma_url: form.figma_url.into_inner(),
        brief: form.brief.into_inner(),
        description: form.description.into_inner(),
    };

    let outcome = state.submissions.update(form_id, update_form, &current).await?;
    Ok(respond(outcome))
}

/// A file input left empty still arrives as a zero-byte part; both that and
/// a missing part mean "no new image".
async fn read_image(file: Option<TempFile>) -> Result<Option<ImageFile>, AppError> {
    let Some(file) = file else {
        return Ok(None);
    };
    if file.size == 0 {
        return Ok(None);
    }

    let bytes = tokio::fs::read(file.file.path())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read uploaded file: {}", e)))?;

    let content_type = file.content_type.as_ref().map(|m| m.to_string());
    let file_name = file.file_name.clone().unwrap_or_else(|| "upload".to_string());

    Ok(Some(ImageFile::new(file_name, content_type, bytes)))
}

fn respond(outcome: SubmissionOutcome) -> HttpResponse {
    let status = match outcome.status {
        SubmissionStatus::Created => StatusCode::CREATED,
        SubmissionStatus::Updated => StatusCode::OK,
        SubmissionStatus::Rejected => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionStatus::Failed => StatusCode::BAD_GATEWAY,
    };

    HttpResponse::build(status).json(outcome)
}
