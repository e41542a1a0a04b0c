use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::entities::form::{first_field_error, ImageFile, ProjectCreateForm, ProjectUpdateForm};
use crate::entities::notification::Notification;
use crate::entities::project::{HostedImage, Project, ProjectFields, ProjectPayload};
use crate::errors::{AppError, FieldError};
use crate::repositories::images::ImageStore;
use crate::repositories::projects::ProjectRepository;

const CREATE_ERROR_TITLE: &str = "Erro ao criar projeto";
const UPDATE_ERROR_TITLE: &str = "Erro ao atualizar projeto";
const RETRY_MESSAGE: &str = "Verifique os campos e tente novamente";

/// Orchestrates project submission: validation, conditional image upload,
/// conditional deletion of a replaced image, and persistence through the
/// backend API. Create and update share one submission routine; only the
/// image plan and the persistence target differ.
pub struct SubmissionHandler<R, S>
where
    R: ProjectRepository,
    S: ImageStore,
{
    pub project_repo: R,
    pub image_store: S,
    in_flight: DashMap<Uuid, ()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Created,
    Updated,
    Rejected,
    Failed,
}

/// What the form UI needs to know after a submission attempt. Network
/// failures are absorbed here as `Failed` outcomes; they never escape as
/// errors to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub status: SubmissionStatus,
    pub notification: Notification,
    pub reset_form: bool,
    pub refresh_view: bool,
    pub project: Option<Project>,
}

impl SubmissionOutcome {
    fn created(project: Project) -> Self {
        SubmissionOutcome {
            status: SubmissionStatus::Created,
            notification: Notification::success(
                "Projeto criado com sucesso",
                "Seu projeto foi criado com sucesso",
            ),
            reset_form: true,
            refresh_view: false,
            project: Some(project),
        }
    }

    fn updated(project: Project) -> Self {
        SubmissionOutcome {
            status: SubmissionStatus::Updated,
            notification: Notification::success(
                "Projeto atualizado com sucesso",
                "Seu projeto foi atualizado com sucesso",
            ),
            reset_form: true,
            refresh_view: true,
            project: Some(project),
        }
    }

    fn rejected(title: &str, first: FieldError) -> Self {
        SubmissionOutcome {
            status: SubmissionStatus::Rejected,
            notification: Notification::destructive(title, first.message),
            reset_form: false,
            refresh_view: false,
            project: None,
        }
    }

    fn failed(title: &str) -> Self {
        SubmissionOutcome {
            status: SubmissionStatus::Failed,
            notification: Notification::destructive(title, RETRY_MESSAGE),
            reset_form: false,
            refresh_view: false,
            project: None,
        }
    }
}

enum ImagePlan {
    /// Create path: a fresh file must be hosted first.
    Upload(ImageFile),
    /// Update path with a new file: host it, then best-effort delete the
    /// replaced image.
    Replace { file: ImageFile, prior: HostedImage },
    /// Update path without a new file: reuse the hosted image untouched.
    Keep(HostedImage),
}

enum Target {
    Create,
    Update(Uuid),
}

impl<R, S> SubmissionHandler<R, S>
where
    R: ProjectRepository,
    S: ImageStore,
{
    pub fn new(project_repo: R, image_store: S) -> Self {
        SubmissionHandler {
            project_repo,
            image_store,
            in_flight: DashMap::new(),
        }
    }

    /// Create flow. Validation happens before the submitting slot is taken
    /// and before any network call; a rejected form costs nothing upstream.
    pub async fn create(
        &self,
        form_id: Uuid,
        form: ProjectCreateForm,
    ) -> Result<SubmissionOutcome, AppError> {
        if let Err(errors) = form.validate() {
            return Ok(SubmissionOutcome::rejected(
                CREATE_ERROR_TITLE,
                first_field_error(&errors),
            ));
        }

        let _slot = self.begin(form_id)?;

        let Some(file) = form.image.clone() else {
            return Err(AppError::InternalError(
                "create form passed validation without an image".to_string(),
            ));
        };

        Ok(self
            .submit(form.fields(), ImagePlan::Upload(file), Target::Create)
            .await)
    }

    /// Update flow. A missing or empty file means the current hosted image
    /// stays in place and no image service call is made at all.
    pub async fn update(
        &self,
        form_id: Uuid,
        form: ProjectUpdateForm,
        current: &Project,
    ) -> Result<SubmissionOutcome, AppError> {
        if let Err(errors) = form.validate() {
            return Ok(SubmissionOutcome::rejected(
                UPDATE_ERROR_TITLE,
                first_field_error(&errors),
            ));
        }

        let _slot = self.begin(form_id)?;

        let plan = match form.image.clone() {
            Some(file) if !file.is_empty() => ImagePlan::Replace {
                file,
                prior: current.hosted_image(),
            },
            _ => ImagePlan::Keep(current.hosted_image()),
        };

        Ok(self
            .submit(form.fields(), plan, Target::Update(current.id))
            .await)
    }

    pub fn is_submitting(&self, form_id: &Uuid) -> bool {
        self.in_flight.contains_key(form_id)
    }

    async fn submit(&self, fields: ProjectFields, plan: ImagePlan, target: Target) -> SubmissionOutcome {
        match self.persist(fields, plan, &target).await {
            Ok(project) => match target {
                Target::Create => SubmissionOutcome::created(project),
                Target::Update(_) => SubmissionOutcome::updated(project),
            },
            Err(e) => {
                tracing::warn!("Project submission failed: {}", e);
                let title = match target {
                    Target::Create => CREATE_ERROR_TITLE,
                    Target::Update(_) => UPDATE_ERROR_TITLE,
                };
                SubmissionOutcome::failed(title)
            }
        }
    }

    async fn persist(
        &self,
        fields: ProjectFields,
        plan: ImagePlan,
        target: &Target,
    ) -> Result<Project, AppError> {
        let (hosted, superseded) = match plan {
            ImagePlan::Upload(file) => (self.image_store.upload(&file).await?, None),
            ImagePlan::Replace { file, prior } => {
                (self.image_store.upload(&file).await?, Some(prior))
            }
            ImagePlan::Keep(existing) => (existing, None),
        };

        // The replaced image is deleted only after the new one is confirmed
        // hosted, and only when it really is a different object. Deletion is
        // best effort: a leaked hosted image must not fail the update.
        if let Some(prior) = superseded {
            if hosted.public_id != prior.public_id {
                if let Err(e) = self.image_store.delete(&prior.public_id).await {
                    tracing::warn!(
                        "Failed to delete superseded image {}: {}",
                        prior.public_id,
                        e
                    );
                }
            }
        }

        let payload = ProjectPayload::new(fields, hosted);

        match target {
            Target::Create => self.project_repo.create_project(&payload).await,
            Target::Update(id) => self.project_repo.update_project(id, &payload).await,
        }
    }

    /// One submission per form instance at a time. The slot is released by
    /// `SubmitSlot::drop` on every exit path, success or failure.
    fn begin(&self, form_id: Uuid) -> Result<SubmitSlot<'_>, AppError> {
        if self.in_flight.insert(form_id, ()).is_some() {
            return Err(AppError::Conflict(
                "Já existe um envio em andamento para este formulário".to_string(),
            ));
        }
        Ok(SubmitSlot {
            slots: &self.in_flight,
            key: form_id,
        })
    }
}

struct SubmitSlot<'a> {
    slots: &'a DashMap<Uuid, ()>,
    key: Uuid,
}

impl Drop for SubmitSlot<'_> {
    fn drop(&mut self) {
        self.slots.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    use crate::repositories::images::MockImageStore;
    use crate::repositories::projects::MockProjectRepository;

    type TestHandler = SubmissionHandler<MockProjectRepository, MockImageStore>;

    fn png_image() -> ImageFile {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52]);
        ImageFile::new("preview.png", Some("image/png".to_string()), bytes)
    }

    fn valid_create_form() -> ProjectCreateForm {
        ProjectCreateForm {
            title: "Login Form Challenge".to_string(),
            technologies: "html css javascript".to_string(),
            difficulty: "Iniciante".to_string(),
            image: Some(png_image()),
            figma_url: "https://www.figma.com/file/abc123".to_string(),
            brief: "Um form de login".to_string(),
            description: "Crie um formulário de login responsivo.".to_string(),
        }
    }

    fn valid_update_form(image: Option<ImageFile>) -> ProjectUpdateForm {
        let create = valid_create_form();
        ProjectUpdateForm {
            title: create.title,
            technologies: create.technologies,
            difficulty: create.difficulty,
            image,
            figma_url: create.figma_url,
            brief: create.brief,
            description: create.description,
        }
    }

    fn existing_project() -> Project {
        Project {
            id: Uuid::new_v4(),
            title: "Login Form Challenge".to_string(),
            brief: "Um form de login".to_string(),
            description: "Crie um formulário de login responsivo.".to_string(),
            image: "https://images.test/old.png".to_string(),
            image_id: "img_old".to_string(),
            figma_url: "https://www.figma.com/file/abc123".to_string(),
            difficulty: None,
            technologies: vec![],
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn persisted(payload: &ProjectPayload) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: payload.title.clone(),
            brief: payload.brief.clone(),
            description: payload.description.clone(),
            image: payload.image.clone(),
            image_id: payload.image_id.clone(),
            figma_url: payload.figma_url.clone(),
            difficulty: None,
            technologies: vec![],
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[actix_rt::test]
    async fn create_with_short_title_makes_no_network_calls() {
        // No expectations set: any repo or image call would panic.
        let handler = TestHandler::new(MockProjectRepository::new(), MockImageStore::new());

        let mut form = valid_create_form();
        form.title = "abc".to_string();

        let outcome = handler.create(Uuid::new_v4(), form).await.unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Rejected);
        assert!(outcome.notification.is_destructive());
        assert!(outcome.notification.description.contains("entre 6 e 45"));
        assert!(!outcome.reset_form);
    }

    #[actix_rt::test]
    async fn create_uploads_image_then_persists_merged_payload() {
        let mut repo = MockProjectRepository::new();
        let mut images = MockImageStore::new();
        let mut seq = Sequence::new();

        images
            .expect_upload()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(HostedImage {
                    url: "https://images.test/new.png".to_string(),
                    public_id: "img_new".to_string(),
                })
            });

        repo.expect_create_project()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|payload| {
                payload.title == "Login Form Challenge"
                    && payload.technologies == "html css javascript"
                    && payload.difficulty == "Iniciante"
                    && payload.image == "https://images.test/new.png"
                    && payload.image_id == "img_new"
            })
            .returning(|payload| Ok(persisted(payload)));

        let handler = TestHandler::new(repo, images);
        let outcome = handler
            .create(Uuid::new_v4(), valid_create_form())
            .await
            .unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Created);
        assert!(!outcome.notification.is_destructive());
        assert!(outcome.reset_form);
        assert_eq!(outcome.project.unwrap().image_id, "img_new");
    }

    #[actix_rt::test]
    async fn upload_failure_skips_persistence_and_clears_slot() {
        let repo = MockProjectRepository::new();
        let mut images = MockImageStore::new();

        images
            .expect_upload()
            .times(1)
            .returning(|_| Err(AppError::UploadFailed("503 from image host".to_string())));

        let handler = TestHandler::new(repo, images);
        let form_id = Uuid::new_v4();
        let outcome = handler.create(form_id, valid_create_form()).await.unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Failed);
        assert_eq!(
            outcome.notification.description,
            "Verifique os campos e tente novamente"
        );
        assert!(!handler.is_submitting(&form_id));
    }

    #[actix_rt::test]
    async fn backend_failure_is_absorbed_as_failure_outcome() {
        let mut repo = MockProjectRepository::new();
        let mut images = MockImageStore::new();

        images.expect_upload().times(1).returning(|_| {
            Ok(HostedImage {
                url: "https://images.test/new.png".to_string(),
                public_id: "img_new".to_string(),
            })
        });
        repo.expect_create_project()
            .times(1)
            .returning(|_| Err(AppError::ServiceError("backend unreachable".to_string())));

        let handler = TestHandler::new(repo, images);
        let form_id = Uuid::new_v4();
        let outcome = handler.create(form_id, valid_create_form()).await.unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Failed);
        assert_eq!(outcome.notification.title, "Erro ao criar projeto");
        assert!(!handler.is_submitting(&form_id));
    }

    #[actix_rt::test]
    async fn update_without_new_image_keeps_prior_image_untouched() {
        let mut repo = MockProjectRepository::new();
        let images = MockImageStore::new();
        let current = existing_project();
        let current_id = current.id;

        repo.expect_update_project()
            .times(1)
            .withf(move |id, payload| {
                *id == current_id
                    && payload.image == "https://images.test/old.png"
                    && payload.image_id == "img_old"
            })
            .returning(|_, payload| Ok(persisted(payload)));

        let handler = TestHandler::new(repo, images);
        let outcome = handler
            .update(Uuid::new_v4(), valid_update_form(None), &current)
            .await
            .unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Updated);
        assert!(outcome.refresh_view);
        assert_eq!(outcome.project.unwrap().image_id, "img_old");
    }

    #[actix_rt::test]
    async fn resubmitting_unchanged_update_is_idempotent() {
        let mut repo = MockProjectRepository::new();
        let images = MockImageStore::new();
        let current = existing_project();

        repo.expect_update_project()
            .times(2)
            .withf(|_, payload| payload.image_id == "img_old")
            .returning(|_, payload| Ok(persisted(payload)));

        let handler = TestHandler::new(repo, images);
        for _ in 0..2 {
            let outcome = handler
                .update(Uuid::new_v4(), valid_update_form(None), &current)
                .await
                .unwrap();
            assert_eq!(outcome.status, SubmissionStatus::Updated);
        }
    }

    #[actix_rt::test]
    async fn update_with_new_image_deletes_prior_after_upload() {
        let mut repo = MockProjectRepository::new();
        let mut images = MockImageStore::new();
        let mut seq = Sequence::new();
        let current = existing_project();

        images
            .expect_upload()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(HostedImage {
                    url: "https://images.test/new.png".to_string(),
                    public_id: "img_new".to_string(),
                })
            });

        images
            .expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|public_id| public_id == "img_old")
            .returning(|_| Ok(()));

        repo.expect_update_project()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|_, payload| payload.image_id == "img_new")
            .returning(|_, payload| Ok(persisted(payload)));

        let handler = TestHandler::new(repo, images);
        let outcome = handler
            .update(Uuid::new_v4(), valid_update_form(Some(png_image())), &current)
            .await
            .unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Updated);
    }

    #[actix_rt::test]
    async fn update_skips_delete_when_service_returns_same_id() {
        let mut repo = MockProjectRepository::new();
        let mut images = MockImageStore::new();
        let current = existing_project();

        // Upload dedup on the image host can hand back the same public id;
        // deleting it would destroy the image still in use.
        images.expect_upload().times(1).returning(|_| {
            Ok(HostedImage {
                url: "https://images.test/old.png".to_string(),
                public_id: "img_old".to_string(),
            })
        });
        repo.expect_update_project()
            .times(1)
            .returning(|_, payload| Ok(persisted(payload)));

        let handler = TestHandler::new(repo, images);
        let outcome = handler
            .update(Uuid::new_v4(), valid_update_form(Some(png_image())), &current)
            .await
            .unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Updated);
    }

    #[actix_rt::test]
    async fn failed_delete_of_replaced_image_does_not_abort_update() {
        let mut repo = MockProjectRepository::new();
        let mut images = MockImageStore::new();
        let current = existing_project();

        images.expect_upload().times(1).returning(|_| {
            Ok(HostedImage {
                url: "https://images.test/new.png".to_string(),
                public_id: "img_new".to_string(),
            })
        });
        images
            .expect_delete()
            .times(1)
            .returning(|_| Err(AppError::ServiceError("delete timed out".to_string())));
        repo.expect_update_project()
            .times(1)
            .returning(|_, payload| Ok(persisted(payload)));

        let handler = TestHandler::new(repo, images);
        let outcome = handler
            .update(Uuid::new_v4(), valid_update_form(Some(png_image())), &current)
            .await
            .unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Updated);
        assert!(!outcome.notification.is_destructive());
    }

    #[actix_rt::test]
    async fn submitting_slot_blocks_duplicate_submission() {
        let handler = TestHandler::new(MockProjectRepository::new(), MockImageStore::new());
        let form_id = Uuid::new_v4();

        let slot = handler.begin(form_id).unwrap();
        assert!(handler.is_submitting(&form_id));
        assert!(matches!(handler.begin(form_id), Err(AppError::Conflict(_))));

        drop(slot);
        assert!(!handler.is_submitting(&form_id));
        assert!(handler.begin(form_id).is_ok());
    }
}
