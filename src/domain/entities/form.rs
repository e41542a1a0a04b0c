use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::{DIFFICULTY_LEVELS, FIELD_ORDER, MAX_IMAGE_BYTES};
use crate::errors::FieldError;

use super::project::ProjectFields;

/// An image file as extracted from the multipart form, held in memory until
/// it is handed to the upload service.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        ImageFile {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Create schema: every field required, including exactly one image file.
#[derive(Debug, Clone, Validate)]
pub struct ProjectCreateForm {
    #[validate(length(
        min = 6,
        max = 45,
        message = "Escolha um nome para o desafio entre 6 e 45 caracteres"
    ))]
    pub title: String,

    #[validate(custom(function = "validate_technologies"))]
    pub technologies: String,

    #[validate(custom(function = "validate_difficulty"))]
    pub difficulty: String,

    #[validate(
        required(message = "Insira uma imagem que demonstre o desafio"),
        custom(function = "validate_image_file")
    )]
    pub image: Option<ImageFile>,

    #[validate(url(message = "Insira um link para o figma do desafio, deve ser um link válido"))]
    pub figma_url: String,

    #[validate(length(
        min = 10,
        max = 120,
        message = "Insira uma descrição entre 10 e 120 caracteres sobre o desafio"
    ))]
    pub brief: String,

    #[validate(length(min = 1, message = "Informe os requisitos do desafio"))]
    pub description: String,
}

/// Update schema: identical to the create schema except the image may be
/// omitted, in which case the project keeps its current hosted image.
#[derive(Debug, Clone, Validate)]
pub struct ProjectUpdateForm {
    #[validate(length(
        min = 6,
        max = 45,
        message = "Escolha um nome para o desafio entre 6 e 45 caracteres"
    ))]
    pub title: String,

    #[validate(custom(function = "validate_technologies"))]
    pub technologies: String,

    #[validate(custom(function = "validate_difficulty"))]
    pub difficulty: String,

    #[validate(custom(function = "validate_image_file"))]
    pub image: Option<ImageFile>,

    #[validate(url(message = "Insira um link para o figma do desafio, deve ser um link válido"))]
    pub figma_url: String,

    #[validate(length(
        min = 10,
        max = 120,
        message = "Insira uma descrição entre 10 e 120 caracteres sobre o desafio"
    ))]
    pub brief: String,

    #[validate(length(min = 1, message = "Informe os requisitos do desafio"))]
    pub description: String,
}

impl ProjectCreateForm {
    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            title: self.title.clone(),
            technologies: self.technologies.clone(),
            difficulty: self.difficulty.clone(),
            figma_url: self.figma_url.clone(),
            brief: self.brief.clone(),
            description: self.description.clone(),
        }
    }
}

impl ProjectUpdateForm {
    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            title: self.title.clone(),
            technologies: self.technologies.clone(),
            difficulty: self.difficulty.clone(),
            figma_url: self.figma_url.clone(),
            brief: self.brief.clone(),
            description: self.description.clone(),
        }
    }
}

fn validate_technologies(value: &str) -> Result<(), ValidationError> {
    if value.split_whitespace().next().is_none() {
        return Err(new_validation_error(
            "technologies_empty",
            "Escolha uma ou mais linguagens para o desafio separadas por espaço",
        ));
    }
    Ok(())
}

fn validate_difficulty(value: &str) -> Result<(), ValidationError> {
    if !DIFFICULTY_LEVELS.contains(&value) {
        return Err(new_validation_error(
            "unknown_difficulty",
            "Escolha um nível para o desafio (Iniciante, Intermediário, Avançado)",
        ));
    }
    Ok(())
}

fn validate_image_file(file: &ImageFile) -> Result<(), ValidationError> {
    if file.is_empty() {
        return Err(new_validation_error(
            "image_empty",
            "Insira uma imagem que demonstre o desafio",
        ));
    }
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(new_validation_error(
            "image_too_large",
            "A imagem deve ter no máximo 5MB",
        ));
    }
    if !infer::is_image(&file.bytes) {
        return Err(new_validation_error(
            "not_an_image",
            "O arquivo enviado não é uma imagem válida",
        ));
    }
    Ok(())
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(std::borrow::Cow::Borrowed(msg));
    err
}

/// Deterministic ordered scan over the fixed field declaration order. Only
/// the first match is shown to the user, so the scan must not depend on the
/// hash order of the underlying error map.
pub fn first_field_error(errors: &ValidationErrors) -> FieldError {
    let map = errors.field_errors();

    for field in FIELD_ORDER {
        if let Some(list) = map.get(field) {
            if let Some(err) = list.first() {
                return FieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                };
            }
        }
    }

    FieldError {
        field: "form".to_string(),
        message: "Invalid value".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest possible valid PNG header for mime sniffing.
    pub fn png_image() -> ImageFile {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52]);
        ImageFile::new("preview.png", Some("image/png".to_string()), bytes)
    }

    pub fn valid_create_form() -> ProjectCreateForm {
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

    #[test]
    fn valid_create_form_passes() {
        assert!(valid_create_form().validate().is_ok());
    }

    #[test]
    fn short_title_fails_on_title_field() {
        let mut form = valid_create_form();
        form.title = "abc".to_string();
        let errors = form.validate().unwrap_err();
        let first = first_field_error(&errors);
        assert_eq!(first.field, "title");
        assert!(first.message.contains("entre 6 e 45"));
    }

    #[test]
    fn title_over_45_chars_fails() {
        let mut form = valid_create_form();
        form.title = "x".repeat(46);
        assert!(form.validate().is_err());
    }

    #[test]
    fn blank_technologies_fails() {
        let mut form = valid_create_form();
        form.technologies = "   ".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(first_field_error(&errors).field, "technologies");
    }

    #[test]
    fn unknown_difficulty_fails() {
        let mut form = valid_create_form();
        form.difficulty = "Expert".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(first_field_error(&errors).field, "difficulty");
    }

    #[test]
    fn create_requires_an_image() {
        let mut form = valid_create_form();
        form.image = None;
        let errors = form.validate().unwrap_err();
        assert_eq!(first_field_error(&errors).field, "image");
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let mut form = valid_create_form();
        form.image = Some(ImageFile::new(
            "notes.txt",
            Some("text/plain".to_string()),
            b"just some text".to_vec(),
        ));
        let errors = form.validate().unwrap_err();
        assert_eq!(first_field_error(&errors).field, "image");
    }

    #[test]
    fn invalid_figma_url_fails() {
        let mut form = valid_create_form();
        form.figma_url = "not-a-url".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(first_field_error(&errors).field, "figma_url");
    }

    #[test]
    fn brief_under_10_chars_fails() {
        let mut form = valid_create_form();
        form.brief = "curta".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn update_form_allows_missing_image() {
        let create = valid_create_form();
        let form = ProjectUpdateForm {
            title: create.title,
            technologies: create.technologies,
            difficulty: create.difficulty,
            image: None,
            figma_url: create.figma_url,
            brief: create.brief,
            description: create.description,
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn first_error_follows_declaration_order() {
        // title and figma_url both invalid: title must win every time.
        let mut form = valid_create_form();
        form.title = "ab".to_string();
        form.figma_url = "nope".to_string();
        for _ in 0..20 {
            let errors = form.clone().validate().unwrap_err();
            assert_eq!(first_field_error(&errors).field, "title");
        }
    }
}
