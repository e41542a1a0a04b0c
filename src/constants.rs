use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Field declaration order of the project forms. Validation errors are
/// surfaced to the user first-match in this order.
pub const FIELD_ORDER: [&str; 7] = [
    "title",
    "technologies",
    "difficulty",
    "image",
    "figma_url",
    "brief",
    "description",
];

/// Accepted difficulty level names, as displayed to users.
pub const DIFFICULTY_LEVELS: [&str; 3] = ["Iniciante", "Intermediário", "Avançado"];

pub const FIGMA_EMBED_URL: &str = "https://www.figma.com/embed";
pub const FIGMA_EMBED_HOST: &str = "astra";

/// Upper bound for uploaded challenge images.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const SITE_TITLE: &str = "DraftCode";
pub const SITE_DESCRIPTION: &str = "DraftCode é uma plataforma de desafios de programação.";
