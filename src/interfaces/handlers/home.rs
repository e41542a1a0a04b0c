use actix_web::{get, HttpResponse, Responder};

use crate::constants::{SITE_DESCRIPTION, SITE_TITLE};
use crate::use_cases::extractors::Session;

/// Shell view: site metadata plus the resolved session user for the header.
#[get("/")]
pub async fn home(session: Session) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "title": SITE_TITLE,
        "description": SITE_DESCRIPTION,
        "version": env!("CARGO_PKG_VERSION"),
        "user": session.user(),
    }))
}
