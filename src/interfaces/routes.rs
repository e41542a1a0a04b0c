use actix_web::web;

use crate::handlers::{challenges, home::home, projects, system::health_check};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(challenges::list_challenges);
    cfg.service(challenges::get_challenge);

    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::post().to(projects::create_project))
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(projects::update_project))
            )
    );
}
