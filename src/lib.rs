mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{api, upload, utils};

use api::projects::RestProjectRepo;
use api::session::HttpSessionClient;
use upload::images::HttpImageStore;
use use_cases::challenge::ChallengeHandler;
use use_cases::submission::SubmissionHandler;

pub struct AppState {
    pub submissions: AppSubmissionHandler,
    pub challenges: AppChallengeHandler,
    pub sessions: Option<HttpSessionClient>,
}

pub type AppSubmissionHandler = SubmissionHandler<RestProjectRepo, HttpImageStore>;
pub type AppChallengeHandler = ChallengeHandler<RestProjectRepo>;

impl AppState {
    pub fn new(config: &settings::AppConfig, client: reqwest::Client) -> Self {
        let project_repo = RestProjectRepo::new(client.clone(), &config.backend_api_url);
        let image_store = HttpImageStore::new(client.clone(), &config.upload_base_url);

        let sessions = config
            .auth_session_url
            .as_ref()
            .map(|url| HttpSessionClient::new(client, url));

        AppState {
            submissions: SubmissionHandler::new(project_repo.clone(), image_store),
            challenges: ChallengeHandler::new(project_repo),
            sessions,
        }
    }
}
