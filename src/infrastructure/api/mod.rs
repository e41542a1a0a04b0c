pub mod projects;
pub mod session;
