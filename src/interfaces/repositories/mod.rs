pub mod images;
pub mod projects;
pub mod session;
