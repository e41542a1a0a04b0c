pub mod challenges;
pub mod home;
pub mod projects;
pub mod system;
