pub mod api;
pub mod upload;
pub mod utils;
