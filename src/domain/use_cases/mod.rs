pub mod challenge;
pub mod extractors;
pub mod submission;
