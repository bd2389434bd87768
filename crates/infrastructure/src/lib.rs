pub mod dns;
pub mod jobs;
