pub mod auth;
pub mod candidate;
pub mod extractors;
pub mod profile;
pub mod recruiter;
