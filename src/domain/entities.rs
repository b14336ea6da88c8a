pub mod application;
pub mod job;
pub mod matching;
pub mod token;
pub mod user;
