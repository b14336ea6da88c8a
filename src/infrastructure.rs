pub mod auth;
pub mod db;
pub mod gateway;
pub mod upload;
