pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod files;
pub mod logger;
pub mod play;
