// Goods API - Core
//
// Backend API for the goods inventory plus a background uploader that
// publishes local videos to YouTube as Shorts.
//
// Domain code lives in domains/*; external services are reached through the
// traits in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
