pub mod config;
pub mod download;
pub mod http;
pub mod middleware;
pub mod repositories;
pub mod speech;
