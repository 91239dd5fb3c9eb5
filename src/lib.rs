pub mod access;
pub mod analytics;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod feed;
pub mod session;
