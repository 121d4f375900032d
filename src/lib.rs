pub mod analytics;
pub mod cache;
pub mod config;
pub mod copper;
pub mod error;
pub mod fallback;
pub mod http;
pub mod mailerlite;
pub mod routes;
pub mod segments;
pub mod services;
pub mod social;
pub mod state;
pub mod templates;
pub mod types;
