//! Cookie-based JWT authentication backend for the Plan Your Perfect Day app.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;
