//! Assure Health backend: account sign-up, email verification, login and
//! profile management over a JSON HTTP API.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod repositories;
pub mod services;
pub mod utils;
