//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides sign-up, email verification and login, the bearer
//! token middleware and the role checks that guard the rest of the API.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
