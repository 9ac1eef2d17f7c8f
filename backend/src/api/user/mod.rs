//! Module for user profile API endpoints.
//!
//! This module handles the authenticated account's own profile changes and
//! the administrator listing of all accounts.

pub mod handlers;
pub mod models;
pub mod routes;
