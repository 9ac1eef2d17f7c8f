//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the user profile endpoints
//! and the service-level routes, excluding core authentication routes which
//! are handled separately in `auth`.

pub mod common;
pub mod system;
pub mod user;
