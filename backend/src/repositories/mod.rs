//! Persistence layer. Each repository owns the SQL for one table.

pub mod account_repository;
