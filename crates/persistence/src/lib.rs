//! Persistence layer for the configuration service.
//!
//! This crate contains:
//! - Database connection management
//! - Row entity definitions (database row mappings)
//! - Postgres implementations of the entity store contract

pub mod db;
pub mod entities;
pub mod metrics;
pub mod stores;
