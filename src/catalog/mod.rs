//! Tracked modules for study-tracker
//!
//! This module provides:
//! - The module data model (status, difficulty, schedule, files, links)
//! - The default programme registry used to seed new users
//! - Facet filtering for the module listing

pub mod filter;
pub mod models;
pub mod registry;

pub use filter::{filter, Facet, FilterSpec, Level};
pub use models::*;
pub use registry::default_modules;
