//! Personal study tracker
//!
//! Tracks the modules of a degree programme per signed-in user: status,
//! assessment month, attached files and links, flashcards for review, and a
//! calendar of assessments and revision periods. Durable records live in a
//! [`remote::RemoteStore`] (a Firebase project or a local directory).

pub mod app;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod flashcards;
pub mod remote;
pub mod timeline;

pub use app::{AppError, AppState, StudyApp};
pub use config::AppConfig;
