//! Flashcards for study-tracker
//!
//! This module provides:
//! - Flashcard records scoped under a module
//! - A linear review session over the cards of several modules

pub mod models;
pub mod session;

pub use models::*;
pub use session::{Judgment, LoadTicket, ReviewPhase, ReviewSession};
