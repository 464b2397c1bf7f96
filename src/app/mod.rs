//! Signed-in application: state snapshots and the flows that change them

pub mod controller;
pub mod state;

pub use controller::{AppError, Result, StudyApp};
pub use state::AppState;
