//! Dashboard widgets
//!
//! - Progress summary over the module statuses
//! - A work/break pomodoro countdown

pub mod pomodoro;
pub mod progress;

pub use pomodoro::{Pomodoro, PomodoroMode, BREAK_MINUTES, WORK_MINUTES};
pub use progress::Progress;
