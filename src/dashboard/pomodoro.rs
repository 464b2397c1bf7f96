//! Pomodoro countdown
//!
//! The timer owns no clock. Callers invoke [`Pomodoro::tick`] once a second
//! while it is running; reaching 00:00 flips between work and break and
//! stops the countdown.

use std::fmt;

use serde::Serialize;

pub const WORK_MINUTES: u32 = 25;
pub const BREAK_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroMode {
    Work,
    Break,
}

impl PomodoroMode {
    pub fn minutes(&self) -> u32 {
        match self {
            Self::Work => WORK_MINUTES,
            Self::Break => BREAK_MINUTES,
        }
    }

    fn other(&self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }
}

impl fmt::Display for PomodoroMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Work => f.pad("Work"),
            Self::Break => f.pad("Break"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pomodoro {
    mode: PomodoroMode,
    remaining_secs: u32,
    active: bool,
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new()
    }
}

impl Pomodoro {
    /// Stopped, at the start of a work period
    pub fn new() -> Self {
        Self::stopped(PomodoroMode::Work)
    }

    fn stopped(mode: PomodoroMode) -> Self {
        Self {
            mode,
            remaining_secs: mode.minutes() * 60,
            active: false,
        }
    }

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Start or pause
    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    /// Stop and rewind the current mode
    pub fn reset(&mut self) {
        *self = Self::stopped(self.mode);
    }

    /// Stop and switch to `mode` at its full length
    pub fn set_mode(&mut self, mode: PomodoroMode) {
        *self = Self::stopped(mode);
    }

    /// Advance one second. Returns the new mode when the countdown finished.
    pub fn tick(&mut self) -> Option<PomodoroMode> {
        if !self.active {
            return None;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            return None;
        }
        let next = self.mode.other();
        *self = Self::stopped(next);
        log::debug!("Pomodoro switched to {}", next);
        Some(next)
    }
}

/// `MM:SS`
impl fmt::Display for Pomodoro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_stopped_at_work() {
        let timer = Pomodoro::new();
        assert_eq!(timer.mode(), PomodoroMode::Work);
        assert!(!timer.is_active());
        assert_eq!(timer.to_string(), "25:00");
    }

    #[test]
    fn test_tick_only_while_active() {
        let mut timer = Pomodoro::new();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 1500);

        timer.toggle();
        timer.tick();
        assert_eq!(timer.to_string(), "24:59");

        timer.toggle();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 1499);
    }

    #[test]
    fn test_finishing_switches_mode_and_stops() {
        let mut timer = Pomodoro::new();
        timer.toggle();
        for _ in 0..1500 {
            assert_eq!(timer.tick(), None);
        }
        assert_eq!(timer.to_string(), "00:00");

        assert_eq!(timer.tick(), Some(PomodoroMode::Break));
        assert!(!timer.is_active());
        assert_eq!(timer.to_string(), "05:00");
    }

    #[test]
    fn test_reset_and_set_mode() {
        let mut timer = Pomodoro::new();
        timer.set_mode(PomodoroMode::Break);
        timer.toggle();
        timer.tick();
        timer.reset();
        assert_eq!(timer.mode(), PomodoroMode::Break);
        assert!(!timer.is_active());
        assert_eq!(timer.remaining_secs(), 300);

        timer.set_mode(PomodoroMode::Work);
        assert_eq!(timer.remaining_secs(), 1500);
    }
}
