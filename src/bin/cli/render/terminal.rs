use study_tracker_lib::catalog::{Module, ModuleStatus};
use study_tracker_lib::dashboard::Progress;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn status_color(status: ModuleStatus) -> &'static str {
    match status {
        ModuleStatus::Completed => Color::MAGENTA,
        ModuleStatus::InProgress => Color::CYAN,
        ModuleStatus::Upcoming => Color::GRAY,
    }
}

/// One listing line: `CM1005 – Title  [Status]  Easy  ~4h`
pub fn module_line(module: &Module, use_color: bool) -> String {
    let status = format!("{:<13}", format!("[{}]", module.status));
    format!(
        "{:<55} {} {:<7} {}",
        truncate(&module.name, 55),
        paint(&status, status_color(module.status), use_color),
        module.difficulty,
        module.estimated_time,
    )
}

/// Completed then in-progress segments over a track of `width` cells
pub fn progress_bar(progress: &Progress, width: usize, use_color: bool) -> String {
    let cells = |percentage: f64| ((percentage / 100.0) * width as f64).round() as usize;
    let completed = cells(progress.completed_percentage).min(width);
    let in_progress = cells(progress.in_progress_percentage).min(width - completed);
    let rest = width - completed - in_progress;

    format!(
        "{}{}{}",
        paint(&"█".repeat(completed), Color::MAGENTA, use_color),
        paint(&"█".repeat(in_progress), Color::CYAN, use_color),
        paint(&"░".repeat(rest), Color::GRAY, use_color),
    )
}

/// Truncate to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
