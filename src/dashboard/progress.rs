//! Progress summary over module statuses

use serde::Serialize;

use crate::catalog::{Module, ModuleStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub upcoming: usize,
    /// Share of all modules, 0.0 to 100.0
    pub completed_percentage: f64,
    pub in_progress_percentage: f64,
}

impl Progress {
    pub fn from_modules(modules: &[Module]) -> Self {
        let count = |status: ModuleStatus| modules.iter().filter(|m| m.status == status).count();
        let total = modules.len();
        let completed = count(ModuleStatus::Completed);
        let in_progress = count(ModuleStatus::InProgress);

        Self {
            total,
            completed,
            in_progress,
            upcoming: count(ModuleStatus::Upcoming),
            completed_percentage: percentage(completed, total),
            in_progress_percentage: percentage(in_progress, total),
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_modules;

    #[test]
    fn test_empty_has_zero_percentages() {
        let progress = Progress::from_modules(&[]);
        assert_eq!(progress, Progress::default());
    }

    #[test]
    fn test_counts_and_percentages() {
        let mut modules: Vec<Module> = default_modules().into_iter().take(4).collect();
        modules[0].status = ModuleStatus::Completed;
        modules[1].status = ModuleStatus::InProgress;

        let progress = Progress::from_modules(&modules);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.in_progress, 1);
        assert_eq!(progress.upcoming, 2);
        assert_eq!(progress.completed_percentage, 25.0);
        assert_eq!(progress.in_progress_percentage, 25.0);
    }
}
