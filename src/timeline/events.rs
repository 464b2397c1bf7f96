//! Calendar events for the revision timeline

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::grouping::group_by_year;
use super::revision::{synthesize, RevisionPeriod};
use crate::catalog::Module;

/// A displayable all-day revision event. `resource` points back at the
/// module so a selection can navigate to its detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub all_day: bool,
    pub resource: Module,
}

impl TimelineEvent {
    pub fn module_id(&self) -> &str {
        &self.resource.id
    }
}

/// One event per dated module whose year has a revision period, in input
/// order. Modules without a period are skipped.
pub fn build_events(
    modules: &[Module],
    periods: &BTreeMap<i32, RevisionPeriod>,
) -> Vec<TimelineEvent> {
    modules
        .iter()
        .filter_map(|module| {
            let year = module.final_date?.year();
            let period = periods.get(&year)?;
            Some(TimelineEvent {
                title: format!("Revision: {}", module.name),
                start: period.start,
                end: period.end,
                all_day: true,
                resource: module.clone(),
            })
        })
        .collect()
}

/// Year grouping, period synthesis and event building over the full module
/// list
pub fn timeline_events(modules: &[Module], today: NaiveDate) -> Vec<TimelineEvent> {
    let years: Vec<i32> = group_by_year(modules).into_keys().collect();
    let periods = synthesize(&years, today);
    build_events(modules, &periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_modules;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_event_count_matches_periods() {
        let modules = default_modules();
        let years: Vec<i32> = group_by_year(&modules).into_keys().collect();

        let today = date(2026, 10, 19);
        let periods = synthesize(&years, today);
        let events = build_events(&modules, &periods);

        let expected = modules
            .iter()
            .filter(|m| {
                m.final_date
                    .map(|d| periods.contains_key(&d.year()))
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(events.len(), expected);
        assert_eq!(events.len(), 14);
        assert!(events.iter().all(|e| e.resource.final_date.unwrap().year() != 2026));
    }

    #[test]
    fn test_event_fields() {
        let modules = default_modules();
        let events = timeline_events(&modules, date(2025, 10, 1));

        assert_eq!(events.len(), 21);
        let first = &events[0];
        assert_eq!(first.title, "Revision: CM1005 – Introduction to Programming I");
        assert_eq!(first.start, date(2025, 10, 1));
        assert_eq!(first.end, date(2026, 1, 31));
        assert!(first.all_day);
        assert_eq!(first.module_id(), "CM1005");
    }

    #[test]
    fn test_events_follow_input_order() {
        let mut modules = default_modules();
        modules.reverse();
        let events = timeline_events(&modules, date(2025, 10, 1));
        assert_eq!(events[0].module_id(), "CM3070");
        assert_eq!(events.last().unwrap().module_id(), "CM1005");
    }

    #[test]
    fn test_missing_period_is_silently_skipped() {
        let modules = default_modules();
        let events = build_events(&modules, &BTreeMap::new());
        assert!(events.is_empty());
    }
}
