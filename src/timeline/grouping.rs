//! Semester grouping for the module listing and year grouping for the
//! timeline

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Module, YearMonth};

pub const UNSCHEDULED_LABEL: &str = "Unscheduled";

/// Semester label for a final-assessment month.
///
/// July to September map to a bare "Other" with no year.
pub fn semester_label(date: YearMonth) -> String {
    match date.month() {
        10..=12 => format!("Fall {}", date.year()),
        1..=6 => format!("Spring {}", date.year()),
        _ => "Other".to_string(),
    }
}

/// Modules sharing a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleGroup {
    pub label: String,
    pub modules: Vec<Module>,
}

/// Listing layout: dated semester buckets followed by undated modules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SemesterGroups {
    pub semesters: Vec<ModuleGroup>,
    pub unscheduled: Vec<Module>,
}

impl SemesterGroups {
    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty() && self.unscheduled.is_empty()
    }

    pub fn semester(&self, label: &str) -> Option<&[Module]> {
        self.semesters
            .iter()
            .find(|group| group.label == label)
            .map(|group| group.modules.as_slice())
    }

    /// Every group in display order, with the trailing "Unscheduled" group
    /// when it has members
    pub fn display_groups(&self) -> Vec<ModuleGroup> {
        let mut groups = self.semesters.clone();
        if !self.unscheduled.is_empty() {
            groups.push(ModuleGroup {
                label: UNSCHEDULED_LABEL.to_string(),
                modules: self.unscheduled.clone(),
            });
        }
        groups
    }
}

/// Group a filtered listing by semester.
///
/// Dated modules are stably sorted by month; groups keep the order in which
/// each label first appears in that sorted sequence.
pub fn group_by_semester(filtered: &[Module]) -> SemesterGroups {
    let (mut dated, unscheduled): (Vec<Module>, Vec<Module>) = filtered
        .iter()
        .cloned()
        .partition(|module| module.final_date.is_some());

    dated.sort_by_key(|module| module.final_date);

    let mut semesters: Vec<ModuleGroup> = Vec::new();
    for module in dated {
        let Some(date) = module.final_date else {
            continue;
        };
        let label = semester_label(date);
        match semesters.iter_mut().find(|group| group.label == label) {
            Some(group) => group.modules.push(module),
            None => semesters.push(ModuleGroup {
                label,
                modules: vec![module],
            }),
        }
    }

    SemesterGroups {
        semesters,
        unscheduled,
    }
}

/// Group the full, unfiltered module list by final-assessment year.
/// Undated modules are left out.
pub fn group_by_year(modules: &[Module]) -> BTreeMap<i32, Vec<Module>> {
    let mut by_year: BTreeMap<i32, Vec<Module>> = BTreeMap::new();
    for module in modules {
        if let Some(date) = module.final_date {
            by_year.entry(date.year()).or_default().push(module.clone());
        }
    }
    by_year
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_modules, filter, FilterSpec};

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn module(id: &str, final_date: Option<&str>) -> Module {
        let mut module = default_modules().remove(0);
        module.id = id.to_string();
        module.name = id.to_string();
        module.final_date = final_date.map(ym);
        module
    }

    fn ids(modules: &[Module]) -> Vec<&str> {
        modules.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_semester_labels() {
        assert_eq!(semester_label(ym("2026-01")), "Spring 2026");
        assert_eq!(semester_label(ym("2026-06")), "Spring 2026");
        assert_eq!(semester_label(ym("2026-07")), "Other");
        assert_eq!(semester_label(ym("2026-09")), "Other");
        assert_eq!(semester_label(ym("2026-10")), "Fall 2026");
        assert_eq!(semester_label(ym("2026-11")), "Fall 2026");
    }

    #[test]
    fn test_scheduled_and_unscheduled_split() {
        let modules = vec![module("A", Some("2026-01")), module("B", None)];

        let filtered = filter(&modules, &FilterSpec::default());
        assert_eq!(ids(&filtered), vec!["A", "B"]);

        let groups = group_by_semester(&filtered);
        assert_eq!(groups.semesters.len(), 1);
        assert_eq!(ids(groups.semester("Spring 2026").unwrap()), vec!["A"]);
        assert_eq!(ids(&groups.unscheduled), vec!["B"]);

        let display = groups.display_groups();
        assert_eq!(display.last().unwrap().label, UNSCHEDULED_LABEL);
    }

    #[test]
    fn test_groups_follow_sorted_first_appearance() {
        let modules = vec![
            module("late", Some("2027-01")),
            module("summer", Some("2026-08")),
            module("fall", Some("2026-11")),
            module("spring", Some("2026-03")),
            module("also-spring", Some("2026-01")),
        ];

        let groups = group_by_semester(&modules);
        let labels: Vec<&str> = groups.semesters.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Spring 2026", "Other", "Fall 2026", "Spring 2027"]);
        assert_eq!(ids(groups.semester("Spring 2026").unwrap()), vec!["also-spring", "spring"]);
        assert!(groups.unscheduled.is_empty());
        assert!(!groups.display_groups().iter().any(|g| g.label == UNSCHEDULED_LABEL));
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let modules = vec![
            module("first", Some("2026-06")),
            module("second", Some("2026-06")),
            module("third", Some("2026-06")),
        ];
        let groups = group_by_semester(&modules);
        assert_eq!(ids(groups.semester("Spring 2026").unwrap()), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_group_by_year_drops_undated() {
        let by_year = group_by_year(&default_modules());
        assert_eq!(by_year.keys().copied().collect::<Vec<_>>(), vec![2026, 2027, 2028]);
        assert_eq!(by_year[&2026].len(), 7);
        assert_eq!(by_year[&2027].len(), 7);
        assert_eq!(by_year[&2028].len(), 7);
        assert!(group_by_semester(&[]).is_empty());
    }
}
