//! Derived views over the module list
//!
//! - Semester grouping for the module listing (filtered list)
//! - Year grouping, revision periods and calendar events for the timeline
//!   (unfiltered list)

pub mod events;
pub mod grouping;
pub mod revision;

pub use events::{build_events, timeline_events, TimelineEvent};
pub use grouping::{
    group_by_semester, group_by_year, semester_label, ModuleGroup, SemesterGroups,
    UNSCHEDULED_LABEL,
};
pub use revision::{synthesize, synthesize_now, RevisionPeriod};
