//! Immutable application state snapshots
//!
//! Views render from an [`AppState`]; every mutation produces a new snapshot
//! rather than editing one in place, so a failed remote write can restore the
//! snapshot it started from.

use chrono::NaiveDate;

use crate::catalog::{filter, FilterSpec, Module, ModulePatch};
use crate::dashboard::Progress;
use crate::remote::Identity;
use crate::timeline::{group_by_semester, timeline_events, SemesterGroups, TimelineEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    identity: Option<Identity>,
    modules: Vec<Module>,
}

impl AppState {
    /// No identity: nothing is loaded and every view gates on sign-in
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity, modules: Vec<Module>) -> Self {
        Self {
            identity: Some(identity),
            modules,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Lookup for a detail view; `None` renders as "not found"
    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Snapshot with `patch` merged into one module
    pub fn with_patch(&self, module_id: &str, patch: &ModulePatch) -> Self {
        Self {
            identity: self.identity.clone(),
            modules: self
                .modules
                .iter()
                .map(|m| if m.id == module_id { m.patched(patch) } else { m.clone() })
                .collect(),
        }
    }

    /// Snapshot with a re-read module record replacing the one with its id
    pub fn with_module(&self, module: Module) -> Self {
        let mut modules = self.modules.clone();
        match modules.iter_mut().find(|m| m.id == module.id) {
            Some(existing) => *existing = module,
            None => modules.push(module),
        }
        Self {
            identity: self.identity.clone(),
            modules,
        }
    }

    // ==================== Derived views ====================

    pub fn filtered(&self, spec: &FilterSpec) -> Vec<Module> {
        filter(&self.modules, spec)
    }

    /// Module listing: filtered, then grouped by semester
    pub fn semester_groups(&self, spec: &FilterSpec) -> SemesterGroups {
        group_by_semester(&self.filtered(spec))
    }

    /// Timeline over every module, ignoring listing filters
    pub fn timeline(&self, today: NaiveDate) -> Vec<TimelineEvent> {
        timeline_events(&self.modules, today)
    }

    pub fn progress(&self) -> Progress {
        Progress::from_modules(&self.modules)
    }
}
