//! Default module set used to seed an empty collection

use super::models::{Difficulty, Module, ModuleStatus, YearMonth};

/// Static description of a module in the programme
#[derive(Debug, Clone, Copy)]
pub struct SeedModule {
    pub id: &'static str,
    pub title: &'static str,
    pub level: u8,
    pub midterm: &'static str,
    pub final_assessment: &'static str,
    pub difficulty: Difficulty,
    pub estimated_time: &'static str,
    pub final_date: Option<(i32, u32)>,
}

impl SeedModule {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        id: &'static str,
        title: &'static str,
        level: u8,
        midterm: &'static str,
        final_assessment: &'static str,
        difficulty: Difficulty,
        estimated_time: &'static str,
        final_date: Option<(i32, u32)>,
    ) -> Self {
        Self {
            id,
            title,
            level,
            midterm,
            final_assessment,
            difficulty,
            estimated_time,
            final_date,
        }
    }

    pub fn to_module(&self) -> Module {
        Module {
            id: self.id.to_string(),
            name: format!("{} – {}", self.id, self.title),
            level: self.level,
            midterm: self.midterm.to_string(),
            final_assessment: self.final_assessment.to_string(),
            difficulty: self.difficulty,
            final_date: self
                .final_date
                .and_then(|(year, month)| YearMonth::new(year, month)),
            estimated_time: self.estimated_time.to_string(),
            status: ModuleStatus::Upcoming,
            files: Vec::new(),
            links: Vec::new(),
        }
    }
}

pub const SEED_MODULES: &[SeedModule] = &[
    SeedModule::new("CM1005", "Introduction to Programming I", 4, "Project (50%)", "Project (50%)", Difficulty::Easy, "4–6h", Some((2026, 1))),
    SeedModule::new("CM1010", "Introduction to Programming II", 4, "Report (30%)", "Project (70%)", Difficulty::Medium, "6–8h", Some((2026, 6))),
    SeedModule::new("CM1015", "Computational Mathematics", 4, "Written Exam (50%)", "Written Exam (50%)", Difficulty::Hard, "6–8h", Some((2026, 6))),
    SeedModule::new("CM1020", "Discrete Mathematics", 4, "Written Exam (50%)", "Written Exam (50%)", Difficulty::Hard, "6–8h", Some((2026, 6))),
    SeedModule::new("CM1025", "Fundamentals of Computer Science", 4, "Written Exam (50%)", "Written Exam (50%)", Difficulty::Medium, "6h", Some((2026, 1))),
    SeedModule::new("CM1030", "How Computers Work", 4, "RPL exemptable", "RPL exemptable", Difficulty::Easy, "2–4h", None),
    SeedModule::new("CM1035", "Algorithms and Data Structures I", 4, "Written Exam (50%)", "Written Exam (50%)", Difficulty::Medium, "6–8h", Some((2026, 1))),
    SeedModule::new("CM1040", "Web Development", 4, "Project (30%)", "Project (70%)", Difficulty::Medium, "8h+", Some((2026, 6))),
    SeedModule::new("CM2005", "Object-Oriented Programming", 5, "Project (50%)", "Project (50%)", Difficulty::Hard, "8h", Some((2027, 1))),
    SeedModule::new("CM2010", "Software Design and Development", 5, "Written Exam (50%)", "Written Exam (50%)", Difficulty::Medium, "6h", Some((2027, 6))),
    SeedModule::new("CM2015", "Programming with Data", 5, "Project (50%)", "Written Exam (50%)", Difficulty::Medium, "6–8h", Some((2027, 6))),
    SeedModule::new("CM2025", "Computer Security", 5, "Written Exam (50%)", "Written Exam (50%)", Difficulty::Medium, "6h", Some((2027, 1))),
    SeedModule::new("CM2030", "Graphics Programming", 5, "Project (50%)", "Project (50%)", Difficulty::Easy, "4h", Some((2027, 1))),
    SeedModule::new("CM2035", "Algorithms and Data Structures II", 5, "Written Exam (50%)", "Written Exam (50%)", Difficulty::Medium, "6h", Some((2027, 6))),
    SeedModule::new("CM2040", "Databases, Networks and the Web", 5, "Project (50%)", "Written Exam (50%)", Difficulty::Medium, "6h", Some((2027, 1))),
    SeedModule::new("CM2045", "Professional Practice for Computer Scientists", 5, "Project (50%)", "Written Exam (50%)", Difficulty::Hard, "6–8h", None),
    SeedModule::new("CM3005", "Data Science", 6, "Project (50%)", "Written Exam (50%)", Difficulty::Easy, "6h", Some((2028, 6))),
    SeedModule::new("CM3010", "Databases and Advanced Data Techniques", 6, "Project (50%)", "Written Exam (50%)", Difficulty::Medium, "6–8h", Some((2028, 1))),
    SeedModule::new("CM3015", "Machine Learning and Neural Networks", 6, "Project (50%)", "Project (50%)", Difficulty::Medium, "6h", Some((2028, 1))),
    SeedModule::new("CM3020", "Artificial Intelligence", 6, "Written Exam (50%)", "Written Exam (50%)", Difficulty::Medium, "6h", Some((2028, 6))),
    SeedModule::new("CM3060", "Natural Language Processing", 6, "Project (50%)", "Written Exam (50%)", Difficulty::Medium, "6–8h", Some((2028, 6))),
    SeedModule::new("CM3065", "Intelligent Signal Processing", 6, "Project (50%)", "Project (50%)", Difficulty::Hard, "6–8h", Some((2028, 1))),
    SeedModule::new("CM3070", "Final Project", 6, "Report", "Project", Difficulty::Custom, "Variable", Some((2028, 6))),
];

/// The registry as fresh module records, in programme order
pub fn default_modules() -> Vec<Module> {
    SEED_MODULES.iter().map(SeedModule::to_module).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_registry_ids_unique() {
        let modules = default_modules();
        let ids: HashSet<&str> = modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), modules.len());
        assert_eq!(modules.len(), 23);
    }

    #[test]
    fn test_registry_names_and_dates() {
        let modules = default_modules();
        assert_eq!(modules[0].name, "CM1005 – Introduction to Programming I");
        assert_eq!(modules[0].final_date, YearMonth::new(2026, 1));

        let unscheduled: Vec<&str> = modules
            .iter()
            .filter(|m| m.final_date.is_none())
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(unscheduled, vec!["CM1030", "CM2045"]);
        assert!(modules.iter().all(|m| m.status == ModuleStatus::Upcoming));
    }
}
