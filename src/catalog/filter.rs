//! Facet filtering for the module listing

use std::fmt;
use std::str::FromStr;

use super::models::{Difficulty, Module, ModuleStatus, ParseFieldError};

/// One filter facet: either unconstrained or a single required value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet<T> {
    All,
    Only(T),
}

impl<T> Default for Facet<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Facet<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(required) => required == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Facet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

impl<T> FromStr for Facet<T>
where
    T: FromStr<Err = ParseFieldError>,
{
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Level facet values go through this newtype so they parse with the same
/// error type as the other facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level(pub u8);

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.0)
    }
}

impl FromStr for Level {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("Level ")
            .or_else(|| trimmed.strip_prefix("level "))
            .unwrap_or(trimmed);
        digits
            .trim()
            .parse()
            .map(Level)
            .map_err(|_| ParseFieldError::Level(s.to_string()))
    }
}

/// Status, difficulty and level facets, combined with logical AND
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub status: Facet<ModuleStatus>,
    pub difficulty: Facet<Difficulty>,
    pub level: Facet<Level>,
}

impl FilterSpec {
    pub fn is_unconstrained(&self) -> bool {
        matches!(
            (self.status, self.difficulty, self.level),
            (Facet::All, Facet::All, Facet::All)
        )
    }

    pub fn matches(&self, module: &Module) -> bool {
        self.status.accepts(&module.status)
            && self.difficulty.accepts(&module.difficulty)
            && self.level.accepts(&Level(module.level))
    }
}

/// Modules passing every constrained facet, in input order
pub fn filter(modules: &[Module], spec: &FilterSpec) -> Vec<Module> {
    modules
        .iter()
        .filter(|module| spec.matches(module))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry::default_modules;

    #[test]
    fn test_unconstrained_filter_is_identity() {
        let modules = default_modules();
        let spec = FilterSpec::default();
        assert!(spec.is_unconstrained());
        assert_eq!(filter(&modules, &spec), modules);
        assert!(filter(&[], &spec).is_empty());
    }

    #[test]
    fn test_each_facet_matches_exactly() {
        let mut modules = default_modules();
        modules[1].status = ModuleStatus::InProgress;
        modules[2].status = ModuleStatus::Completed;

        let specs = [
            FilterSpec {
                status: Facet::Only(ModuleStatus::InProgress),
                ..FilterSpec::default()
            },
            FilterSpec {
                difficulty: Facet::Only(Difficulty::Hard),
                level: Facet::Only(Level(5)),
                ..FilterSpec::default()
            },
            FilterSpec {
                status: Facet::Only(ModuleStatus::Upcoming),
                difficulty: Facet::Only(Difficulty::Custom),
                level: Facet::Only(Level(6)),
            },
        ];

        for spec in &specs {
            let result = filter(&modules, spec);
            for module in &modules {
                let expected = spec.status.accepts(&module.status)
                    && spec.difficulty.accepts(&module.difficulty)
                    && spec.level.accepts(&Level(module.level));
                assert_eq!(result.contains(module), expected, "{} under {:?}", module.id, spec);
            }
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let modules = default_modules();
        let spec = FilterSpec {
            level: Facet::Only(Level(4)),
            ..FilterSpec::default()
        };
        let level_four = filter(&modules, &spec);
        let ids: Vec<&str> = level_four.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["CM1005", "CM1010", "CM1015", "CM1020", "CM1025", "CM1030", "CM1035", "CM1040"]
        );

        let hard_level_five = FilterSpec {
            difficulty: Facet::Only(Difficulty::Hard),
            level: Facet::Only(Level(5)),
            ..FilterSpec::default()
        };
        let ids: Vec<String> = filter(&modules, &hard_level_five)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["CM2005", "CM2045"]);
    }

    #[test]
    fn test_facet_parsing() {
        assert_eq!("All".parse::<Facet<ModuleStatus>>(), Ok(Facet::All));
        assert_eq!("all".parse::<Facet<Level>>(), Ok(Facet::All));
        assert_eq!("5".parse::<Facet<Level>>(), Ok(Facet::Only(Level(5))));
        assert_eq!(
            "Completed".parse::<Facet<ModuleStatus>>(),
            Ok(Facet::Only(ModuleStatus::Completed))
        );
        assert!("Impossible".parse::<Facet<Difficulty>>().is_err());
        assert!("four".parse::<Facet<Level>>().is_err());
    }
}
