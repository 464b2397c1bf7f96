//! Data models for tracked modules

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Progress of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleStatus {
    Upcoming,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Default for ModuleStatus {
    fn default() -> Self {
        Self::Upcoming
    }
}

impl ModuleStatus {
    pub const ALL: [ModuleStatus; 3] = [Self::Upcoming, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ModuleStatus {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseFieldError::Status(s.to_string())),
        }
    }
}

/// Perceived difficulty of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseFieldError::Difficulty(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFieldError {
    #[error("Invalid status: {0} (expected Upcoming, In Progress or Completed)")]
    Status(String),

    #[error("Invalid difficulty: {0} (expected Easy, Medium, Hard or Custom)")]
    Difficulty(String),

    #[error("Invalid level: {0}")]
    Level(String),

    #[error("Invalid year-month: {0} (expected YYYY-MM)")]
    YearMonth(String),
}

/// A calendar month, written `YYYY-MM`
///
/// Field order gives chronological ordering for the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Long display form, e.g. "January 2026"
    pub fn long_label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFieldError::YearMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Stored documents may carry an empty string where no date was chosen.
fn deserialize_final_date<'de, D>(deserializer: D) -> Result<Option<YearMonth>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A file attached to a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Original filename
    pub name: String,
    /// Backend-issued retrieval URL; may rotate
    pub url: String,
    /// Storage key, the durable identity of the file
    pub path: String,
}

/// An external link attached to a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    #[serde(default)]
    pub title: String,
    pub url: String,
}

impl LinkRef {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Title to show, falling back to the URL
    pub fn label(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// An academic module tracked by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Stable key, also used as the remote document id
    pub id: String,
    /// Display label, conventionally "<id> – <title>"
    pub name: String,
    pub level: u8,
    pub midterm: String,
    #[serde(rename = "final")]
    pub final_assessment: String,
    pub difficulty: Difficulty,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_final_date"
    )]
    pub final_date: Option<YearMonth>,
    pub estimated_time: String,
    #[serde(default)]
    pub status: ModuleStatus,
    #[serde(default)]
    pub files: Vec<FileRef>,
    #[serde(default)]
    pub links: Vec<LinkRef>,
}

impl Module {
    /// Apply a patch, returning the merged module
    pub fn patched(&self, patch: &ModulePatch) -> Module {
        let mut module = self.clone();
        if let Some(status) = patch.status {
            module.status = status;
        }
        if let Some(final_date) = patch.final_date {
            module.final_date = final_date;
        }
        if let Some(difficulty) = patch.difficulty {
            module.difficulty = difficulty;
        }
        if let Some(estimated_time) = &patch.estimated_time {
            module.estimated_time = estimated_time.clone();
        }
        module
    }
}

/// Partial update of a module's mutable scalar fields
///
/// `final_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePatch {
    pub status: Option<ModuleStatus>,
    pub final_date: Option<Option<YearMonth>>,
    pub difficulty: Option<Difficulty>,
    pub estimated_time: Option<String>,
}

impl ModulePatch {
    pub fn status(status: ModuleStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn final_date(final_date: Option<YearMonth>) -> Self {
        Self {
            final_date: Some(final_date),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.final_date.is_none()
            && self.difficulty.is_none()
            && self.estimated_time.is_none()
    }

    /// Document field names touched by this patch
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.status.is_some() {
            paths.push("status");
        }
        if self.final_date.is_some() {
            paths.push("finalDate");
        }
        if self.difficulty.is_some() {
            paths.push("difficulty");
        }
        if self.estimated_time.is_some() {
            paths.push("estimatedTime");
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_module() -> Module {
        Module {
            id: "CM1005".to_string(),
            name: "CM1005 – Introduction to Programming I".to_string(),
            level: 4,
            midterm: "Project (50%)".to_string(),
            final_assessment: "Project (50%)".to_string(),
            difficulty: Difficulty::Easy,
            final_date: YearMonth::new(2026, 1),
            estimated_time: "4–6h".to_string(),
            status: ModuleStatus::Upcoming,
            files: Vec::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_year_month_parse() {
        assert_eq!("2026-01".parse::<YearMonth>(), Ok(YearMonth::new(2026, 1).unwrap()));
        assert_eq!("2026-11".parse::<YearMonth>().unwrap().month(), 11);
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("2026-00".parse::<YearMonth>().is_err());
        assert!("26-01".parse::<YearMonth>().is_err());
        assert!("2026".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_ordering() {
        let a: YearMonth = "2026-06".parse().unwrap();
        let b: YearMonth = "2027-01".parse().unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "2026-06");
        assert_eq!(b.long_label(), "January 2027");
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&ModuleStatus::InProgress).unwrap(), "\"In Progress\"");
        assert_eq!("in-progress".parse::<ModuleStatus>(), Ok(ModuleStatus::InProgress));
        assert_eq!("In Progress".parse::<ModuleStatus>(), Ok(ModuleStatus::InProgress));
        assert!("done".parse::<ModuleStatus>().is_err());
    }

    #[test]
    fn test_module_document_shape() {
        let value = serde_json::to_value(sample_module()).unwrap();
        assert_eq!(value["finalDate"], "2026-01");
        assert_eq!(value["final"], "Project (50%)");
        assert_eq!(value["estimatedTime"], "4–6h");
        assert!(value.get("final_assessment").is_none());
    }

    #[test]
    fn test_module_missing_optional_fields() {
        let json = r#"{
            "id": "CM1030",
            "name": "CM1030 – How Computers Work",
            "level": 4,
            "midterm": "RPL exemptable",
            "final": "RPL exemptable",
            "difficulty": "Easy",
            "estimatedTime": "2–4h",
            "status": "Upcoming",
            "finalDate": ""
        }"#;
        let module: Module = serde_json::from_str(json).unwrap();
        assert_eq!(module.final_date, None);
        assert!(module.files.is_empty());
        assert!(module.links.is_empty());
    }

    #[test]
    fn test_patch_merge() {
        let module = sample_module();

        let patched = module.patched(&ModulePatch::status(ModuleStatus::Completed));
        assert_eq!(patched.status, ModuleStatus::Completed);
        assert_eq!(patched.final_date, module.final_date);

        let cleared = module.patched(&ModulePatch::final_date(None));
        assert_eq!(cleared.final_date, None);
        assert_eq!(cleared.status, ModuleStatus::Upcoming);

        assert!(ModulePatch::default().is_empty());
        assert_eq!(ModulePatch::final_date(None).field_paths(), vec!["finalDate"]);
    }
}
