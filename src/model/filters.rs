//! Roster filters: cohort equality, course-name containment, case-folded name search.

use crate::model::Student;
use serde::{Deserialize, Serialize};

pub const DEFAULT_YEAR: &str = "AY 2024-25";
pub const DEFAULT_CLASS: &str = "CBSE 9";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub year: String,
    pub class: String,
    pub search: String,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            year: DEFAULT_YEAR.to_string(),
            class: DEFAULT_CLASS.to_string(),
            search: String::new(),
        }
    }
}

/// Shallow patch for [`Filters`]; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Filters {
    pub fn merge(&mut self, patch: FiltersPatch) {
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(class) = patch.class {
            self.class = class;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
    }

    /// All three predicates must hold; an empty filter value matches everything.
    pub fn matches(&self, student: &Student) -> bool {
        let year_ok = self.year.is_empty() || student.cohort == self.year;
        let class_ok = self.class.is_empty()
            || student.courses.iter().any(|c| c.name.contains(self.class.as_str()));
        let search_ok = self.search.is_empty()
            || student
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        year_ok && class_ok && search_ok
    }

    pub fn apply(&self, students: &[Student]) -> Vec<Student> {
        students.iter().filter(|s| self.matches(s)).cloned().collect()
    }
}
