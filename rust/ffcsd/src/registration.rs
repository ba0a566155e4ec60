use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum total credits one student may hold in a single registration session.
pub const CREDIT_CAP: u32 = 27;

/// Parsed case-insensitively, both from JSON and from stored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Category {
    Core,
    Elective,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Core => "Core",
            Category::Elective => "Elective",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(Category::Core),
            "elective" => Ok(Category::Elective),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Category restriction applied by [`filter_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    fn admits(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<Category>().map(CategoryFilter::Only)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub faculty: String,
    /// Weekly time-block token, e.g. `A1+TA1`. Equal tokens clash.
    pub slot: String,
    pub venue: String,
    #[serde(default)]
    pub enrolled: u32,
    #[serde(default)]
    pub capacity: u32,
    pub category: Category,
}

impl Course {
    pub fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }

    pub fn fill_percent(&self) -> u32 {
        if self.capacity == 0 {
            return 0;
        }
        (100.0 * f64::from(self.enrolled) / f64::from(self.capacity)).round() as u32
    }

    fn matches(&self, needle_lower: &str, category: CategoryFilter) -> bool {
        let text_hit = self.code.to_lowercase().contains(needle_lower)
            || self.name.to_lowercase().contains(needle_lower);
        text_hit && category.admits(self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("{code} is already in the selection")]
    DuplicateCourse { code: String },

    #[error("adding {code} ({credits} credits) would exceed the {cap}-credit limit (currently {total})")]
    CreditLimitExceeded {
        code: String,
        credits: u32,
        total: u32,
        cap: u32,
    },

    #[error("{code} clashes with {clashes_with} in slot {slot}")]
    SlotClash {
        code: String,
        slot: String,
        clashes_with: String,
    },

    #[error("select at least one course before submitting")]
    EmptySelection,
}

impl RegistrationError {
    /// Stable wire code for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            RegistrationError::DuplicateCourse { .. } => "duplicate_course",
            RegistrationError::CreditLimitExceeded { .. } => "credit_limit_exceeded",
            RegistrationError::SlotClash { .. } => "slot_clash",
            RegistrationError::EmptySelection => "empty_selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub codes: Vec<String>,
    pub total_credits: u32,
}

/// A student's in-progress course choice for one session.
///
/// Invariants held after every successful mutation: codes are unique, slots
/// are unique and the credit sum never exceeds [`CREDIT_CAP`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    courses: Vec<Course>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn total_credits(&self) -> u32 {
        self.courses.iter().map(|c| c.credits).sum()
    }

    pub fn remaining_credits(&self) -> u32 {
        CREDIT_CAP.saturating_sub(self.total_credits())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.courses.iter().any(|c| c.code == code)
    }

    /// Appends `course` if it passes the duplicate, credit and slot checks, in
    /// that order. Returns the new credit total. On failure nothing changes.
    pub fn add(&mut self, course: &Course) -> Result<u32, RegistrationError> {
        if self.contains(&course.code) {
            return Err(RegistrationError::DuplicateCourse {
                code: course.code.clone(),
            });
        }

        let total = self.total_credits();
        if total.saturating_add(course.credits) > CREDIT_CAP {
            return Err(RegistrationError::CreditLimitExceeded {
                code: course.code.clone(),
                credits: course.credits,
                total,
                cap: CREDIT_CAP,
            });
        }

        if let Some(existing) = self.courses.iter().find(|c| c.slot == course.slot) {
            return Err(RegistrationError::SlotClash {
                code: course.code.clone(),
                slot: course.slot.clone(),
                clashes_with: existing.code.clone(),
            });
        }

        self.courses.push(course.clone());
        Ok(total + course.credits)
    }

    /// Drops the entry with `code` if present. Absent codes are a no-op.
    pub fn remove(&mut self, code: &str) -> u32 {
        self.courses.retain(|c| c.code != code);
        self.total_credits()
    }

    /// Finalizes the current choice. The selection itself is left untouched.
    pub fn submit(&self) -> Result<Submission, RegistrationError> {
        if self.is_empty() {
            return Err(RegistrationError::EmptySelection);
        }
        Ok(Submission {
            codes: self.courses.iter().map(|c| c.code.clone()).collect(),
            total_credits: self.total_credits(),
        })
    }
}

/// Courses whose code or name contains `search` (case-insensitive) and whose
/// category passes `category`, in catalog order. The returned iterator is
/// lazy and can be cloned to restart the scan.
pub fn filter_catalog<'a>(
    catalog: &'a [Course],
    search: &str,
    category: CategoryFilter,
) -> impl Iterator<Item = &'a Course> + Clone + 'a {
    let needle = search.to_lowercase();
    catalog
        .iter()
        .filter(move |course| course.matches(&needle, category))
}
