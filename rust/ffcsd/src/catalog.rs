use crate::registration::Course;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("course #{index} has an empty code")]
    EmptyCode { index: usize },
    #[error("course code {code} appears more than once")]
    DuplicateCode { code: String },
    #[error("course {code} must carry at least one credit")]
    ZeroCredits { code: String },
    #[error("course {code} has no slot")]
    EmptySlot { code: String },
}

/// Read-only snapshot of the courses on offer. Clones share storage, so one
/// snapshot can back any number of sessions.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Arc<[Course]>,
    fingerprint: Arc<str>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Result<Self, CatalogError> {
        validate(&courses)?;
        let fingerprint = fingerprint_courses(&courses);
        Ok(Self {
            courses: courses.into(),
            fingerprint: fingerprint.into(),
        })
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn find(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code == code)
    }

    /// Hex SHA-256 over the courses in catalog order.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn validate(courses: &[Course]) -> Result<(), CatalogError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for (index, c) in courses.iter().enumerate() {
        if c.code.trim().is_empty() {
            return Err(CatalogError::EmptyCode { index });
        }
        if !seen.insert(c.code.as_str()) {
            return Err(CatalogError::DuplicateCode {
                code: c.code.clone(),
            });
        }
        if c.credits == 0 {
            return Err(CatalogError::ZeroCredits {
                code: c.code.clone(),
            });
        }
        if c.slot.trim().is_empty() {
            return Err(CatalogError::EmptySlot {
                code: c.code.clone(),
            });
        }
    }
    Ok(())
}

fn fingerprint_courses(courses: &[Course]) -> String {
    let mut hasher = Sha256::new();
    for c in courses {
        // Unit separators keep adjacent fields from running together.
        for field in [
            c.code.as_str(),
            c.name.as_str(),
            c.faculty.as_str(),
            c.slot.as_str(),
            c.venue.as_str(),
            c.category.as_str(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0x1fu8]);
        }
        hasher.update(c.credits.to_le_bytes());
        hasher.update(c.enrolled.to_le_bytes());
        hasher.update(c.capacity.to_le_bytes());
        hasher.update([0x1eu8]);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::tests::course;

    #[test]
    fn rejects_duplicate_codes() {
        let err = Catalog::new(vec![course("C1", 3, "A1"), course("C1", 4, "B1")])
            .expect_err("duplicate");
        assert_eq!(err, CatalogError::DuplicateCode { code: "C1".into() });
    }

    #[test]
    fn rejects_zero_credits_and_blank_fields() {
        assert!(matches!(
            Catalog::new(vec![course("C1", 0, "A1")]),
            Err(CatalogError::ZeroCredits { .. })
        ));
        assert!(matches!(
            Catalog::new(vec![course(" ", 3, "A1")]),
            Err(CatalogError::EmptyCode { index: 0 })
        ));
        assert!(matches!(
            Catalog::new(vec![course("C1", 3, "")]),
            Err(CatalogError::EmptySlot { .. })
        ));
    }

    #[test]
    fn clones_share_courses_and_find_by_code() {
        let cat = Catalog::new(vec![course("C1", 3, "A1"), course("C2", 4, "B1")])
            .expect("catalog");
        let shared = cat.clone();
        assert!(std::ptr::eq(cat.courses(), shared.courses()));
        assert_eq!(shared.find("C2").map(|c| c.credits), Some(4));
        assert!(shared.find("C3").is_none());
    }

    #[test]
    fn fingerprint_tracks_content_and_order() {
        let a = Catalog::new(vec![course("C1", 3, "A1"), course("C2", 4, "B1")]).expect("a");
        let same = Catalog::new(vec![course("C1", 3, "A1"), course("C2", 4, "B1")]).expect("same");
        let swapped =
            Catalog::new(vec![course("C2", 4, "B1"), course("C1", 3, "A1")]).expect("swapped");
        assert_eq!(a.fingerprint(), same.fingerprint());
        assert_ne!(a.fingerprint(), swapped.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
        let empty = Catalog::new(Vec::new()).expect("empty");
        assert!(empty.is_empty());
        assert_ne!(a.fingerprint(), empty.fingerprint());
    }
}
