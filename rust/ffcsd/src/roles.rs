use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    FilterCatalog,
    ViewSelection,
    AddCourse,
    RemoveCourse,
    SubmitRegistration,
    ViewCourseStats,
    ManageWindow,
    ImportCatalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
    Dean,
}

const STUDENT_OPS: &[Operation] = &[
    Operation::FilterCatalog,
    Operation::ViewSelection,
    Operation::AddCourse,
    Operation::RemoveCourse,
    Operation::SubmitRegistration,
];

const STAFF_OPS: &[Operation] = &[Operation::FilterCatalog, Operation::ViewCourseStats];

const DEAN_OPS: &[Operation] = &[
    Operation::FilterCatalog,
    Operation::ViewCourseStats,
    Operation::ManageWindow,
    Operation::ImportCatalog,
];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Staff => "staff",
            Role::Dean => "dean",
        }
    }

    pub fn capabilities(self) -> &'static [Operation] {
        match self {
            Role::Student => STUDENT_OPS,
            Role::Staff => STAFF_OPS,
            Role::Dean => DEAN_OPS,
        }
    }

    pub fn allows(self, op: Operation) -> bool {
        self.capabilities().contains(&op)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "staff" => Ok(Role::Staff),
            "dean" => Ok(Role::Dean),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
