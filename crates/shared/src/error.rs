use std::fmt;

use serde::{Deserialize, Serialize};

/// One segment of a FastAPI error location, e.g. `body` or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Field(String),
    Index(i64),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Field(name) => f.write_str(name),
            LocSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub loc: Vec<LocSegment>,
    pub msg: String,
}

impl ValidationIssue {
    pub fn new(loc: &[&str], msg: impl Into<String>) -> Self {
        Self {
            loc: loc
                .iter()
                .map(|segment| LocSegment::Field((*segment).to_string()))
                .collect(),
            msg: msg.into(),
        }
    }

    pub fn path(&self) -> String {
        self.loc
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationDetail {
    Issues(Vec<ValidationIssue>),
    Message(String),
}

impl Default for ValidationDetail {
    fn default() -> Self {
        ValidationDetail::Issues(Vec::new())
    }
}

/// Body of an HTTP 422 response from the prediction service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    #[serde(default)]
    pub detail: ValidationDetail,
}

impl ValidationErrorBody {
    /// Joins every `loc: msg` pair with ", ".
    pub fn summary(&self) -> String {
        match &self.detail {
            ValidationDetail::Issues(issues) => issues
                .iter()
                .map(|issue| format!("{}: {}", issue.path(), issue.msg))
                .collect::<Vec<_>>()
                .join(", "),
            ValidationDetail::Message(message) => message.clone(),
        }
    }
}
