use std::fmt;

use serde::{Deserialize, Serialize};

/// Clinical category assigned by the extractor's keyword scan or chosen by
/// the author on direct submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cardiac,
    Trauma,
    Respiratory,
    Neurological,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cardiac => "cardiac",
            Category::Trauma => "trauma",
            Category::Respiratory => "respiratory",
            Category::Neurological => "neurological",
            Category::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cardiac" => Some(Category::Cardiac),
            "trauma" => Some(Category::Trauma),
            "respiratory" => Some(Category::Respiratory),
            "neurological" => Some(Category::Neurological),
            "general" => Some(Category::General),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Urgent,
    Routine,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Urgent => "urgent",
            Severity::Routine => "routine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Severity::Critical),
            "urgent" => Some(Severity::Urgent),
            "routine" => Some(Severity::Routine),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted protocol step. `step` carries the source document's own
/// numbering verbatim; gaps and duplicates are preserved, never renumbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedStep {
    pub step: i64,
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Unvalidated protocol candidate (extractor output or direct API submission)
/// prior to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolDraft {
    pub name: String,
    pub category: Category,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<ExtractedStep>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub guidelines: String,
}

/// Persisted protocol record.
#[derive(Debug, Clone, Serialize)]
pub struct Protocol {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub severity: Severity,
    pub description: String,
    pub steps: Vec<ExtractedStep>,
    pub medications: Vec<String>,
    pub guidelines: String,
    pub last_updated: String,
}
