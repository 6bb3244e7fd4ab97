use std::fmt;

/// A single failed requirement found while validating story or step records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// 1-based step number, `None` for story-level fields.
    pub step: Option<usize>,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Some(step) => write!(f, "step {step}: {}: {}", self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Could not find the data file (tried {tried})")]
    SourceUnavailable { tried: String },

    #[error("Sheet name \"{0}\" not found")]
    MissingSheet(String),

    #[error("unreadable spreadsheet: {0}")]
    MalformedSource(String),

    #[error("{}", join_violations(.0))]
    Validation(Vec<Violation>),

    #[error("{0}")]
    Remote(String),

    #[error("no document id in sheet reference: {0}")]
    InvalidReference(String),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure of one ingestion run, labelled with the stage that observed it.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {kind}")]
pub struct ScrollyError {
    pub context: String,
    pub kind: ErrorKind,
}

impl ScrollyError {
    pub fn new(context: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            context: context.into(),
            kind,
        }
    }

    /// Prefixes the context with an outer stage label, keeping the kind.
    pub fn in_stage(mut self, stage: &str) -> Self {
        self.context = format!("{stage}: {}", self.context);
        self
    }

    pub fn missing_sheet(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::MissingSheet(name) => Some(name),
            _ => None,
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match &self.kind {
            ErrorKind::Validation(violations) => violations,
            _ => &[],
        }
    }
}

pub type ScrollyResult<T> = Result<T, ScrollyError>;
