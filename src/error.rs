//! Error types for the PhLynx model compiler.
//!
//! This module provides a unified error type [`CompileError`] covering every
//! fatal condition a compile run can hit, plus the [`Issue`] record type that
//! carries human-readable findings (fatal or otherwise) back to the caller.

use thiserror::Error;

/// Result type alias using [`CompileError`].
pub type Result<T> = std::result::Result<T, CompileError>;

/// A single human-readable finding, as reported to the caller.
///
/// Fatal errors, validation findings, and non-fatal warnings all surface as
/// issue records; [`IssueCategory`] tells them apart at the output level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Description of the finding.
    pub description: String,
}

impl Issue {
    /// Create an issue from any displayable description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// Category attached to a failed compile's issue list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    /// Malformed module, unit-library, or model text.
    Parser,
    /// The graph references a module file the project store does not hold.
    MissingFile,
    /// The graph references a component absent from its module.
    MissingComponent,
    /// A connection the compiler does not support.
    UnsupportedConnection,
    /// Structural validation of the assembled model failed.
    Validation,
    /// Import resolution or flattening failed.
    ImportResolution,
    /// Reading project inputs from disk failed (CLI only).
    Io,
    /// The compiler produced a model it could not print.
    Internal,
}

impl IssueCategory {
    /// Stable lowercase tag, used by the CLI and WASM surfaces.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parser => "parser",
            Self::MissingFile => "missing_file",
            Self::MissingComponent => "missing_component",
            Self::UnsupportedConnection => "unsupported_connection",
            Self::Validation => "validation",
            Self::ImportResolution => "import_resolution",
            Self::Io => "io",
            Self::Internal => "internal",
        }
    }
}

/// Unified error type for all compile operations.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Source text failed to parse; the issue list holds the structural
    /// findings reported by the parser.
    #[error("failed to parse '{filename}': {} issue(s)", issues.len())]
    Parse {
        filename: String,
        issues: Vec<Issue>,
    },

    /// The graph names a module file that is not in the project store.
    #[error("missing module file '{filename}'")]
    MissingFile { filename: String },

    /// The graph names a component its module does not define.
    #[error("component '{component}' not found in '{filename}'")]
    MissingComponent {
        component: String,
        filename: String,
    },

    /// Aggregation-to-aggregation or multi-variable aggregation ports.
    #[error("unsupported connection: {message}")]
    UnsupportedConnection { message: String },

    /// Structural model issues, accumulated and reported together.
    #[error("model validation failed with {} issue(s)", issues.len())]
    Validation { issues: Vec<Issue> },

    /// Import resolution reported issues while flattening.
    #[error("import resolution failed with {} issue(s)", issues.len())]
    ImportResolution { issues: Vec<Issue> },

    /// Filesystem error on a project input or output path (CLI only).
    #[error("'{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The assembled model could not be serialized.
    #[error("failed to print model: {message}")]
    Print { message: String },
}

impl CompileError {
    /// Create a parse error with a single description.
    pub fn parse(filename: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Parse {
            filename: filename.into(),
            issues: vec![Issue::new(description)],
        }
    }

    /// Create an unsupported-connection error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedConnection {
            message: message.into(),
        }
    }

    /// The output category for this error.
    pub fn category(&self) -> IssueCategory {
        match self {
            Self::Parse { .. } => IssueCategory::Parser,
            Self::MissingFile { .. } => IssueCategory::MissingFile,
            Self::MissingComponent { .. } => IssueCategory::MissingComponent,
            Self::UnsupportedConnection { .. } => IssueCategory::UnsupportedConnection,
            Self::Validation { .. } => IssueCategory::Validation,
            Self::ImportResolution { .. } => IssueCategory::ImportResolution,
            Self::Io { .. } => IssueCategory::Io,
            Self::Print { .. } => IssueCategory::Internal,
        }
    }

    /// Convert this error into the issue records reported to the caller.
    ///
    /// Multi-issue variants keep their accumulated findings, prefixed by the
    /// summary line; everything else becomes a single record.
    pub fn into_issues(self) -> Vec<Issue> {
        match self {
            Self::Parse { ref issues, .. }
            | Self::Validation { ref issues }
            | Self::ImportResolution { ref issues } => {
                let mut all = vec![Issue::new(self.to_string())];
                all.extend(issues.iter().cloned());
                all
            }
            other => vec![Issue::new(other.to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        let err = CompileError::MissingFile {
            filename: "veins.xml".into(),
        };
        assert_eq!(err.category(), IssueCategory::MissingFile);
        assert_eq!(err.to_string(), "missing module file 'veins.xml'");
    }

    #[test]
    fn test_validation_issues_are_preserved() {
        let err = CompileError::Validation {
            issues: vec![Issue::new("a"), Issue::new("b")],
        };
        let issues = err.into_issues();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[1].description, "a");
        assert_eq!(issues[2].description, "b");
    }
}
