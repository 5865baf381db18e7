//! Validation findings: error kinds, located errors and the failure report

use rmmd_ir::FieldPath;
use serde::Serialize;
use std::fmt;

/// Target collection of a reference that did not resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "collection")]
pub enum ReferenceTarget {
    /// `PointId` into the document's `points`
    #[serde(rename = "points")]
    Point { id: i64, len: usize },
    /// `QcCalculationId` into the document's `calculations`
    #[serde(rename = "calculations")]
    Calculation { id: i64, len: usize },
    /// `CitationKey` into the document's `literature` table
    #[serde(rename = "literature")]
    Literature { key: String },
}

impl ReferenceTarget {
    /// Name of the targeted top-level field
    #[must_use]
    pub fn collection(&self) -> &'static str {
        match self {
            ReferenceTarget::Point { .. } => "points",
            ReferenceTarget::Calculation { .. } => "calculations",
            ReferenceTarget::Literature { .. } => "literature",
        }
    }
}

impl fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceTarget::Point { id, len } | ReferenceTarget::Calculation { id, len } => {
                let collection = self.collection();
                if *len == 0 {
                    write!(f, "{collection} has no entry {id} (valid range is empty)")
                } else {
                    write!(f, "{collection} has no entry {id} (valid range 0..{len})")
                }
            }
            ReferenceTarget::Literature { key } => {
                write!(f, "literature has no entry '{key}'")
            }
        }
    }
}

/// One failed candidate of a structural union
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantAttempt {
    pub variant: &'static str,
    pub errors: Vec<ValidationError>,
}

/// Kind of a validation error; [`ErrorKind::code`] gives its stable code
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Scalar fails a pattern, length or range constraint
    InvalidFormat,
    /// Value has the wrong shape for its field
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Tag of a discriminated union names no known variant
    UnknownVariant {
        union: &'static str,
        tag: String,
        expected: Vec<&'static str>,
    },
    /// No candidate of a structural union accepted the value
    NoMatchingVariant {
        union: &'static str,
        attempts: Vec<VariantAttempt>,
    },
    MissingRequiredField,
    /// Index or key does not resolve within the document
    DanglingReference { target: ReferenceTarget },
    VersionMismatch {
        found: String,
        expected: &'static str,
    },
    /// Key given more than once in a mapping
    DuplicateKey,
}

impl ErrorKind {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "INVALID_FORMAT",
            ErrorKind::TypeMismatch { .. } => "TYPE_MISMATCH",
            ErrorKind::UnknownVariant { .. } => "UNKNOWN_VARIANT",
            ErrorKind::NoMatchingVariant { .. } => "NO_MATCHING_VARIANT",
            ErrorKind::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            ErrorKind::DanglingReference { .. } => "DANGLING_REFERENCE",
            ErrorKind::VersionMismatch { .. } => "VERSION_MISMATCH",
            ErrorKind::DuplicateKey => "DUPLICATE_KEY",
        }
    }
}

/// A located validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    #[serde(flatten)]
    pub kind: ErrorKind,
    pub path: FieldPath,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every error collected while validating one input; never empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// `None` for an empty error list
    #[must_use]
    pub fn new(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// Report holding `first` followed by `rest`
    #[must_use]
    pub fn starting_with(first: ValidationError, rest: Vec<ValidationError>) -> Self {
        let mut errors = Vec::with_capacity(rest.len() + 1);
        errors.push(first);
        errors.extend(rest);
        Self { errors }
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Errors with the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.code() == code)
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        write!(
            f,
            "{count} validation error{}",
            if count == 1 { "" } else { "s" }
        )?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
