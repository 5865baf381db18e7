//! Local names, keys and constrained scalars
//!
//! Keys let a document refer to entries of its top-level collections without
//! nesting or repeating them. String keys are checked against a fixed
//! constraint table; integer ids are positions into the `points` and
//! `calculations` lists and are resolved by the validation engine.

use crate::KeyError;
use regex::Regex;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::Serialize;
use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Length and pattern constraint for a string scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyConstraint {
    name: &'static str,
    pattern: &'static str,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

/// Key of a literature reference, e.g. `arrhenius1889`
pub const CITATION_KEY: KeyConstraint = KeyConstraint {
    name: "CitationKey",
    pattern: r"^[a-zA-Z0-9.\-]+$",
    min_length: Some(1),
    max_length: None,
};

/// Name of a species; the length limit comes from CHEMKIN II
pub const SPECIES_NAME: KeyConstraint = KeyConstraint {
    name: "SpeciesName",
    pattern: r"^[a-zA-Z][a-zA-Z0-9+*()\-]*$",
    min_length: Some(1),
    max_length: Some(16),
};

/// InChIKey with fixed-H layer
pub const ENTITY_KEY: KeyConstraint = KeyConstraint {
    name: "EntityKey",
    pattern: r"^[A-Z]{14}-[A-Z]{10}-[A-Z]$",
    min_length: Some(27),
    max_length: Some(27),
};

/// Digital Object Identifier
pub const DOI: KeyConstraint = KeyConstraint {
    name: "Doi",
    pattern: r"^10\.\d{4,9}/.*",
    min_length: None,
    max_length: None,
};

/// Posix path relative to the dataset file, starting with `./`
pub const LOCAL_FILE: KeyConstraint = KeyConstraint {
    name: "LocalFile",
    pattern: r"^\./.*",
    min_length: None,
    max_length: None,
};

pub const HTTP_URL: KeyConstraint = KeyConstraint {
    name: "HttpUrl",
    pattern: r"^https?://[^\s/$.?#][^\s]*$",
    min_length: None,
    max_length: None,
};

/// Every string constraint known to the schema
pub const CONSTRAINT_TABLE: [KeyConstraint; 6] =
    [CITATION_KEY, SPECIES_NAME, ENTITY_KEY, DOI, LOCAL_FILE, HTTP_URL];

static COMPILED: OnceLock<HashMap<&'static str, Regex>> = OnceLock::new();

fn compiled(pattern: &str) -> Option<&'static Regex> {
    COMPILED
        .get_or_init(|| {
            CONSTRAINT_TABLE
                .iter()
                .filter_map(|c| Regex::new(c.pattern).ok().map(|re| (c.pattern, re)))
                .collect()
        })
        .get(pattern)
}

impl KeyConstraint {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    #[must_use]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Check length bounds, then the pattern
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check(&self, value: &str) -> Result<(), KeyError> {
        let len = value.chars().count();

        if let Some(min) = self.min_length {
            if len < min {
                return Err(KeyError::TooShort {
                    name: self.name,
                    min,
                    actual: len,
                });
            }
        }

        if let Some(max) = self.max_length {
            if len > max {
                return Err(KeyError::TooLong {
                    name: self.name,
                    max,
                    actual: len,
                });
            }
        }

        if compiled(self.pattern).is_some_and(|re| re.is_match(value)) {
            Ok(())
        } else {
            Err(KeyError::Pattern {
                name: self.name,
                value: value.to_string(),
                pattern: self.pattern,
            })
        }
    }

    /// JSON Schema for a string carrying this constraint
    #[must_use]
    pub fn json_schema(&self) -> Schema {
        let mut map = serde_json::Map::new();
        map.insert("type".to_string(), "string".into());
        map.insert("pattern".to_string(), self.pattern.into());
        if let Some(min) = self.min_length {
            map.insert("minLength".to_string(), min.into());
        }
        if let Some(max) = self.max_length {
            map.insert("maxLength".to_string(), max.into());
        }
        Schema::from(map)
    }
}

macro_rules! constrained_string {
    ($(#[$meta:meta])* $name:ident, $constraint:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const CONSTRAINT: &'static KeyConstraint = &$constraint;

            /// Validate `value` against the constraint table entry
            ///
            /// # Errors
            ///
            /// Returns a [`KeyError`] naming the violated length or pattern.
            pub fn parse(value: &str) -> Result<Self, KeyError> {
                Self::CONSTRAINT.check(value)?;
                Ok(Self(value.to_string()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = KeyError;

            fn from_str(s: &str) -> Result<Self, KeyError> {
                Self::parse(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl JsonSchema for $name {
            fn schema_name() -> Cow<'static, str> {
                Cow::Borrowed(stringify!($name))
            }

            fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
                Self::CONSTRAINT.json_schema()
            }
        }
    };
}

constrained_string!(
    /// Key for a literature reference
    CitationKey,
    CITATION_KEY
);
constrained_string!(
    /// Name of a species in the dataset
    SpeciesName,
    SPECIES_NAME
);
constrained_string!(
    /// Key for a canonical representation of a species
    EntityKey,
    ENTITY_KEY
);
constrained_string!(Doi, DOI);
constrained_string!(
    /// Reference to a file shipped with the dataset
    LocalFile,
    LOCAL_FILE
);
constrained_string!(HttpUrl, HTTP_URL);

/// Index of a point in the document's `points` list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct PointId(pub i64);

/// Index of a calculation in the document's `calculations` list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct QcCalculationId(pub i64);

impl PointId {
    /// Position in the `points` list, `None` for negative ids
    #[must_use]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl QcCalculationId {
    /// Position in the `calculations` list, `None` for negative ids
    #[must_use]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QcCalculationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
