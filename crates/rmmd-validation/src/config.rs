//! Engine configuration

use serde::{Deserialize, Serialize};

/// Whether the cross-reference pass runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceCheck {
    /// Every id and citation key must resolve within the document
    #[default]
    Strict,
    /// Skip the cross-reference pass, for fragments whose references are
    /// resolved elsewhere
    Deferred,
}

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub references: ReferenceCheck,
    /// Maximum errors reported (0 = unlimited)
    pub max_errors: usize,
}

impl ValidationConfig {
    #[must_use]
    pub fn deferred() -> Self {
        Self {
            references: ReferenceCheck::Deferred,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.references, ReferenceCheck::Strict);
        assert_eq!(config.max_errors, 0);
    }

    #[test]
    fn test_config_from_yaml() {
        let config: ValidationConfig =
            serde_yaml::from_str("references: deferred\nmax_errors: 10\n").unwrap();
        assert_eq!(config.references, ReferenceCheck::Deferred);
        assert_eq!(config.max_errors, 10);

        let config: ValidationConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ValidationConfig::default());

        assert!(serde_yaml::from_str::<ValidationConfig>("strictness: strict\n").is_err());
    }
}
