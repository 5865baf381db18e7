//! Validation reporter

use crate::error::{ValidationError, ValidationReport};
use serde::Serialize;
use std::str::FromStr;

/// Output format for rendered results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}', expected text or json")),
        }
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    /// Rendered path, e.g. `points[0].calculations[1]`
    location: String,
    #[serde(flatten)]
    error: &'a ValidationError,
}

#[derive(Serialize)]
struct JsonResult<'a> {
    source: &'a str,
    valid: bool,
    error_count: usize,
    errors: Vec<JsonEntry<'a>>,
}

/// Renders validation results for one input
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationReporter {
    format: OutputFormat,
}

impl ValidationReporter {
    /// Create a new validation reporter
    #[must_use]
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render the outcome of validating `source`
    #[must_use]
    pub fn render(&self, source: &str, report: Option<&ValidationReport>) -> String {
        match self.format {
            OutputFormat::Text => Self::render_text(source, report),
            OutputFormat::Json => Self::render_json(source, report),
        }
    }

    fn render_text(source: &str, report: Option<&ValidationReport>) -> String {
        let Some(report) = report else {
            return format!("{source}: valid\n");
        };
        let mut out = format!("{source}: {report}\n");
        let mut codes: Vec<&str> = report.iter().map(ValidationError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        out.push_str(&format!("  codes: {}\n", codes.join(", ")));
        out
    }

    fn render_json(source: &str, report: Option<&ValidationReport>) -> String {
        let errors: Vec<JsonEntry<'_>> = report
            .into_iter()
            .flatten()
            .map(|error| JsonEntry {
                location: error.path.to_string(),
                error,
            })
            .collect();
        let result = JsonResult {
            source,
            valid: errors.is_empty(),
            error_count: errors.len(),
            errors,
        };
        // Every field serializes to plain JSON
        serde_json::to_string_pretty(&result).unwrap_or_default() + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rmmd_ir::FieldPath;
    use serde_json::json;

    fn report() -> ValidationReport {
        ValidationReport::new(vec![
            ValidationError::new(
                ErrorKind::MissingRequiredField,
                FieldPath::root().field("license"),
                "required field 'license' is missing",
            ),
            ValidationError::new(
                ErrorKind::TypeMismatch {
                    expected: "sequence",
                    found: "string",
                },
                FieldPath::root().field("points"),
                "expected sequence, found string",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_text() {
        let reporter = ValidationReporter::default();
        assert_eq!(reporter.render("a.yaml", None), "a.yaml: valid\n");

        let text = reporter.render("a.yaml", Some(&report()));
        assert_eq!(
            text,
            "a.yaml: 2 validation errors\n  \
             license: required field 'license' is missing\n  \
             points: expected sequence, found string\n  \
             codes: MISSING_REQUIRED_FIELD, TYPE_MISMATCH\n"
        );
    }

    #[test]
    fn test_render_json() {
        let reporter = ValidationReporter::new(OutputFormat::Json);
        let rendered: serde_json::Value =
            serde_json::from_str(&reporter.render("a.yaml", Some(&report()))).unwrap();

        assert_eq!(rendered["valid"], json!(false));
        assert_eq!(rendered["error_count"], json!(2));
        assert_eq!(
            rendered["errors"][1],
            json!({
                "location": "points",
                "code": "TYPE_MISMATCH",
                "expected": "sequence",
                "found": "string",
                "path": ["points"],
                "message": "expected sequence, found string",
            })
        );

        let valid: serde_json::Value =
            serde_json::from_str(&reporter.render("b.json", None)).unwrap();
        assert_eq!(valid, json!({"source": "b.json", "valid": true, "error_count": 0, "errors": []}));
    }
}
