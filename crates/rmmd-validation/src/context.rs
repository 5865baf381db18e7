//! Current location and collected errors of a validation walk

use crate::error::{ErrorKind, ValidationError};
use rmmd_ir::{FieldPath, PathSegment};

/// Path to the value under validation plus the errors found so far.
///
/// Validators push a segment before descending into a child and pop it on
/// the way back, so every reported error carries its full location.
#[derive(Debug, Default)]
pub struct Context {
    path: FieldPath,
    errors: Vec<ValidationError>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context rooted at `path`, for validating a fragment in place
    #[must_use]
    pub fn at(path: FieldPath) -> Self {
        Self {
            path,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Record an error at the current path
    pub fn report(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.errors
            .push(ValidationError::new(kind, self.path.clone(), message));
    }

    pub fn in_field<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scoped(PathSegment::Field(name.to_string()), f)
    }

    pub fn in_index<T>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scoped(PathSegment::Index(index), f)
    }

    pub fn in_key<T>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scoped(PathSegment::Key(key.to_string()), f)
    }

    fn scoped<T>(&mut self, segment: PathSegment, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Empty context at the same location, for trying a union candidate
    pub(crate) fn fork(&self) -> Self {
        Self::at(self.path.clone())
    }

    /// Keep errors collected by a fork
    pub(crate) fn absorb(&mut self, errors: Vec<ValidationError>) {
        self.errors.extend(errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_paths() {
        let mut ctx = Context::new();
        ctx.in_field("species", |ctx| {
            ctx.in_key("CH4", |ctx| {
                ctx.in_field("entities", |ctx| {
                    ctx.in_index(0, |ctx| ctx.report(ErrorKind::MissingRequiredField, "missing"));
                });
            });
        });
        ctx.report(ErrorKind::InvalidFormat, "at root");

        assert!(ctx.path().is_root());
        let rendered: Vec<String> = ctx.errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "species[\"CH4\"].entities[0]: missing".to_string(),
                "<root>: at root".to_string()
            ]
        );
    }

    #[test]
    fn test_fork_keeps_path_not_errors() {
        let mut ctx = Context::new();
        ctx.report(ErrorKind::DuplicateKey, "dup");
        let fork = ctx.in_field("calculations", |ctx| ctx.fork());

        assert!(!fork.has_errors());
        assert_eq!(fork.path().to_string(), "calculations");
        assert_eq!(ctx.into_errors().len(), 1);
    }
}
