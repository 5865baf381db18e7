//! Field and scalar rules shared by the entity validators
//!
//! Every rule reports its own errors into the [`Context`] and returns `None`
//! when it cannot produce a value. Callers evaluate all fields of an entity
//! before combining the results, so sibling errors are all collected.

use crate::context::Context;
use crate::error::ErrorKind;
use rmmd_ir::{Mapping, Value};
use rmmd_schema::KeyError;
use std::collections::BTreeMap;

pub(crate) fn type_mismatch(ctx: &mut Context, expected: &'static str, found: &Value) {
    let found = found.kind();
    ctx.report(
        ErrorKind::TypeMismatch { expected, found },
        format!("expected {expected}, found {found}"),
    );
}

/// The value as a mapping of named fields. Repeated field names are
/// reported; the first occurrence wins.
pub fn mapping<'v>(value: &'v Value, ctx: &mut Context) -> Option<&'v Mapping> {
    let Some(map) = value.as_mapping() else {
        type_mismatch(ctx, "mapping", value);
        return None;
    };
    for (idx, (key, _)) in map.iter().enumerate() {
        if map.is_repeated_at(idx) {
            ctx.in_field(key, |ctx| {
                ctx.report(
                    ErrorKind::DuplicateKey,
                    format!("field '{key}' is given more than once"),
                );
            });
        }
    }
    Some(map)
}

/// A field that must be present and not null
pub fn required<'v, T>(
    map: &'v Mapping,
    field: &str,
    ctx: &mut Context,
    f: impl FnOnce(&'v Value, &mut Context) -> Option<T>,
) -> Option<T> {
    ctx.in_field(field, |ctx| match map.get(field) {
        None | Some(Value::Null) => {
            ctx.report(
                ErrorKind::MissingRequiredField,
                format!("required field '{field}' is missing"),
            );
            None
        }
        Some(value) => f(value, ctx),
    })
}

/// A field that may be absent; explicit null counts as absent.
/// `Some(None)` means absent, `None` means present but invalid.
pub fn optional<'v, T>(
    map: &'v Mapping,
    field: &str,
    ctx: &mut Context,
    f: impl FnOnce(&'v Value, &mut Context) -> Option<T>,
) -> Option<Option<T>> {
    match map.get(field) {
        None | Some(Value::Null) => Some(None),
        Some(value) => ctx.in_field(field, |ctx| f(value, ctx)).map(Some),
    }
}

/// Optional field falling back to the type's default
pub fn defaulted<'v, T: Default>(
    map: &'v Mapping,
    field: &str,
    ctx: &mut Context,
    f: impl FnOnce(&'v Value, &mut Context) -> Option<T>,
) -> Option<T> {
    optional(map, field, ctx, f).map(Option::unwrap_or_default)
}

/// Every element of a sequence, each validated independently
pub fn sequence_of<'v, T>(
    value: &'v Value,
    ctx: &mut Context,
    mut f: impl FnMut(&'v Value, &mut Context) -> Option<T>,
) -> Option<Vec<T>> {
    let Some(items) = value.as_sequence() else {
        type_mismatch(ctx, "sequence", value);
        return None;
    };

    let mut out = Vec::with_capacity(items.len());
    let mut complete = true;
    for (idx, item) in items.iter().enumerate() {
        match ctx.in_index(idx, |ctx| f(item, ctx)) {
            Some(v) => out.push(v),
            None => complete = false,
        }
    }
    complete.then_some(out)
}

/// Like [`sequence_of`], rejecting an empty sequence
pub fn non_empty_sequence_of<'v, T>(
    value: &'v Value,
    ctx: &mut Context,
    f: impl FnMut(&'v Value, &mut Context) -> Option<T>,
) -> Option<Vec<T>> {
    if value.as_sequence().is_some_and(<[Value]>::is_empty) {
        ctx.report(
            ErrorKind::InvalidFormat,
            "must contain at least one item",
        );
        return None;
    }
    sequence_of(value, ctx, f)
}

/// A mapping with user-chosen keys, e.g. `species` or `literature`.
///
/// Each key is checked with `key`; repeated keys are reported as
/// duplicates. Values are validated even when their key is invalid.
pub fn keyed<'v, K: Ord, V>(
    value: &'v Value,
    ctx: &mut Context,
    mut key: impl FnMut(&str) -> Result<K, KeyError>,
    mut f: impl FnMut(&'v Value, &mut Context) -> Option<V>,
) -> Option<BTreeMap<K, V>> {
    let Some(map) = value.as_mapping() else {
        type_mismatch(ctx, "mapping", value);
        return None;
    };

    let mut out = BTreeMap::new();
    let mut complete = true;
    for (idx, (raw_key, item)) in map.iter().enumerate() {
        let entry = ctx.in_key(raw_key, |ctx| {
            let repeated = map.is_repeated_at(idx);
            if repeated {
                ctx.report(
                    ErrorKind::DuplicateKey,
                    format!("key '{raw_key}' is given more than once"),
                );
            }
            let parsed = match key(raw_key) {
                Ok(k) => Some(k),
                Err(e) => {
                    ctx.report(ErrorKind::InvalidFormat, e.to_string());
                    None
                }
            };
            let validated = f(item, ctx);
            if repeated {
                return None;
            }
            Some((parsed?, validated?))
        });
        match entry {
            Some((k, v)) => {
                out.insert(k, v);
            }
            None => complete = false,
        }
    }
    complete.then_some(out)
}

pub fn string(value: &Value, ctx: &mut Context) -> Option<String> {
    if let Some(s) = value.as_str() {
        Some(s.to_string())
    } else {
        type_mismatch(ctx, "string", value);
        None
    }
}

pub fn non_empty_string(value: &Value, ctx: &mut Context) -> Option<String> {
    let s = string(value, ctx)?;
    if s.is_empty() {
        ctx.report(ErrorKind::InvalidFormat, "must not be empty");
        return None;
    }
    Some(s)
}

pub fn integer(value: &Value, ctx: &mut Context) -> Option<i64> {
    if let Some(i) = value.as_integer() {
        Some(i)
    } else {
        type_mismatch(ctx, "integer", value);
        None
    }
}

/// Integer in `min..=u32::MAX`
pub fn unsigned(value: &Value, ctx: &mut Context, min: u32) -> Option<u32> {
    let i = integer(value, ctx)?;
    match u32::try_from(i) {
        Ok(n) if n >= min => Some(n),
        _ => {
            ctx.report(
                ErrorKind::InvalidFormat,
                format!("must be an integer >= {min}, got {i}"),
            );
            None
        }
    }
}

/// A string checked against an entry of the constraint table
pub fn constrained<T>(
    value: &Value,
    ctx: &mut Context,
    parse: impl FnOnce(&str) -> Result<T, KeyError>,
) -> Option<T> {
    let s = value.as_str().or_else(|| {
        type_mismatch(ctx, "string", value);
        None
    })?;
    match parse(s) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            ctx.report(ErrorKind::InvalidFormat, e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmmd_schema::SpeciesName;

    fn map(entries: Vec<(&str, Value)>) -> Value {
        Value::Mapping(entries.into_iter().collect())
    }

    fn messages(ctx: Context) -> Vec<String> {
        ctx.into_errors().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_required_and_optional() {
        let value = map(vec![("a", Value::from(1_i64)), ("b", Value::Null)]);
        let fields = value.as_mapping().unwrap();
        let mut ctx = Context::new();

        assert_eq!(required(fields, "a", &mut ctx, integer), Some(1));
        assert_eq!(optional(fields, "b", &mut ctx, integer), Some(None));
        assert_eq!(optional(fields, "c", &mut ctx, integer), Some(None));
        assert!(!ctx.has_errors());

        assert_eq!(required(fields, "b", &mut ctx, integer), None);
        assert_eq!(optional(fields, "a", &mut ctx, string), None);
        assert_eq!(
            messages(ctx),
            vec![
                "b: required field 'b' is missing",
                "a: expected string, found integer"
            ]
        );
    }

    #[test]
    fn test_sequence_collects_every_element_error() {
        let value = Value::from(vec![
            Value::from("x"),
            Value::from(2_i64),
            Value::from(false),
        ]);
        let mut ctx = Context::new();

        assert_eq!(sequence_of(&value, &mut ctx, integer), None);
        assert_eq!(
            messages(ctx),
            vec![
                "[0]: expected integer, found string",
                "[2]: expected integer, found boolean"
            ]
        );
    }

    #[test]
    fn test_non_empty_sequence() {
        let mut ctx = Context::new();
        assert_eq!(
            non_empty_sequence_of(&Value::from(Vec::<Value>::new()), &mut ctx, integer),
            None
        );
        assert_eq!(ctx.errors()[0].code(), "INVALID_FORMAT");
    }

    #[test]
    fn test_keyed_reports_bad_and_repeated_keys() {
        let value = map(vec![
            ("CH4", Value::from(1_i64)),
            ("4CH", Value::from(2_i64)),
            ("CH4", Value::from(3_i64)),
        ]);
        let mut ctx = Context::new();

        let result = keyed(&value, &mut ctx, SpeciesName::parse, integer);
        assert!(result.is_none());

        let errors = ctx.into_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].path.to_string(), "[\"4CH\"]");
        assert_eq!(errors[0].code(), "INVALID_FORMAT");
        assert_eq!(errors[1].code(), "DUPLICATE_KEY");
    }

    #[test]
    fn test_mapping_reports_repeated_fields() {
        let value = map(vec![("license", Value::from("a")), ("license", Value::from("b"))]);
        let mut ctx = Context::new();

        let fields = mapping(&value, &mut ctx).unwrap();
        assert_eq!(fields.get("license"), Some(&Value::from("a")));
        assert_eq!(messages(ctx), vec!["license: field 'license' is given more than once"]);
    }

    #[test]
    fn test_unsigned_bounds() {
        let mut ctx = Context::new();
        assert_eq!(unsigned(&Value::from(2_i64), &mut ctx, 2), Some(2));
        assert_eq!(unsigned(&Value::from(1_i64), &mut ctx, 2), None);
        assert_eq!(unsigned(&Value::from(-1_i64), &mut ctx, 0), None);
        assert_eq!(unsigned(&Value::from(1.5), &mut ctx, 0), None);
        let codes: Vec<_> = ctx.errors().iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["INVALID_FORMAT", "INVALID_FORMAT", "TYPE_MISMATCH"]);
    }

    #[test]
    fn test_constrained() {
        let mut ctx = Context::new();
        assert!(constrained(&Value::from("CH4"), &mut ctx, SpeciesName::parse).is_some());
        assert!(constrained(&Value::from("4CH"), &mut ctx, SpeciesName::parse).is_none());
        assert!(constrained(&Value::from(4_i64), &mut ctx, SpeciesName::parse).is_none());
        let errors = ctx.into_errors();
        assert!(errors[0].message.contains("4CH"));
        assert_eq!(errors[1].code(), "TYPE_MISMATCH");
    }
}
