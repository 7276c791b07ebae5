use indexmap::IndexMap;

use crate::common::SourceLocation;
use crate::error::{GenError, GenErrorKind};

use super::schema::{AnnotationKind, ParsedAnnotation};

/// Parse one wire-format annotation line (spec.md §6):
///
/// ```text
/// ::kind positional1 positional2 -Name=Value -Other=a,b,c
/// ```
///
/// Positional tokens fill a kind-specific ordered slot list passed in
/// `positional_names`; every `-Name=Value` token is a named parameter.
/// Commas inside a value are preserved verbatim — splitting a list-typed
/// value into its elements is the schema's job, not the wire parser's.
pub fn parse_line(
    line: &str,
    positional_names: &[&str],
    location: SourceLocation,
) -> Result<ParsedAnnotation, GenError> {
    let trimmed = line.trim();
    let rest = trimmed.strip_prefix("::").ok_or_else(|| {
        GenError::new(
            GenErrorKind::AnnotationSyntax,
            format!("annotation line must start with '::', got '{trimmed}'"),
        )
        .at(location.clone())
    })?;

    let mut tokens = rest.split_whitespace();
    let kind_name = tokens.next().ok_or_else(|| {
        GenError::new(GenErrorKind::AnnotationSyntax, "annotation line has no kind")
            .at(location.clone())
    })?;
    let kind = AnnotationKind::from_wire_name(kind_name).ok_or_else(|| {
        GenError::new(
            GenErrorKind::AnnotationSyntax,
            format!("'{kind_name}' is not a recognized annotation kind"),
        )
        .at(location.clone())
        .suggest(format!(
            "expected one of: {}",
            AnnotationKind::ALL
                .iter()
                .map(|k| k.wire_name())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;

    let mut raw = IndexMap::new();
    let mut positional_index = 0;

    for token in tokens {
        if let Some(named) = token.strip_prefix('-') {
            let (name, value) = named.split_once('=').ok_or_else(|| {
                GenError::new(
                    GenErrorKind::AnnotationSyntax,
                    format!("named parameter '-{named}' is missing '=value'"),
                )
                .at(location.clone())
            })?;
            if name.is_empty() {
                return Err(GenError::new(
                    GenErrorKind::AnnotationSyntax,
                    "named parameter has an empty name",
                )
                .at(location.clone()));
            }
            raw.insert(name.to_string(), value.to_string());
        } else {
            let name = positional_names.get(positional_index).ok_or_else(|| {
                GenError::new(
                    GenErrorKind::AnnotationSyntax,
                    format!(
                        "too many positional parameters for '{kind_name}' (expected {})",
                        positional_names.len()
                    ),
                )
                .at(location.clone())
            })?;
            raw.insert((*name).to_string(), token.to_string());
            positional_index += 1;
        }
    }

    Ok(ParsedAnnotation::new(kind, raw, location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_positional_and_named_tokens() {
        let ann = parse_line(
            "::route GET /users/{id:int} -Middleware=Auth,Logging -Priority=5",
            &["method", "path"],
            SourceLocation::new("pkg/routes.go", 3, 1),
        )
        .unwrap();
        assert_eq!(ann.kind, AnnotationKind::Route);
        assert_eq!(ann.raw.get("method").unwrap(), "GET");
        assert_eq!(ann.raw.get("path").unwrap(), "/users/{id:int}");
        assert_eq!(ann.raw.get("Middleware").unwrap(), "Auth,Logging");
        assert_eq!(ann.raw.get("Priority").unwrap(), "5");
    }

    #[test]
    fn missing_double_colon_prefix_is_rejected() {
        let err = parse_line("route GET /x", &["method", "path"], SourceLocation::unknown())
            .unwrap_err();
        assert_eq!(err.kind, GenErrorKind::AnnotationSyntax);
    }

    #[test]
    fn unrecognized_kind_is_rejected() {
        let err = parse_line("::bogus", &[], SourceLocation::unknown()).unwrap_err();
        assert_eq!(err.kind, GenErrorKind::AnnotationSyntax);
        assert!(!err.suggestions.is_empty());
    }

    #[test]
    fn named_token_without_equals_is_rejected() {
        let err = parse_line("::logger -Name", &[], SourceLocation::unknown()).unwrap_err();
        assert_eq!(err.kind, GenErrorKind::AnnotationSyntax);
    }

    #[test]
    fn excess_positional_tokens_are_rejected() {
        let err = parse_line("::init extra", &[], SourceLocation::unknown()).unwrap_err();
        assert_eq!(err.kind, GenErrorKind::AnnotationSyntax);
    }

    #[test]
    fn bare_kind_with_no_parameters_parses() {
        let ann = parse_line("::init", &[], SourceLocation::unknown()).unwrap();
        assert_eq!(ann.kind, AnnotationKind::Init);
        assert!(ann.raw.is_empty());
    }
}
