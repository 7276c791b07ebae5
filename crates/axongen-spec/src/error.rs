use indexmap::IndexMap;
use thiserror::Error;

use crate::common::SourceLocation;

/// The closed error taxonomy from the error handling design (spec.md §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenErrorKind {
    AnnotationSyntax,
    Validation,
    ParserRegistration,
    ParserValidation,
    ParserImport,
    ParserNotFound,
    ParserConflict,
    Generation,
    FileSystem,
}

impl GenErrorKind {
    /// Stable, machine-filterable `E_`-prefixed code.
    pub fn code(&self) -> &'static str {
        match self {
            GenErrorKind::AnnotationSyntax => "E_ANNOTATION_SYNTAX",
            GenErrorKind::Validation => "E_VALIDATION",
            GenErrorKind::ParserRegistration => "E_PARSER_REGISTRATION",
            GenErrorKind::ParserValidation => "E_PARSER_VALIDATION",
            GenErrorKind::ParserImport => "E_PARSER_IMPORT",
            GenErrorKind::ParserNotFound => "E_PARSER_NOT_FOUND",
            GenErrorKind::ParserConflict => "E_PARSER_CONFLICT",
            GenErrorKind::Generation => "E_GENERATION",
            GenErrorKind::FileSystem => "E_FILESYSTEM",
        }
    }

    /// Whether this error kind aborts generation of the current package only
    /// vs. the whole run. axongen never has a whole-run-fatal kind: every
    /// kind is scoped to the package (or single write) that produced it,
    /// per spec.md §7.
    pub fn fatal_for_package(&self) -> bool {
        true
    }
}

impl std::fmt::Display for GenErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The single error type every axongen component surfaces to its caller.
#[derive(Debug, Error, Clone)]
#[error("{}", self.render())]
pub struct GenError {
    pub kind: GenErrorKind,
    pub location: SourceLocation,
    pub message: String,
    pub cause: Option<Box<GenError>>,
    pub suggestions: Vec<String>,
    pub context: IndexMap<String, String>,
}

impl GenError {
    pub fn new(kind: GenErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: SourceLocation::unknown(),
            message: message.into(),
            cause: None,
            suggestions: Vec::new(),
            context: IndexMap::new(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_cause(mut self, cause: GenError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    fn render(&self) -> String {
        let mut out = format!("[{}] {}", self.kind.code(), self.message);
        if self.location != SourceLocation::unknown() {
            out.push_str(&format!(" ({})", self.location));
        }
        if let Some(cause) = &self.cause {
            out.push_str(&format!(": {cause}"));
        }
        out
    }
}
