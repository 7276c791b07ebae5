use axongen_spec::{SourceLocation, Severity};

/// One semantic finding: a stable code, a severity, a human message, a
/// location, and an optional fix suggestion. Kept distinct from
/// `axongen_spec::GenError`
/// because the fatal generation-pipeline taxonomy (spec.md §7) is closed,
/// while semantic checks here can also emit non-fatal warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            location,
            suggestion: None,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            location,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Aggregated findings from one or more rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Whether the package is clean enough to generate: no `Error`-severity
    /// diagnostics. Warnings don't block generation (spec.md §7: only the
    /// named taxonomy kinds are fatal; these semantic checks are stricter
    /// than what the annotation validator alone catches, but a `Validation`
    /// kind fatal for generation is reserved for ones that would make
    /// generated code nonsensical, not merely suspicious).
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }
}
