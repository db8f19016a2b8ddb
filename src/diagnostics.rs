//! Diagnostics: structured records for user-source and configuration
//! problems.
//!
//! The core never renders prose. Each [`Diagnostic`] carries a stable code,
//! a severity, the unit and range it applies to, and a [`DiagnosticKind`]
//! holding the contextual data a renderer needs.

use smol_str::SmolStr;

use crate::base::{FileId, LineCol, LineIndex, TextRange};
use crate::checker::AnnotationKind;
use crate::options::LuaTarget;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// What went wrong, with the data needed to explain it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `$multi` used as a value instead of being called.
    InvalidMultiFunctionUse,
    /// An operator-mapping declaration referenced as a bare value.
    InvalidOperatorMappingUse,
    /// A table-extension declaration referenced as a bare value.
    InvalidTableExtensionUse,
    /// `$vararg` used anywhere but as a spread.
    InvalidVarargUse,
    /// `$range` used anywhere but as a `for...of` iterable.
    InvalidRangeUse,
    /// A legacy annotation that no longer has any effect.
    AnnotationRemoved { kind: AnnotationKind },
    /// An ambient declaration whose name cannot exist in Lua.
    InvalidAmbientIdentifierName { name: SmolStr },
    /// A language feature the selected Lua target does not provide.
    UnsupportedForTarget { feature: SmolStr, target: LuaTarget },

    UnknownCompilerOption { name: SmolStr },
    CompilerOptionRequiresValueOfType { name: SmolStr, expected: SmolStr },
    ArgumentForOptionMustBe { flag: SmolStr, choices: SmolStr },
    CompilerOptionExpectsAnArgument { name: SmolStr },
    /// Transpiler options were given at the root of the config instead of
    /// inside the `tstl` object.
    OptionsMovingToTstlObject,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::InvalidMultiFunctionUse => codes::INVALID_MULTI_FUNCTION_USE,
            DiagnosticKind::InvalidOperatorMappingUse => codes::INVALID_OPERATOR_MAPPING_USE,
            DiagnosticKind::InvalidTableExtensionUse => codes::INVALID_TABLE_EXTENSION_USE,
            DiagnosticKind::InvalidVarargUse => codes::INVALID_VARARG_USE,
            DiagnosticKind::InvalidRangeUse => codes::INVALID_RANGE_USE,
            DiagnosticKind::AnnotationRemoved { .. } => codes::ANNOTATION_REMOVED,
            DiagnosticKind::InvalidAmbientIdentifierName { .. } => {
                codes::INVALID_AMBIENT_IDENTIFIER_NAME
            }
            DiagnosticKind::UnsupportedForTarget { .. } => codes::UNSUPPORTED_FOR_TARGET,
            DiagnosticKind::UnknownCompilerOption { .. } => codes::UNKNOWN_COMPILER_OPTION,
            DiagnosticKind::CompilerOptionRequiresValueOfType { .. } => {
                codes::OPTION_REQUIRES_VALUE_OF_TYPE
            }
            DiagnosticKind::ArgumentForOptionMustBe { .. } => codes::ARGUMENT_FOR_OPTION_MUST_BE,
            DiagnosticKind::CompilerOptionExpectsAnArgument { .. } => {
                codes::OPTION_EXPECTS_AN_ARGUMENT
            }
            DiagnosticKind::OptionsMovingToTstlObject => codes::OPTIONS_MOVING_TO_TSTL_OBJECT,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::AnnotationRemoved { .. } => Severity::Info,
            DiagnosticKind::OptionsMovingToTstlObject => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A diagnostic record. Never mutated once pushed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The unit this diagnostic belongs to; `None` for configuration
    /// diagnostics raised before any unit exists.
    pub file: Option<FileId>,
    pub range: Option<TextRange>,
    pub severity: Severity,
    pub code: &'static str,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// A diagnostic attached to a source range.
    pub fn at(file: FileId, range: TextRange, kind: DiagnosticKind) -> Self {
        Self {
            file: Some(file),
            range: Some(range),
            severity: kind.severity(),
            code: kind.code(),
            kind,
        }
    }

    /// A diagnostic with no source location (configuration problems).
    pub fn global(kind: DiagnosticKind) -> Self {
        Self {
            file: None,
            range: None,
            severity: kind.severity(),
            code: kind.code(),
            kind,
        }
    }

    /// Display position of the start of the range, for renderers.
    pub fn start_line_col(&self, index: &LineIndex) -> Option<LineCol> {
        self.range.map(|range| index.line_col(range.start()))
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
pub mod codes {
    pub const INVALID_MULTI_FUNCTION_USE: &str = "L1001";
    pub const INVALID_OPERATOR_MAPPING_USE: &str = "L1002";
    pub const INVALID_TABLE_EXTENSION_USE: &str = "L1003";
    pub const INVALID_VARARG_USE: &str = "L1004";
    pub const INVALID_RANGE_USE: &str = "L1005";
    pub const INVALID_AMBIENT_IDENTIFIER_NAME: &str = "L1006";
    pub const UNSUPPORTED_FOR_TARGET: &str = "L1007";
    /// Legacy annotation no longer supported.
    pub const ANNOTATION_REMOVED: &str = "L1101";

    pub const UNKNOWN_COMPILER_OPTION: &str = "C2001";
    pub const OPTION_REQUIRES_VALUE_OF_TYPE: &str = "C2002";
    pub const ARGUMENT_FOR_OPTION_MUST_BE: &str = "C2003";
    pub const OPTION_EXPECTS_AN_ARGUMENT: &str = "C2004";
    pub const OPTIONS_MOVING_TO_TSTL_OBJECT: &str = "C2101";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Append-only, insertion-ordered diagnostic sink.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics for a specific unit, in insertion order.
    pub fn diagnostics_for_file(&self, file: FileId) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.file == Some(file))
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Extend<Diagnostic> for DiagnosticCollector {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}
