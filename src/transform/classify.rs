//! What kind of identifier is this?
//!
//! [`classify`] answers with one [`ClassificationResult`], querying the
//! checker once per fact. The pipeline then acts on the variant without
//! asking again. Classification never pushes diagnostics or imports
//! features; it only reports what applies.

use crate::checker::{AnnotationKind, SymbolRef, TypeRef};
use crate::syntax::Identifier;

use super::TransformationContext;
use super::builtins::BuiltinSubstitution;
use super::extensions::MarkerKind;

/// Facts that do not change the outcome but still need reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Notes {
    /// A marker that is reported but keeps the original identifier.
    pub retained_marker: Option<MarkerKind>,
    /// A legacy annotation found on the identifier's type.
    pub deprecated_annotation: Option<AnnotationKind>,
}

/// An identifier resolved the ordinary way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StandardIdentifier {
    pub symbol: Option<SymbolRef>,
    pub ty: TypeRef,
    pub notes: Notes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassificationResult {
    /// Synthetic continuation of a short-circuited optional chain.
    Continuation,
    /// A marker whose bare reference is replaced by a placeholder.
    Marker(MarkerKind),
    /// A builtin the emitted code gets from lualib.
    Builtin(BuiltinSubstitution, Notes),
    Standard(StandardIdentifier),
}

/// Classify one identifier node.
pub fn classify(ctx: &TransformationContext<'_>, identifier: &Identifier) -> ClassificationResult {
    if identifier.optional_continuation {
        return ClassificationResult::Continuation;
    }

    let checker = ctx.checker;
    let symbol = checker.symbol_at(identifier.node);
    let ty = checker.type_at(identifier.node);

    let marker = ctx.bindings.extensions.marker_of(checker, symbol, ty);
    if let Some(kind) = marker.filter(|kind| kind.substitutes()) {
        tracing::trace!(name = %identifier.text, ?kind, "substituting marker");
        return ClassificationResult::Marker(kind);
    }

    let notes = Notes {
        retained_marker: marker,
        deprecated_annotation: checker
            .type_has_annotation(ty, AnnotationKind::ForRange)
            .then_some(AnnotationKind::ForRange),
    };

    if let Some(substitution) = ctx.bindings.builtins.substitute(checker, symbol, ty) {
        tracing::trace!(name = %identifier.text, feature = %substitution.feature, "builtin");
        return ClassificationResult::Builtin(substitution, notes);
    }

    tracing::trace!(name = %identifier.text, ?symbol, "standard identifier");
    ClassificationResult::Standard(StandardIdentifier { symbol, ty, notes })
}
