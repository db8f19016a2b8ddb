//! Identifier resolution.
//!
//! Two entry points:
//!
//! - [`transform_identifier`] resolves a raw identifier node into a Lua
//!   identifier: placeholder for invalid marker uses, lualib entry point for
//!   builtins, otherwise the (possibly mangled) name with its symbol
//!   identity.
//! - [`transform_identifier_expression`] handles an identifier read as a
//!   value, which may instead become an export-table access, `nil`, or a
//!   builtin value.

use crate::checker::SymbolRef;
use crate::diagnostics::DiagnosticKind;
use crate::error::TransformError;
use crate::lua::{LuaExpression, LuaIdentifier};
use crate::syntax::Identifier;

use super::TransformationContext;
use super::builtins::transform_builtin_identifier_expression;
use super::classify::{ClassificationResult, Notes, classify};
use super::export::{create_exported_identifier, export_scope_of};
use super::safe_names::{create_safe_name, has_unsafe_identifier_name};

/// Resolve an identifier node into a Lua identifier.
pub fn transform_identifier(
    ctx: &mut TransformationContext<'_>,
    identifier: &Identifier,
) -> Result<LuaIdentifier, TransformError> {
    match classify(ctx, identifier) {
        ClassificationResult::Continuation => Ok(LuaIdentifier::temporary(identifier.text.clone())),
        ClassificationResult::Marker(kind) => {
            ctx.report(identifier, kind.invalid_use());
            Ok(LuaIdentifier::anonymous(identifier.range))
        }
        ClassificationResult::Builtin(substitution, notes) => {
            report_notes(ctx, identifier, notes);
            ctx.import_feature(substitution.feature);
            Ok(substitution.identifier(identifier))
        }
        ClassificationResult::Standard(standard) => {
            report_notes(ctx, identifier, standard.notes);

            if let Some(feature) = ctx.bindings.builtins.runtime_feature(ctx.checker, standard.ty) {
                ctx.import_feature(feature);
            }

            plain_identifier(ctx, identifier, standard.symbol)
        }
    }
}

/// Resolve an identifier read as a value.
pub fn transform_identifier_expression(
    ctx: &mut TransformationContext<'_>,
    identifier: &Identifier,
) -> Result<LuaExpression, TransformError> {
    if let Some(symbol) = ctx.checker.symbol_at(identifier.node) {
        if let Some(scope) = export_scope_of(ctx, symbol)? {
            let name = ctx.checker.symbol_name(symbol);
            let text = if has_unsafe_identifier_name(ctx, identifier, Some(symbol)) {
                create_safe_name(&name).into()
            } else {
                name.clone()
            };
            let id = ctx.symbol_id(symbol, identifier.range)?;
            let exported = LuaIdentifier::new(text)
                .with_range(identifier.range)
                .with_symbol_id(id)
                .with_original_name(name);
            tracing::trace!(name = %identifier.text, path = ?scope.path(), "exported read");
            return Ok(create_exported_identifier(exported, &scope));
        }
    }

    if identifier.is_undefined_keyword() {
        return Ok(LuaExpression::Nil);
    }

    if let Some(expression) = transform_builtin_identifier_expression(ctx, identifier)? {
        return Ok(expression);
    }

    transform_identifier(ctx, identifier).map(LuaExpression::Identifier)
}

fn report_notes(ctx: &mut TransformationContext<'_>, identifier: &Identifier, notes: Notes) {
    if let Some(marker) = notes.retained_marker {
        ctx.report(identifier, marker.invalid_use());
    }
    if let Some(kind) = notes.deprecated_annotation {
        ctx.report(identifier, DiagnosticKind::AnnotationRemoved { kind });
    }
}

fn plain_identifier(
    ctx: &mut TransformationContext<'_>,
    identifier: &Identifier,
    symbol: Option<SymbolRef>,
) -> Result<LuaIdentifier, TransformError> {
    let text = if has_unsafe_identifier_name(ctx, identifier, symbol) {
        create_safe_name(&identifier.text).into()
    } else {
        identifier.text.clone()
    };

    let mut lua = LuaIdentifier::new(text)
        .with_range(identifier.range)
        .with_original_name(identifier.text.clone());
    if let Some(symbol) = symbol {
        lua = lua.with_symbol_id(ctx.symbol_id(symbol, identifier.range)?);
    }
    Ok(lua)
}
