//! The sanctioned positions of language-extension markers.
//!
//! A marker used where it is meant to be used (`$multi(...)`,
//! `...$vararg`, `for (const i of $range(...))`, an operator-mapping or
//! table-extension call) is lowered here and never reaches bare-identifier
//! resolution, so it produces no diagnostic.

use crate::diagnostics::DiagnosticKind;
use crate::error::TransformError;
use crate::lua::{LuaBinaryOperator, LuaExpression, LuaIdentifier};
use crate::lualib::LuaLibFeature;
use crate::syntax::{CallExpression, Identifier, SourceExpression};

use super::TransformationContext;
use super::extensions::{MarkerKind, OperatorLowering, TableExtensionKind};
use super::identifier::transform_identifier_expression;

/// Lower a source expression.
pub fn transform_expression(
    ctx: &mut TransformationContext<'_>,
    expression: &SourceExpression,
) -> Result<LuaExpression, TransformError> {
    match expression {
        SourceExpression::Identifier(identifier) => transform_identifier_expression(ctx, identifier),
        SourceExpression::Call(call) => transform_call(ctx, call),
        SourceExpression::Spread(inner, _) => transform_spread(ctx, inner),
        SourceExpression::Numeric(value, _) => Ok(LuaExpression::Numeric(*value)),
        SourceExpression::String(value, _) => Ok(LuaExpression::String(value.clone())),
    }
}

/// Lower the iterable of a `for...of` loop. `$range(start, limit[, step])`
/// becomes a numeric `for` header.
pub fn transform_for_of_iterable(
    ctx: &mut TransformationContext<'_>,
    iterable: &SourceExpression,
) -> Result<LuaExpression, TransformError> {
    if let SourceExpression::Call(call) = iterable {
        if callee_marker(ctx, call) == Some(MarkerKind::Range) {
            let found = call.arguments.len();
            if !(2..=3).contains(&found) {
                return Err(TransformError::ExtensionArity {
                    extension: "$range",
                    expected: if found < 2 { 2 } else { 3 },
                    found,
                });
            }
            let mut arguments = transform_arguments(ctx, &call.arguments)?.into_iter();
            let (Some(start), Some(limit)) = (arguments.next(), arguments.next()) else {
                return Err(TransformError::ExtensionArity {
                    extension: "$range",
                    expected: 2,
                    found,
                });
            };
            return Ok(LuaExpression::NumericRange {
                start: Box::new(start),
                limit: Box::new(limit),
                step: arguments.next().map(Box::new),
            });
        }
    }
    transform_expression(ctx, iterable)
}

/// Lower a call expression.
pub fn transform_call(
    ctx: &mut TransformationContext<'_>,
    call: &CallExpression,
) -> Result<LuaExpression, TransformError> {
    match callee_marker(ctx, call) {
        Some(MarkerKind::MultiReturn) => {
            let values = transform_arguments(ctx, &call.arguments)?;
            Ok(LuaExpression::Multiple(values))
        }
        Some(MarkerKind::OperatorMapping(operator)) => {
            let found = call.arguments.len();
            if found != operator.arity() {
                return Err(TransformError::ExtensionArity {
                    extension: operator.declaration_name(),
                    expected: operator.arity(),
                    found,
                });
            }
            let target = ctx.options.lua_target;
            if !operator.is_supported_by(target) {
                ctx.report_at(
                    call.range,
                    DiagnosticKind::UnsupportedForTarget {
                        feature: operator.declaration_name().into(),
                        target,
                    },
                );
            }
            let mut operands = transform_arguments(ctx, &call.arguments)?.into_iter();
            match (operator.lowering(), operands.next(), operands.next()) {
                (OperatorLowering::Binary(op), Some(left), Some(right)) => {
                    Ok(LuaExpression::binary(op, left, right))
                }
                (OperatorLowering::Unary(op), Some(operand), None) => {
                    Ok(LuaExpression::unary(op, operand))
                }
                _ => Err(TransformError::ExtensionArity {
                    extension: operator.declaration_name(),
                    expected: operator.arity(),
                    found,
                }),
            }
        }
        Some(MarkerKind::TableExtension(kind)) => {
            let found = call.arguments.len();
            let mut operands = transform_arguments(ctx, &call.arguments)?.into_iter();
            let (Some(table), Some(key), None) = (operands.next(), operands.next(), operands.next())
            else {
                return Err(TransformError::ExtensionArity {
                    extension: kind.declaration_name(),
                    expected: 2,
                    found,
                });
            };
            let access = LuaExpression::table_index(table, key);
            Ok(match kind {
                TableExtensionKind::Get => access,
                TableExtensionKind::Has => {
                    LuaExpression::binary(LuaBinaryOperator::Ne, access, LuaExpression::Nil)
                }
            })
        }
        Some(MarkerKind::Range) => {
            // Only a for...of iterable may call $range.
            ctx.report_at(call.range, DiagnosticKind::InvalidRangeUse);
            Ok(LuaIdentifier::anonymous(call.range).into())
        }
        Some(MarkerKind::Vararg) | None => {
            let callee = transform_expression(ctx, &call.callee)?;
            let arguments = transform_arguments(ctx, &call.arguments)?;
            Ok(LuaExpression::call(callee, arguments))
        }
    }
}

fn transform_arguments(
    ctx: &mut TransformationContext<'_>,
    arguments: &[SourceExpression],
) -> Result<Vec<LuaExpression>, TransformError> {
    arguments
        .iter()
        .map(|argument| transform_expression(ctx, argument))
        .collect()
}

/// `...$vararg` is Lua's `...`. Any other spread unpacks a table.
fn transform_spread(
    ctx: &mut TransformationContext<'_>,
    inner: &SourceExpression,
) -> Result<LuaExpression, TransformError> {
    if let SourceExpression::Identifier(identifier) = inner {
        if identifier_marker(ctx, identifier) == Some(MarkerKind::Vararg) {
            return Ok(LuaExpression::Dots);
        }
    }

    let value = transform_expression(ctx, inner)?;
    let unpack = match ctx.options.lua_target.unpack_function() {
        Some("table.unpack") => LuaExpression::table_index(
            LuaExpression::identifier("table"),
            LuaExpression::string("unpack"),
        ),
        Some(name) => LuaExpression::identifier(name),
        None => {
            ctx.import_feature(LuaLibFeature::Unpack);
            LuaExpression::identifier(LuaLibFeature::Unpack.entry_point())
        }
    };
    Ok(LuaExpression::call(unpack, vec![value]))
}

fn callee_marker(ctx: &TransformationContext<'_>, call: &CallExpression) -> Option<MarkerKind> {
    match call.callee.as_ref() {
        SourceExpression::Identifier(identifier) => identifier_marker(ctx, identifier),
        _ => None,
    }
}

fn identifier_marker(ctx: &TransformationContext<'_>, identifier: &Identifier) -> Option<MarkerKind> {
    let symbol = ctx.checker.symbol_at(identifier.node);
    let ty = ctx.checker.type_at(identifier.node);
    ctx.bindings.extensions.marker_of(ctx.checker, symbol, ty)
}
