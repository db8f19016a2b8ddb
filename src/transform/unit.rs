//! Compilation-unit driver.
//!
//! A unit is transformed sequentially in source order so that diagnostics,
//! symbol identities and feature imports come out deterministic. Independent
//! units run in parallel, each with its own [`TransformationContext`];
//! their feature sets are merged afterwards in unit order.

use rayon::prelude::*;
use thiserror::Error;

use crate::base::FileId;
use crate::checker::TypeChecker;
use crate::diagnostics::Diagnostic;
use crate::error::TransformError;
use crate::lua::LuaExpression;
use crate::lualib::LuaLibFeatureSet;
use crate::options::CompilerOptions;
use crate::syntax::SourceExpression;

use super::call::transform_expression;
use super::context::{LibraryBindings, TransformationContext};

/// The expressions of one unit, in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceUnit {
    pub file: FileId,
    pub expressions: Vec<SourceExpression>,
}

/// A transformed unit.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitOutput {
    pub file: FileId,
    pub expressions: Vec<LuaExpression>,
    pub diagnostics: Vec<Diagnostic>,
    pub features: LuaLibFeatureSet,
}

/// A unit aborted by an internal error. Diagnostics pushed before the
/// error are still valid and are kept.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{file}: {error}")]
pub struct UnitFailure {
    pub file: FileId,
    #[source]
    pub error: TransformError,
    pub diagnostics: Vec<Diagnostic>,
}

/// Transform one unit with a fresh context.
#[tracing::instrument(level = "debug", skip_all, fields(file = %unit.file))]
pub fn transform_unit(
    checker: &dyn TypeChecker,
    options: &CompilerOptions,
    bindings: &LibraryBindings,
    unit: &SourceUnit,
) -> Result<UnitOutput, UnitFailure> {
    let mut ctx = TransformationContext::new(checker, options, bindings, unit.file);

    let mut expressions = Vec::with_capacity(unit.expressions.len());
    for expression in &unit.expressions {
        match transform_expression(&mut ctx, expression) {
            Ok(lua) => expressions.push(lua),
            Err(error) => {
                let (diagnostics, _) = ctx.finish();
                tracing::debug!(%error, diagnostics = diagnostics.len(), "unit aborted");
                return Err(UnitFailure {
                    file: unit.file,
                    error,
                    diagnostics,
                });
            }
        }
    }

    let (diagnostics, features) = ctx.finish();
    tracing::debug!(
        expressions = expressions.len(),
        diagnostics = diagnostics.len(),
        features = features.len(),
        "unit transformed"
    );
    Ok(UnitOutput {
        file: unit.file,
        expressions,
        diagnostics,
        features,
    })
}

/// Transform independent units in parallel. Results are in input order.
pub fn transform_units<C>(
    checker: &C,
    options: &CompilerOptions,
    bindings: &LibraryBindings,
    units: &[SourceUnit],
) -> Vec<Result<UnitOutput, UnitFailure>>
where
    C: TypeChecker + Sync,
{
    units
        .par_iter()
        .map(|unit| transform_unit(checker, options, bindings, unit))
        .collect()
}

/// Combine the feature sets of transformed units, in unit order.
pub fn merge_features<'a>(outputs: impl IntoIterator<Item = &'a UnitOutput>) -> LuaLibFeatureSet {
    let mut merged = LuaLibFeatureSet::new();
    for output in outputs {
        merged.merge(&output.features);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{DeclFlags, ProgramModel};

    #[test]
    fn test_unit_failure_keeps_diagnostics() {
        let mut program = ProgramModel::new();
        let vararg = program.declare_library(crate::checker::Library::LanguageExtensions, "$vararg");
        let addition =
            program.declare_library(crate::checker::Library::LanguageExtensions, "LuaAddition");
        let file = program.add_source_file("main.ts", true);
        let add = program.declare(file, "add", DeclFlags::AMBIENT);
        let add_ty = program.user_type(addition);
        program.set_symbol_type(add, add_ty);

        let bare = program.reference(vararg, "$vararg");
        let callee = program.reference(add, "add");
        let call = SourceExpression::call(callee.clone().into(), vec![], callee.range);

        let bindings = LibraryBindings::bind(&program);
        let options = CompilerOptions::default();
        let unit = SourceUnit {
            file: FileId::new(0),
            expressions: vec![bare.into(), call],
        };

        let failure = transform_unit(&program, &options, &bindings, &unit).unwrap_err();
        assert_eq!(
            failure.error,
            TransformError::ExtensionArity {
                extension: "LuaAddition",
                expected: 2,
                found: 0,
            }
        );
        assert_eq!(failure.diagnostics.len(), 1);
        assert_eq!(failure.diagnostics[0].code, "L1004");
    }
}
