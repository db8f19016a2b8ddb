//! Standard-library globals that need special treatment in Lua.
//!
//! Like extension markers, builtins are recognised by declaration identity:
//! a user class named `Promise` is left alone.

use rustc_hash::FxHashMap;

use crate::checker::{Library, SymbolRef, TypeChecker, TypeRef};
use crate::error::TransformError;
use crate::lua::{LuaBinaryOperator, LuaExpression, LuaIdentifier};
use crate::lualib::LuaLibFeature;
use crate::syntax::Identifier;

use super::TransformationContext;

/// Standard-library types whose values need a lualib feature at runtime.
const RUNTIME_TYPES: &[(&str, LuaLibFeature)] = &[
    ("Map", LuaLibFeature::Map),
    ("Set", LuaLibFeature::Set),
    ("WeakMap", LuaLibFeature::WeakMap),
    ("WeakSet", LuaLibFeature::WeakSet),
    ("Error", LuaLibFeature::Error),
    ("RangeError", LuaLibFeature::Error),
    ("ReferenceError", LuaLibFeature::Error),
    ("SyntaxError", LuaLibFeature::Error),
    ("TypeError", LuaLibFeature::Error),
    ("URIError", LuaLibFeature::Error),
];

/// A builtin replaced by a lualib entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltinSubstitution {
    pub feature: LuaLibFeature,
}

impl BuiltinSubstitution {
    /// The identifier bound to the feature's entry point. It stands for the
    /// polyfill, not the source symbol, so it carries no symbol identity.
    pub fn identifier(self, source: &Identifier) -> LuaIdentifier {
        LuaIdentifier::new(self.feature.entry_point())
            .with_range(source.range)
            .with_original_name(source.text.clone())
    }
}

/// Global values with a direct Lua spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinValue {
    /// `0 / 0`
    NaN,
    /// `math.huge`
    Infinity,
    /// `_G`
    GlobalThis,
}

/// Builtin declarations by identity, bound once per program.
#[derive(Clone, Debug, Default)]
pub struct BuiltinTable {
    promise: Option<SymbolRef>,
    values: FxHashMap<SymbolRef, BuiltinValue>,
    runtime_types: FxHashMap<SymbolRef, LuaLibFeature>,
}

impl BuiltinTable {
    pub fn bind(checker: &dyn TypeChecker) -> Self {
        let lookup = |name: &str| checker.library_declaration(Library::Standard, name);

        let values = [
            ("NaN", BuiltinValue::NaN),
            ("Infinity", BuiltinValue::Infinity),
            ("globalThis", BuiltinValue::GlobalThis),
        ]
        .into_iter()
        .filter_map(|(name, value)| lookup(name).map(|symbol| (symbol, value)))
        .collect();

        let runtime_types = RUNTIME_TYPES
            .iter()
            .filter_map(|&(name, feature)| lookup(name).map(|symbol| (symbol, feature)))
            .collect();

        Self {
            promise: lookup("Promise"),
            values,
            runtime_types,
        }
    }

    /// Identifier substitution for a reference, if it names a builtin that
    /// Lua must get from lualib.
    pub fn substitute(
        &self,
        checker: &dyn TypeChecker,
        symbol: Option<SymbolRef>,
        ty: TypeRef,
    ) -> Option<BuiltinSubstitution> {
        let symbol = checker.aliased_symbol(symbol?);
        (Some(symbol) == self.promise && checker.is_standard_library_type(ty)).then_some(
            BuiltinSubstitution {
                feature: LuaLibFeature::Promise,
            },
        )
    }

    /// The feature a value of type `ty` needs, without substituting the
    /// reference itself.
    pub fn runtime_feature(&self, checker: &dyn TypeChecker, ty: TypeRef) -> Option<LuaLibFeature> {
        if !checker.is_standard_library_type(ty) {
            return None;
        }
        let symbol = checker.type_symbol(ty)?;
        self.runtime_types
            .get(&checker.aliased_symbol(symbol))
            .copied()
    }

    /// The builtin value a symbol is, if any.
    pub fn value_of(&self, checker: &dyn TypeChecker, symbol: SymbolRef) -> Option<BuiltinValue> {
        self.values.get(&checker.aliased_symbol(symbol)).copied()
    }
}

/// Fast path for builtin globals read as values.
///
/// `globalThis` keeps its symbol identity and original spelling so later
/// passes can still trace it.
pub fn transform_builtin_identifier_expression(
    ctx: &mut TransformationContext<'_>,
    identifier: &Identifier,
) -> Result<Option<LuaExpression>, TransformError> {
    let Some(symbol) = ctx.checker.symbol_at(identifier.node) else {
        return Ok(None);
    };
    let Some(value) = ctx.bindings.builtins.value_of(ctx.checker, symbol) else {
        return Ok(None);
    };

    tracing::trace!(name = %identifier.text, ?value, "builtin value");
    let expression = match value {
        BuiltinValue::NaN => LuaExpression::binary(
            LuaBinaryOperator::Div,
            LuaExpression::Numeric(0.0),
            LuaExpression::Numeric(0.0),
        ),
        BuiltinValue::Infinity => LuaExpression::table_index(
            LuaExpression::identifier("math"),
            LuaExpression::string("huge"),
        ),
        BuiltinValue::GlobalThis => {
            let id = ctx.symbol_id(symbol, identifier.range)?;
            LuaIdentifier::new("_G")
                .with_range(identifier.range)
                .with_symbol_id(id)
                .with_original_name(identifier.text.clone())
                .into()
        }
    };
    Ok(Some(expression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{DeclFlags, ProgramModel};

    #[test]
    fn test_promise_by_identity() {
        let mut program = ProgramModel::new();
        let promise = program.declare_library(Library::Standard, "Promise");
        let ty = program.standard_type(promise);
        let file = program.add_source_file("main.ts", true);
        let user_promise = program.declare(file, "Promise", DeclFlags::LOCAL);
        let user_ty = program.user_type(user_promise);
        let table = BuiltinTable::bind(&program);

        assert_eq!(
            table.substitute(&program, Some(promise), ty),
            Some(BuiltinSubstitution {
                feature: LuaLibFeature::Promise
            })
        );
        assert_eq!(table.substitute(&program, Some(user_promise), user_ty), None);
        assert_eq!(table.substitute(&program, None, ty), None);
    }

    #[test]
    fn test_runtime_feature_by_type() {
        let mut program = ProgramModel::new();
        let map = program.declare_library(Library::Standard, "Map");
        let range_error = program.declare_library(Library::Standard, "RangeError");
        let map_ty = program.standard_type(map);
        let error_ty = program.standard_type(range_error);
        let file = program.add_source_file("main.ts", true);
        let user_map = program.declare(file, "Map", DeclFlags::LOCAL);
        let user_ty = program.user_type(user_map);
        let table = BuiltinTable::bind(&program);

        assert_eq!(table.runtime_feature(&program, map_ty), Some(LuaLibFeature::Map));
        assert_eq!(table.runtime_feature(&program, error_ty), Some(LuaLibFeature::Error));
        assert_eq!(table.runtime_feature(&program, user_ty), None);
    }

    #[test]
    fn test_builtin_values() {
        let mut program = ProgramModel::new();
        let nan = program.declare_library(Library::Standard, "NaN");
        let file = program.add_source_file("main.ts", true);
        let alias = program.alias(file, "notANumber", nan);
        let table = BuiltinTable::bind(&program);

        assert_eq!(table.value_of(&program, nan), Some(BuiltinValue::NaN));
        assert_eq!(table.value_of(&program, alias), Some(BuiltinValue::NaN));
    }
}
