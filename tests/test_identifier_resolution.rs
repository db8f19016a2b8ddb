//! Identifier resolution through the in-memory program model.
//!
//! Each test builds a small program, binds the library tables, and runs the
//! pipeline inside one transformation context, checking the produced Lua
//! together with the diagnostics and feature imports it left behind.

use lunar::base::FileId;
use lunar::checker::{
    AnnotationKind, DeclFlags, Library, ProgramModel, ScopeRef, SymbolRef, TypeData,
};
use lunar::diagnostics::{Diagnostic, DiagnosticKind, Severity};
use lunar::lua::{LuaExpression, LuaIdentifier};
use lunar::lualib::{LuaLibFeature, LuaLibFeatureSet};
use lunar::options::{CompilerOptions, LuaTarget};
use lunar::syntax::{Identifier, SourceExpression};
use lunar::transform::{
    LibraryBindings, SymbolId, TransformationContext, transform_expression,
    transform_for_of_iterable, transform_identifier, transform_identifier_expression,
};
use lunar::{TransformError, TextRange};

// ============================================================================
// FIXTURE
// ============================================================================

struct Fixture {
    program: ProgramModel,
    file: ScopeRef,
}

impl Fixture {
    fn new() -> Self {
        let mut program = ProgramModel::new();
        let file = program.add_source_file("main.ts", true);
        Self { program, file }
    }

    fn extension(&mut self, name: &str) -> SymbolRef {
        self.program.declare_library(Library::LanguageExtensions, name)
    }

    /// A standard-library declaration whose references have a
    /// standard-library type backed by the declaration itself.
    fn standard(&mut self, name: &str) -> SymbolRef {
        let symbol = self.program.declare_library(Library::Standard, name);
        let ty = self.program.standard_type(symbol);
        self.program.set_symbol_type(symbol, ty);
        symbol
    }

    fn local(&mut self, name: &str) -> SymbolRef {
        self.program.declare(self.file, name, DeclFlags::LOCAL)
    }

    /// A local whose type is the extension declaration `extension`.
    fn typed_with(&mut self, name: &str, extension: SymbolRef) -> SymbolRef {
        let symbol = self.program.declare(self.file, name, DeclFlags::AMBIENT);
        let ty = self.program.user_type(extension);
        self.program.set_symbol_type(symbol, ty);
        symbol
    }

    fn reference(&mut self, symbol: SymbolRef, text: &str) -> Identifier {
        self.program.reference(symbol, text)
    }

    fn run<R>(
        &self,
        options: &CompilerOptions,
        f: impl FnOnce(&mut TransformationContext<'_>) -> R,
    ) -> (R, Vec<Diagnostic>, LuaLibFeatureSet) {
        let bindings = LibraryBindings::bind(&self.program);
        let mut ctx = TransformationContext::new(&self.program, options, &bindings, FileId::new(0));
        let result = f(&mut ctx);
        let (diagnostics, features) = ctx.finish();
        (result, diagnostics, features)
    }

    fn resolve(&self, identifier: &Identifier) -> (LuaIdentifier, Vec<Diagnostic>, LuaLibFeatureSet) {
        let (result, diagnostics, features) =
            self.run(&CompilerOptions::default(), |ctx| transform_identifier(ctx, identifier));
        (result.unwrap(), diagnostics, features)
    }

    fn lower(
        &self,
        target: LuaTarget,
        expression: &SourceExpression,
    ) -> (LuaExpression, Vec<Diagnostic>, LuaLibFeatureSet) {
        let options = CompilerOptions {
            lua_target: target,
            ..CompilerOptions::default()
        };
        let (result, diagnostics, features) =
            self.run(&options, |ctx| transform_expression(ctx, expression));
        (result.unwrap(), diagnostics, features)
    }
}

fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
    diagnostics.iter().map(|d| d.kind.clone()).collect()
}

fn call(callee: Identifier, arguments: Vec<SourceExpression>) -> SourceExpression {
    let range = callee.range;
    SourceExpression::call(callee.into(), arguments, range)
}

fn number(value: f64) -> SourceExpression {
    SourceExpression::Numeric(value, TextRange::default())
}

// ============================================================================
// PLAIN IDENTIFIERS
// ============================================================================

#[test]
fn test_plain_local_keeps_name_and_gets_identity() {
    let mut fx = Fixture::new();
    let x = fx.local("x");
    let node = fx.reference(x, "x");

    let (lua, diagnostics, features) = fx.resolve(&node);

    assert_eq!(lua.text, "x");
    assert_eq!(lua.original_name.as_deref(), Some("x"));
    assert_eq!(lua.symbol_id.map(SymbolId::index), Some(1));
    assert_eq!(lua.range, Some(node.range));
    assert!(diagnostics.is_empty());
    assert!(features.is_empty());
}

#[test]
fn test_keyword_local_is_mangled() {
    let mut fx = Fixture::new();
    let end = fx.local("end");
    let node = fx.reference(end, "end");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert_eq!(lua.text, "____end");
    assert_eq!(lua.original_name.as_deref(), Some("end"));
    assert!(lua.symbol_id.is_some());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_unbound_identifier_is_mangled_by_spelling() {
    let mut fx = Fixture::new();
    let node = fx.program.unbound("local");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert_eq!(lua.text, "____local");
    assert_eq!(lua.symbol_id, None);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_ambient_lua_global_kept_verbatim() {
    let mut fx = Fixture::new();
    let print = fx.program.declare(fx.file, "print", DeclFlags::AMBIENT);
    let node = fx.reference(print, "print");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert_eq!(lua.text, "print");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_local_shadowing_lua_global_is_mangled() {
    let mut fx = Fixture::new();
    let print = fx.local("print");
    let node = fx.reference(print, "print");

    let (lua, _, _) = fx.resolve(&node);

    assert_eq!(lua.text, "____print");
}

#[test]
fn test_reserved_prefix_local_is_mangled_again() {
    let mut fx = Fixture::new();
    let end = fx.local("end");
    let spoof = fx.local("____end");
    let a = fx.reference(end, "end");
    let b = fx.reference(spoof, "____end");

    let (first, _, _) = fx.resolve(&a);
    let (second, diagnostics, _) = fx.resolve(&b);

    assert_eq!(first.text, "____end");
    assert_eq!(second.text, "_____5F__5F__5F__5F_end");
    assert_ne!(first.text, second.text);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_ambient_name_lua_cannot_spell_is_reported() {
    let mut fx = Fixture::new();
    let weird = fx.program.declare(fx.file, "$weird", DeclFlags::AMBIENT);
    let node = fx.reference(weird, "$weird");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert_eq!(lua.text, "_____24_weird");
    assert_eq!(
        kinds(&diagnostics),
        vec![DiagnosticKind::InvalidAmbientIdentifierName {
            name: "$weird".into()
        }]
    );
    assert_eq!(diagnostics[0].range, Some(node.range));
}

#[test]
fn test_identities_follow_symbols_not_spellings() {
    let mut fx = Fixture::new();
    let outer = fx.local("value");
    let inner = fx.local("value");
    let a = fx.reference(outer, "value");
    let b = fx.reference(inner, "value");
    let c = fx.reference(outer, "value");

    let (ids, _, _) = fx.run(&CompilerOptions::default(), |ctx| {
        [&a, &b, &c]
            .map(|node| transform_identifier(ctx, node).unwrap().symbol_id.unwrap())
    });

    assert_eq!(ids[0], ids[2]);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_optional_continuation_gets_temporary_identity() {
    let mut fx = Fixture::new();
    let x = fx.local("x");
    let node = fx.reference(x, "____opt_0").as_optional_continuation();

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert_eq!(lua.text, "____opt_0");
    assert_eq!(lua.symbol_id, Some(SymbolId::TEMP));
    assert!(diagnostics.is_empty());
}

// ============================================================================
// EXTENSION MARKERS
// ============================================================================

#[test]
fn test_bare_multi_is_replaced_and_reported_once() {
    let mut fx = Fixture::new();
    let multi = fx.extension("$multi");
    let node = fx.reference(multi, "$multi");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert!(lua.is_anonymous());
    assert_eq!(lua.range, Some(node.range));
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidMultiFunctionUse]);
    assert_eq!(diagnostics[0].severity, Severity::Error);
}

#[test]
fn test_bare_vararg_and_range_are_replaced() {
    let mut fx = Fixture::new();
    let vararg = fx.extension("$vararg");
    let range = fx.extension("$range");
    let a = fx.reference(vararg, "$vararg");
    let b = fx.reference(range, "$range");

    let ((first, second), diagnostics, _) = fx.run(&CompilerOptions::default(), |ctx| {
        (
            transform_identifier(ctx, &a).unwrap(),
            transform_identifier(ctx, &b).unwrap(),
        )
    });

    assert!(first.is_anonymous());
    assert!(second.is_anonymous());
    assert_eq!(
        kinds(&diagnostics),
        vec![DiagnosticKind::InvalidVarargUse, DiagnosticKind::InvalidRangeUse]
    );
}

#[test]
fn test_marker_recognised_through_import_alias() {
    let mut fx = Fixture::new();
    let multi = fx.extension("$multi");
    let alias = fx.program.alias(fx.file, "multi", multi);
    let node = fx.reference(alias, "multi");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert!(lua.is_anonymous());
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidMultiFunctionUse]);
}

#[test]
fn test_user_variable_cannot_spoof_marker() {
    let mut fx = Fixture::new();
    fx.extension("$multi");
    let spoof = fx.local("$multi");
    let node = fx.reference(spoof, "$multi");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert!(!lua.is_anonymous());
    assert_eq!(lua.text, "_____24_multi");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_bare_operator_mapping_is_reported_but_kept() {
    let mut fx = Fixture::new();
    let addition = fx.extension("LuaAddition");
    let add = fx.typed_with("add", addition);
    let node = fx.reference(add, "add");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert_eq!(lua.text, "add");
    assert!(lua.symbol_id.is_some());
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidOperatorMappingUse]);
}

#[test]
fn test_bare_table_extension_is_reported_but_kept() {
    let mut fx = Fixture::new();
    let get = fx.extension("LuaTableGet");
    let node = fx.reference(get, "LuaTableGet");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert_eq!(lua.text, "LuaTableGet");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidTableExtensionUse]);
}

#[test]
fn test_for_range_annotation_warns_without_changing_node() {
    let mut fx = Fixture::new();
    let r = fx.local("r");
    let ty = fx.program.add_type(TypeData {
        symbol: None,
        standard_library: false,
        annotations: vec![AnnotationKind::ForRange],
    });
    fx.program.set_symbol_type(r, ty);
    let node = fx.reference(r, "r");

    let (lua, diagnostics, _) = fx.resolve(&node);

    assert_eq!(lua.text, "r");
    assert_eq!(
        kinds(&diagnostics),
        vec![DiagnosticKind::AnnotationRemoved {
            kind: AnnotationKind::ForRange
        }]
    );
    assert_eq!(diagnostics[0].severity, Severity::Info);
}

// ============================================================================
// BUILTINS
// ============================================================================

#[test]
fn test_promise_becomes_lualib_entry_point() {
    let mut fx = Fixture::new();
    let promise = fx.standard("Promise");
    let node = fx.reference(promise, "Promise");

    let (lua, diagnostics, features) = fx.resolve(&node);

    assert_eq!(lua.text, "__TS__Promise");
    assert_eq!(lua.original_name.as_deref(), Some("Promise"));
    assert_eq!(lua.symbol_id, None);
    assert!(diagnostics.is_empty());
    assert!(features.contains(LuaLibFeature::Promise));
    // Dependencies were imported ahead of the feature itself.
    let order: Vec<_> = features.iter().collect();
    assert_eq!(order.last(), Some(&LuaLibFeature::Promise));
    assert!(features.contains(LuaLibFeature::Class));
}

#[test]
fn test_user_promise_class_is_left_alone() {
    let mut fx = Fixture::new();
    fx.standard("Promise");
    let mine = fx.local("Promise");
    let ty = fx.program.user_type(mine);
    fx.program.set_symbol_type(mine, ty);
    let node = fx.reference(mine, "Promise");

    let (lua, _, features) = fx.resolve(&node);

    assert_eq!(lua.text, "Promise");
    assert!(features.is_empty());
}

#[test]
fn test_runtime_type_imports_without_substitution() {
    let mut fx = Fixture::new();
    let map = fx.standard("Map");
    let m = fx.local("m");
    let map_ty = fx.program.standard_type(map);
    fx.program.set_symbol_type(m, map_ty);
    let node = fx.reference(m, "m");

    let (lua, diagnostics, features) = fx.resolve(&node);

    assert_eq!(lua.text, "m");
    assert!(diagnostics.is_empty());
    assert!(features.contains(LuaLibFeature::Map));
}

#[test]
fn test_builtin_values_in_read_position() {
    let mut fx = Fixture::new();
    let nan = fx.standard("NaN");
    let infinity = fx.standard("Infinity");
    let global = fx.standard("globalThis");
    let a = fx.reference(nan, "NaN");
    let b = fx.reference(infinity, "Infinity");
    let c = fx.reference(global, "globalThis");

    let (values, diagnostics, _) = fx.run(&CompilerOptions::default(), |ctx| {
        [&a, &b, &c].map(|node| transform_identifier_expression(ctx, node).unwrap())
    });

    assert_eq!(values[0].to_string(), "0 / 0");
    assert_eq!(values[1].to_string(), "math.huge");
    let g = values[2].as_identifier().unwrap();
    assert_eq!(g.text, "_G");
    assert_eq!(g.original_name.as_deref(), Some("globalThis"));
    assert!(g.symbol_id.is_some());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_undefined_becomes_nil() {
    let mut fx = Fixture::new();
    let node = fx.program.unbound("undefined");

    let (value, _, _) = fx.run(&CompilerOptions::default(), |ctx| {
        transform_identifier_expression(ctx, &node)
    });

    assert_eq!(value, Ok(LuaExpression::Nil));
}

// ============================================================================
// SANCTIONED MARKER POSITIONS
// ============================================================================

#[test]
fn test_multi_call_produces_no_diagnostic() {
    let mut fx = Fixture::new();
    let multi = fx.extension("$multi");
    let a = fx.local("a");
    let b = fx.local("b");
    let callee = fx.reference(multi, "$multi");
    let args = vec![fx.reference(a, "a").into(), fx.reference(b, "b").into()];
    let expression = call(callee, args);

    let (lua, diagnostics, _) = fx.lower(LuaTarget::Universal, &expression);

    assert!(matches!(lua, LuaExpression::Multiple(ref values) if values.len() == 2));
    assert_eq!(lua.to_string(), "a, b");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_vararg_spread_produces_dots() {
    let mut fx = Fixture::new();
    let vararg = fx.extension("$vararg");
    let print = fx.program.declare(fx.file, "print", DeclFlags::AMBIENT);
    let callee = fx.reference(print, "print");
    let spread_range = TextRange::default();
    let inner = fx.reference(vararg, "$vararg");
    let expression = call(callee, vec![SourceExpression::spread(inner.into(), spread_range)]);

    let (lua, diagnostics, _) = fx.lower(LuaTarget::Lua54, &expression);

    assert_eq!(lua.to_string(), "print(...)");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_range_in_for_of() {
    let mut fx = Fixture::new();
    let range = fx.extension("$range");
    let callee = fx.reference(range, "$range");
    let expression = call(callee, vec![number(1.0), number(10.0), number(2.0)]);

    let (lua, diagnostics, _) = fx.run(&CompilerOptions::default(), |ctx| {
        transform_for_of_iterable(ctx, &expression)
    });

    assert_eq!(lua.unwrap().to_string(), "1, 10, 2");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_range_call_outside_for_of_is_reported() {
    let mut fx = Fixture::new();
    let range = fx.extension("$range");
    let callee = fx.reference(range, "$range");
    let expression = call(callee, vec![number(1.0), number(3.0)]);

    let (lua, diagnostics, _) = fx.lower(LuaTarget::Universal, &expression);

    assert!(lua.as_identifier().is_some_and(LuaIdentifier::is_anonymous));
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::InvalidRangeUse]);
}

#[test]
fn test_operator_mapping_call_lowers_to_operator() {
    let mut fx = Fixture::new();
    let addition = fx.extension("LuaAddition");
    let add = fx.typed_with("add", addition);
    let a = fx.local("a");
    let callee = fx.reference(add, "add");
    let args = vec![fx.reference(a, "a").into(), number(1.0)];
    let expression = call(callee, args);

    let (lua, diagnostics, _) = fx.lower(LuaTarget::Lua51, &expression);

    assert_eq!(lua.to_string(), "a + 1");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_integer_operator_unsupported_before_lua53() {
    let mut fx = Fixture::new();
    let band = fx.extension("LuaBitwiseAnd");
    let and = fx.typed_with("band", band);
    let callee = fx.reference(and, "band");
    let expression = call(callee, vec![number(6.0), number(3.0)]);

    let (lua, diagnostics, _) = fx.lower(LuaTarget::Lua51, &expression);
    assert_eq!(lua.to_string(), "6 & 3");
    assert_eq!(
        kinds(&diagnostics),
        vec![DiagnosticKind::UnsupportedForTarget {
            feature: "LuaBitwiseAnd".into(),
            target: LuaTarget::Lua51,
        }]
    );

    let (_, diagnostics, _) = fx.lower(LuaTarget::Lua53, &expression);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_operator_mapping_wrong_arity_is_fatal() {
    let mut fx = Fixture::new();
    let length = fx.extension("LuaLength");
    let len = fx.typed_with("len", length);
    let callee = fx.reference(len, "len");
    let expression = call(callee, vec![number(1.0), number(2.0)]);

    let (result, _, _) = fx.run(&CompilerOptions::default(), |ctx| {
        transform_expression(ctx, &expression)
    });

    assert_eq!(
        result,
        Err(TransformError::ExtensionArity {
            extension: "LuaLength",
            expected: 1,
            found: 2,
        })
    );
}

#[test]
fn test_table_extension_calls() {
    let mut fx = Fixture::new();
    let get = fx.extension("LuaTableGet");
    let has = fx.extension("LuaTableHas");
    let t = fx.local("t");
    let k = fx.local("k");

    let get_call = {
        let callee = fx.reference(get, "LuaTableGet");
        let args = vec![fx.reference(t, "t").into(), fx.reference(k, "k").into()];
        call(callee, args)
    };
    let has_call = {
        let callee = fx.reference(has, "LuaTableHas");
        let args = vec![fx.reference(t, "t").into(), fx.reference(k, "k").into()];
        call(callee, args)
    };

    let (get_lua, diagnostics, _) = fx.lower(LuaTarget::Universal, &get_call);
    assert_eq!(get_lua.to_string(), "t[k]");
    assert!(diagnostics.is_empty());

    let (has_lua, diagnostics, _) = fx.lower(LuaTarget::Universal, &has_call);
    assert_eq!(has_lua.to_string(), "t[k] ~= nil");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_spread_unpack_depends_on_target() {
    let mut fx = Fixture::new();
    let f = fx.local("f");
    let arr = fx.local("arr");
    let callee = fx.reference(f, "f");
    let inner = fx.reference(arr, "arr");
    let expression = call(
        callee,
        vec![SourceExpression::spread(inner.into(), TextRange::default())],
    );

    let (lua, _, features) = fx.lower(LuaTarget::Lua51, &expression);
    assert_eq!(lua.to_string(), "f(unpack(arr))");
    assert!(features.is_empty());

    let (lua, _, _) = fx.lower(LuaTarget::Lua54, &expression);
    assert_eq!(lua.to_string(), "f(table.unpack(arr))");

    let (lua, _, features) = fx.lower(LuaTarget::Universal, &expression);
    assert_eq!(lua.to_string(), "f(__TS__Unpack(arr))");
    assert!(features.contains(LuaLibFeature::Unpack));
}

#[test]
fn test_diagnostics_follow_traversal_order() {
    let mut fx = Fixture::new();
    let f = fx.local("f");
    let vararg = fx.extension("$vararg");
    let multi = fx.extension("$multi");
    let callee = fx.reference(f, "f");
    let args = vec![
        fx.reference(multi, "$multi").into(),
        fx.reference(vararg, "$vararg").into(),
    ];
    let expression = call(callee, args);

    let (lua, diagnostics, _) = fx.lower(LuaTarget::Universal, &expression);

    assert_eq!(lua.to_string(), "f(____, ____)");
    assert_eq!(
        kinds(&diagnostics),
        vec![DiagnosticKind::InvalidMultiFunctionUse, DiagnosticKind::InvalidVarargUse]
    );
}
