//! Export scopes.
//!
//! Lua has no module or namespace construct. An exported binding lives in a
//! table: `____exports` for a module file, one nested table per enclosing
//! exported namespace. Reads of such a binding go through that table chain.

use smol_str::SmolStr;

use crate::checker::{ScopeKind, SymbolRef};
use crate::error::TransformError;
use crate::lua::{LuaExpression, LuaIdentifier};

use super::TransformationContext;
use super::safe_names::{create_safe_name, needs_mangling};

/// Name of the table a module file exports through.
pub const EXPORTS_TABLE: &str = "____exports";

/// Scope chains deeper than this are treated as cyclic.
const MAX_SCOPE_DEPTH: usize = 4096;

/// Where an exported symbol lives: a table path, outermost table first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportScope {
    path: Vec<SmolStr>,
}

impl ExportScope {
    pub fn new(path: Vec<SmolStr>) -> Self {
        Self { path }
    }

    /// Table names from the export boundary inward. Never empty.
    pub fn path(&self) -> &[SmolStr] {
        &self.path
    }

    /// The access expression for the table the symbol is a field of.
    ///
    /// A root other than `____exports` is a namespace local and is spelled
    /// the way its declaration is, mangled if need be. Inner segments are
    /// table keys and keep their source names.
    pub fn table_expression(&self) -> LuaExpression {
        let mut segments = self.path.iter();
        let root = match segments.next() {
            None => LuaExpression::identifier(EXPORTS_TABLE),
            Some(name) if name == EXPORTS_TABLE => LuaExpression::identifier(name.clone()),
            Some(name) if needs_mangling(name) => LuaIdentifier::new(create_safe_name(name))
                .with_original_name(name.clone())
                .into(),
            Some(name) => LuaExpression::identifier(name.clone()),
        };
        segments.fold(root, |table, name| {
            LuaExpression::table_index(table, LuaExpression::string(name.clone()))
        })
    }
}

/// The export scope of `symbol`, or `None` when references use a plain
/// local.
///
/// Walks outward from the declaring scope. A module file is the boundary
/// (table `____exports`). A namespace contributes its own name and is the
/// boundary unless the namespace is itself exported from its parent. Script
/// files, functions and blocks have no export table.
pub fn export_scope_of(
    ctx: &TransformationContext<'_>,
    symbol: SymbolRef,
) -> Result<Option<ExportScope>, TransformError> {
    let checker = ctx.checker;
    if !checker.is_exported(symbol) {
        return Ok(None);
    }
    let Some(mut scope) = checker.declaring_scope(symbol) else {
        return Ok(None);
    };

    let mut path = Vec::new();
    let mut depth = 0;
    loop {
        depth += 1;
        if depth > MAX_SCOPE_DEPTH {
            return Err(TransformError::ScopeCycle {
                symbol: checker.symbol_name(symbol),
            });
        }

        let info = checker.scope_info(scope);
        match info.kind {
            ScopeKind::SourceFile { is_module: true } => {
                path.push(SmolStr::new_static(EXPORTS_TABLE));
                break;
            }
            ScopeKind::SourceFile { is_module: false } | ScopeKind::Function | ScopeKind::Block => {
                return Ok(None);
            }
            ScopeKind::Namespace => {
                path.push(info.name.clone());
                let nested_export = info.symbol.is_some_and(|ns| checker.is_exported(ns));
                match info.parent {
                    Some(parent) if nested_export => scope = parent,
                    _ => break,
                }
            }
        }
    }

    path.reverse();
    Ok(Some(ExportScope::new(path)))
}

/// `scope.path.name` for an exported identifier.
pub fn create_exported_identifier(identifier: LuaIdentifier, scope: &ExportScope) -> LuaExpression {
    let key = LuaExpression::string(
        identifier
            .original_name
            .clone()
            .unwrap_or_else(|| identifier.text.clone()),
    );
    LuaExpression::table_index(scope.table_expression(), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_expression() {
        let scope = ExportScope::new(vec!["____exports".into(), "Outer".into(), "Inner".into()]);
        assert_eq!(scope.table_expression().to_string(), "____exports.Outer.Inner");
    }

    #[test]
    fn test_namespace_root_is_mangled_like_its_declaration() {
        let keyword = ExportScope::new(vec!["end".into(), "Inner".into()]);
        assert_eq!(keyword.table_expression().to_string(), "____end.Inner");

        let builtin = ExportScope::new(vec!["print".into()]);
        assert_eq!(builtin.table_expression().to_string(), "____print");

        let plain = ExportScope::new(vec!["Outer".into(), "end".into()]);
        assert_eq!(plain.table_expression().to_string(), "Outer[\"end\"]");
    }

    #[test]
    fn test_exported_identifier_uses_source_name() {
        let scope = ExportScope::new(vec!["____exports".into()]);
        let identifier = LuaIdentifier::new("____end").with_original_name("end");
        assert_eq!(
            create_exported_identifier(identifier, &scope).to_string(),
            "____exports[\"end\"]"
        );
    }
}
