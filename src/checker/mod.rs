//! Type-checker collaborator.
//!
//! The transformation core consumes the source-language type checker as a
//! black-box oracle. Every query is synchronous and side-effect free from
//! the core's point of view.
//!
//! - [`TypeChecker`] - the query surface the core relies on
//! - [`ProgramModel`] - an in-memory implementation, built through a small
//!   builder API, for embedders without their own checker and for tests

mod ids;
mod model;

pub use ids::{NodeId, ScopeRef, SymbolRef, TypeRef};
pub use model::{DeclFlags, ProgramModel, TypeData};

use smol_str::SmolStr;

/// Libraries whose declarations the core binds by identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Library {
    /// The source language's default library (`Promise`, `Map`, `NaN`, ...).
    Standard,
    /// The compiler's language-extensions module (`$multi`, `LuaAddition`, ...).
    LanguageExtensions,
}

/// Kinds of lexical scope the export resolver distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// A source file. Module files export through the `____exports` table;
    /// script files have no exports.
    SourceFile { is_module: bool },
    Namespace,
    Function,
    Block,
}

/// What the checker knows about one scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeInfo {
    pub name: SmolStr,
    pub kind: ScopeKind,
    pub parent: Option<ScopeRef>,
    /// The declaration that introduces this scope (a namespace's own symbol).
    pub symbol: Option<SymbolRef>,
}

/// Legacy JSDoc-style annotations the compiler once honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    ForRange,
    LuaIterator,
    LuaTable,
    TupleReturn,
    Vararg,
}

impl AnnotationKind {
    /// The annotation tag as written in source.
    pub fn tag(self) -> &'static str {
        match self {
            AnnotationKind::ForRange => "forRange",
            AnnotationKind::LuaIterator => "luaIterator",
            AnnotationKind::LuaTable => "luaTable",
            AnnotationKind::TupleReturn => "tupleReturn",
            AnnotationKind::Vararg => "vararg",
        }
    }
}

/// Queries the transformation core makes against the source-language
/// type checker.
pub trait TypeChecker {
    /// The symbol bound at a node, if any.
    fn symbol_at(&self, node: NodeId) -> Option<SymbolRef>;

    /// The static type at a node.
    fn type_at(&self, node: NodeId) -> TypeRef;

    /// Follow import aliases to the original declaration.
    ///
    /// Returns `symbol` itself when it is not an alias.
    fn aliased_symbol(&self, symbol: SymbolRef) -> SymbolRef;

    /// The declared name of a symbol.
    fn symbol_name(&self, symbol: SymbolRef) -> SmolStr;

    /// Whether the symbol carries an `export` modifier in its declaring scope.
    fn is_exported(&self, symbol: SymbolRef) -> bool;

    /// Whether the symbol is ambient (`declare`d to exist at runtime).
    fn is_ambient(&self, symbol: SymbolRef) -> bool;

    /// The scope that declares the symbol.
    fn declaring_scope(&self, symbol: SymbolRef) -> Option<ScopeRef>;

    fn scope_info(&self, scope: ScopeRef) -> ScopeInfo;

    /// The declaration behind a type (the class of an instance type, the
    /// alias of a branded type, ...).
    fn type_symbol(&self, ty: TypeRef) -> Option<SymbolRef>;

    /// Whether the type is declared by the standard library surface.
    fn is_standard_library_type(&self, ty: TypeRef) -> bool;

    fn type_has_annotation(&self, ty: TypeRef, kind: AnnotationKind) -> bool;

    /// Look up a well-known declaration inside a trusted library.
    fn library_declaration(&self, library: Library, name: &str) -> Option<SymbolRef>;
}
