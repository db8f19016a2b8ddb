//! In-memory program model implementing [`TypeChecker`].
//!
//! Symbols, scopes and types are stored in flat vectors and referenced by
//! index from every other map, so handles stay valid for the life of the
//! model. Nodes are created through [`ProgramModel::reference`] and
//! friends, which bind them to a symbol and a type in one step.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::{
    AnnotationKind, Library, NodeId, ScopeInfo, ScopeKind, ScopeRef, SymbolRef, TypeChecker,
    TypeRef,
};
use crate::base::{TextRange, TextSize};
use crate::syntax::Identifier;

/// Declaration modifiers relevant to identifier resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeclFlags {
    pub exported: bool,
    pub ambient: bool,
}

impl DeclFlags {
    pub const LOCAL: Self = Self {
        exported: false,
        ambient: false,
    };
    pub const EXPORTED: Self = Self {
        exported: true,
        ambient: false,
    };
    pub const AMBIENT: Self = Self {
        exported: false,
        ambient: true,
    };
}

#[derive(Clone, Debug)]
struct SymbolData {
    name: SmolStr,
    scope: Option<ScopeRef>,
    flags: DeclFlags,
    alias_of: Option<SymbolRef>,
    /// Type given to references of this symbol.
    ty: Option<TypeRef>,
}

/// A static type in the model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeData {
    pub symbol: Option<SymbolRef>,
    pub standard_library: bool,
    pub annotations: Vec<AnnotationKind>,
}

/// An in-memory [`TypeChecker`].
#[derive(Clone, Debug)]
pub struct ProgramModel {
    symbols: Vec<SymbolData>,
    scopes: Vec<ScopeInfo>,
    types: Vec<TypeData>,
    node_symbols: FxHashMap<NodeId, SymbolRef>,
    node_types: FxHashMap<NodeId, TypeRef>,
    libraries: FxHashMap<(Library, SmolStr), SymbolRef>,
    library_scopes: FxHashMap<Library, ScopeRef>,
    next_node: u32,
    next_offset: u32,
}

impl Default for ProgramModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramModel {
    /// Type given to nodes nothing else was recorded for.
    pub const UNKNOWN_TYPE: TypeRef = TypeRef::new(0);

    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: Vec::new(),
            types: vec![TypeData::default()],
            node_symbols: FxHashMap::default(),
            node_types: FxHashMap::default(),
            libraries: FxHashMap::default(),
            library_scopes: FxHashMap::default(),
            next_node: 0,
            next_offset: 0,
        }
    }

    // ========================================================================
    // SCOPES
    // ========================================================================

    pub fn add_source_file(&mut self, name: &str, is_module: bool) -> ScopeRef {
        self.push_scope(ScopeInfo {
            name: name.into(),
            kind: ScopeKind::SourceFile { is_module },
            parent: None,
            symbol: None,
        })
    }

    /// Add a namespace, declaring its own symbol in `parent`.
    pub fn add_namespace(&mut self, parent: ScopeRef, name: &str, flags: DeclFlags) -> ScopeRef {
        let symbol = self.declare(parent, name, flags);
        self.push_scope(ScopeInfo {
            name: name.into(),
            kind: ScopeKind::Namespace,
            parent: Some(parent),
            symbol: Some(symbol),
        })
    }

    /// Add a function or block scope.
    pub fn add_scope(&mut self, parent: ScopeRef, kind: ScopeKind, name: &str) -> ScopeRef {
        self.push_scope(ScopeInfo {
            name: name.into(),
            kind,
            parent: Some(parent),
            symbol: None,
        })
    }

    /// Re-parent a scope. Only meant for constructing malformed programs.
    pub fn set_scope_parent(&mut self, scope: ScopeRef, parent: Option<ScopeRef>) {
        if let Some(info) = self.scopes.get_mut(scope.index() as usize) {
            info.parent = parent;
        }
    }

    fn push_scope(&mut self, info: ScopeInfo) -> ScopeRef {
        let scope = ScopeRef::new(self.scopes.len() as u32);
        self.scopes.push(info);
        scope
    }

    // ========================================================================
    // SYMBOLS
    // ========================================================================

    pub fn declare(&mut self, scope: ScopeRef, name: &str, flags: DeclFlags) -> SymbolRef {
        self.push_symbol(SymbolData {
            name: name.into(),
            scope: Some(scope),
            flags,
            alias_of: None,
            ty: None,
        })
    }

    /// Declare an import alias of `target` in `scope`.
    pub fn alias(&mut self, scope: ScopeRef, name: &str, target: SymbolRef) -> SymbolRef {
        let ty = self.symbol_data(target).and_then(|data| data.ty);
        self.push_symbol(SymbolData {
            name: name.into(),
            scope: Some(scope),
            flags: DeclFlags::LOCAL,
            alias_of: Some(target),
            ty,
        })
    }

    /// Declare a well-known ambient declaration inside a trusted library.
    pub fn declare_library(&mut self, library: Library, name: &str) -> SymbolRef {
        let scope = match self.library_scopes.get(&library) {
            Some(&scope) => scope,
            None => {
                let file = match library {
                    Library::Standard => "lib.es.d.ts",
                    Library::LanguageExtensions => "language-extensions.d.ts",
                };
                let scope = self.add_source_file(file, false);
                self.library_scopes.insert(library, scope);
                scope
            }
        };
        let symbol = self.declare(scope, name, DeclFlags::AMBIENT);
        self.libraries.insert((library, name.into()), symbol);
        symbol
    }

    /// Set the type references to `symbol` get.
    pub fn set_symbol_type(&mut self, symbol: SymbolRef, ty: TypeRef) {
        if let Some(data) = self.symbols.get_mut(symbol.index() as usize) {
            data.ty = Some(ty);
        }
    }

    fn push_symbol(&mut self, data: SymbolData) -> SymbolRef {
        let symbol = SymbolRef::new(self.symbols.len() as u32);
        self.symbols.push(data);
        symbol
    }

    fn symbol_data(&self, symbol: SymbolRef) -> Option<&SymbolData> {
        self.symbols.get(symbol.index() as usize)
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    pub fn add_type(&mut self, data: TypeData) -> TypeRef {
        let ty = TypeRef::new(self.types.len() as u32);
        self.types.push(data);
        ty
    }

    /// A type declared by the standard library, backed by `symbol`.
    pub fn standard_type(&mut self, symbol: SymbolRef) -> TypeRef {
        self.add_type(TypeData {
            symbol: Some(symbol),
            standard_library: true,
            annotations: Vec::new(),
        })
    }

    /// A user-declared type backed by `symbol`.
    pub fn user_type(&mut self, symbol: SymbolRef) -> TypeRef {
        self.add_type(TypeData {
            symbol: Some(symbol),
            standard_library: false,
            annotations: Vec::new(),
        })
    }

    fn type_data(&self, ty: TypeRef) -> Option<&TypeData> {
        self.types.get(ty.index() as usize)
    }

    // ========================================================================
    // NODES
    // ========================================================================

    /// Create an identifier node referencing `symbol`, spelled `text`.
    ///
    /// The node gets the symbol's type, if one was set.
    pub fn reference(&mut self, symbol: SymbolRef, text: &str) -> Identifier {
        let identifier = self.unbound(text);
        self.node_symbols.insert(identifier.node, symbol);
        if let Some(ty) = self.symbol_data(symbol).and_then(|data| data.ty) {
            self.node_types.insert(identifier.node, ty);
        }
        identifier
    }

    /// Create an identifier node bound to no symbol.
    pub fn unbound(&mut self, text: &str) -> Identifier {
        let node = NodeId::new(self.next_node);
        self.next_node += 1;

        // Lay identifiers out one per "line" so ranges never overlap.
        let start = self.next_offset;
        let end = start + text.len() as u32;
        self.next_offset = end + 1;

        Identifier::new(
            node,
            text,
            TextRange::new(TextSize::from(start), TextSize::from(end)),
        )
    }

    /// Override the type recorded for a node.
    pub fn set_node_type(&mut self, node: NodeId, ty: TypeRef) {
        self.node_types.insert(node, ty);
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

impl TypeChecker for ProgramModel {
    fn symbol_at(&self, node: NodeId) -> Option<SymbolRef> {
        self.node_symbols.get(&node).copied()
    }

    fn type_at(&self, node: NodeId) -> TypeRef {
        self.node_types
            .get(&node)
            .copied()
            .unwrap_or(Self::UNKNOWN_TYPE)
    }

    fn aliased_symbol(&self, symbol: SymbolRef) -> SymbolRef {
        let mut current = symbol;
        // Alias chains are acyclic by construction; bound the walk anyway.
        for _ in 0..self.symbols.len() {
            match self.symbol_data(current).and_then(|data| data.alias_of) {
                Some(target) => current = target,
                None => break,
            }
        }
        current
    }

    fn symbol_name(&self, symbol: SymbolRef) -> SmolStr {
        self.symbol_data(symbol)
            .map(|data| data.name.clone())
            .unwrap_or_default()
    }

    fn is_exported(&self, symbol: SymbolRef) -> bool {
        self.symbol_data(symbol)
            .is_some_and(|data| data.flags.exported)
    }

    fn is_ambient(&self, symbol: SymbolRef) -> bool {
        self.symbol_data(symbol)
            .is_some_and(|data| data.flags.ambient)
    }

    fn declaring_scope(&self, symbol: SymbolRef) -> Option<ScopeRef> {
        self.symbol_data(symbol).and_then(|data| data.scope)
    }

    fn scope_info(&self, scope: ScopeRef) -> ScopeInfo {
        self.scopes
            .get(scope.index() as usize)
            .cloned()
            .unwrap_or(ScopeInfo {
                name: SmolStr::default(),
                kind: ScopeKind::Block,
                parent: None,
                symbol: None,
            })
    }

    fn type_symbol(&self, ty: TypeRef) -> Option<SymbolRef> {
        self.type_data(ty).and_then(|data| data.symbol)
    }

    fn is_standard_library_type(&self, ty: TypeRef) -> bool {
        self.type_data(ty).is_some_and(|data| data.standard_library)
    }

    fn type_has_annotation(&self, ty: TypeRef, kind: AnnotationKind) -> bool {
        self.type_data(ty)
            .is_some_and(|data| data.annotations.contains(&kind))
    }

    fn library_declaration(&self, library: Library, name: &str) -> Option<SymbolRef> {
        self.libraries.get(&(library, SmolStr::new(name))).copied()
    }
}
