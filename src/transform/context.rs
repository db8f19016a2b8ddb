//! Per-unit transformation state.

use crate::base::{FileId, TextRange};
use crate::checker::{SymbolRef, TypeChecker};
use crate::diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticKind};
use crate::error::TransformError;
use crate::lua::SymbolId;
use crate::lualib::{LuaLibFeature, LuaLibFeatureSet};
use crate::options::CompilerOptions;
use crate::syntax::Identifier;

use super::builtins::BuiltinTable;
use super::extensions::ExtensionRegistry;
use super::symbols::SymbolIdAllocator;

/// Declaration tables bound once per program and shared read-only by every
/// unit.
#[derive(Clone, Debug, Default)]
pub struct LibraryBindings {
    pub extensions: ExtensionRegistry,
    pub builtins: BuiltinTable,
}

impl LibraryBindings {
    pub fn bind(checker: &dyn TypeChecker) -> Self {
        Self {
            extensions: ExtensionRegistry::bind(checker),
            builtins: BuiltinTable::bind(checker),
        }
    }
}

/// Everything one compilation unit's transformation reads and writes.
///
/// The mutable parts (diagnostics, symbol identities, imported features)
/// belong to exactly one unit. Units transformed in parallel each get their
/// own context.
pub struct TransformationContext<'a> {
    pub checker: &'a dyn TypeChecker,
    pub options: &'a CompilerOptions,
    pub bindings: &'a LibraryBindings,
    pub file: FileId,
    diagnostics: DiagnosticCollector,
    symbols: SymbolIdAllocator,
    features: LuaLibFeatureSet,
}

impl<'a> TransformationContext<'a> {
    pub fn new(
        checker: &'a dyn TypeChecker,
        options: &'a CompilerOptions,
        bindings: &'a LibraryBindings,
        file: FileId,
    ) -> Self {
        Self {
            checker,
            options,
            bindings,
            file,
            diagnostics: DiagnosticCollector::new(),
            symbols: SymbolIdAllocator::new(),
            features: LuaLibFeatureSet::new(),
        }
    }

    /// Replace the symbol allocator, e.g. with a bounded one.
    pub fn with_symbol_allocator(mut self, symbols: SymbolIdAllocator) -> Self {
        self.symbols = symbols;
        self
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.add(diagnostic);
    }

    pub fn report_at(&mut self, range: TextRange, kind: DiagnosticKind) {
        self.push_diagnostic(Diagnostic::at(self.file, range, kind));
    }

    pub fn report(&mut self, identifier: &Identifier, kind: DiagnosticKind) {
        self.report_at(identifier.range, kind);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    // ========================================================================
    // SYMBOLS AND FEATURES
    // ========================================================================

    /// The identity of `symbol` in this unit.
    pub fn symbol_id(&self, symbol: SymbolRef, range: TextRange) -> Result<SymbolId, TransformError> {
        self.symbols.identity_of(symbol, Some(range))
    }

    pub fn symbols(&self) -> &SymbolIdAllocator {
        &self.symbols
    }

    /// Record that the emitted unit needs `feature`.
    pub fn import_feature(&mut self, feature: LuaLibFeature) {
        self.features.import(feature);
    }

    pub fn features(&self) -> &LuaLibFeatureSet {
        &self.features
    }

    /// Give up the unit's diagnostics and features.
    pub fn finish(self) -> (Vec<Diagnostic>, LuaLibFeatureSet) {
        let mut diagnostics = self.diagnostics;
        (diagnostics.take(), self.features)
    }
}
