//! Language-extension markers.
//!
//! The language-extensions library declares pseudo-functions and types
//! (`$multi`, `$vararg`, `$range`, `LuaAddition`, `LuaTableGet`, ...) that
//! let source code express Lua features directly. Each is only meaningful in
//! one syntactic position. References are recognised by declaration
//! identity, never by spelling, so a user variable named `$multi` is just a
//! variable.

use rustc_hash::FxHashMap;

use crate::checker::{Library, SymbolRef, TypeChecker, TypeRef};
use crate::diagnostics::DiagnosticKind;
use crate::lua::{LuaBinaryOperator, LuaUnaryOperator};
use crate::options::LuaTarget;

// ============================================================================
// MARKER KINDS
// ============================================================================

/// An operator-mapping declaration (`LuaAddition`, `LuaLength`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LuaOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    Power,
    FloorDivision,
    BitwiseAnd,
    BitwiseOr,
    BitwiseExclusiveOr,
    BitwiseLeftShift,
    BitwiseRightShift,
    Concat,
    LessThan,
    GreaterThan,
    Negation,
    BitwiseNot,
    Length,
}

/// The Lua operator an operator mapping lowers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorLowering {
    Binary(LuaBinaryOperator),
    Unary(LuaUnaryOperator),
}

impl LuaOperator {
    pub const ALL: &'static [LuaOperator] = &[
        LuaOperator::Addition,
        LuaOperator::Subtraction,
        LuaOperator::Multiplication,
        LuaOperator::Division,
        LuaOperator::Modulo,
        LuaOperator::Power,
        LuaOperator::FloorDivision,
        LuaOperator::BitwiseAnd,
        LuaOperator::BitwiseOr,
        LuaOperator::BitwiseExclusiveOr,
        LuaOperator::BitwiseLeftShift,
        LuaOperator::BitwiseRightShift,
        LuaOperator::Concat,
        LuaOperator::LessThan,
        LuaOperator::GreaterThan,
        LuaOperator::Negation,
        LuaOperator::BitwiseNot,
        LuaOperator::Length,
    ];

    /// Name of the declaring type in the language-extensions library.
    pub fn declaration_name(self) -> &'static str {
        match self {
            LuaOperator::Addition => "LuaAddition",
            LuaOperator::Subtraction => "LuaSubtraction",
            LuaOperator::Multiplication => "LuaMultiplication",
            LuaOperator::Division => "LuaDivision",
            LuaOperator::Modulo => "LuaModulo",
            LuaOperator::Power => "LuaPower",
            LuaOperator::FloorDivision => "LuaFloorDivision",
            LuaOperator::BitwiseAnd => "LuaBitwiseAnd",
            LuaOperator::BitwiseOr => "LuaBitwiseOr",
            LuaOperator::BitwiseExclusiveOr => "LuaBitwiseExclusiveOr",
            LuaOperator::BitwiseLeftShift => "LuaBitwiseLeftShift",
            LuaOperator::BitwiseRightShift => "LuaBitwiseRightShift",
            LuaOperator::Concat => "LuaConcat",
            LuaOperator::LessThan => "LuaLessThan",
            LuaOperator::GreaterThan => "LuaGreaterThan",
            LuaOperator::Negation => "LuaNegation",
            LuaOperator::BitwiseNot => "LuaBitwiseNot",
            LuaOperator::Length => "LuaLength",
        }
    }

    pub fn lowering(self) -> OperatorLowering {
        use LuaBinaryOperator as B;
        use LuaUnaryOperator as U;
        match self {
            LuaOperator::Addition => OperatorLowering::Binary(B::Add),
            LuaOperator::Subtraction => OperatorLowering::Binary(B::Sub),
            LuaOperator::Multiplication => OperatorLowering::Binary(B::Mul),
            LuaOperator::Division => OperatorLowering::Binary(B::Div),
            LuaOperator::Modulo => OperatorLowering::Binary(B::Mod),
            LuaOperator::Power => OperatorLowering::Binary(B::Pow),
            LuaOperator::FloorDivision => OperatorLowering::Binary(B::FloorDiv),
            LuaOperator::BitwiseAnd => OperatorLowering::Binary(B::BitAnd),
            LuaOperator::BitwiseOr => OperatorLowering::Binary(B::BitOr),
            LuaOperator::BitwiseExclusiveOr => OperatorLowering::Binary(B::BitXor),
            LuaOperator::BitwiseLeftShift => OperatorLowering::Binary(B::Shl),
            LuaOperator::BitwiseRightShift => OperatorLowering::Binary(B::Shr),
            LuaOperator::Concat => OperatorLowering::Binary(B::Concat),
            LuaOperator::LessThan => OperatorLowering::Binary(B::Lt),
            LuaOperator::GreaterThan => OperatorLowering::Binary(B::Gt),
            LuaOperator::Negation => OperatorLowering::Unary(U::Neg),
            LuaOperator::BitwiseNot => OperatorLowering::Unary(U::BitNot),
            LuaOperator::Length => OperatorLowering::Unary(U::Len),
        }
    }

    /// Number of operands the mapping takes.
    pub fn arity(self) -> usize {
        match self.lowering() {
            OperatorLowering::Binary(_) => 2,
            OperatorLowering::Unary(_) => 1,
        }
    }

    /// Floor division and the bitwise operators only exist from Lua 5.3 on.
    pub fn is_supported_by(self, target: LuaTarget) -> bool {
        let needs_integer_operators = matches!(
            self,
            LuaOperator::FloorDivision
                | LuaOperator::BitwiseAnd
                | LuaOperator::BitwiseOr
                | LuaOperator::BitwiseExclusiveOr
                | LuaOperator::BitwiseLeftShift
                | LuaOperator::BitwiseRightShift
                | LuaOperator::BitwiseNot
        );
        !needs_integer_operators || target.supports_integer_operators()
    }
}

/// A table-extension declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableExtensionKind {
    /// `LuaTableGet(t, k)` lowers to `t[k]`.
    Get,
    /// `LuaTableHas(t, k)` lowers to `t[k] ~= nil`.
    Has,
}

impl TableExtensionKind {
    pub fn declaration_name(self) -> &'static str {
        match self {
            TableExtensionKind::Get => "LuaTableGet",
            TableExtensionKind::Has => "LuaTableHas",
        }
    }
}

/// What a reference to a language-extension declaration is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `$multi`: only valid as the callee of a call in return position.
    MultiReturn,
    OperatorMapping(LuaOperator),
    TableExtension(TableExtensionKind),
    /// `$vararg`: only valid as the operand of a spread.
    Vararg,
    /// `$range`: only valid as the iterable of a `for...of`.
    Range,
}

impl MarkerKind {
    /// Position in the classifier's check order. When one reference matches
    /// several markers the lowest rank wins.
    pub fn rank(self) -> u8 {
        match self {
            MarkerKind::MultiReturn => 0,
            MarkerKind::OperatorMapping(_) => 1,
            MarkerKind::TableExtension(_) => 2,
            MarkerKind::Vararg => 3,
            MarkerKind::Range => 4,
        }
    }

    /// Whether a bare reference is replaced by an anonymous placeholder.
    ///
    /// Markers whose only legal use is as a call callee or spread operand
    /// are. Operator mappings and table extensions keep their identity so
    /// the call path still recognises them.
    pub fn substitutes(self) -> bool {
        matches!(
            self,
            MarkerKind::MultiReturn | MarkerKind::Vararg | MarkerKind::Range
        )
    }

    /// The diagnostic a bare reference produces.
    pub fn invalid_use(self) -> DiagnosticKind {
        match self {
            MarkerKind::MultiReturn => DiagnosticKind::InvalidMultiFunctionUse,
            MarkerKind::OperatorMapping(_) => DiagnosticKind::InvalidOperatorMappingUse,
            MarkerKind::TableExtension(_) => DiagnosticKind::InvalidTableExtensionUse,
            MarkerKind::Vararg => DiagnosticKind::InvalidVarargUse,
            MarkerKind::Range => DiagnosticKind::InvalidRangeUse,
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Every language-extension declaration, by name.
pub fn extension_declarations() -> impl Iterator<Item = (&'static str, MarkerKind)> {
    let fixed = [
        ("$multi", MarkerKind::MultiReturn),
        ("$vararg", MarkerKind::Vararg),
        ("$range", MarkerKind::Range),
    ];
    let operators = LuaOperator::ALL
        .iter()
        .map(|&op| (op.declaration_name(), MarkerKind::OperatorMapping(op)));
    let tables = [TableExtensionKind::Get, TableExtensionKind::Has]
        .into_iter()
        .map(|kind| (kind.declaration_name(), MarkerKind::TableExtension(kind)));
    fixed.into_iter().chain(operators).chain(tables)
}

/// Marker kind by declaration identity.
///
/// Bound once per program from the checker's view of the
/// language-extensions library. Declarations the program does not include
/// are simply absent.
#[derive(Clone, Debug, Default)]
pub struct ExtensionRegistry {
    markers: FxHashMap<SymbolRef, MarkerKind>,
}

impl ExtensionRegistry {
    pub fn bind(checker: &dyn TypeChecker) -> Self {
        let markers: FxHashMap<_, _> = extension_declarations()
            .filter_map(|(name, kind)| {
                checker
                    .library_declaration(Library::LanguageExtensions, name)
                    .map(|symbol| (symbol, kind))
            })
            .collect();
        tracing::debug!(markers = markers.len(), "bound language extensions");
        Self { markers }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The marker a declaration is, if any.
    pub fn get(&self, symbol: SymbolRef) -> Option<MarkerKind> {
        self.markers.get(&symbol).copied()
    }

    /// Classify a reference by its bound symbol (through import aliases)
    /// and by its type's declaration.
    ///
    /// The type lookup catches user declarations typed with an extension,
    /// e.g. `declare const add: LuaAddition<number, number, number>`.
    pub fn marker_of(
        &self,
        checker: &dyn TypeChecker,
        symbol: Option<SymbolRef>,
        ty: TypeRef,
    ) -> Option<MarkerKind> {
        if self.markers.is_empty() {
            return None;
        }
        let by_symbol = symbol.and_then(|symbol| self.get(checker.aliased_symbol(symbol)));
        let by_type = checker
            .type_symbol(ty)
            .and_then(|symbol| self.get(checker.aliased_symbol(symbol)));

        match (by_symbol, by_type) {
            (Some(a), Some(b)) => Some(if b.rank() < a.rank() { b } else { a }),
            (a, b) => a.or(b),
        }
    }
}
