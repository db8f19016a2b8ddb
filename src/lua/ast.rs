//! Lua expression nodes.
//!
//! The `Display` impls give a compact single-line rendering used for
//! debugging and tests. Real code printing (indentation, source maps,
//! statement layout) belongs to the printer, not to this module.

use std::fmt;

use smol_str::SmolStr;

use crate::base::TextRange;

use super::names::is_valid_lua_identifier;

/// Identity of a source symbol in the emitted Lua.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Reserved for the temporaries optional-chain lowering introduces.
    /// Never handed out by the allocator.
    pub const TEMP: SymbolId = SymbolId(0);

    /// Only the identity allocator mints identities.
    #[inline]
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    pub fn is_temp(self) -> bool {
        self == Self::TEMP
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spelling of the placeholder substituted for invalid identifier uses.
pub const ANONYMOUS_IDENTIFIER: &str = "____";

/// A name reference in the emitted Lua.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LuaIdentifier {
    /// The spelling emitted into Lua.
    pub text: SmolStr,
    /// The source spelling, kept for tracing and diagnostics.
    pub original_name: Option<SmolStr>,
    /// Absent for anonymous and synthetic identifiers.
    pub symbol_id: Option<SymbolId>,
    /// Source range this identifier was produced from.
    pub range: Option<TextRange>,
}

impl LuaIdentifier {
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            original_name: None,
            symbol_id: None,
            range: None,
        }
    }

    /// The `____` placeholder standing in for a rejected source identifier.
    pub fn anonymous(range: TextRange) -> Self {
        Self::new(ANONYMOUS_IDENTIFIER).with_range(range)
    }

    /// An identifier bound to the reserved temporary identity. It has no
    /// source node: the optional-chain lowering owns its meaning.
    pub fn temporary(text: impl Into<SmolStr>) -> Self {
        Self::new(text).with_symbol_id(SymbolId::TEMP)
    }

    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_symbol_id(mut self, id: SymbolId) -> Self {
        self.symbol_id = Some(id);
        self
    }

    pub fn with_original_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.text == ANONYMOUS_IDENTIFIER && self.symbol_id.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LuaBinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl LuaBinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LuaBinaryOperator::Add => "+",
            LuaBinaryOperator::Sub => "-",
            LuaBinaryOperator::Mul => "*",
            LuaBinaryOperator::Div => "/",
            LuaBinaryOperator::FloorDiv => "//",
            LuaBinaryOperator::Mod => "%",
            LuaBinaryOperator::Pow => "^",
            LuaBinaryOperator::Concat => "..",
            LuaBinaryOperator::Eq => "==",
            LuaBinaryOperator::Ne => "~=",
            LuaBinaryOperator::Lt => "<",
            LuaBinaryOperator::Le => "<=",
            LuaBinaryOperator::Gt => ">",
            LuaBinaryOperator::Ge => ">=",
            LuaBinaryOperator::BitAnd => "&",
            LuaBinaryOperator::BitOr => "|",
            LuaBinaryOperator::BitXor => "~",
            LuaBinaryOperator::Shl => "<<",
            LuaBinaryOperator::Shr => ">>",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LuaUnaryOperator {
    Neg,
    BitNot,
    Len,
    Not,
}

impl LuaUnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LuaUnaryOperator::Neg => "-",
            LuaUnaryOperator::BitNot => "~",
            LuaUnaryOperator::Len => "#",
            LuaUnaryOperator::Not => "not ",
        }
    }
}

/// A Lua expression.
#[derive(Clone, Debug, PartialEq)]
pub enum LuaExpression {
    Nil,
    /// The vararg expression `...`.
    Dots,
    Boolean(bool),
    Numeric(f64),
    String(SmolStr),
    Identifier(LuaIdentifier),
    /// `table[index]`, rendered as `table.index` when `index` is a string
    /// that is a valid Lua identifier.
    TableIndex {
        table: Box<LuaExpression>,
        index: Box<LuaExpression>,
    },
    Binary {
        operator: LuaBinaryOperator,
        left: Box<LuaExpression>,
        right: Box<LuaExpression>,
    },
    Unary {
        operator: LuaUnaryOperator,
        operand: Box<LuaExpression>,
    },
    Call {
        callee: Box<LuaExpression>,
        arguments: Vec<LuaExpression>,
    },
    /// An expression list (`a, b`), only valid where Lua accepts several
    /// values such as a `return` statement.
    Multiple(Vec<LuaExpression>),
    /// The `start, limit[, step]` header of a numeric `for` loop.
    NumericRange {
        start: Box<LuaExpression>,
        limit: Box<LuaExpression>,
        step: Option<Box<LuaExpression>>,
    },
}

impl LuaExpression {
    pub fn identifier(name: impl Into<SmolStr>) -> Self {
        LuaExpression::Identifier(LuaIdentifier::new(name))
    }

    pub fn string(value: impl Into<SmolStr>) -> Self {
        LuaExpression::String(value.into())
    }

    pub fn table_index(table: LuaExpression, index: LuaExpression) -> Self {
        LuaExpression::TableIndex {
            table: Box::new(table),
            index: Box::new(index),
        }
    }

    pub fn binary(operator: LuaBinaryOperator, left: LuaExpression, right: LuaExpression) -> Self {
        LuaExpression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: LuaUnaryOperator, operand: LuaExpression) -> Self {
        LuaExpression::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn call(callee: LuaExpression, arguments: Vec<LuaExpression>) -> Self {
        LuaExpression::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn as_identifier(&self) -> Option<&LuaIdentifier> {
        match self {
            LuaExpression::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }

    fn needs_parens(&self) -> bool {
        matches!(
            self,
            LuaExpression::Binary { .. } | LuaExpression::Unary { .. }
        )
    }
}

impl From<LuaIdentifier> for LuaExpression {
    fn from(identifier: LuaIdentifier) -> Self {
        LuaExpression::Identifier(identifier)
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &LuaExpression) -> fmt::Result {
    if operand.needs_parens() {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[LuaExpression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_string_literal(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\0' => f.write_str("\\0")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for LuaIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for LuaExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuaExpression::Nil => f.write_str("nil"),
            LuaExpression::Dots => f.write_str("..."),
            LuaExpression::Boolean(value) => write!(f, "{value}"),
            LuaExpression::Numeric(value) => {
                if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            LuaExpression::String(value) => write_string_literal(f, value),
            LuaExpression::Identifier(identifier) => write!(f, "{identifier}"),
            LuaExpression::TableIndex { table, index } => {
                match table.as_ref() {
                    LuaExpression::Identifier(_)
                    | LuaExpression::TableIndex { .. }
                    | LuaExpression::Call { .. } => write!(f, "{table}")?,
                    _ => write!(f, "({table})")?,
                }
                match index.as_ref() {
                    LuaExpression::String(key) if is_valid_lua_identifier(key) => {
                        write!(f, ".{key}")
                    }
                    _ => write!(f, "[{index}]"),
                }
            }
            LuaExpression::Binary {
                operator,
                left,
                right,
            } => {
                write_operand(f, left)?;
                write!(f, " {} ", operator.as_str())?;
                write_operand(f, right)
            }
            LuaExpression::Unary { operator, operand } => {
                f.write_str(operator.as_str())?;
                write_operand(f, operand)
            }
            LuaExpression::Call { callee, arguments } => {
                write!(f, "{callee}(")?;
                write_list(f, arguments)?;
                f.write_str(")")
            }
            LuaExpression::Multiple(values) => write_list(f, values),
            LuaExpression::NumericRange { start, limit, step } => {
                write!(f, "{start}, {limit}")?;
                if let Some(step) = step {
                    write!(f, ", {step}")?;
                }
                Ok(())
            }
        }
    }
}
