//! Source-side syntax nodes consumed by the transformation core.
//!
//! Only the node kinds the identifier resolver (and its companion call
//! path) look at are modelled here; full lowering of other node kinds is
//! done by surrounding passes.

use smol_str::SmolStr;

use crate::base::TextRange;
use crate::checker::NodeId;

/// An identifier occurrence in the source tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    pub node: NodeId,
    pub text: SmolStr,
    pub range: TextRange,
    /// Set by the optional-chaining desugaring for the synthetic
    /// continuation of a short-circuited access chain (`a?.b.c`).
    pub optional_continuation: bool,
}

impl Identifier {
    pub fn new(node: NodeId, text: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            node,
            text: text.into(),
            range,
            optional_continuation: false,
        }
    }

    /// Mark this identifier as an optional-chain continuation placeholder.
    pub fn as_optional_continuation(mut self) -> Self {
        self.optional_continuation = true;
        self
    }

    /// `undefined` is scanned as an identifier whose original keyword kind
    /// is the undefined keyword; it cannot be redeclared.
    pub fn is_undefined_keyword(&self) -> bool {
        self.text == "undefined"
    }
}

/// A call expression `callee(arguments...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpression {
    pub callee: Box<SourceExpression>,
    pub arguments: Vec<SourceExpression>,
    pub range: TextRange,
}

/// The expression forms the resolver and its call path handle.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceExpression {
    Identifier(Identifier),
    Call(CallExpression),
    /// `...expr`
    Spread(Box<SourceExpression>, TextRange),
    Numeric(f64, TextRange),
    String(SmolStr, TextRange),
}

impl SourceExpression {
    pub fn call(callee: SourceExpression, arguments: Vec<SourceExpression>, range: TextRange) -> Self {
        SourceExpression::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
            range,
        })
    }

    pub fn spread(inner: SourceExpression, range: TextRange) -> Self {
        SourceExpression::Spread(Box::new(inner), range)
    }

    pub fn range(&self) -> TextRange {
        match self {
            SourceExpression::Identifier(identifier) => identifier.range,
            SourceExpression::Call(call) => call.range,
            SourceExpression::Spread(_, range)
            | SourceExpression::Numeric(_, range)
            | SourceExpression::String(_, range) => *range,
        }
    }
}

impl From<Identifier> for SourceExpression {
    fn from(identifier: Identifier) -> Self {
        SourceExpression::Identifier(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TextSize;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    #[test]
    fn test_undefined_keyword() {
        let undefined = Identifier::new(NodeId::new(0), "undefined", range(0, 9));
        let other = Identifier::new(NodeId::new(1), "undef", range(0, 5));
        assert!(undefined.is_undefined_keyword());
        assert!(!other.is_undefined_keyword());
    }

    #[test]
    fn test_expression_range() {
        let callee = Identifier::new(NodeId::new(0), "f", range(0, 1));
        let call = SourceExpression::call(
            callee.into(),
            vec![SourceExpression::Numeric(1.0, range(2, 3))],
            range(0, 4),
        );
        assert_eq!(call.range(), range(0, 4));
    }
}
