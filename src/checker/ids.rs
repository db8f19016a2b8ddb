//! Opaque handles handed out by the type checker.
//!
//! The transformation core never looks inside these; it only compares,
//! hashes and passes them back to the [`TypeChecker`](super::TypeChecker).

use std::fmt;

macro_rules! checker_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

checker_handle!(
    /// One declaration site. Unique per declaration, not per reference.
    SymbolRef,
    "SymbolRef"
);

checker_handle!(
    /// A static type as computed by the checker.
    TypeRef,
    "TypeRef"
);

checker_handle!(
    /// A lexical scope: source file, namespace, function or block.
    ScopeRef,
    "ScopeRef"
);

checker_handle!(
    /// A syntax node in the source tree.
    NodeId,
    "NodeId"
);
