//! Deciding whether a source spelling can be emitted verbatim, and mangling
//! it when it cannot.
//!
//! Mangled names all start with [`MANGLE_PREFIX`]. Source names with that
//! prefix are themselves mangled, so a mangled name can never coincide with
//! a name kept as written.

use crate::checker::SymbolRef;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
pub use crate::lua::{LUA_KEYWORDS, is_lua_keyword, is_valid_lua_identifier};
use crate::syntax::Identifier;

use super::TransformationContext;

/// Prefix every mangled name starts with.
pub const MANGLE_PREFIX: &str = "____";

/// Globals the emitted code and lualib rely on. A user declaration with one
/// of these names would shadow them.
pub const LUA_BUILTINS: &[&str] = &[
    "_G",
    "assert",
    "coroutine",
    "debug",
    "error",
    "getmetatable",
    "ipairs",
    "math",
    "next",
    "pairs",
    "pcall",
    "print",
    "rawequal",
    "rawget",
    "rawlen",
    "rawset",
    "require",
    "select",
    "setmetatable",
    "string",
    "table",
    "tonumber",
    "tostring",
    "type",
    "unpack",
    "xpcall",
];

pub fn is_lua_builtin(name: &str) -> bool {
    LUA_BUILTINS.contains(&name)
}

/// Whether `name` cannot be emitted as written: not a Lua identifier, or a
/// global the emitted code relies on.
pub fn is_unsafe_name(name: &str) -> bool {
    !is_valid_lua_identifier(name) || is_lua_builtin(name)
}

/// Whether a source spelling must be mangled. Unsafe names are, and so are
/// names in the reserved [`MANGLE_PREFIX`] namespace, so that a name kept as
/// written never coincides with a mangled one.
pub fn needs_mangling(name: &str) -> bool {
    is_unsafe_name(name) || name.starts_with(MANGLE_PREFIX)
}

/// Mangle `name` into a valid, non-keyword Lua identifier.
///
/// Every character outside `[A-Za-z0-9]` (`_` included) becomes
/// `_<HEX>_`, upper-case hex of its code point. Since `_` itself is
/// escaped, the encoding reads back unambiguously and distinct inputs never
/// collide.
pub fn create_safe_name(name: &str) -> String {
    let mut out = String::with_capacity(MANGLE_PREFIX.len() + name.len());
    out.push_str(MANGLE_PREFIX);
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push_str(&format!("_{:X}_", c as u32));
        }
    }
    out
}

/// Whether the identifier's final spelling must be mangled.
///
/// Ambient declarations exist on the Lua side under their own name, so they
/// are kept verbatim whenever Lua can spell them at all. An ambient name Lua
/// cannot spell is reported and mangled anyway.
pub fn has_unsafe_identifier_name(
    ctx: &mut TransformationContext<'_>,
    identifier: &Identifier,
    symbol: Option<SymbolRef>,
) -> bool {
    let Some(symbol) = symbol else {
        return needs_mangling(&identifier.text);
    };

    let name = ctx.checker.symbol_name(symbol);
    if ctx.checker.is_ambient(symbol) {
        if is_valid_lua_identifier(&name) {
            return false;
        }
        ctx.push_diagnostic(Diagnostic::at(
            ctx.file,
            identifier.range,
            DiagnosticKind::InvalidAmbientIdentifierName { name },
        ));
        return true;
    }

    needs_mangling(&name)
}
