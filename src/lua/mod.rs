//! Target-language (Lua) syntax produced by the resolver.

mod ast;
mod names;

pub use ast::{
    ANONYMOUS_IDENTIFIER, LuaBinaryOperator, LuaExpression, LuaIdentifier, LuaUnaryOperator,
    SymbolId,
};
pub use names::{LUA_KEYWORDS, is_lua_keyword, is_valid_lua_identifier};
