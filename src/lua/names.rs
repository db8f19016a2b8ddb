//! Lexical rules of Lua names.

/// Reserved words of every supported Lua dialect.
pub const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

pub fn is_lua_keyword(name: &str) -> bool {
    LUA_KEYWORDS.contains(&name)
}

/// `[A-Za-z_][A-Za-z0-9_]*` and not a keyword.
pub fn is_valid_lua_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !is_lua_keyword(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_shape() {
        assert!(is_valid_lua_identifier("_G"));
        assert!(is_valid_lua_identifier("x1"));
        assert!(!is_valid_lua_identifier("1x"));
        assert!(!is_valid_lua_identifier("a-b"));
        assert!(!is_valid_lua_identifier(""));
        assert!(!is_valid_lua_identifier("goto"));
    }
}
