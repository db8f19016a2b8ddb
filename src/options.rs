//! Compiler options for the Lua back end.
//!
//! The transformation core only ever reads a finished [`CompilerOptions`].
//! This module produces one from a config object (the `tstl` section of a
//! `tsconfig.json`) or from command-line arguments, reporting every problem
//! as a configuration diagnostic before any transformation starts.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::ConfigError;

// ============================================================================
// OPTION VALUES
// ============================================================================

/// Lua dialect to emit for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LuaTarget {
    /// Code that runs on every supported dialect.
    #[default]
    #[serde(rename = "universal")]
    Universal,
    #[serde(rename = "5.0")]
    Lua50,
    #[serde(rename = "5.1")]
    Lua51,
    #[serde(rename = "5.2")]
    Lua52,
    #[serde(rename = "5.3")]
    Lua53,
    #[serde(rename = "5.4")]
    Lua54,
    #[serde(rename = "JIT")]
    LuaJit,
}

impl LuaTarget {
    pub const CHOICES: &'static [&'static str] =
        &["universal", "5.0", "5.1", "5.2", "5.3", "5.4", "JIT"];

    pub fn as_str(self) -> &'static str {
        match self {
            LuaTarget::Universal => "universal",
            LuaTarget::Lua50 => "5.0",
            LuaTarget::Lua51 => "5.1",
            LuaTarget::Lua52 => "5.2",
            LuaTarget::Lua53 => "5.3",
            LuaTarget::Lua54 => "5.4",
            LuaTarget::LuaJit => "JIT",
        }
    }

    fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "universal" => Some(LuaTarget::Universal),
            "5.0" => Some(LuaTarget::Lua50),
            "5.1" => Some(LuaTarget::Lua51),
            "5.2" => Some(LuaTarget::Lua52),
            "5.3" => Some(LuaTarget::Lua53),
            "5.4" => Some(LuaTarget::Lua54),
            "JIT" => Some(LuaTarget::LuaJit),
            _ => None,
        }
    }

    /// Native integer operators (`//`, `&`, `|`, `~`, `<<`, `>>`).
    pub fn supports_integer_operators(self) -> bool {
        matches!(self, LuaTarget::Lua53 | LuaTarget::Lua54)
    }

    /// The expression that unpacks a table into multiple values, or `None`
    /// when the dialect is not known in advance and a runtime helper is
    /// needed.
    pub fn unpack_function(self) -> Option<&'static str> {
        match self {
            LuaTarget::Universal => None,
            LuaTarget::Lua50 | LuaTarget::Lua51 | LuaTarget::LuaJit => Some("unpack"),
            LuaTarget::Lua52 | LuaTarget::Lua53 | LuaTarget::Lua54 => Some("table.unpack"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Default,
    /// Compile as a library: external dependencies are not resolved.
    Library,
}

impl BuildMode {
    pub const CHOICES: &'static [&'static str] = &["default", "library"];
}

/// How lualib polyfills reach the emitted code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LuaLibImportKind {
    /// Emit nothing; the host environment provides the helpers.
    None,
    /// Always `require` the bundle, even when no feature was used.
    Always,
    /// Paste each used polyfill body into the file.
    Inline,
    /// `require` the bundle and bind only the used helpers.
    #[default]
    Require,
}

impl LuaLibImportKind {
    pub const CHOICES: &'static [&'static str] = &["none", "always", "inline", "require"];
}

/// Validated options. Read-only once transformation starts.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub build_mode: BuildMode,
    pub extension: Option<String>,
    pub lua_bundle: Option<String>,
    pub lua_bundle_entry: Option<String>,
    pub lua_lib_import: LuaLibImportKind,
    pub lua_target: LuaTarget,
    /// Do not inject a `self` parameter when `this` is implicitly `any`.
    pub no_implicit_self: bool,
    pub no_header: bool,
    pub source_map_traceback: bool,
    pub lua_plugins: Option<Value>,
    pub tstl_verbose: bool,
    pub no_resolve_paths: Vec<Value>,
    /// Allow try/catch inside async functions on Lua 5.1.
    pub lua51_allow_try_catch_in_async_await: bool,
}

impl CompilerOptions {
    /// The effective options as JSON, for "show config" style output.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn apply(&mut self, name: &str, value: OptionValue) {
        match (name, value) {
            ("buildMode", OptionValue::Choice(choice)) => {
                self.build_mode = if choice == "library" {
                    BuildMode::Library
                } else {
                    BuildMode::Default
                };
            }
            ("luaLibImport", OptionValue::Choice(choice)) => {
                self.lua_lib_import = match choice {
                    "none" => LuaLibImportKind::None,
                    "always" => LuaLibImportKind::Always,
                    "inline" => LuaLibImportKind::Inline,
                    _ => LuaLibImportKind::Require,
                };
            }
            ("luaTarget", OptionValue::Choice(choice)) => {
                self.lua_target = LuaTarget::from_choice(choice).unwrap_or_default();
            }
            ("extension", OptionValue::String(value)) => self.extension = Some(value),
            ("luaBundle", OptionValue::String(value)) => self.lua_bundle = Some(value),
            ("luaBundleEntry", OptionValue::String(value)) => self.lua_bundle_entry = Some(value),
            ("noImplicitSelf", OptionValue::Bool(value)) => self.no_implicit_self = value,
            ("noHeader", OptionValue::Bool(value)) => self.no_header = value,
            ("sourceMapTraceback", OptionValue::Bool(value)) => self.source_map_traceback = value,
            ("tstlVerbose", OptionValue::Bool(value)) => self.tstl_verbose = value,
            ("lua51AllowTryCatchInAsyncAwait", OptionValue::Bool(value)) => {
                self.lua51_allow_try_catch_in_async_await = value
            }
            ("luaPlugins", OptionValue::Object(value)) => self.lua_plugins = Some(value),
            ("noResolvePaths", OptionValue::Array(values)) => self.no_resolve_paths = values,
            (name, value) => {
                tracing::warn!(option = name, ?value, "option value does not fit its field");
            }
        }
    }
}

// ============================================================================
// OPTION DECLARATIONS
// ============================================================================

/// The JSON shape an option accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionType {
    Boolean,
    String,
    Object,
    Array,
    Enum(&'static [&'static str]),
}

impl OptionType {
    fn name(self) -> &'static str {
        match self {
            OptionType::Boolean => "boolean",
            // Enums are spelled as strings.
            OptionType::String | OptionType::Enum(_) => "string",
            OptionType::Object => "object",
            OptionType::Array => "array",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionDeclaration {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub option_type: OptionType,
}

const fn option(name: &'static str, option_type: OptionType) -> OptionDeclaration {
    OptionDeclaration {
        name,
        aliases: &[],
        option_type,
    }
}

/// Every option the Lua back end understands.
pub const OPTION_DECLARATIONS: &[OptionDeclaration] = &[
    option("buildMode", OptionType::Enum(BuildMode::CHOICES)),
    option("extension", OptionType::String),
    option("luaBundle", OptionType::String),
    option("luaBundleEntry", OptionType::String),
    option("luaLibImport", OptionType::Enum(LuaLibImportKind::CHOICES)),
    OptionDeclaration {
        name: "luaTarget",
        aliases: &["lt"],
        option_type: OptionType::Enum(LuaTarget::CHOICES),
    },
    option("noImplicitSelf", OptionType::Boolean),
    option("noHeader", OptionType::Boolean),
    option("sourceMapTraceback", OptionType::Boolean),
    option("luaPlugins", OptionType::Object),
    option("tstlVerbose", OptionType::Boolean),
    option("noResolvePaths", OptionType::Array),
    option("lua51AllowTryCatchInAsyncAwait", OptionType::Boolean),
];

fn find_option(name: &str) -> Option<&'static OptionDeclaration> {
    OPTION_DECLARATIONS.iter().find(|decl| decl.name == name)
}

fn find_command_line_option(name: &str, is_shorthand: bool) -> Option<&'static OptionDeclaration> {
    OPTION_DECLARATIONS.iter().find(|decl| {
        decl.name.eq_ignore_ascii_case(name)
            || (is_shorthand && decl.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name)))
    })
}

#[derive(Clone, Debug, PartialEq)]
enum OptionValue {
    Bool(bool),
    String(String),
    Object(Value),
    Array(Vec<Value>),
    Choice(&'static str),
}

/// Check a raw value against its declaration.
///
/// `Ok(None)` means an explicit `null`: the option keeps its default.
fn read_value(decl: &OptionDeclaration, value: &Value) -> Result<Option<OptionValue>, DiagnosticKind> {
    let type_error = || DiagnosticKind::CompilerOptionRequiresValueOfType {
        name: decl.name.into(),
        expected: decl.option_type.name().into(),
    };

    let value = match (decl.option_type, value) {
        (_, Value::Null) => return Ok(None),
        (OptionType::Boolean, Value::Bool(b)) => OptionValue::Bool(*b),
        (OptionType::String, Value::String(s)) => OptionValue::String(s.clone()),
        (OptionType::Object, Value::Object(_)) => OptionValue::Object(value.clone()),
        (OptionType::Array, Value::Array(items)) => OptionValue::Array(items.clone()),
        (OptionType::Enum(choices), Value::String(s)) => {
            let choice = choices
                .iter()
                .find(|choice| choice.eq_ignore_ascii_case(s))
                .ok_or_else(|| DiagnosticKind::ArgumentForOptionMustBe {
                    flag: format!("--{}", decl.name).into(),
                    choices: choices.join(", ").into(),
                })?;
            OptionValue::Choice(choice)
        }
        _ => return Err(type_error()),
    };
    Ok(Some(value))
}

// ============================================================================
// CONFIG FILES
// ============================================================================

/// Options read from a config object, with every problem found.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedConfig {
    pub options: CompilerOptions,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read the Lua back-end options from a parsed `tsconfig.json` root.
///
/// Options belong in the `tstl` object. Known options found at the root are
/// still honoured (and win over the `tstl` object) but produce a warning.
pub fn parse_config_object(raw: &Value) -> ParsedConfig {
    let mut parsed = ParsedConfig::default();
    let Some(root) = raw.as_object() else {
        return parsed;
    };

    let mut tstl: Map<String, Value> = root
        .get("tstl")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let mut has_root_level_options = false;
    for (name, value) in root {
        if name != "tstl" && find_option(name).is_some() {
            tstl.insert(name.clone(), value.clone());
            has_root_level_options = true;
        }
    }

    if has_root_level_options {
        parsed
            .diagnostics
            .push(Diagnostic::global(DiagnosticKind::OptionsMovingToTstlObject));
    }

    for (name, value) in &tstl {
        let Some(decl) = find_option(name) else {
            parsed
                .diagnostics
                .push(Diagnostic::global(DiagnosticKind::UnknownCompilerOption {
                    name: name.as_str().into(),
                }));
            continue;
        };

        match read_value(decl, value) {
            Ok(Some(value)) => parsed.options.apply(decl.name, value),
            Ok(None) => {}
            Err(kind) => parsed.diagnostics.push(Diagnostic::global(kind)),
        }
    }

    parsed
}

/// Load and read a config file.
pub fn load_config_file(path: &Path) -> Result<ParsedConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&text)?;
    if !raw.is_object() {
        return Err(ConfigError::NotAnObject);
    }
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(parse_config_object(&raw))
}

// ============================================================================
// COMMAND LINE
// ============================================================================

/// Options read from command-line arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedCommandLine {
    pub options: CompilerOptions,
    /// Bare (non-flag) arguments, in order.
    pub file_names: Vec<String>,
    /// Flags not consumed by a Lua back-end option, in order. The host
    /// compiler parses these.
    pub passthrough: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Apply command-line arguments on top of `base` (usually the config file's
/// options).
pub fn parse_command_line<S: AsRef<str>>(args: &[S], base: CompilerOptions) -> ParsedCommandLine {
    let mut parsed = ParsedCommandLine {
        options: base,
        ..ParsedCommandLine::default()
    };

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();
        let decl = arg.strip_prefix('-').and_then(|flag| match flag.strip_prefix('-') {
            Some(long) => find_command_line_option(long, false),
            None => find_command_line_option(flag, true),
        });

        let Some(decl) = decl else {
            if arg.starts_with('-') {
                parsed.passthrough.push(arg.to_owned());
            } else {
                parsed.file_names.push(arg.to_owned());
            }
            i += 1;
            continue;
        };

        let next = args.get(i + 1).map(AsRef::as_ref);
        let (result, consumed) = read_command_line_argument(decl, next);
        match result {
            Ok(Some(value)) => parsed.options.apply(decl.name, value),
            Ok(None) => {}
            Err(kind) => parsed.diagnostics.push(Diagnostic::global(kind)),
        }

        i += if consumed { 2 } else { 1 };
    }

    parsed
}

type ReadResult = Result<Option<OptionValue>, DiagnosticKind>;

fn read_command_line_argument(decl: &OptionDeclaration, next: Option<&str>) -> (ReadResult, bool) {
    if decl.option_type == OptionType::Boolean {
        // A bare boolean flag means `true`.
        return match next {
            Some("true") => (Ok(Some(OptionValue::Bool(true))), true),
            Some("false") => (Ok(Some(OptionValue::Bool(false))), true),
            _ => (Ok(Some(OptionValue::Bool(true))), false),
        };
    }

    match next {
        Some(value) => (read_value(decl, &Value::String(value.to_owned())), true),
        None => (
            Err(DiagnosticKind::CompilerOptionExpectsAnArgument {
                name: SmolStr::new(decl.name),
            }),
            false,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = CompilerOptions::default();
        assert_eq!(options.lua_target, LuaTarget::Universal);
        assert_eq!(options.lua_lib_import, LuaLibImportKind::Require);
        assert!(!options.no_implicit_self);
    }

    #[test]
    fn test_read_value_enum_case_insensitive() {
        let decl = find_option("luaTarget").unwrap();
        assert_eq!(
            read_value(decl, &json!("jit")),
            Ok(Some(OptionValue::Choice("JIT")))
        );
    }

    #[test]
    fn test_read_value_null_keeps_default() {
        let decl = find_option("noHeader").unwrap();
        assert_eq!(read_value(decl, &Value::Null), Ok(None));
    }

    #[test]
    fn test_read_value_wrong_type() {
        let decl = find_option("luaTarget").unwrap();
        assert_eq!(
            read_value(decl, &json!(5.1)),
            Err(DiagnosticKind::CompilerOptionRequiresValueOfType {
                name: "luaTarget".into(),
                expected: "string".into(),
            })
        );
    }

    #[test]
    fn test_find_command_line_option_alias_only_for_shorthand() {
        assert_eq!(find_command_line_option("lt", true).map(|d| d.name), Some("luaTarget"));
        assert_eq!(find_command_line_option("lt", false), None);
        assert_eq!(
            find_command_line_option("LUATARGET", false).map(|d| d.name),
            Some("luaTarget")
        );
    }

    #[test]
    fn test_target_capabilities() {
        assert!(LuaTarget::Lua54.supports_integer_operators());
        assert!(!LuaTarget::LuaJit.supports_integer_operators());
        assert_eq!(LuaTarget::Lua51.unpack_function(), Some("unpack"));
        assert_eq!(LuaTarget::Lua53.unpack_function(), Some("table.unpack"));
        assert_eq!(LuaTarget::Universal.unpack_function(), None);
    }
}
