//! Fatal errors.
//!
//! Problems in user source are never errors: they are pushed as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s and transformation
//! continues. The types here are internal invariant violations that abort
//! the current compilation unit, and I/O failures while loading a config.

use smol_str::SmolStr;
use thiserror::Error;

/// An internal invariant violation that aborts the current unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("symbol identity space exhausted after {0} allocations")]
    SymbolIdsExhausted(u32),

    #[error("unknown lualib feature `{0}`")]
    UnknownFeature(SmolStr),

    #[error("scope chain of `{symbol}` does not terminate")]
    ScopeCycle { symbol: SmolStr },

    /// A language-extension call the checker let through with the wrong
    /// number of arguments.
    #[error("`{extension}` expects {expected} argument(s), found {found}")]
    ExtensionArity {
        extension: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Failure to read a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config file root must be a JSON object")]
    NotAnObject,
}
