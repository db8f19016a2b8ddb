//! # lunar
//!
//! Identifier resolution and name transformation for a TypeScript-to-Lua
//! compiler: every source identifier becomes a plain Lua local, an
//! export-table access, a lualib entry point, a mangled name or a
//! diagnosed placeholder.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! transform   → identifier pipeline, call path, per-unit context
//!   ↓
//! lualib      → polyfill catalog, feature sets, splice model
//!   ↓
//! options     → compiler options, config and command line
//! diagnostics → structured diagnostic records
//!   ↓
//! checker     → type-checker interface + in-memory model
//! syntax      → source identifier and expression nodes
//! lua         → target expression nodes, symbol identities, Lua names
//! error       → fatal errors
//!   ↓
//! base        → primitives (FileId, TextRange, LineIndex)
//! ```

// ============================================================================
// FOUNDATION
// ============================================================================

/// Foundation types: FileId, TextRange, LineIndex
pub mod base;

pub mod diagnostics;
pub mod error;

/// Compiler options and their config/command-line parsing
pub mod options;

// ============================================================================
// SOURCE AND TARGET MODELS
// ============================================================================

/// The type-checker collaborator
pub mod checker;

pub mod lua;
pub mod syntax;

// ============================================================================
// TRANSFORMATION
// ============================================================================

/// Lua runtime library: polyfill bodies and feature imports
pub mod lualib;

/// Identifier resolution pipeline
pub mod transform;

// Re-export commonly needed items
pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
pub use diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticKind, Severity};
pub use error::{ConfigError, TransformError};
pub use options::{CompilerOptions, LuaLibImportKind, LuaTarget};
