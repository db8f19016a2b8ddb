//! Identifier resolution and the transformation context.
//!
//! The pipeline for one identifier, in precedence order:
//!
//! ```text
//! optional-chain continuation ──► temporary identifier
//! extension marker (substituting) ──► diagnostic + `____` placeholder
//! extension marker (retained), deprecated annotation ──► diagnostic, continue
//! builtin (Promise) ──► lualib entry point + feature import
//! standard-library runtime type ──► feature import, continue
//! unsafe spelling ──► mangled name
//! bound symbol ──► symbol identity
//! ```
//!
//! Reads go through [`transform_identifier_expression`] first, which handles
//! export tables, `undefined` and builtin values before deferring to
//! [`transform_identifier`].

mod builtins;
mod call;
mod classify;
mod context;
mod export;
pub mod extensions;
mod identifier;
pub mod safe_names;
mod symbols;
mod unit;

pub use builtins::{
    BuiltinSubstitution, BuiltinTable, BuiltinValue, transform_builtin_identifier_expression,
};
pub use call::{transform_call, transform_expression, transform_for_of_iterable};
pub use classify::{ClassificationResult, Notes, StandardIdentifier, classify};
pub use context::{LibraryBindings, TransformationContext};
pub use export::{EXPORTS_TABLE, ExportScope, create_exported_identifier, export_scope_of};
pub use extensions::{ExtensionRegistry, LuaOperator, MarkerKind, TableExtensionKind};
pub use identifier::{transform_identifier, transform_identifier_expression};
pub use crate::lua::SymbolId;
pub use symbols::{SymbolIdAllocator, SymbolInfo};
pub use unit::{
    SourceUnit, UnitFailure, UnitOutput, merge_features, transform_unit, transform_units,
};
