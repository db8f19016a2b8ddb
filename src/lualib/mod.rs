//! Lua runtime library ("lualib").
//!
//! Hand-written Lua routines reproducing source-language builtins that Lua
//! lacks, and the bookkeeping that decides which of them a compilation unit
//! needs.
//!
//! - [`LuaLibFeature`] - the catalog: id, body, exported names, dependencies
//! - [`LuaLibFeatureSet`] - the per-unit record of requested features
//! - [`render_lualib`] - the prelude emitted for a feature set
//! - [`SparseArray`] - reference model of the `ArraySplice` polyfill

mod feature;
mod import;
mod splice;

pub use feature::LuaLibFeature;
pub use import::{LUALIB_BUNDLE_MODULE, LuaLibFeatureSet, render_lualib};
pub use splice::SparseArray;
