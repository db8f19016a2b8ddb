//! The imported-feature set and its rendering at emission time.

use indexmap::IndexSet;

use super::LuaLibFeature;
use crate::error::TransformError;
use crate::options::LuaLibImportKind;

/// Module name the `require` import modes load.
pub const LUALIB_BUNDLE_MODULE: &str = "lualib_bundle";

/// Features requested by one compilation unit.
///
/// Insertion-ordered. A feature is only inserted after all of its
/// dependencies, so iterating the set always yields a valid emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LuaLibFeatureSet {
    features: IndexSet<LuaLibFeature>,
}

impl LuaLibFeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `feature` is needed. Returns `true` if it was not
    /// already present. Importing twice has no further effect.
    pub fn import(&mut self, feature: LuaLibFeature) -> bool {
        if self.features.contains(&feature) {
            return false;
        }
        for &dependency in feature.dependencies() {
            self.import(dependency);
        }
        self.features.insert(feature);
        tracing::debug!(feature = feature.id(), "lualib feature imported");
        true
    }

    /// Import a feature by its identifier.
    pub fn import_by_name(&mut self, id: &str) -> Result<bool, TransformError> {
        let feature: LuaLibFeature = id.parse()?;
        Ok(self.import(feature))
    }

    /// Import everything `other` holds, keeping dependency order.
    pub fn merge(&mut self, other: &LuaLibFeatureSet) {
        for feature in other.iter() {
            self.import(feature);
        }
    }

    pub fn contains(&self, feature: LuaLibFeature) -> bool {
        self.features.contains(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = LuaLibFeature> + '_ {
        self.features.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Extend<LuaLibFeature> for LuaLibFeatureSet {
    fn extend<T: IntoIterator<Item = LuaLibFeature>>(&mut self, iter: T) {
        for feature in iter {
            self.import(feature);
        }
    }
}

impl FromIterator<LuaLibFeature> for LuaLibFeatureSet {
    fn from_iter<T: IntoIterator<Item = LuaLibFeature>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Produce the Lua prelude that makes every feature in `set` available.
pub fn render_lualib(set: &LuaLibFeatureSet, kind: LuaLibImportKind) -> String {
    match kind {
        LuaLibImportKind::None => String::new(),
        LuaLibImportKind::Inline => {
            let mut out = String::new();
            for feature in set.iter() {
                out.push_str(feature.body());
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push('\n');
            }
            out
        }
        LuaLibImportKind::Require if set.is_empty() => String::new(),
        LuaLibImportKind::Require | LuaLibImportKind::Always => {
            let mut out = format!("local ____lualib = require(\"{LUALIB_BUNDLE_MODULE}\")\n");
            for name in set.iter().flat_map(|feature| feature.exports()) {
                out.push_str(&format!("local {name} = ____lualib.{name}\n"));
            }
            out
        }
    }
}
