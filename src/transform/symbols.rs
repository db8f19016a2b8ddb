//! Symbol identities.
//!
//! Every checker symbol the resolver meets gets a small integer identity the
//! first time it is seen. Later passes use identities to tell apart
//! shadowed declarations that share a spelling.

use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::base::TextRange;
use crate::checker::SymbolRef;
use crate::error::TransformError;
use crate::lua::SymbolId;

/// What is known about an allocated identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub symbol: SymbolRef,
    /// Range of the first reference that asked for this identity.
    pub first_seen: Option<TextRange>,
}

/// Append-only `symbol -> identity` map.
///
/// Identities start at 1 and are assigned in first-seen order. The map is
/// internally locked so that a symbol looked up from several places, even
/// concurrently, is only ever assigned once.
pub struct SymbolIdAllocator {
    inner: RwLock<AllocatorInner>,
    limit: u32,
}

#[derive(Default)]
struct AllocatorInner {
    ids: FxHashMap<SymbolRef, SymbolId>,
    /// Indexed by `identity - 1`.
    infos: Vec<SymbolInfo>,
}

impl Default for SymbolIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolIdAllocator {
    pub fn new() -> Self {
        Self::with_limit(u32::MAX)
    }

    /// An allocator that hands out at most `limit` identities.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            inner: RwLock::new(AllocatorInner::default()),
            limit,
        }
    }

    /// The identity of `symbol`, allocating one on first sight.
    pub fn identity_of(
        &self,
        symbol: SymbolRef,
        first_seen: Option<TextRange>,
    ) -> Result<SymbolId, TransformError> {
        // Fast path: already allocated (read lock)
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.ids.get(&symbol) {
                return Ok(id);
            }
        }

        let mut inner = self.inner.write();

        // Double-check after acquiring write lock
        if let Some(&id) = inner.ids.get(&symbol) {
            return Ok(id);
        }

        let allocated = inner.infos.len() as u32;
        if allocated >= self.limit {
            return Err(TransformError::SymbolIdsExhausted(allocated));
        }

        let id = SymbolId::new(allocated + 1);
        inner.infos.push(SymbolInfo { symbol, first_seen });
        inner.ids.insert(symbol, id);
        tracing::trace!(?symbol, ?id, "allocated symbol identity");
        Ok(id)
    }

    /// The identity already given to `symbol`, without allocating.
    pub fn lookup(&self, symbol: SymbolRef) -> Option<SymbolId> {
        self.inner.read().ids.get(&symbol).copied()
    }

    pub fn info(&self, id: SymbolId) -> Option<SymbolInfo> {
        let index = id.index().checked_sub(1)?;
        self.inner.read().infos.get(index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.read().infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SymbolIdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolIdAllocator")
            .field("len", &self.len())
            .finish()
    }
}
