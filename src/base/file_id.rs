//! Compilation-unit handles.

use std::fmt;

/// Handle for one compilation unit (a source file being transformed).
///
/// Every diagnostic carries the `FileId` of the unit that produced it, so
/// diagnostics from units transformed in parallel can be merged and still
/// be attributed correctly. The path itself lives with the caller.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn new(unit: u32) -> Self {
        Self(unit)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}
