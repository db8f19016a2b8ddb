//! The polyfill catalog.
//!
//! Each [`LuaLibFeature`] names one hand-written Lua routine (or a small
//! family of them) reproducing a source-language builtin. Bodies are
//! compiled into the crate from `lua/*.lua`.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::error::TransformError;

/// A runtime polyfill the emitted Lua may need.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LuaLibFeature {
    ArrayPush,
    ArraySplice,
    Class,
    ClassExtends,
    Error,
    FunctionBind,
    InstanceOf,
    Iterator,
    Map,
    New,
    Promise,
    Set,
    Symbol,
    Unpack,
    WeakMap,
    WeakSet,
}

impl LuaLibFeature {
    pub const ALL: &'static [LuaLibFeature] = &[
        LuaLibFeature::ArrayPush,
        LuaLibFeature::ArraySplice,
        LuaLibFeature::Class,
        LuaLibFeature::ClassExtends,
        LuaLibFeature::Error,
        LuaLibFeature::FunctionBind,
        LuaLibFeature::InstanceOf,
        LuaLibFeature::Iterator,
        LuaLibFeature::Map,
        LuaLibFeature::New,
        LuaLibFeature::Promise,
        LuaLibFeature::Set,
        LuaLibFeature::Symbol,
        LuaLibFeature::Unpack,
        LuaLibFeature::WeakMap,
        LuaLibFeature::WeakSet,
    ];

    /// Stable feature identifier, also the file stem of its body.
    pub fn id(self) -> &'static str {
        match self {
            LuaLibFeature::ArrayPush => "ArrayPush",
            LuaLibFeature::ArraySplice => "ArraySplice",
            LuaLibFeature::Class => "Class",
            LuaLibFeature::ClassExtends => "ClassExtends",
            LuaLibFeature::Error => "Error",
            LuaLibFeature::FunctionBind => "FunctionBind",
            LuaLibFeature::InstanceOf => "InstanceOf",
            LuaLibFeature::Iterator => "Iterator",
            LuaLibFeature::Map => "Map",
            LuaLibFeature::New => "New",
            LuaLibFeature::Promise => "Promise",
            LuaLibFeature::Set => "Set",
            LuaLibFeature::Symbol => "Symbol",
            LuaLibFeature::Unpack => "Unpack",
            LuaLibFeature::WeakMap => "WeakMap",
            LuaLibFeature::WeakSet => "WeakSet",
        }
    }

    /// Lua source defining every name in [`exports`](Self::exports).
    pub fn body(self) -> &'static str {
        match self {
            LuaLibFeature::ArrayPush => include_str!("lua/ArrayPush.lua"),
            LuaLibFeature::ArraySplice => include_str!("lua/ArraySplice.lua"),
            LuaLibFeature::Class => include_str!("lua/Class.lua"),
            LuaLibFeature::ClassExtends => include_str!("lua/ClassExtends.lua"),
            LuaLibFeature::Error => include_str!("lua/Error.lua"),
            LuaLibFeature::FunctionBind => include_str!("lua/FunctionBind.lua"),
            LuaLibFeature::InstanceOf => include_str!("lua/InstanceOf.lua"),
            LuaLibFeature::Iterator => include_str!("lua/Iterator.lua"),
            LuaLibFeature::Map => include_str!("lua/Map.lua"),
            LuaLibFeature::New => include_str!("lua/New.lua"),
            LuaLibFeature::Promise => include_str!("lua/Promise.lua"),
            LuaLibFeature::Set => include_str!("lua/Set.lua"),
            LuaLibFeature::Symbol => include_str!("lua/Symbol.lua"),
            LuaLibFeature::Unpack => include_str!("lua/Unpack.lua"),
            LuaLibFeature::WeakMap => include_str!("lua/WeakMap.lua"),
            LuaLibFeature::WeakSet => include_str!("lua/WeakSet.lua"),
        }
    }

    /// Names the body binds, entry point first.
    pub fn exports(self) -> &'static [&'static str] {
        match self {
            LuaLibFeature::ArrayPush => &["__TS__ArrayPush"],
            LuaLibFeature::ArraySplice => &["__TS__ArraySplice"],
            LuaLibFeature::Class => &["__TS__Class"],
            LuaLibFeature::ClassExtends => &["__TS__ClassExtends"],
            LuaLibFeature::Error => &[
                "Error",
                "RangeError",
                "ReferenceError",
                "SyntaxError",
                "TypeError",
                "URIError",
            ],
            LuaLibFeature::FunctionBind => &["__TS__FunctionBind"],
            LuaLibFeature::InstanceOf => &["__TS__InstanceOf"],
            LuaLibFeature::Iterator => &["__TS__Iterator"],
            LuaLibFeature::Map => &["Map"],
            LuaLibFeature::New => &["__TS__New"],
            LuaLibFeature::Promise => &["__TS__Promise"],
            LuaLibFeature::Set => &["Set"],
            LuaLibFeature::Symbol => &["__TS__Symbol", "Symbol"],
            LuaLibFeature::Unpack => &["__TS__Unpack"],
            LuaLibFeature::WeakMap => &["WeakMap"],
            LuaLibFeature::WeakSet => &["WeakSet"],
        }
    }

    /// The public name call sites bind to.
    pub fn entry_point(self) -> &'static str {
        self.exports()[0]
    }

    /// Features this body references. Must be imported first.
    pub fn dependencies(self) -> &'static [LuaLibFeature] {
        use LuaLibFeature::*;
        match self {
            Error => &[Class, ClassExtends, New],
            InstanceOf => &[Symbol],
            Iterator => &[Symbol],
            Map | Set | WeakMap | WeakSet => &[Class, Iterator, Symbol],
            Promise => &[ArrayPush, Class, FunctionBind, InstanceOf, New],
            ArrayPush | ArraySplice | Class | ClassExtends | FunctionBind | New | Symbol
            | Unpack => &[],
        }
    }
}

impl fmt::Display for LuaLibFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LuaLibFeature {
    type Err = TransformError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        LuaLibFeature::ALL
            .iter()
            .copied()
            .find(|feature| feature.id() == id)
            .ok_or_else(|| TransformError::UnknownFeature(SmolStr::new(id)))
    }
}
