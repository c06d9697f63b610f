//! Typed parameter slots
//!
//! A parameter is a named slot with read/write accessors supplied by its
//! owner; the slot itself knows nothing about the registry it ends up in.
//! The closed set of host value types is a sum type, so registry dispatch
//! is checked at compile time instead of by downcasting.

use std::fmt;

/// Value kind tag used when registering a slot with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Int32,
    Int64,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParamKind::Text => "text",
            ParamKind::Int32 => "int32",
            ParamKind::Int64 => "int64",
        };
        write!(f, "{label}")
    }
}

/// Accessors for one typed slot
///
/// The write accessor returns whether the owner accepted the value;
/// read-only slots always refuse.
pub struct Parameter<T> {
    name: String,
    read: Box<dyn Fn() -> T + Send + Sync>,
    write: Box<dyn Fn(T) -> bool + Send + Sync>,
}

impl<T> Parameter<T> {
    pub fn new<R, W>(name: impl Into<String>, read: R, write: W) -> Self
    where
        R: Fn() -> T + Send + Sync + 'static,
        W: Fn(T) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            read: Box::new(read),
            write: Box::new(write),
        }
    }

    /// A slot whose writes are always refused
    pub fn read_only<R>(name: impl Into<String>, read: R) -> Self
    where
        R: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(name, read, |_| false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read_value(&self) -> T {
        (self.read)()
    }

    pub fn write_value(&self, value: T) -> bool {
        (self.write)(value)
    }
}

impl<T> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter").field("name", &self.name).finish()
    }
}

/// A parameter of one of the supported host value types
#[derive(Debug)]
pub enum TypedParameter {
    Text(Parameter<String>),
    Int32(Parameter<i32>),
    Int64(Parameter<i64>),
}

impl TypedParameter {
    pub fn name(&self) -> &str {
        match self {
            TypedParameter::Text(p) => p.name(),
            TypedParameter::Int32(p) => p.name(),
            TypedParameter::Int64(p) => p.name(),
        }
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            TypedParameter::Text(_) => ParamKind::Text,
            TypedParameter::Int32(_) => ParamKind::Int32,
            TypedParameter::Int64(_) => ParamKind::Int64,
        }
    }
}
