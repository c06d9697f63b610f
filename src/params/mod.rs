//! Typed parameter synchronization
//!
//! Exposes named, typed read/write slots to an external host: parameters
//! carry owner-supplied accessors, the registry maps host-assigned indices
//! to parameters and dispatches by type.

pub mod parameter;
pub mod registry;

pub use parameter::{ParamKind, Parameter, TypedParameter};
pub use registry::{ParamIndex, ParameterHost, ParameterRegistry, RegistryError};
