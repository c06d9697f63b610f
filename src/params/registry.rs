//! Parameter registry and host boundary
//!
//! The registry maps host-assigned integer indices to typed parameters and
//! dispatches host reads and writes to the owning accessors. Indices are
//! assigned once by the host at registration and stay stable for the life
//! of the registry; entries are never removed or reassigned.

use super::parameter::{ParamKind, TypedParameter};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// Slot index assigned by the host
pub type ParamIndex = i32;

/// Host-side surface for parameter synchronization
///
/// The host owns the index space. `create_slot` must return a fresh index
/// for every call; the typed setters push current values back out.
pub trait ParameterHost: Send + Sync {
    /// Create a named slot of the given kind, returning its stable index
    fn create_slot(&self, name: &str, kind: ParamKind) -> ParamIndex;

    fn set_text(&self, index: ParamIndex, value: &str);

    fn set_int32(&self, index: ParamIndex, value: i32);

    fn set_int64(&self, index: ParamIndex, value: i64);
}

/// Errors from host-driven registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no parameter registered at index {0}")]
    UnknownIndex(ParamIndex),

    #[error("parameter '{name}' at index {index} does not hold the requested type")]
    TypeMismatch { index: ParamIndex, name: String },

    #[error("parameter '{name}' rejected the value")]
    Rejected { name: String },
}

/// Index-to-parameter map with typed dispatch
pub struct ParameterRegistry {
    host: Arc<dyn ParameterHost>,
    known: Mutex<HashMap<ParamIndex, Arc<TypedParameter>>>,
}

impl ParameterRegistry {
    pub fn new(host: Arc<dyn ParameterHost>) -> Self {
        Self {
            host,
            known: Mutex::new(HashMap::new()),
        }
    }

    /// Register a parameter with the host and remember its index
    pub fn register(&self, param: Arc<TypedParameter>) -> ParamIndex {
        let index = self.host.create_slot(param.name(), param.kind());
        debug!(
            name = param.name(),
            kind = %param.kind(),
            index,
            "Registered parameter"
        );
        self.lock_known().insert(index, param);
        index
    }

    /// Number of registered parameters
    pub fn len(&self) -> usize {
        self.lock_known().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_known().is_empty()
    }

    /// Host write of a text value
    pub fn write_text(&self, index: ParamIndex, value: &str) -> Result<(), RegistryError> {
        let param = self.lookup(index)?;
        match &*param {
            TypedParameter::Text(p) => Self::apply_write(p.name(), p.write_value(value.to_string())),
            _ => Err(Self::mismatch(index, &param)),
        }
    }

    /// Host write of a 32-bit integer value
    pub fn write_int32(&self, index: ParamIndex, value: i32) -> Result<(), RegistryError> {
        let param = self.lookup(index)?;
        match &*param {
            TypedParameter::Int32(p) => Self::apply_write(p.name(), p.write_value(value)),
            _ => Err(Self::mismatch(index, &param)),
        }
    }

    /// Host write of a 64-bit integer value
    pub fn write_int64(&self, index: ParamIndex, value: i64) -> Result<(), RegistryError> {
        let param = self.lookup(index)?;
        match &*param {
            TypedParameter::Int64(p) => Self::apply_write(p.name(), p.write_value(value)),
            _ => Err(Self::mismatch(index, &param)),
        }
    }

    /// Host read of a text value
    pub fn read_text(&self, index: ParamIndex) -> Result<String, RegistryError> {
        let param = self.lookup(index)?;
        match &*param {
            TypedParameter::Text(p) => Ok(p.read_value()),
            _ => Err(Self::mismatch(index, &param)),
        }
    }

    /// Host read of a 32-bit integer value
    pub fn read_int32(&self, index: ParamIndex) -> Result<i32, RegistryError> {
        let param = self.lookup(index)?;
        match &*param {
            TypedParameter::Int32(p) => Ok(p.read_value()),
            _ => Err(Self::mismatch(index, &param)),
        }
    }

    /// Host read of a 64-bit integer value
    pub fn read_int64(&self, index: ParamIndex) -> Result<i64, RegistryError> {
        let param = self.lookup(index)?;
        match &*param {
            TypedParameter::Int64(p) => Ok(p.read_value()),
            _ => Err(Self::mismatch(index, &param)),
        }
    }

    /// Push a parameter's current value out to the host
    ///
    /// Looked up by identity; a parameter that was never registered here is
    /// ignored.
    pub fn update_host_value(&self, param: &Arc<TypedParameter>) {
        let index = {
            let known = self.lock_known();
            match known
                .iter()
                .find(|(_, candidate)| Arc::ptr_eq(candidate, param))
            {
                Some((index, _)) => *index,
                None => {
                    warn!(name = param.name(), "Ignoring push for unregistered parameter");
                    return;
                }
            }
        };
        self.push(index, param);
    }

    /// Push every registered parameter's current value out to the host
    pub fn push_all(&self) {
        let entries: Vec<(ParamIndex, Arc<TypedParameter>)> = {
            let known = self.lock_known();
            known.iter().map(|(i, p)| (*i, Arc::clone(p))).collect()
        };
        for (index, param) in entries {
            self.push(index, &param);
        }
    }

    fn push(&self, index: ParamIndex, param: &Arc<TypedParameter>) {
        match &**param {
            TypedParameter::Text(p) => self.host.set_text(index, &p.read_value()),
            TypedParameter::Int32(p) => self.host.set_int32(index, p.read_value()),
            TypedParameter::Int64(p) => self.host.set_int64(index, p.read_value()),
        }
    }

    fn lookup(&self, index: ParamIndex) -> Result<Arc<TypedParameter>, RegistryError> {
        self.lock_known()
            .get(&index)
            .cloned()
            .ok_or(RegistryError::UnknownIndex(index))
    }

    fn apply_write(name: &str, accepted: bool) -> Result<(), RegistryError> {
        if accepted {
            Ok(())
        } else {
            warn!(name, "Parameter rejected host write");
            Err(RegistryError::Rejected {
                name: name.to_string(),
            })
        }
    }

    fn mismatch(index: ParamIndex, param: &TypedParameter) -> RegistryError {
        RegistryError::TypeMismatch {
            index,
            name: param.name().to_string(),
        }
    }

    // Accessors never run under this lock, so poisoning cannot leave the
    // map half-updated; recover instead of propagating the panic.
    fn lock_known(&self) -> std::sync::MutexGuard<'_, HashMap<ParamIndex, Arc<TypedParameter>>> {
        self.known.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
