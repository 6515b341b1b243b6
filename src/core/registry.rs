//! # Type registry - event type to ordered callbacks.
//!
//! ```text
//! new_type("dummy")                ──► { "dummy": [] }
//! register_callback("dummy", A)    ──► { "dummy": [A] }
//! register_callback("dummy", B)    ──► { "dummy": [A, B] }
//! callbacks("dummy")               ──► snapshot [A, B]  (worker invokes A then B)
//! ```
//!
//! ## Rules
//! - Creating a type twice fails ([`EngineError::TypeExists`]).
//! - Registering on a type never created fails ([`EngineError::UnknownType`]).
//! - The termination type is created by the engine and takes no callbacks
//!   ([`EngineError::ReservedType`]).
//! - Registration is meant to settle before steady-state dispatch. It stays safe
//!   afterwards: the worker takes a snapshot per record and holds no lock while
//!   callbacks run, so a callback may itself register.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::callbacks::CallbackRef;
use crate::error::EngineError;
use crate::events::EventType;

/// Mapping from event type to its callbacks, in registration order.
#[derive(Default)]
pub struct Registry {
    types: RwLock<HashMap<EventType, Vec<CallbackRef>>>,
}

impl Registry {
    /// Creates an empty registry (no types, not even the termination type).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` with an empty callback list.
    pub fn new_type(&self, id: impl Into<EventType>) -> Result<EventType, EngineError> {
        let ty = id.into();
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        if types.contains_key(&ty) {
            return Err(EngineError::TypeExists {
                id: ty.to_string(),
            });
        }
        types.insert(ty.clone(), Vec::new());
        Ok(ty)
    }

    /// Appends `callback` to the callbacks of `ty`.
    pub fn register_callback(&self, ty: &EventType, callback: CallbackRef) -> Result<(), EngineError> {
        if ty.is_terminate() {
            return Err(EngineError::ReservedType {
                id: ty.to_string(),
            });
        }
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        match types.get_mut(ty) {
            Some(list) => {
                list.push(callback);
                Ok(())
            }
            None => Err(EngineError::UnknownType {
                id: ty.to_string(),
            }),
        }
    }

    /// True if `id` was created with [`new_type`](Self::new_type).
    pub fn type_exists(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Snapshot of the callbacks of `ty`; `None` if the type is unknown.
    pub fn callbacks(&self, ty: &EventType) -> Option<Vec<CallbackRef>> {
        self.read().get(ty).cloned()
    }

    /// Returns sorted list of registered type names.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().map(EventType::to_string).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<EventType, Vec<CallbackRef>>> {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::CallbackFn;
    use crate::core::Engine;
    use crate::error::CallbackError;
    use crate::events::{Event, TERMINATE};
    use tokio_util::sync::CancellationToken;

    fn noop(name: &'static str) -> CallbackRef {
        CallbackFn::arc(name, |_ctx: CancellationToken, _engine: Engine, _ev: Event| async {
            Ok::<_, CallbackError>(())
        })
    }

    #[test]
    fn test_new_type_twice_fails() {
        let reg = Registry::new();
        let ty = reg.new_type("dummy").expect("first");
        assert_eq!(ty, "dummy");
        assert_eq!(
            reg.new_type("dummy"),
            Err(EngineError::TypeExists { id: "dummy".into() })
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_register_on_unknown_type_fails() {
        let reg = Registry::new();
        let err = reg
            .register_callback(&EventType::from("ghost"), noop("a"))
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownType { id: "ghost".into() });
    }

    #[test]
    fn test_terminate_is_reserved() {
        let reg = Registry::new();
        let term = reg.new_type(TERMINATE).expect("terminate type");
        assert_eq!(
            reg.register_callback(&term, noop("a")),
            Err(EngineError::ReservedType { id: TERMINATE.into() })
        );
        assert_eq!(reg.callbacks(&term).map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_callbacks_keep_registration_order() {
        let reg = Registry::new();
        let ty = reg.new_type("dummy").expect("type");
        reg.register_callback(&ty, noop("a")).expect("a");
        reg.register_callback(&ty, noop("b")).expect("b");
        reg.register_callback(&ty, noop("c")).expect("c");

        let names: Vec<String> = reg
            .callbacks(&ty)
            .expect("known type")
            .iter()
            .map(|cb| cb.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_type_exists_and_list() {
        let reg = Registry::new();
        assert!(reg.is_empty());
        reg.new_type("b").expect("b");
        reg.new_type("a").expect("a");

        assert!(reg.type_exists("a"));
        assert!(!reg.type_exists("c"));
        assert_eq!(reg.list(), vec!["a", "b"]);
        assert!(reg.callbacks(&EventType::from("c")).is_none());
    }
}
