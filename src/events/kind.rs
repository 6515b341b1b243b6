//! # Event type identifiers.
//!
//! [`EventType`] is the routing key of the engine: the registry maps each type
//! to an ordered list of callbacks, and the dispatch worker looks every emitted
//! record up by its type.
//!
//! One identifier is reserved: [`TERMINATE`] is registered by the engine at
//! initialization and carries the shutdown signal to the worker.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identifier of the internal termination type.
pub const TERMINATE: &str = "internal:evt:term";

/// String-like token naming a class of events.
///
/// Cheap to clone (`Arc<str>` inside), hashable, and comparable with `&str`.
///
/// # Example
/// ```
/// use eventpool::EventType;
///
/// let ty = EventType::from("dummy");
/// assert_eq!(ty.as_str(), "dummy");
/// assert!(!ty.is_terminate());
/// assert!(EventType::terminate().is_terminate());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(Arc<str>);

impl EventType {
    /// Creates a type from any string-like value.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The reserved termination type.
    pub fn terminate() -> Self {
        Self::new(TERMINATE)
    }

    /// True for the reserved termination type.
    #[inline]
    pub fn is_terminate(&self) -> bool {
        &*self.0 == TERMINATE
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventType({:?})", &*self.0)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventType {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventType {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&EventType> for EventType {
    fn from(ty: &EventType) -> Self {
        ty.clone()
    }
}

impl Borrow<str> for EventType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EventType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EventType {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for EventType {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_terminate_is_detected_by_value() {
        assert!(EventType::from(TERMINATE).is_terminate());
        assert!(!EventType::from("internal:evt:other").is_terminate());
    }

    #[test]
    fn test_lookup_by_str_in_map() {
        let mut map = HashMap::new();
        map.insert(EventType::from("dummy"), 1);
        assert_eq!(map.get("dummy"), Some(&1));
        assert!(!map.contains_key("ghost"));
    }

    #[test]
    fn test_display_and_debug() {
        let ty = EventType::from(String::from("net:rx"));
        assert_eq!(ty.to_string(), "net:rx");
        assert_eq!(format!("{ty:?}"), "EventType(\"net:rx\")");
        assert_eq!(ty, "net:rx");
    }
}
