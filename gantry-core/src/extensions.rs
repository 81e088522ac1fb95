//! Typed request extensions.
//!
//! A type-keyed map used to attach per-request state to a
//! [`RequestContext`](crate::RequestContext): plugins store what they own
//! here (the validation context, the request transaction) and actions read
//! it back by type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Container for per-request typed values, keyed by `TypeId`.
#[derive(Clone, Default)]
pub struct Extensions {
    map: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a typed value, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Insert an already-shared value without another allocation.
    pub fn insert_arc<T: Send + Sync + 'static>(&mut self, value: Arc<T>) {
        self.map.insert(TypeId::of::<T>(), value);
    }

    /// Borrow a typed value, if present.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Clone out a shared handle to a typed value, if present.
    pub fn get_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|v| v.clone().downcast::<T>().ok())
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Remove a typed value, returning the shared handle if one was stored.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<Arc<T>> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut ext = Extensions::new();
        ext.insert(42i32);
        ext.insert("hello".to_string());

        assert_eq!(ext.get::<i32>(), Some(&42));
        assert_eq!(ext.get::<String>().map(String::as_str), Some("hello"));
        assert_eq!(ext.get::<u64>(), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut ext = Extensions::new();
        ext.insert(1i32);
        ext.insert(2i32);
        assert_eq!(ext.get::<i32>(), Some(&2));
        assert_eq!(ext.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut ext = Extensions::new();
        ext.insert(7u8);
        let taken = ext.remove::<u8>();
        assert_eq!(taken.as_deref(), Some(&7));
        assert!(!ext.contains::<u8>());
        assert!(ext.remove::<u8>().is_none());
    }

    #[test]
    fn test_get_arc_shares() {
        let mut ext = Extensions::new();
        ext.insert_arc(Arc::new(5i64));
        let a = ext.get_arc::<i64>().expect("present");
        let b = ext.get_arc::<i64>().expect("present");
        assert!(Arc::ptr_eq(&a, &b));
    }
}
