//! Per-type record of which tables have been ensured.
//!
//! Each record type gets one flag, created on first use. Once a flag is set
//! it never clears for the lifetime of the registry, so the schema
//! statement for a type runs at most once per registry unless two callers
//! race on the very first use. The statement is idempotent, which makes
//! that race harmless.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use lite_orm_core::Record;

/// Tracks which record types already have their table.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    flags: Mutex<HashMap<TypeId, Arc<AtomicBool>>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn flag<R: Record>(&self) -> Arc<AtomicBool> {
        let mut flags = self.flags.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(flags.entry(TypeId::of::<R>()).or_default())
    }

    /// Returns `true` once the table for `R` has been ensured.
    pub fn is_ensured<R: Record>(&self) -> bool {
        self.flag::<R>().load(Ordering::Acquire)
    }

    /// Marks the table for `R` as ensured. Returns `true` if it was not
    /// marked before.
    pub fn mark_ensured<R: Record>(&self) -> bool {
        !self.flag::<R>().swap(true, Ordering::AcqRel)
    }

    /// Number of record types seen so far, ensured or not.
    pub fn len(&self) -> usize {
        self.flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no record type has been seen.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    lite_orm_core::record! {
        #[derive(Default)]
        struct Alpha {
            id: i64,
        }
    }

    lite_orm_core::record! {
        #[derive(Default)]
        struct Beta {
            id: i64,
        }
    }

    #[test]
    fn test_flags_are_per_type() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.is_ensured::<Alpha>());

        assert!(registry.mark_ensured::<Alpha>());
        assert!(registry.is_ensured::<Alpha>());
        assert!(!registry.is_ensured::<Beta>());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_mark_reports_first_call_only() {
        let registry = SchemaRegistry::new();
        assert!(registry.mark_ensured::<Beta>());
        assert!(!registry.mark_ensured::<Beta>());
        assert!(registry.is_ensured::<Beta>());
    }

    #[test]
    fn test_concurrent_marks_have_one_winner() {
        let registry = Arc::new(SchemaRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.mark_ensured::<Alpha>())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
