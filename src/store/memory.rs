use super::{ContactStore, StoreError};
use crate::model::{Contact, ContactFields};
use anyhow::Context;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

struct Inner {
    contacts: Vec<Contact>,
    next_id: u64,
}

/// In-memory contact store.
///
/// Records live in a `RwLock`-guarded vec; identifiers are sequential
/// starting at 1 and are never reused within a process. A poisoned lock is
/// recovered rather than propagated — the data is plain old values and a
/// panicking reader cannot leave it half-written.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                contacts: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Preload the store from a YAML seed file: a list of
    /// `{name, phone, email}` entries. Entries go through the same
    /// validation as web submissions; an invalid entry aborts startup.
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let entries: Vec<ContactFields> =
            serde_yaml::from_str(&raw).context("seed file is not a list of contacts")?;
        let store = Self::new();
        let count = entries.len();
        for entry in entries {
            store
                .create(entry)
                .map_err(|e| anyhow::anyhow!("invalid seed entry: {e}"))?;
        }
        info!(count, path = %path.display(), "seeded contact store");
        Ok(store)
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore for MemoryStore {
    fn all(&self) -> Vec<Contact> {
        self.read().contacts.clone()
    }

    fn find(&self, id: u64) -> Result<Contact, StoreError> {
        self.read()
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn create(&self, fields: ContactFields) -> Result<Contact, StoreError> {
        fields.validate().map_err(StoreError::Invalid)?;
        let mut inner = self.write();
        let contact = Contact {
            id: inner.next_id,
            name: fields.name,
            phone: fields.phone,
            email: fields.email,
        };
        inner.next_id += 1;
        inner.contacts.push(contact.clone());
        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> ContactFields {
        ContactFields {
            name: name.to_string(),
            phone: "555 0100".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    #[test]
    fn ids_are_sequential_and_stable() {
        let store = MemoryStore::new();
        let a = store.create(fields("Ada")).unwrap();
        let b = store.create(fields("Grace")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.find(1).unwrap().name, "Ada");
    }

    #[test]
    fn invalid_candidate_persists_nothing() {
        let store = MemoryStore::new();
        let err = store.create(ContactFields::default()).unwrap_err();
        match err {
            StoreError::Invalid(errors) => assert!(!errors.is_empty()),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(store.all().is_empty());
    }

    #[test]
    fn find_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.find(7), Err(StoreError::NotFound(7))));
    }

    #[test]
    fn all_returns_insertion_order() {
        let store = MemoryStore::new();
        store.create(fields("Ada")).unwrap();
        store.create(fields("Grace")).unwrap();
        let names: Vec<String> = store.all().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }
}
