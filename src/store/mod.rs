//! Contact persistence seam.
//!
//! The request handlers never touch storage directly; they hold an
//! `Arc<dyn ContactStore>` and go through the three operations the
//! application defines: `all`, `find`, `create`. The store owns validation —
//! a rejected candidate comes back as [`StoreError::Invalid`] with per-field
//! messages, which the create controller turns into a re-rendered form
//! rather than a hard failure.

mod memory;

pub use memory::MemoryStore;

use crate::model::{Contact, ContactFields, ValidationErrors};
use core::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// No record with the given identifier.
    NotFound(u64),
    /// The candidate failed validation; nothing was persisted.
    Invalid(ValidationErrors),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "contact {id} not found"),
            StoreError::Invalid(errors) => write!(f, "validation failed: {errors}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The canonical record set. Implementations own locking and id assignment.
pub trait ContactStore: Send + Sync {
    /// Every contact, in insertion order.
    fn all(&self) -> Vec<Contact>;

    /// Look up one contact by identifier.
    fn find(&self, id: u64) -> Result<Contact, StoreError>;

    /// Validate and persist a candidate, assigning its identifier.
    fn create(&self, fields: ContactFields) -> Result<Contact, StoreError>;
}
